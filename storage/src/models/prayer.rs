//! Prayer times of a city and the per-user read marks.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Stored prayer names, in the order of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Sunrise => "sunrise",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha'a",
        }
    }

    /// Label shown in the prayer times message.
    pub fn title(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Иртәнге",
            PrayerName::Sunrise => "Восход",
            PrayerName::Dhuhr => "Өйлә",
            PrayerName::Asr => "Икенде",
            PrayerName::Maghrib => "Ахшам",
            PrayerName::Isha => "Ястү",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == value)
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Prayer {
    pub prayer_id: i64,
    pub name: String,
    pub time: NaiveTime,
    pub city_id: String,
    pub city_name: String,
    pub day: NaiveDate,
}

impl Prayer {
    pub fn prayer_name(&self) -> Option<PrayerName> {
        PrayerName::parse(&self.name)
    }
}

/// A user's read mark for one prayer.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserPrayer {
    pub prayer_at_user_id: i64,
    pub prayer_id: i64,
    pub is_read: bool,
}
