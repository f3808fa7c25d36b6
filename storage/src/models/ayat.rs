//! Ayat joined with its sura link.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ayat {
    pub ayat_id: i64,
    pub sura_num: i64,
    pub sura_link: String,
    /// Number inside the sura; may be a range ("1-7") or a list ("3,4").
    pub ayat_num: String,
    pub arab_text: String,
    pub content: String,
    pub transliteration: String,
}

impl Ayat {
    /// HTML message body.
    pub fn text(&self) -> String {
        format!(
            "<a href=\"https://umma.ru{}\">{}:{})</a>\n{}\n\n{}\n\n<i>{}</i>",
            self.sura_link,
            self.sura_num,
            self.ayat_num,
            self.arab_text,
            self.content,
            self.transliteration
        )
    }

    /// Whether `number` falls into this row's `ayat_num` ("5", "1-7" or "3,4").
    pub fn covers(&self, number: i64) -> bool {
        let num = self.ayat_num.trim();
        if let Some((start, end)) = num.split_once('-') {
            return match (start.trim().parse::<i64>(), end.trim().parse::<i64>()) {
                (Ok(start), Ok(end)) => (start..=end).contains(&number),
                _ => false,
            };
        }
        num.split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .any(|n| n == number)
    }
}
