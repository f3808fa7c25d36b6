//! City selection by name or location, and inline city search.

use std::sync::Arc;

use answer_chain::text_to_sender;
use async_trait::async_trait;
use qbot_core::{
    Answer, BotError, Endpoint, Result, TgRequest, Update, UserStateRepository, UserStep,
};
use serde_json::json;
use storage::{City, CityRepository, UserRepository};
use tracing::info;

/// Picks the city named in the message (or nearest to the sent location), stores it for
/// the user and ends the city search.
#[derive(Clone)]
pub struct ChangeCity {
    cities: CityRepository,
    users: UserRepository,
    states: Arc<dyn UserStateRepository>,
}

impl ChangeCity {
    pub fn new(
        cities: CityRepository,
        users: UserRepository,
        states: Arc<dyn UserStateRepository>,
    ) -> Self {
        Self {
            cities,
            users,
            states,
        }
    }

    async fn find(&self, update: &Update) -> Result<City> {
        let city = match (update.text(), update.coordinates()) {
            (Some(name), _) => self.cities.search_by_name(name).await?.into_iter().next(),
            (None, Some(coordinates)) => self.cities.nearest(coordinates).await?,
            (None, None) => None,
        };
        city.ok_or(BotError::CityNotSupported)
    }
}

#[async_trait]
impl Answer for ChangeCity {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let city = self.find(update).await?;
        self.users.update_city(chat_id, &city.city_id).await?;
        self.states.change_step(chat_id, UserStep::Nothing).await?;
        info!(chat_id, city = %city.name, "City changed");

        text_to_sender(format!(
            "Вам будет приходить время намаза для города {}",
            city.name
        ))
        .build(update)
        .await
    }
}

/// Answers an inline query with the matching city names as article results.
#[derive(Clone)]
pub struct InlineCityQuery {
    cities: CityRepository,
}

impl InlineCityQuery {
    pub fn new(cities: CityRepository) -> Self {
        Self { cities }
    }
}

#[async_trait]
impl Answer for InlineCityQuery {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let query_id = update
            .inline_query_id()
            .ok_or_else(|| BotError::MalformedUpdate("inline query id missing".to_string()))?;
        let cities = self
            .cities
            .search_by_name(update.inline_query().unwrap_or_default())
            .await?;
        let results: Vec<_> = cities
            .iter()
            .map(|city| {
                json!({
                    "type": "article",
                    "id": city.city_id,
                    "title": city.name,
                    "input_message_content": { "message_text": city.name },
                })
            })
            .collect();

        Ok(vec![TgRequest::new(Endpoint::AnswerInlineQuery)
            .with_param("inline_query_id", query_id)
            .with_param("results", serde_json::to_string(&results)?)])
    }
}
