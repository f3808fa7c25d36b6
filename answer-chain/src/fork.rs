//! Ordered guarded dispatch.
//!
//! A [`Fork`] holds `(Guard, Answer)` routes. Guards are evaluated strictly in declaration
//! order; the first satisfied guard's answer is built and returned, nothing after it is
//! evaluated. Guards never write anything: the only I/O a guard may do is reading the
//! chat's [`UserStep`], and that read happens at most once per dispatch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Answer, BotError, Result, TgRequest, Update, UserStateRepository, UserStep};
use regex::Regex;
use tracing::{debug, info, instrument};

/// What the update payload must look like for a route to fire.
#[derive(Debug, Clone)]
enum Payload {
    Any,
    Message,
    MessageText(Regex),
    CallbackData(Regex),
    InlineQuery,
    Location,
}

/// Route predicate: a payload match, optionally gated by the chat's current step.
#[derive(Debug, Clone)]
pub struct Guard {
    payload: Payload,
    step: Option<UserStep>,
}

impl Guard {
    fn payload(payload: Payload) -> Self {
        Self {
            payload,
            step: None,
        }
    }

    /// Regex searched in the message text.
    pub fn message_text(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self::payload(Payload::MessageText(Regex::new(pattern)?)))
    }

    /// Regex searched in the callback data of a button press.
    pub fn callback_data(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self::payload(Payload::CallbackData(Regex::new(pattern)?)))
    }

    /// Any message carrying text or a location.
    pub fn message() -> Self {
        Self::payload(Payload::Message)
    }

    pub fn location() -> Self {
        Self::payload(Payload::Location)
    }

    pub fn inline_query() -> Self {
        Self::payload(Payload::InlineQuery)
    }

    /// Matches every update whose chat is in `step`.
    pub fn step(step: UserStep) -> Self {
        Self {
            payload: Payload::Any,
            step: Some(step),
        }
    }

    /// Gates this guard: it only matches while the chat is in `step`.
    pub fn in_step(mut self, step: UserStep) -> Self {
        self.step = Some(step);
        self
    }

    fn payload_matches(&self, update: &Update) -> bool {
        match &self.payload {
            Payload::Any => true,
            Payload::Message => update.text().is_some() || update.coordinates().is_some(),
            Payload::MessageText(regex) => update.text().is_some_and(|text| regex.is_match(text)),
            Payload::CallbackData(regex) => update
                .callback_data()
                .is_some_and(|data| regex.is_match(data)),
            Payload::InlineQuery => update.is_inline_query(),
            Payload::Location => update.coordinates().is_some(),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Any => f.write_str("any")?,
            Payload::Message => f.write_str("message")?,
            Payload::MessageText(regex) => write!(f, "text~/{}/", regex.as_str())?,
            Payload::CallbackData(regex) => write!(f, "callback~/{}/", regex.as_str())?,
            Payload::InlineQuery => f.write_str("inline_query")?,
            Payload::Location => f.write_str("location")?,
        }
        if let Some(step) = self.step {
            write!(f, " @{}", step)?;
        }
        Ok(())
    }
}

/// Result of routing: either a route handled the update, or no route wanted it.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Handled(Vec<TgRequest>),
    Unhandled,
}

/// Dispatches an update to at most one route.
#[async_trait]
pub trait Router: Send + Sync {
    async fn dispatch(&self, update: &Update) -> Result<Routed>;
}

#[derive(Clone)]
struct Route {
    guard: Guard,
    answer: Arc<dyn Answer>,
}

/// Pattern router: first satisfied guard wins, declaration order is the only tie-break.
#[derive(Clone)]
pub struct Fork {
    routes: Vec<Route>,
    states: Arc<dyn UserStateRepository>,
}

impl Fork {
    /// Creates an empty fork; `states` is consulted only by step-gated guards.
    pub fn new(states: Arc<dyn UserStateRepository>) -> Self {
        Self {
            routes: Vec::new(),
            states,
        }
    }

    /// Appends a route. Routes are tried in the order they are added.
    pub fn route(mut self, guard: Guard, answer: impl Answer + 'static) -> Self {
        self.routes.push(Route {
            guard,
            answer: Arc::new(answer),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    async fn guard_matches(
        &self,
        guard: &Guard,
        update: &Update,
        current_step: &mut Option<UserStep>,
    ) -> Result<bool> {
        if !guard.payload_matches(update) {
            return Ok(false);
        }
        let Some(required) = guard.step else {
            return Ok(true);
        };
        let step = match *current_step {
            Some(step) => step,
            None => {
                let step = self.states.step(update.chat_id()?).await?;
                *current_step = Some(step);
                step
            }
        };
        Ok(step == required)
    }
}

#[async_trait]
impl Router for Fork {
    #[instrument(skip(self, update), fields(update_id = ?update.update_id()))]
    async fn dispatch(&self, update: &Update) -> Result<Routed> {
        let mut current_step = None;
        for (index, route) in self.routes.iter().enumerate() {
            if !self.guard_matches(&route.guard, update, &mut current_step).await? {
                continue;
            }
            debug!(route = index, guard = %route.guard, "step: route matched");
            let requests = route.answer.build(update).await?;
            debug!(route = index, requests = requests.len(), "step: route answered");
            return Ok(Routed::Handled(requests));
        }
        info!(routes = self.routes.len(), "step: no route matched update");
        Ok(Routed::Unhandled)
    }
}

#[async_trait]
impl Answer for Fork {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        match self.dispatch(update).await? {
            Routed::Handled(requests) => Ok(requests),
            Routed::Unhandled => Err(BotError::Unhandled),
        }
    }
}
