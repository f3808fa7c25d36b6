//! Step-writing and step-gated answers.

use std::sync::Arc;

use async_trait::async_trait;
use qbot_core::{Answer, Result, TgRequest, Update, UserStateRepository, UserStep};
use tracing::{debug, instrument};

/// Writes `step` for the update's chat, then delegates. The write happens first, so the
/// new step is already visible while the inner answer builds.
#[derive(Clone)]
pub struct ChangeState {
    origin: Arc<dyn Answer>,
    states: Arc<dyn UserStateRepository>,
    step: UserStep,
}

impl ChangeState {
    pub fn new(
        origin: impl Answer + 'static,
        states: Arc<dyn UserStateRepository>,
        step: UserStep,
    ) -> Self {
        Self {
            origin: Arc::new(origin),
            states,
            step,
        }
    }
}

#[async_trait]
impl Answer for ChangeState {
    #[instrument(skip(self, update), fields(step = %self.step))]
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        self.states.change_step(update.chat_id()?, self.step).await?;
        self.origin.build(update).await
    }
}

/// [`ChangeState`] back to [`UserStep::Nothing`], for answers that end any pending flow
/// whatever their outcome, such as a podcast reaction.
///
/// The reset is written before the inner answer runs. A flow that must keep its step when
/// the answer fails (the city search on an unsupported city) resets inline after success
/// instead.
#[derive(Clone)]
pub struct ResetState(ChangeState);

impl ResetState {
    pub fn new(origin: impl Answer + 'static, states: Arc<dyn UserStateRepository>) -> Self {
        Self(ChangeState::new(origin, states, UserStep::Nothing))
    }
}

#[async_trait]
impl Answer for ResetState {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        self.0.build(update).await
    }
}

/// Builds the inner answer only while the chat is in `step`; otherwise yields no requests.
///
/// The empty result is terminal: it is not [`qbot_core::BotError::Unhandled`] and an
/// enclosing router does not go on to try other routes.
#[derive(Clone)]
pub struct StepGate {
    step: UserStep,
    origin: Arc<dyn Answer>,
    states: Arc<dyn UserStateRepository>,
}

impl StepGate {
    pub fn new(
        step: UserStep,
        origin: impl Answer + 'static,
        states: Arc<dyn UserStateRepository>,
    ) -> Self {
        Self {
            step,
            origin: Arc::new(origin),
            states,
        }
    }
}

#[async_trait]
impl Answer for StepGate {
    async fn build(&self, update: &Update) -> Result<Vec<TgRequest>> {
        let chat_id = update.chat_id()?;
        let current = self.states.step(chat_id).await?;
        if current != self.step {
            debug!(chat_id, current = %current, expected = %self.step, "Step gate closed");
            return Ok(Vec::new());
        }
        self.origin.build(update).await
    }
}
