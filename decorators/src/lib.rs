//! Answer decorators with side effects on per-chat state.
//!
//! - [`ChangeState`] / [`ResetState`] – write the chat's step, then build the inner answer
//! - [`StepGate`] – build the inner answer only while the chat is in a given step
//! - [`CachedSearchQuery`] – remember the message text as the chat's search query
//! - [`UserFacingSafe`] – turn domain-not-found failures into an explanatory reply

mod search_query;
mod state;
mod user_facing;

#[cfg(test)]
mod test;

pub use search_query::CachedSearchQuery;
pub use state::{ChangeState, ResetState, StepGate};
pub use user_facing::UserFacingSafe;
