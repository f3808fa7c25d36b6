//! # quranbot
//!
//! Application crate: configuration from the environment, component wiring, the route
//! table ([`QuranbotAnswer`]) and the CLI entry points.

pub mod cli;
pub mod components;
pub mod config;
pub mod routes;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_components, BotComponents};
pub use config::BotConfig;
pub use routes::{QuranbotAnswer, CHANGE_CITY_TEXT, SEARCH_PROMPT_TEXT};
pub use runner::{init_db, run_bot};
