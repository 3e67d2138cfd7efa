// Export our modules for use in the binary and integration tests
pub mod api;
pub mod app;
pub mod cache;
pub mod chart;
pub mod cli;
pub mod config;
pub mod countries;
pub mod domain;
pub mod error;
pub mod event;
pub mod format;
pub mod logging;
pub mod map;
pub mod terminal;
pub mod ui;

pub use api::TrendsGateway;
pub use error::{MapError, TrendsError};
