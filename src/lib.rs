//! cellmate library — token-budgeted context windows and streamed notebook suggestions.

pub mod assist;
pub mod config;
pub mod context;
pub mod display;
pub mod errors;
pub mod providers;
pub mod session;
pub mod tokens;
