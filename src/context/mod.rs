pub mod builder;
pub mod filters;
pub mod message;
