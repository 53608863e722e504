pub mod markdown;
pub mod phrases;
pub mod sink;
