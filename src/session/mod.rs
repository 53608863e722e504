pub mod history;
pub mod recall;
