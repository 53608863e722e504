pub mod encoder;
pub mod estimate;
pub mod limits;
pub mod retain;
pub mod trim;
