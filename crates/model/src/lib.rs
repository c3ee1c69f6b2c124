pub mod core;
pub mod prediction;
pub mod records;
