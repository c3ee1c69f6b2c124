pub mod outcome;
pub mod payload;
