pub mod row;
pub mod transform;
