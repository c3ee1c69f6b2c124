pub mod customer;
pub mod scored;
