//! base traits shared between the id types and generators of kflake

pub mod traits;
