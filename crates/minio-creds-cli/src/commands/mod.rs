//! Command implementations

pub mod statement;
pub mod username;
pub mod validate;
