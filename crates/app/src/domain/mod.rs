//! Threadline Domain Concerns

pub mod orders;
pub mod users;
