//! Shared infrastructure for database-backed tests.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
