//! Integration test utilities for the PayFeed API
//!
//! Spawns the real server against a PostgreSQL database and drives it over
//! HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
