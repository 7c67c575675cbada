//! Integration test utilities for the community bot
//!
//! This crate wires the services to an in-memory database, a manual clock
//! and a recording chat platform, and can serve the health endpoint on a
//! local port.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
