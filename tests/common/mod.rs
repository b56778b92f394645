//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod helpers;

#[allow(unused_imports)]
pub use helpers::{body_bytes, body_json, get, test_router};
