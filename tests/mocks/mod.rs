//! Mock implementations for integration testing
//!
//! Stand-ins for the resolver so the HTTP layer can be tested without
//! reaching Instagram.

pub mod mock_resolver;

#[allow(unused_imports)]
pub use mock_resolver::MockResolver;
