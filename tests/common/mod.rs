//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod mock_transport;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_transport::{keyboard_tokens, Call, MockTransport, SentMessage};
