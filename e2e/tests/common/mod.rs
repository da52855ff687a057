//! Common test utilities and infrastructure
//!
//! A wiremock stand-in for the app's readiness endpoints plus mocked process
//! services that record what the sequencer asked them to do.

pub mod fixtures;
pub mod helpers;

pub use fixtures::{AppStub, TestFixtures};
pub use helpers::{EventLog, ServiceMocks};
