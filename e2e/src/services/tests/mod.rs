//! Service-specific tests
//!
//! These exercise the real implementations against local sockets, wiremock
//! servers and short-lived shell processes.

mod http_probe;

pub mod common {
    use std::time::Duration;

    use shared::AppEnvironment;

    use crate::config::TargetConfig;

    /// Upper bound for anything that talks to a local socket or process
    pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn target_for(base_url: &str) -> TargetConfig {
        TargetConfig::new(base_url, 13000, AppEnvironment::Development).expect("valid test target")
    }
}
