//! Readiness endpoint fixtures

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestFixtures;

impl TestFixtures {
    pub const HEALTH_PATH: &'static str = "/api/__health_check";
    pub const BUNDLE_PATH: &'static str = "/__umi/api/bundle-status";
    pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
    pub const MAX_ATTEMPTS: u32 = 20;
}

/// Fake app answering the health and bundle-status endpoints
pub struct AppStub {
    pub server: MockServer,
}

impl AppStub {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Health check answers `status` on every request
    pub async fn health(&self, status: u16) -> &Self {
        Mock::given(method("GET"))
            .and(path(TestFixtures::HEALTH_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
        self
    }

    /// Bundle still compiling for the first `pending` requests, done afterwards
    pub async fn bundle_done_after(&self, pending: u64) -> &Self {
        if pending > 0 {
            Mock::given(method("GET"))
                .and(path(TestFixtures::BUNDLE_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "bundleStatus": { "done": false }
                })))
                .up_to_n_times(pending)
                .with_priority(1)
                .mount(&self.server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(TestFixtures::BUNDLE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bundleStatus": { "done": true }
            })))
            .mount(&self.server)
            .await;
        self
    }

    /// Requests received on `endpoint` so far
    pub async fn hits(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == endpoint)
            .count()
    }
}
