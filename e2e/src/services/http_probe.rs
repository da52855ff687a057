//! HTTP readiness probes
//!
//! The server is ready once its health endpoint answers 200. The UI is ready
//! once the dev bundler reports its bundle as done, or the status endpoint
//! answers with the plain `ok` sentinel served by production builds.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use shared::CheckKind;

use crate::config::TargetConfig;
use crate::error::{E2eError, E2eResult};
use crate::traits::ReadinessProbe;

/// Body production builds serve instead of a bundle status document
const BUNDLE_READY_SENTINEL: &str = "ok";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleStatusResponse {
    bundle_status: BundleStatus,
}

#[derive(Debug, Deserialize)]
struct BundleStatus {
    #[serde(default)]
    done: bool,
}

/// Whether a bundle-status body reports the UI as ready
///
/// Accepts the bare sentinel, the sentinel as a JSON string, or a document
/// with `bundleStatus.done == true`. Anything else is "not ready yet".
pub fn bundle_ready(body: &str) -> bool {
    let body = body.trim();
    if body == BUNDLE_READY_SENTINEL {
        return true;
    }
    if let Ok(text) = serde_json::from_str::<String>(body) {
        return text == BUNDLE_READY_SENTINEL;
    }
    serde_json::from_str::<BundleStatusResponse>(body)
        .map(|status| status.bundle_status.done)
        .unwrap_or(false)
}

/// Readiness probe against the app's HTTP endpoints
#[derive(Clone)]
pub struct HttpReadinessProbe {
    target: TargetConfig,
    client: reqwest::Client,
}

impl HttpReadinessProbe {
    pub fn new(target: TargetConfig, probe_timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(probe_timeout).build()?;
        Ok(Self { target, client })
    }

    async fn fetch(&self, check: CheckKind) -> E2eResult<(StatusCode, String)> {
        let url = self.target.endpoint_url(check);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| E2eError::probe(check, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(E2eError::probe(
                check,
                format!("Request failed with status code {}", status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| E2eError::probe(check, e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl ReadinessProbe for HttpReadinessProbe {
    async fn probe(&self, check: CheckKind) -> E2eResult<bool> {
        let (status, body) = self.fetch(check).await?;
        match check {
            CheckKind::Server => Ok(status == StatusCode::OK),
            CheckKind::Ui => Ok(bundle_ready(&body)),
        }
    }
}
