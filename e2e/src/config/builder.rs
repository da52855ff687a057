//! Sequencer Configuration Builder
//!
//! Collects values from the environment first, then lets CLI flags override
//! them, and validates everything in [`SequencerConfigBuilder::build`].

use std::path::PathBuf;
use std::time::Duration;

use shared::{AppEnvironment, SharedError, SharedResult};

use super::poll::PollSettings;
use super::target::{self, TargetConfig, normalize_base_url};
use super::toolchain::{self, ToolchainConfig};
use super::SequencerConfig;

#[derive(Debug, Default)]
pub struct SequencerConfigBuilder {
    base_url: Option<String>,
    external_url: Option<String>,
    port: Option<String>,
    environment: Option<String>,
    production: bool,
    skip_reporter: bool,
    poll: PollSettings,
    toolchain: ToolchainConfig,
}

impl SequencerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from environment variables via `lookup`
    ///
    /// Taking a lookup function keeps the process environment out of tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::new();
        builder.base_url = non_empty(target::ENV_BASE_URL);
        builder.port = non_empty(target::ENV_PORT);
        builder.environment = non_empty(target::ENV_APP_ENV);

        if let Some(command) = non_empty(toolchain::ENV_APP_COMMAND) {
            builder.toolchain.app_command = command;
        }
        if let Some(command) = non_empty(toolchain::ENV_NPX_COMMAND) {
            builder.toolchain.npx_command = command;
        }
        if let Some(path) = non_empty(toolchain::ENV_AUTH_STATE) {
            builder.toolchain.auth_state_path = PathBuf::from(path);
        }
        builder
    }

    /// Test against an app that is already running at `url`; nothing is launched
    pub fn external_url<S: Into<String>>(mut self, url: S) -> Self {
        self.external_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port.to_string());
        self
    }

    /// Force production mode regardless of `APP_ENV`
    pub fn production(mut self, production: bool) -> Self {
        self.production = self.production || production;
        self
    }

    pub fn skip_reporter(mut self, skip: bool) -> Self {
        self.skip_reporter = skip;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.poll.max_attempts = max_attempts;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.poll.probe_timeout = timeout;
        self
    }

    pub fn app_command<S: Into<String>>(mut self, command: S) -> Self {
        self.toolchain.app_command = command.into();
        self
    }

    pub fn npx_command<S: Into<String>>(mut self, command: S) -> Self {
        self.toolchain.npx_command = command.into();
        self
    }

    pub fn auth_state_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.toolchain.auth_state_path = path.into();
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> SharedResult<SequencerConfig> {
        for (field, command) in [
            (toolchain::ENV_APP_COMMAND, &self.toolchain.app_command),
            (toolchain::ENV_NPX_COMMAND, &self.toolchain.npx_command),
        ] {
            if command.trim().is_empty() {
                return Err(SharedError::invalid_config(field, command.as_str()));
            }
        }

        let port = match self.port.as_deref() {
            Some(raw) => target::parse_port(raw)?,
            None => target::DEFAULT_APP_PORT,
        };

        let environment = if self.production {
            AppEnvironment::Production
        } else {
            AppEnvironment::from_env_value(self.environment.as_deref())
        };

        let manage_app = self.external_url.is_none();
        let base_url = self
            .external_url
            .or(self.base_url)
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|| TargetConfig::local_base_url(port));

        Ok(SequencerConfig {
            target: TargetConfig::new(&base_url, port, environment)?,
            poll: self.poll,
            toolchain: self.toolchain,
            manage_app,
            skip_reporter: self.skip_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = SequencerConfigBuilder::from_lookup(|_| None).build().unwrap();

        assert_eq!(config.target.base_url, "http://127.0.0.1:13000");
        assert_eq!(config.target.port, 13000);
        assert_eq!(config.target.environment, AppEnvironment::Development);
        assert_eq!(config.poll, PollSettings::default());
        assert_eq!(config.toolchain, ToolchainConfig::default());
        assert!(config.manage_app);
        assert!(!config.skip_reporter);
    }

    #[test]
    fn test_environment_values_are_read_and_normalized() {
        let lookup = lookup_from(&[
            ("APP_BASE_URL", "http://localhost:20000"),
            ("APP_PORT", "20000"),
            ("APP_ENV", "production"),
            ("E2E_APP_COMMAND", "yarn nocobase"),
            ("E2E_AUTH_STATE", "/tmp/auth.json"),
        ]);
        let config = SequencerConfigBuilder::from_lookup(lookup).build().unwrap();

        assert_eq!(config.target.base_url, "http://127.0.0.1:20000");
        assert_eq!(config.target.port, 20000);
        assert_eq!(config.target.environment, AppEnvironment::Production);
        assert_eq!(config.toolchain.app_command, "yarn nocobase");
        assert_eq!(config.toolchain.npx_command, "npx");
        assert_eq!(config.toolchain.auth_state_path, PathBuf::from("/tmp/auth.json"));
    }

    #[test]
    fn test_external_url_overrides_env_and_disables_launch() {
        let lookup = lookup_from(&[("APP_BASE_URL", "http://127.0.0.1:13000")]);
        let config = SequencerConfigBuilder::from_lookup(lookup)
            .external_url("http://localhost:4000")
            .build()
            .unwrap();

        assert_eq!(config.target.base_url, "http://127.0.0.1:4000");
        assert!(!config.manage_app);
    }

    #[test]
    fn test_port_flag_overrides_env_and_default_url_follows() {
        let lookup = lookup_from(&[("APP_PORT", "13000")]);
        let config = SequencerConfigBuilder::from_lookup(lookup).port(14000).build().unwrap();

        assert_eq!(config.target.port, 14000);
        assert_eq!(config.target.base_url, "http://127.0.0.1:14000");
    }

    #[test]
    fn test_production_flag_wins_over_app_env() {
        let lookup = lookup_from(&[("APP_ENV", "development")]);
        let config = SequencerConfigBuilder::from_lookup(lookup)
            .production(true)
            .build()
            .unwrap();
        assert_eq!(config.target.environment, AppEnvironment::Production);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let lookup = lookup_from(&[("APP_PORT", "not-a-port")]);
        let result = SequencerConfigBuilder::from_lookup(lookup).build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("APP_PORT"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let lookup = lookup_from(&[("APP_BASE_URL", "  "), ("APP_PORT", "")]);
        let config = SequencerConfigBuilder::from_lookup(lookup).build().unwrap();
        assert_eq!(config.target.base_url, "http://127.0.0.1:13000");
    }

    #[test]
    fn test_skip_reporter_exported_to_runner_env() {
        let config = SequencerConfigBuilder::new().skip_reporter(true).build().unwrap();
        let env = config.runner_env();
        assert!(env.contains(&("PLAYWRIGHT_SKIP_REPORTER".to_string(), "true".to_string())));

        let config = SequencerConfigBuilder::new().build().unwrap();
        assert!(!config.runner_env().iter().any(|(k, _)| k == "PLAYWRIGHT_SKIP_REPORTER"));
    }

    #[test]
    fn test_blank_command_override_is_rejected() {
        let result = SequencerConfigBuilder::new().npx_command("  ").build();
        assert!(result.unwrap_err().to_string().contains("E2E_NPX_COMMAND"));
    }

    #[test]
    fn test_poll_overrides() {
        let config = SequencerConfigBuilder::new()
            .poll_interval(Duration::from_millis(250))
            .max_attempts(4)
            .build()
            .unwrap();
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, 4);
    }
}
