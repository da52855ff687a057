//! Target application configuration
//!
//! Where the app under test lives and how it should be started. Built once
//! from the environment and CLI flags, read-only for the rest of the run.

use shared::{AppEnvironment, CheckKind, SharedError, SharedResult};
use url::Url;

/// Port the app listens on when `APP_PORT` is not set
pub const DEFAULT_APP_PORT: u16 = 13000;

pub const ENV_BASE_URL: &str = "APP_BASE_URL";
pub const ENV_PORT: &str = "APP_PORT";
pub const ENV_APP_ENV: &str = "APP_ENV";

const LOOPBACK_HOST: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Normalized base URL, without a trailing slash
    pub base_url: String,
    pub port: u16,
    pub environment: AppEnvironment,
}

impl TargetConfig {
    /// Build from explicit parts; the base URL is validated and normalized
    pub fn new(base_url: &str, port: u16, environment: AppEnvironment) -> SharedResult<Self> {
        let base_url = normalize_base_url(base_url);
        Url::parse(&base_url).map_err(|e| SharedError::InvalidUrl {
            input: base_url.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
            environment,
        })
    }

    /// Default base URL for an app served locally on `port`
    pub fn local_base_url(port: u16) -> String {
        format!("http://{LOOPBACK_HOST}:{port}")
    }

    /// Full URL of the endpoint probed for `check`
    pub fn endpoint_url(&self, check: CheckKind) -> String {
        format!("{}{}", self.base_url, check.endpoint_path())
    }

    /// Variables exported to every child so the app and Playwright agree on the target
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![
            (ENV_BASE_URL.to_string(), self.base_url.clone()),
            (ENV_PORT.to_string(), self.port.to_string()),
            (ENV_APP_ENV.to_string(), self.environment.as_env_value().to_string()),
        ]
    }
}

/// Parse an `APP_PORT` style value
pub fn parse_port(value: &str) -> SharedResult<u16> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| SharedError::invalid_config(ENV_PORT, value))
}

/// Rewrite a `localhost` host to the IPv4 loopback literal
///
/// Only the host is touched; scheme, port and path are kept as written.
/// Anything that does not parse as a URL is returned unchanged.
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.host_str() == Some("localhost") => {
            let authority_start = trimmed.find("://").map(|i| i + 3).unwrap_or(0);
            let (scheme, rest) = trimmed.split_at(authority_start);
            let authority_end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
            let host_at = rest[..authority_end].rfind('@').map(|i| i + 1).unwrap_or(0);
            let (userinfo, host_and_rest) = rest.split_at(host_at);
            format!(
                "{scheme}{userinfo}{}",
                host_and_rest.replacen("localhost", LOOPBACK_HOST, 1)
            )
        }
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_is_rewritten_to_loopback() {
        assert_eq!(normalize_base_url("http://localhost:3000"), "http://127.0.0.1:3000");
        assert_eq!(
            normalize_base_url("https://localhost/admin"),
            "https://127.0.0.1/admin"
        );
    }

    #[test]
    fn test_other_hosts_unchanged() {
        assert_eq!(normalize_base_url("http://example.com:3000"), "http://example.com:3000");
        assert_eq!(normalize_base_url("http://127.0.0.1:13000"), "http://127.0.0.1:13000");
        assert_eq!(
            normalize_base_url("http://localhost.example.com"),
            "http://localhost.example.com"
        );
    }

    #[test]
    fn test_userinfo_named_localhost_keeps_host() {
        assert_eq!(
            normalize_base_url("http://localhost@localhost:3000"),
            "http://localhost@127.0.0.1:3000"
        );
    }

    #[test]
    fn test_at_sign_in_path_is_not_userinfo() {
        assert_eq!(
            normalize_base_url("http://localhost:3000/users/@me"),
            "http://127.0.0.1:3000/users/@me"
        );
    }

    #[test]
    fn test_unparseable_input_passes_through() {
        assert_eq!(normalize_base_url("not a url"), "not a url");
    }

    #[test]
    fn test_target_config_trims_trailing_slash() {
        let target = TargetConfig::new("http://localhost:3000/", 3000, AppEnvironment::Development).unwrap();
        assert_eq!(target.base_url, "http://127.0.0.1:3000");
        assert_eq!(
            target.endpoint_url(CheckKind::Server),
            "http://127.0.0.1:3000/api/__health_check"
        );
        assert_eq!(
            target.endpoint_url(CheckKind::Ui),
            "http://127.0.0.1:3000/__umi/api/bundle-status"
        );
    }

    #[test]
    fn test_target_config_rejects_invalid_url() {
        let result = TargetConfig::new("127.0.0.1 3000", 3000, AppEnvironment::Development);
        assert!(matches!(result, Err(SharedError::InvalidUrl { .. })));
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("13000").unwrap(), 13000);
        assert_eq!(parse_port(" 8080 ").unwrap(), 8080);
        assert!(parse_port("0").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("abc").is_err());
    }

    #[test]
    fn test_child_env_exports_target() {
        let target = TargetConfig::new("http://127.0.0.1:13000", 13000, AppEnvironment::Production).unwrap();
        let env = target.child_env();
        assert!(env.contains(&("APP_BASE_URL".to_string(), "http://127.0.0.1:13000".to_string())));
        assert!(env.contains(&("APP_PORT".to_string(), "13000".to_string())));
        assert!(env.contains(&("APP_ENV".to_string(), "production".to_string())));
    }
}
