//! Polling cadence for readiness checks

use std::time::Duration;

/// Delay between two probes of the same check
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Probes per check before giving up (10 minutes at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60 * 10;

/// Upper bound for a single HTTP probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
    pub probe_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl PollSettings {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            ..Default::default()
        }
    }

    /// Longest a check can poll before timing out, probe time excluded
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_ten_minutes() {
        let settings = PollSettings::default();
        assert_eq!(settings.max_attempts, 600);
        assert_eq!(settings.budget(), Duration::from_secs(600));
    }
}
