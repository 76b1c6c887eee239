use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("invalid spawn config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("poll_interval_ms must be greater than zero")]
	ZeroPollInterval,
	#[error("max_polls must be greater than zero; omit it to wait indefinitely")]
	ZeroMaxPolls,
}

/// Tuning for spawn coordinators.
///
/// ```toml
/// poll_interval_ms = 16
/// max_polls = 3600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
	poll_interval_ms: u64,
	max_polls: Option<u32>,
}

impl Default for SpawnConfig {
	fn default() -> Self {
		Self {
			poll_interval_ms: 16,
			max_polls: None,
		}
	}
}

impl SpawnConfig {
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		if config.poll_interval_ms == 0 {
			return Err(ConfigError::ZeroPollInterval);
		}
		if config.max_polls == Some(0) {
			return Err(ConfigError::ZeroMaxPolls);
		}
		Ok(config)
	}

	/// Time between two readiness polls. Never zero.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms.max(1))
	}

	/// Failed polls after which a wait phase gives up; `None` waits indefinitely.
	pub fn max_polls(&self) -> Option<u32> {
		self.max_polls
	}

	#[must_use]
	pub fn with_poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1);
		self
	}

	/// Sets the poll limit. `Some(0)` is raised to `Some(1)`.
	#[must_use]
	pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
		self.max_polls = max_polls.map(|max| max.max(1));
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_source_yields_defaults() {
		let config = SpawnConfig::from_toml_str("").unwrap();
		assert_eq!(config, SpawnConfig::default());
		assert_eq!(config.max_polls(), None);
		assert_eq!(config.poll_interval(), Duration::from_millis(16));
	}

	#[test]
	fn fields_are_read() {
		let config = SpawnConfig::from_toml_str("poll_interval_ms = 50\nmax_polls = 10\n").unwrap();
		assert_eq!(config.poll_interval(), Duration::from_millis(50));
		assert_eq!(config.max_polls(), Some(10));
	}

	#[test]
	fn zero_interval_is_rejected() {
		assert!(matches!(SpawnConfig::from_toml_str("poll_interval_ms = 0"), Err(ConfigError::ZeroPollInterval)));
	}

	#[test]
	fn zero_max_polls_is_rejected() {
		assert!(matches!(SpawnConfig::from_toml_str("max_polls = 0"), Err(ConfigError::ZeroMaxPolls)));
		assert_eq!(SpawnConfig::default().with_max_polls(Some(0)).max_polls(), Some(1));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(matches!(SpawnConfig::from_toml_str("poll_every = 3"), Err(ConfigError::Parse(_))));
	}

	#[test]
	fn builder_clamps_interval() {
		let config = SpawnConfig::default().with_poll_interval(Duration::ZERO);
		assert_eq!(config.poll_interval(), Duration::from_millis(1));
	}
}
