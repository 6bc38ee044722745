use std::time::Duration;

use crate::error::ConfigError;

pub const ADVANCE_DELAY_ENV: &str = "LEARN_ADVANCE_DELAY_MS";
pub const PASS_THRESHOLD_ENV: &str = "LEARN_PASS_THRESHOLD";

pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.7;

/// Tunables for the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnConfig {
    /// How long a graded answer stays on screen before the quiz moves on.
    pub advance_delay: Duration,
    /// Minimum `correct / total` ratio that completes a lesson.
    pub pass_threshold: f64,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            advance_delay: DEFAULT_ADVANCE_DELAY,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl LearnConfig {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ADVANCE_DELAY_ENV) {
            config.advance_delay = parse_delay_ms(ADVANCE_DELAY_ENV, &raw)?;
        }
        if let Some(raw) = lookup(PASS_THRESHOLD_ENV) {
            config.pass_threshold = parse_threshold(PASS_THRESHOLD_ENV, &raw)?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }
}

/// Parses a millisecond count.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDelay` for anything but a non-negative integer.
pub fn parse_delay_ms(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDelay {
            var,
            raw: raw.to_string(),
        })
}

fn parse_threshold(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value > 0.0 && value <= 1.0 => Ok(value),
        _ => Err(ConfigError::InvalidThreshold {
            var,
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = LearnConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LearnConfig::default());
        assert_eq!(config.advance_delay, Duration::from_millis(1500));
        assert!((config.pass_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn reads_overrides() {
        let config = LearnConfig::from_lookup(lookup(&[
            (ADVANCE_DELAY_ENV, "250"),
            (PASS_THRESHOLD_ENV, "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.advance_delay, Duration::from_millis(250));
        assert!((config.pass_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_delay() {
        let err = LearnConfig::from_lookup(lookup(&[(ADVANCE_DELAY_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay { .. }));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        for raw in ["0", "1.5", "-0.2", "NaN", "high"] {
            let err = LearnConfig::from_lookup(lookup(&[(PASS_THRESHOLD_ENV, raw)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidThreshold { .. }), "{raw}");
        }
    }
}
