//! Calendar configuration.
//!
//! # Responsibility
//! - Hold the window sizing parameters and keyboard scroll metrics.
//! - Reject window parameters that would let extension and pruning thrash.
//!
//! # Invariants
//! - `max_keep > initial_before + initial_after + 1`.
//! - `max_keep > 2 * extend_by` and `extend_by >= 1`.

use chrono::Weekday;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default pixel distance from either edge that triggers window extension.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 600.0;

/// First column of every month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }
}

/// Forward-correction policy for prepended panels that were never measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrependEstimate {
    /// Unmeasured panels contribute zero. Under-corrects on first prepend.
    CachedOnly,
    /// Unmeasured panels contribute the mean height of measured mounted panels.
    #[default]
    MeanOfMeasured,
}

/// Sizing parameters for the mounted month window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub initial_before: u32,
    pub initial_after: u32,
    pub extend_by: u32,
    pub max_keep: u32,
    pub edge_threshold: f64,
    pub prepend_estimate: PrependEstimate,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            initial_before: 6,
            initial_after: 6,
            extend_by: 5,
            max_keep: 26,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            prepend_estimate: PrependEstimate::default(),
        }
    }
}

impl WindowConfig {
    /// Checks the no-thrash constraints.
    ///
    /// # Errors
    /// - `ConfigError::ZeroExtend` when `extend_by == 0`.
    /// - `ConfigError::InitialWindowTooLarge` when the initial span does not
    ///   leave room below `max_keep`.
    /// - `ConfigError::ExtendTooLarge` when two extensions alone reach `max_keep`.
    /// - `ConfigError::InvalidThreshold` for a negative or non-finite threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extend_by == 0 {
            return Err(ConfigError::ZeroExtend);
        }
        let initial_len = u64::from(self.initial_before) + u64::from(self.initial_after) + 1;
        if u64::from(self.max_keep) <= initial_len {
            return Err(ConfigError::InitialWindowTooLarge {
                initial_len,
                max_keep: self.max_keep,
            });
        }
        if u64::from(self.max_keep) <= u64::from(self.extend_by) * 2 {
            return Err(ConfigError::ExtendTooLarge {
                extend_by: self.extend_by,
                max_keep: self.max_keep,
            });
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.edge_threshold));
        }
        Ok(())
    }
}

/// Full calendar configuration consumed by the surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub window: WindowConfig,
    pub week_start: WeekStart,
    /// Keyboard row step when no day row has been measured yet.
    pub row_height_fallback: f64,
    /// Vertical gap between week rows, added to a measured row height.
    pub row_gap: f64,
    /// Fraction of the viewport scrolled by page up/down.
    pub page_factor: f64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            week_start: WeekStart::default(),
            row_height_fallback: 110.0,
            row_gap: 8.0,
            page_factor: 0.9,
        }
    }
}

impl CalendarConfig {
    /// Parses a JSON config document. Missing fields take defaults.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON or mistyped fields.
    /// - Any window constraint violation reported by [`WindowConfig::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroExtend,
    InitialWindowTooLarge { initial_len: u64, max_keep: u32 },
    ExtendTooLarge { extend_by: u32, max_keep: u32 },
    InvalidThreshold(f64),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroExtend => write!(f, "extend_by must be at least 1"),
            Self::InitialWindowTooLarge {
                initial_len,
                max_keep,
            } => write!(
                f,
                "initial window of {initial_len} months must be smaller than max_keep {max_keep}"
            ),
            Self::ExtendTooLarge {
                extend_by,
                max_keep,
            } => write!(
                f,
                "two extensions of {extend_by} months must stay below max_keep {max_keep}"
            ),
            Self::InvalidThreshold(value) => {
                write!(f, "edge_threshold must be a finite non-negative number, got {value}")
            }
            Self::Parse(message) => write!(f, "invalid calendar config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{CalendarConfig, ConfigError, PrependEstimate, WeekStart, WindowConfig};

    #[test]
    fn default_window_passes_validation() {
        WindowConfig::default()
            .validate()
            .expect("defaults should be valid");
    }

    #[test]
    fn initial_span_must_leave_room_below_max_keep() {
        let config = WindowConfig {
            max_keep: 13,
            ..WindowConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InitialWindowTooLarge {
                initial_len: 13,
                max_keep: 13
            })
        );
    }

    #[test]
    fn double_extension_must_stay_below_max_keep() {
        let config = WindowConfig {
            initial_before: 1,
            initial_after: 1,
            extend_by: 10,
            max_keep: 20,
            ..WindowConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ExtendTooLarge { .. })
        ));
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let config = CalendarConfig::from_json_str(
            r#"{"week_start":"sunday","window":{"max_keep":40,"prepend_estimate":"cached_only"}}"#,
        )
        .expect("config should parse");
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.window.max_keep, 40);
        assert_eq!(config.window.extend_by, 5);
        assert_eq!(config.window.prepend_estimate, PrependEstimate::CachedOnly);
        assert_eq!(config.row_height_fallback, 110.0);
    }

    #[test]
    fn json_with_thrashing_window_is_rejected() {
        let err = CalendarConfig::from_json_str(r#"{"window":{"extend_by":0}}"#)
            .expect_err("zero extension should fail");
        assert_eq!(err, ConfigError::ZeroExtend);
    }
}
