use crate::error::ConfigError;
use crate::timestamp::MAX_SECONDS;

/// Shortest caption length that survives rounding to whole milliseconds.
pub const MIN_DURATION: f64 = 0.001;

/// Synthetic timing given to captions read from plain text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainTiming {
    /// How long each caption is shown, in seconds.
    pub duration: f64,
    /// Pause between consecutive captions, in seconds.
    pub gap: f64,
}

impl PlainTiming {
    pub fn new(duration: f64, gap: f64) -> Result<Self, ConfigError> {
        let timing = Self { duration, gap };
        timing.validate()?;
        Ok(timing)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("plain duration", self.duration, MIN_DURATION)?;
        check("plain gap", self.gap, 0.0)
    }
}

impl Default for PlainTiming {
    fn default() -> Self {
        Self {
            duration: 3.0,
            gap: 0.1,
        }
    }
}

/// Constants used by the edit layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditPolicy {
    /// Distance between the end of the last caption and an appended one.
    pub append_gap: f64,
    /// Length of an appended caption.
    pub append_duration: f64,
    /// How far the opposite endpoint is pushed when a timing edit would
    /// collapse or invert an interval.
    pub correction_offset: f64,
}

impl EditPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("append gap", self.append_gap, 0.0)?;
        check("append duration", self.append_duration, MIN_DURATION)?;
        check("correction offset", self.correction_offset, MIN_DURATION)
    }
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self {
            append_gap: 1.0,
            append_duration: 3.0,
            correction_offset: 0.5,
        }
    }
}

/// Checks a seconds value against `min` and the clock limit.
pub fn check(name: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value > MAX_SECONDS {
        return Err(ConfigError::OutOfRange { name, value });
    }
    if value < min {
        return Err(ConfigError::TooSmall { name, min, value });
    }
    Ok(())
}
