use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("malformed timestamp: '{0}'")]
    MalformedTimestamp(String),
    #[error("timestamp out of range: '{0}'")]
    TimestampOutOfRange(String),
    #[error("unknown subtitle format: '{0}'")]
    UnknownFormat(String),
}

/// Validation notices raised by the edit layer. The document is left as it
/// was before the rejected edit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("time must be a finite, non-negative number of seconds up to the clock limit (got {0})")]
    InvalidTime(f64),
    #[error(transparent)]
    Timestamp(#[from] EngineError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be at least {min} seconds (got {value})")]
    TooSmall {
        name: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{name} must be a finite number of seconds up to the clock limit (got {value})")]
    OutOfRange { name: &'static str, value: f64 },
}
