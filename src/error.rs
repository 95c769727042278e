use std::collections::TryReserveError;

///
/// Rejected format configuration.
///
/// Always raised before any output buffer is allocated.
///
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The rounding token was neither `decimal` nor `signif`.
    #[error("round must be either 'decimal' or 'signif', got '{0}'")]
    InvalidRound(String),

    /// The missing-value token was neither `string` nor `null`.
    #[error("na must be either 'string' or 'null', got '{0}'")]
    InvalidNa(String),

    /// A negative digit count.
    #[error("digits must be a non-negative number, got {0}")]
    NegativeDigits(i64),

    /// More digits than any `f64` can meaningfully produce.
    #[error("digits must not exceed {max}, got {digits}")]
    DigitsTooLarge {
        /// Requested digit count.
        digits: i64,
        /// Largest accepted digit count.
        max: u32,
    },
}

///
/// Errors returned by the encoders.
///
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Invalid `digits`, `round` or `na`.
    #[error("invalid format configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// An input element is not text.
    #[error("element {index} is not valid UTF-8 text (valid up to byte {valid_up_to})")]
    Type {
        /// Position of the offending element in its batch (0 for single values).
        index: usize,
        /// Length of the longest valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// Formatting a finite value failed.
    #[error("failed to format number")]
    Format(#[from] std::fmt::Error),

    /// The output buffer could not be grown.
    #[error("failed to grow output buffer: {0}")]
    Allocation(#[from] TryReserveError),
}

impl EncodeError {
    /// True for errors the caller can fix by changing arguments.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EncodeError::Allocation(_) | EncodeError::Format(_))
    }
}
