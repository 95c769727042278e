use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigError;
use crate::number::NumberClass;

///
/// Largest accepted digit count.
///
/// The smallest subnormal `f64` needs 1074 fractional digits to be printed exactly,
/// more digits only append zeros.
///
pub const MAX_DIGITS: u32 = 1074;

///
/// Selects how `digits` is interpreted for finite values.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RoundMode {
    /// Fixed-point text with `digits` digits after the decimal point.
    #[default]
    Decimal,
    /// `digits` significant digits, in the general form of C's `%g`.
    Signif,
}

impl RoundMode {
    /// The token this mode is parsed from.
    pub fn as_str(self) -> &'static str {
        match self {
            RoundMode::Decimal => "decimal",
            RoundMode::Signif => "signif",
        }
    }
}

impl FromStr for RoundMode {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "decimal" => Ok(RoundMode::Decimal),
            "signif" => Ok(RoundMode::Signif),
            other => Err(ConfigError::InvalidRound(other.to_owned())),
        }
    }
}

impl fmt::Display for RoundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Selects how missing, NaN and infinite values are rendered.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NaMode {
    /// Quoted tokens: `"NA"`, `"NaN"`, `"Inf"`, `"-Inf"`.
    #[default]
    String,
    /// The JSON `null` literal for all of them.
    Null,
}

impl NaMode {
    /// The token this mode is parsed from.
    pub fn as_str(self) -> &'static str {
        match self {
            NaMode::String => "string",
            NaMode::Null => "null",
        }
    }

    ///
    /// Returns the JSON text for a non-finite class, or `None` for [`NumberClass::Finite`].
    ///
    pub fn token(self, class: NumberClass) -> Option<&'static str> {
        let quoted = match class {
            NumberClass::Finite => return None,
            NumberClass::Missing => "\"NA\"",
            NumberClass::NaN => "\"NaN\"",
            NumberClass::PosInf => "\"Inf\"",
            NumberClass::NegInf => "\"-Inf\"",
        };
        match self {
            NaMode::String => Some(quoted),
            NaMode::Null => Some("null"),
        }
    }
}

impl FromStr for NaMode {
    type Err = ConfigError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "string" => Ok(NaMode::String),
            "null" => Ok(NaMode::Null),
            other => Err(ConfigError::InvalidNa(other.to_owned())),
        }
    }
}

impl fmt::Display for NaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Number of digits to print for finite values.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Precision {
    /// A fixed digit count, interpreted by the [`RoundMode`].
    Digits(u32),
    /// The shortest text that parses back to the same `f64`.
    Shortest,
}

///
/// Immutable per-call settings of the numeric array encoder.
///
/// Build one from typed values with [`FormatConfig::new`], or from caller
/// tokens with [`FormatConfig::parse`]:
///
/// ```
/// use json_literals::{FormatConfig, NaMode, RoundMode};
///
/// let config = FormatConfig::parse(2, "signif", "null").unwrap();
/// assert_eq!(config.round(), RoundMode::Signif);
/// assert_eq!(config.na(), NaMode::Null);
///
/// assert!(FormatConfig::parse(2, "round", "null").is_err());
/// ```
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    precision: Precision,
    round: RoundMode,
    na: NaMode,
}

impl FormatConfig {
    ///
    /// Creates a configuration with a fixed digit count.
    ///
    pub fn new(digits: u32, round: RoundMode, na: NaMode) -> Result<FormatConfig, ConfigError> {
        if digits > MAX_DIGITS {
            debug!("rejecting digits={}", digits);
            return Err(ConfigError::DigitsTooLarge {
                digits: i64::from(digits),
                max: MAX_DIGITS,
            });
        }
        Ok(FormatConfig {
            precision: Precision::Digits(digits),
            round,
            na,
        })
    }

    ///
    /// Creates a configuration that prints every finite value with the
    /// shortest round-trip text. The rounding mode is not used.
    ///
    pub fn shortest(na: NaMode) -> FormatConfig {
        FormatConfig {
            precision: Precision::Shortest,
            round: RoundMode::default(),
            na,
        }
    }

    ///
    /// Validates caller supplied tokens.
    ///
    /// `round` must be exactly `decimal` or `signif`, `na` exactly `string` or `null`
    /// and `digits` between 0 and [`MAX_DIGITS`].
    ///
    pub fn parse(digits: i64, round: &str, na: &str) -> Result<FormatConfig, ConfigError> {
        let round = round.parse::<RoundMode>().inspect_err(|err| debug!("{}", err))?;
        let na = na.parse::<NaMode>().inspect_err(|err| debug!("{}", err))?;
        if digits < 0 {
            debug!("rejecting digits={}", digits);
            return Err(ConfigError::NegativeDigits(digits));
        }
        let digits = u32::try_from(digits).map_err(|_| ConfigError::DigitsTooLarge {
            digits,
            max: MAX_DIGITS,
        })?;
        FormatConfig::new(digits, round, na)
    }

    /// Digit setting for finite values.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Rounding mode for finite values.
    pub fn round(&self) -> RoundMode {
        self.round
    }

    /// Rendering of missing and non-finite values.
    pub fn na(&self) -> NaMode {
        self.na
    }

    ///
    /// Digit count used to estimate the output size.
    ///
    /// An `f64` never needs more than 17 significant digits to round-trip.
    ///
    pub(crate) fn estimated_digits(&self) -> usize {
        match self.precision {
            Precision::Digits(digits) => digits as usize,
            Precision::Shortest => 17,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            precision: Precision::Digits(4),
            round: RoundMode::Decimal,
            na: NaMode::String,
        }
    }
}
