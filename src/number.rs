use std::borrow::Cow;
use std::fmt::Write;

use log::trace;

use crate::buffer::{OutputBuffer, ELEMENT_SLACK};
use crate::config::{FormatConfig, Precision, RoundMode};
use crate::error::EncodeError;

///
/// Bit pattern of the missing value (`NA`): a NaN whose low word is 1954.
///
pub const NA_BITS: u64 = 0x7FF0_0000_0000_07A2;

const NA_LOW_WORD: u64 = 1954;

///
/// Returns the missing value.
///
#[inline]
pub fn missing() -> f64 {
    f64::from_bits(NA_BITS)
}

///
/// True if `value` is the missing value rather than an ordinary NaN.
///
/// Only the low word is compared, so NaN payload propagation through arithmetic
/// keeps a missing value missing.
///
#[inline]
pub fn is_missing(value: f64) -> bool {
    value.is_nan() && (value.to_bits() & 0xFFFF_FFFF) == NA_LOW_WORD
}

///
/// Kind of a numeric input value.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumberClass {
    /// The distinguished missing value, see [`missing`].
    Missing,
    /// Any other NaN.
    NaN,
    /// Positive infinity.
    PosInf,
    /// Negative infinity.
    NegInf,
    /// Every other value.
    Finite,
}

/// Classifies `value`.
#[inline]
pub fn classify(value: f64) -> NumberClass {
    if value.is_finite() {
        NumberClass::Finite
    } else if is_missing(value) {
        NumberClass::Missing
    } else if value.is_nan() {
        NumberClass::NaN
    } else if value > 0.0 {
        NumberClass::PosInf
    } else {
        NumberClass::NegInf
    }
}

///
/// Removes trailing zeros from the fractional part of a formatted number.
///
/// Zeros are only stripped after a decimal point; if the whole fraction is
/// zeros, the point goes too. Integer text such as `100` is never touched.
/// In exponent form (`1.500e+03`) only the mantissa is stripped.
/// A result of exactly `-0` becomes `0`.
///
/// Stripping is idempotent:
///
/// ```
/// use json_literals::strip_trailing_zeros;
///
/// assert_eq!(strip_trailing_zeros("1.500"), "1.5");
/// assert_eq!(strip_trailing_zeros("2.000"), "2");
/// assert_eq!(strip_trailing_zeros("100"), "100");
/// assert_eq!(strip_trailing_zeros("-0.00"), "0");
/// assert_eq!(strip_trailing_zeros("1.200e+10"), "1.2e+10");
/// assert_eq!(strip_trailing_zeros("1.5"), "1.5");
/// ```
///
pub fn strip_trailing_zeros(text: &str) -> Cow<'_, str> {
    match text.find(|c: char| c == 'e' || c == 'E') {
        Some(index) => {
            let (mantissa, exponent) = text.split_at(index);
            let stripped = strip_fraction(mantissa);
            if stripped.len() == mantissa.len() {
                Cow::Borrowed(text)
            } else {
                Cow::Owned(format!("{}{}", stripped, exponent))
            }
        }
        None => match strip_fraction(text) {
            "-0" => Cow::Borrowed("0"),
            stripped => Cow::Borrowed(stripped),
        },
    }
}

fn strip_fraction(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

///
/// Writes the unstripped text of the finite `value` into `scratch`, replacing its contents.
///
fn format_finite(value: f64, config: &FormatConfig, scratch: &mut String) -> std::fmt::Result {
    scratch.clear();
    match (config.precision(), config.round()) {
        (Precision::Shortest, _) => {
            let mut buf = ryu::Buffer::new();
            scratch.push_str(buf.format_finite(value));
            Ok(())
        }
        (Precision::Digits(digits), RoundMode::Decimal) => {
            write!(scratch, "{:.*}", digits as usize, value)
        }
        (Precision::Digits(digits), RoundMode::Signif) => format_general(value, digits, scratch),
    }
}

///
/// Formats like C's `%.{digits}g` before its own zero removal.
///
/// The decimal exponent is taken after rounding to the requested significant digits,
/// so `9.99` with two digits becomes `10` and not `9.99e+00`.
///
fn format_general(value: f64, digits: u32, scratch: &mut String) -> std::fmt::Result {
    let precision = digits.max(1) as usize;
    write!(scratch, "{:.*e}", precision - 1, value)?;

    let e_index = scratch.find('e').ok_or(std::fmt::Error)?;
    let exponent: i64 = scratch[e_index + 1..].parse().map_err(|_| std::fmt::Error)?;

    if exponent < -4 || exponent >= precision as i64 {
        scratch.truncate(e_index);
        scratch.push('e');
        scratch.push(if exponent < 0 { '-' } else { '+' });
        let mut buf = itoa::Buffer::new();
        let magnitude = buf.format(exponent.unsigned_abs());
        if magnitude.len() < 2 {
            scratch.push('0');
        }
        scratch.push_str(magnitude);
        Ok(())
    } else {
        scratch.clear();
        let fraction_digits = (precision as i64 - 1 - exponent) as usize;
        write!(scratch, "{:.*}", fraction_digits, value)
    }
}

///
/// Writes a single value as it appears inside an encoded array.
///
/// Missing and non-finite values become the token selected by the [`NaMode`](crate::NaMode),
/// finite values are formatted and stripped.
///
/// ```
/// use json_literals::{write_number, FormatConfig, NaMode, RoundMode};
///
/// let config = FormatConfig::new(3, RoundMode::Signif, NaMode::String).unwrap();
/// let mut text = String::new();
/// write_number(&mut text, 1234.5, &config).unwrap();
/// assert_eq!(text, "1.23e+03");
/// ```
///
pub fn write_number<W: std::fmt::Write>(
    output_buffer: &mut W,
    value: f64,
    config: &FormatConfig,
) -> std::fmt::Result {
    if let Some(token) = config.na().token(classify(value)) {
        return output_buffer.write_str(token);
    }
    let mut scratch = String::new();
    format_finite(value, config, &mut scratch)?;
    output_buffer.write_str(&strip_trailing_zeros(&scratch))
}

///
/// Encodes `values` as a JSON array literal.
///
/// ```
/// use json_literals::{encode_numeric_array, missing, FormatConfig, NaMode, RoundMode};
///
/// let config = FormatConfig::new(2, RoundMode::Decimal, NaMode::String).unwrap();
/// let values = [1.5, missing(), f64::INFINITY, f64::NEG_INFINITY, 100.0];
/// assert_eq!(
///     encode_numeric_array(&values, &config).unwrap(),
///     "[1.5,\"NA\",\"Inf\",\"-Inf\",100]"
/// );
/// ```
///
pub fn encode_numeric_array(values: &[f64], config: &FormatConfig) -> Result<String, EncodeError> {
    let mut out = OutputBuffer::with_estimate(values.len(), config.estimated_digits())?;
    out.push('[');

    let mut scratch = String::new();
    for &value in values {
        let text = match config.na().token(classify(value)) {
            Some(token) => Cow::Borrowed(token),
            None => {
                format_finite(value, config, &mut scratch)?;
                strip_trailing_zeros(&scratch)
            }
        };
        out.reserve(text.len().max(ELEMENT_SLACK) + 1)?;
        out.push_str(&text);
        out.push(',');
    }

    if values.is_empty() {
        out.push(']');
    } else {
        out.replace_last(']');
    }

    trace!(
        "encoded {} values into {} bytes ({:?}, round={}, na={})",
        values.len(),
        out.len(),
        config.precision(),
        config.round(),
        config.na()
    );
    Ok(out.into_string())
}

///
/// Validates the `digits`, `round` and `na` tokens and encodes `values`.
///
/// Configuration errors are returned before any output is allocated.
///
pub fn encode_numeric_array_with(
    values: &[f64],
    digits: i64,
    round: &str,
    na: &str,
) -> Result<String, EncodeError> {
    let config = FormatConfig::parse(digits, round, na)?;
    encode_numeric_array(values, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NaMode;
    use crate::error::ConfigError;

    fn decimal(digits: u32) -> FormatConfig {
        FormatConfig::new(digits, RoundMode::Decimal, NaMode::String).unwrap()
    }

    fn signif(digits: u32) -> FormatConfig {
        FormatConfig::new(digits, RoundMode::Signif, NaMode::String).unwrap()
    }

    fn one(value: f64, config: &FormatConfig) -> String {
        let mut text = String::new();
        write_number(&mut text, value, config).unwrap();
        text
    }

    #[test]
    fn test_missing() {
        assert!(is_missing(missing()));
        assert!(missing().is_nan());
        assert!(!is_missing(f64::NAN));
        assert!(!is_missing(0.0));
        assert!(!is_missing(f64::INFINITY));

        assert_eq!(classify(missing()), NumberClass::Missing);
        assert_eq!(classify(f64::NAN), NumberClass::NaN);
        assert_eq!(classify(f64::INFINITY), NumberClass::PosInf);
        assert_eq!(classify(f64::NEG_INFINITY), NumberClass::NegInf);
        assert_eq!(classify(-0.0), NumberClass::Finite);
        assert_eq!(classify(f64::MIN_POSITIVE / 2.0), NumberClass::Finite);
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip_trailing_zeros("1.50"), "1.5");
        assert_eq!(strip_trailing_zeros("1.00"), "1");
        assert_eq!(strip_trailing_zeros("0.000"), "0");
        assert_eq!(strip_trailing_zeros("-0.000"), "0");
        assert_eq!(strip_trailing_zeros("-0"), "0");
        assert_eq!(strip_trailing_zeros("-0.5"), "-0.5");
        assert_eq!(strip_trailing_zeros("100"), "100");
        assert_eq!(strip_trailing_zeros("-100"), "-100");
        assert_eq!(strip_trailing_zeros("100.0100"), "100.01");
        assert_eq!(strip_trailing_zeros("10"), "10");
        assert_eq!(strip_trailing_zeros("0"), "0");
        assert_eq!(strip_trailing_zeros(""), "");

        // exponent digits are never stripped
        assert_eq!(strip_trailing_zeros("1e+20"), "1e+20");
        assert_eq!(strip_trailing_zeros("1.000e+20"), "1e+20");
        assert_eq!(strip_trailing_zeros("1.5e30"), "1.5e30");
        assert_eq!(strip_trailing_zeros("2.50e-10"), "2.5e-10");
    }

    #[test]
    fn test_strip_idempotent() {
        for text in ["1.50", "100", "-0.00", "3.14159000", "1.000e+20", "0.1"] {
            let once = strip_trailing_zeros(text).into_owned();
            assert_eq!(strip_trailing_zeros(&once), once);
        }
    }

    #[test]
    fn test_decimal() {
        assert_eq!(one(3.14159, &decimal(2)), "3.14");
        assert_eq!(one(2.0, &decimal(3)), "2");
        assert_eq!(one(1.25, &decimal(4)), "1.25");
        assert_eq!(one(-1.76, &decimal(1)), "-1.8");
        assert_eq!(one(100.0, &decimal(0)), "100");
        assert_eq!(one(1234.0, &decimal(0)), "1234");
        assert_eq!(one(1e21, &decimal(0)), "1000000000000000000000");
        assert_eq!(one(0.1, &decimal(20)), "0.10000000000000000555");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(one(-0.0, &decimal(2)), "0");
        assert_eq!(one(-0.0001, &decimal(2)), "0");
        assert_eq!(one(-0.0, &signif(3)), "0");
        assert_eq!(one(-0.0, &FormatConfig::shortest(NaMode::String)), "0");
        assert_eq!(one(0.0, &decimal(0)), "0");
    }

    #[test]
    fn test_signif() {
        assert_eq!(one(3.14159, &signif(4)), "3.142");
        assert_eq!(one(2.5, &signif(4)), "2.5");
        assert_eq!(one(1234.5678, &signif(3)), "1.23e+03");
        assert_eq!(one(1234.5678, &signif(4)), "1235");
        assert_eq!(one(0.0001234, &signif(3)), "0.000123");
        assert_eq!(one(0.00001234, &signif(3)), "1.23e-05");
        assert_eq!(one(100.0, &signif(2)), "1e+02");
        assert_eq!(one(100.0, &signif(3)), "100");
        assert_eq!(one(9.99, &signif(2)), "10");
        assert_eq!(one(123.0, &signif(0)), "1e+02");
        assert_eq!(one(-2.0e-300, &signif(2)), "-2e-300");
        assert_eq!(one(1.5e20, &signif(6)), "1.5e+20");
    }

    #[test]
    fn test_shortest() {
        let config = FormatConfig::shortest(NaMode::String);
        assert_eq!(one(0.1, &config), "0.1");
        assert_eq!(one(100.0, &config), "100");
        assert_eq!(one(-2.0, &config), "-2");
        assert_eq!(one(1.5e30, &config), "1.5e30");
        assert_eq!(one(3.141592653589793, &config), "3.141592653589793");
    }

    #[test]
    fn test_special_values() {
        for config in [decimal(0), decimal(7), signif(3), FormatConfig::shortest(NaMode::String)] {
            let values = [missing(), f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
            assert_eq!(
                encode_numeric_array(&values, &config).unwrap(),
                "[\"NA\",\"NaN\",\"Inf\",\"-Inf\"]"
            );
        }

        let config = FormatConfig::new(5, RoundMode::Signif, NaMode::Null).unwrap();
        let values = [missing(), f64::NAN, 1.0, f64::INFINITY, f64::NEG_INFINITY];
        assert_eq!(
            encode_numeric_array(&values, &config).unwrap(),
            "[null,null,1,null,null]"
        );
    }

    #[test]
    fn test_array() {
        let values = [1.5, missing(), f64::INFINITY, f64::NEG_INFINITY, 100.0];
        assert_eq!(
            encode_numeric_array_with(&values, 2, "decimal", "string").unwrap(),
            "[1.5,\"NA\",\"Inf\",\"-Inf\",100]"
        );
        assert_eq!(
            encode_numeric_array_with(&values, 2, "decimal", "null").unwrap(),
            "[1.5,null,null,null,100]"
        );
        assert_eq!(
            encode_numeric_array_with(&[42.0], 4, "signif", "string").unwrap(),
            "[42]"
        );
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(encode_numeric_array(&[], &decimal(4)).unwrap(), "[]");
        assert_eq!(encode_numeric_array_with(&[], 0, "signif", "null").unwrap(), "[]");
    }

    #[test]
    fn test_invalid_configuration() {
        let err = encode_numeric_array_with(&[1.0], 2, "round", "string").unwrap_err();
        assert!(matches!(
            err,
            EncodeError::Configuration(ConfigError::InvalidRound(ref token)) if token == "round"
        ));
        assert!(err.is_recoverable());

        let err = encode_numeric_array_with(&[1.0], 2, "decimal", "NA").unwrap_err();
        assert!(matches!(err, EncodeError::Configuration(ConfigError::InvalidNa(_))));

        let err = encode_numeric_array_with(&[1.0], -2, "decimal", "null").unwrap_err();
        assert!(matches!(
            err,
            EncodeError::Configuration(ConfigError::NegativeDigits(-2))
        ));
    }

    #[test_log::test]
    fn test_buffer_growth() {
        let values = vec![123456.789; 1000];
        let encoded = encode_numeric_array(&values, &decimal(0)).unwrap();
        assert_eq!(encoded.len(), 1000 * "123457,".len() + 1);
        assert!(encoded.starts_with("[123457,123457,"));
        assert!(encoded.ends_with(",123457]"));
    }

    #[test_log::test]
    fn test_long_fixed_point_numbers() {
        let encoded = encode_numeric_array(&[1e300, 1e300], &decimal(2)).unwrap();
        let mut parts = encoded[1..encoded.len() - 1].split(',');
        let first = parts.next().unwrap();
        assert_eq!(first.len(), 301);
        assert!(first.starts_with('1'));
        assert_eq!(first.parse::<f64>().unwrap(), 1e300);
        assert_eq!(parts.next().unwrap(), first);
        assert!(parts.next().is_none());
    }

    #[test]
    fn test_write_number_matches_array_element() {
        let config = signif(3);
        for value in [0.5, -12.25, 1e-7, 6.02e23, 0.0] {
            assert_eq!(
                encode_numeric_array(&[value], &config).unwrap(),
                format!("[{}]", one(value, &config))
            );
        }
    }
}
