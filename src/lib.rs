#![warn(missing_docs)]

//!
//! Encoders that turn numeric arrays and strings into exact JSON literals.
//!
//! Each call returns a complete, owned fragment that a document assembler can
//! embed as is. Nothing is parsed and no state is kept between calls.
//!
//! # Usage
//!
//! Numeric arrays:
//! ```
//! use json_literals::{encode_numeric_array, encode_numeric_array_with, missing, FormatConfig, NaMode, RoundMode};
//!
//! let values = [1.5, missing(), f64::INFINITY, f64::NEG_INFINITY, 100.0];
//!
//! // Caller tokens are validated before anything is encoded
//! assert_eq!(
//!     encode_numeric_array_with(&values, 2, "decimal", "string").unwrap(),
//!     "[1.5,\"NA\",\"Inf\",\"-Inf\",100]"
//! );
//! assert!(encode_numeric_array_with(&values, 2, "floor", "string").is_err());
//!
//! // Typed configuration
//! let config = FormatConfig::new(3, RoundMode::Signif, NaMode::Null).unwrap();
//! assert_eq!(
//!     encode_numeric_array(&[3.14159, f64::NAN, 0.00001234, -0.0], &config).unwrap(),
//!     "[3.14,null,1.23e-05,0]"
//! );
//!
//! // Shortest round-trip text
//! let config = FormatConfig::shortest(NaMode::String);
//! assert_eq!(encode_numeric_array(&[0.1, 2.0], &config).unwrap(), "[0.1,2]");
//!
//! assert_eq!(encode_numeric_array(&[], &config).unwrap(), "[]");
//! ```
//!
//! Strings:
//! ```
//! use json_literals::{escape_string, escape_strings};
//!
//! assert_eq!(escape_string("Hello World\n"), "\"Hello World\\n\"");
//! assert_eq!(
//!     escape_strings(["a", "b\"c"]),
//!     vec!["\"a\"", "\"b\\\"c\""]
//! );
//! ```
//!
//! # Limitations
//!
//! Only backslash, quote, newline, carriage return, tab, backspace and form feed are
//! escaped. Other control characters are copied unchanged.
//!
//! Missing values use the `NA` bit pattern ([`NA_BITS`]). Any other NaN is
//! rendered as `NaN`.
//!

mod buffer;
mod config;
mod error;
mod escape;
mod number;

pub use config::{FormatConfig, NaMode, Precision, RoundMode, MAX_DIGITS};
pub use error::{ConfigError, EncodeError};
pub use escape::{escape_byte_strings, escape_bytes, escape_string, escape_strings, escaped_len};
pub use number::{
    classify, encode_numeric_array, encode_numeric_array_with, is_missing, missing,
    strip_trailing_zeros, write_number, NumberClass, NA_BITS,
};
