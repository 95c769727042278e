use log::trace;

use crate::error::EncodeError;

const fn get_replacements() -> [u8; 256] {
    // NOTE: only characters smaller than 128 are allowed here
    let mut result = [0u8; 256];
    result[b'"' as usize] = b'"';
    result[b'\\' as usize] = b'\\';
    result[0x08] = b'b';
    result[0x0c] = b'f';
    result[b'\n' as usize] = b'n';
    result[b'\r' as usize] = b'r';
    result[b'\t' as usize] = b't';

    let mut c: u8 = 0x80;
    loop {
        if result[c as usize] != 0 {
            panic!("bytes from 0x80 to 0xFF are parts of UTF-8 multi-byte characters and must not be modified");
        }
        c = match c.checked_add(1) {
            Some(c) => c,
            None => break,
        };
    }

    result
}
static REPLACEMENTS: [u8; 256] = get_replacements();

///
/// Counts the bytes of `bytes` that need a two-byte escape.
///
#[inline]
fn count_escapes(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .filter(|&&byte| REPLACEMENTS[byte as usize] != 0)
        .count()
}

///
/// Exact length of [`escape_string`]`(input)`, quotes included.
///
/// ```
/// use json_literals::{escape_string, escaped_len};
///
/// let input = "tab\there";
/// assert_eq!(escaped_len(input), escape_string(input).len());
/// ```
///
pub fn escaped_len(input: &str) -> usize {
    input.len() + count_escapes(input.as_bytes()) + 2
}

///
/// Quotes and escapes `input` as a JSON string literal.
///
/// Backslash, quote, newline, carriage return, tab, backspace and form feed are
/// replaced by their two character escapes. Everything else, multi-byte UTF-8
/// included, is copied unchanged.
///
/// The result is allocated at its exact final size.
///
/// ```
/// use json_literals::escape_string;
///
/// assert_eq!(escape_string("a\"b\\c\nd"), r#""a\"b\\c\nd""#);
/// assert_eq!(escape_string("中文"), "\"中文\"");
/// ```
///
pub fn escape_string(input: &str) -> String {
    let matches = count_escapes(input.as_bytes());
    let mut output = String::with_capacity(input.len() + matches + 2);
    output.push('"');
    write_escaped(&mut output, input);
    output.push('"');
    debug_assert_eq!(output.len(), input.len() + matches + 2);
    output
}

///
/// Copies `input` to `output`, replacing every byte of the escape set.
///
#[inline(always)]
fn write_escaped(output: &mut String, input: &str) {
    // All of the escaped characters are in the ascii range (<128).
    // Runs between them therefore start and end on character boundaries.
    let bytes = input.as_bytes();
    let mut num_bytes_written: usize = 0;
    for (index, &cur_byte) in bytes.iter().enumerate() {
        let replacement = REPLACEMENTS[cur_byte as usize];
        if replacement == 0 {
            continue;
        }
        if num_bytes_written < index {
            output.push_str(&input[num_bytes_written..index]);
        }
        output.push('\\');
        output.push(char::from(replacement));
        num_bytes_written = index + 1;
    }
    if num_bytes_written < bytes.len() {
        output.push_str(&input[num_bytes_written..]);
    }
}

///
/// Checks that `input` is text, then escapes it like [`escape_string`].
///
/// Bytes that are not valid UTF-8 are a [`EncodeError::Type`] error.
///
pub fn escape_bytes(input: &[u8]) -> Result<String, EncodeError> {
    let text = as_text(0, input)?;
    Ok(escape_string(text))
}

///
/// Escapes every string of a batch, preserving order.
///
/// An empty batch yields an empty result.
///
/// ```
/// use json_literals::escape_strings;
///
/// assert_eq!(escape_strings(["a", "\t"]), vec!["\"a\"", "\"\\t\""]);
/// assert!(escape_strings(Vec::<String>::new()).is_empty());
/// ```
///
pub fn escape_strings<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let escaped: Vec<String> = values
        .into_iter()
        .map(|value| escape_string(value.as_ref()))
        .collect();
    trace!("escaped {} strings", escaped.len());
    escaped
}

///
/// Escapes a batch of byte strings.
///
/// Every element is checked before any is encoded; the first element that is not
/// valid UTF-8 fails the whole batch and is reported with its index.
///
pub fn escape_byte_strings<B: AsRef<[u8]>>(values: &[B]) -> Result<Vec<String>, EncodeError> {
    let texts = values
        .iter()
        .enumerate()
        .map(|(index, value)| as_text(index, value.as_ref()))
        .collect::<Result<Vec<&str>, EncodeError>>()?;
    Ok(escape_strings(texts))
}

fn as_text(index: usize, bytes: &[u8]) -> Result<&str, EncodeError> {
    std::str::from_utf8(bytes).map_err(|err| EncodeError::Type {
        index,
        valid_up_to: err.valid_up_to(),
    })
}
