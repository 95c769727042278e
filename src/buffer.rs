use std::collections::TryReserveError;

use log::debug;

///
/// Minimum headroom kept free for one more encoded element.
///
/// Covers every special token and any `signif` or shortest formatted number.
/// Longer fixed-point numbers raise the requirement to their own length.
///
pub(crate) const ELEMENT_SLACK: usize = 40;

///
/// Owned, growable output buffer of the numeric array encoder.
///
/// Capacity starts from an estimate and is doubled whenever the headroom drops
/// below the size of the next element. Growth keeps all written bytes.
///
#[derive(Debug)]
pub(crate) struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    ///
    /// Allocates `len * (digits + 4) + 100` bytes.
    ///
    pub(crate) fn with_estimate(len: usize, digits: usize) -> Result<OutputBuffer, TryReserveError> {
        let estimate = len
            .saturating_mul(digits.saturating_add(4))
            .saturating_add(100);
        let mut text = String::new();
        text.try_reserve_exact(estimate)?;
        Ok(OutputBuffer { text })
    }

    /// Number of bytes written so far.
    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    /// Bytes that can be written without growing.
    pub(crate) fn headroom(&self) -> usize {
        self.text.capacity() - self.text.len()
    }

    ///
    /// Makes sure `needed` more bytes fit, doubling the capacity as often as required.
    ///
    pub(crate) fn reserve(&mut self, needed: usize) -> Result<(), TryReserveError> {
        if self.headroom() >= needed {
            return Ok(());
        }
        let mut capacity = self.text.capacity().max(1);
        while capacity - self.text.len() < needed {
            capacity = capacity.saturating_mul(2);
        }
        debug!(
            "growing output buffer from {} to {} bytes",
            self.text.capacity(),
            capacity
        );
        self.text.try_reserve_exact(capacity - self.text.len())
    }

    pub(crate) fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    ///
    /// Overwrites the last written character, or appends if nothing was written.
    ///
    pub(crate) fn replace_last(&mut self, c: char) {
        self.text.pop();
        self.text.push(c);
    }

    /// Hands the written text to the caller.
    pub(crate) fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate() {
        let buffer = OutputBuffer::with_estimate(10, 2).unwrap();
        assert!(buffer.headroom() >= 10 * 6 + 100);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn test_grow_preserves_bytes() {
        let mut buffer = OutputBuffer::with_estimate(0, 0).unwrap();
        buffer.push('[');
        for _ in 0..50 {
            buffer.reserve(ELEMENT_SLACK + 1).unwrap();
            assert!(buffer.headroom() >= ELEMENT_SLACK + 1);
            buffer.push_str("12.5");
            buffer.push(',');
        }
        buffer.replace_last(']');
        let text = buffer.into_string();
        assert!(text.starts_with("[12.5,12.5,"));
        assert!(text.ends_with(",12.5]"));
        assert_eq!(text.len(), 1 + 50 * 5);
    }

    #[test]
    fn test_reserve_large_element() {
        let mut buffer = OutputBuffer::with_estimate(1, 0).unwrap();
        buffer.reserve(10_000).unwrap();
        assert!(buffer.headroom() >= 10_000);
    }
}
