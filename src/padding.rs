//! Padding policy: aligning a container's encoded span to a quantum.

use crate::buffer::Buffer;
use crate::error::Result;

/// Whether a padding quantum's span measurement includes the length field's
/// own bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// The length field's bytes count toward the measured span.
    Inclusive,
    /// The length field's bytes are excluded from the measured span.
    Exclusive,
}

/// A padding policy: align to `quantum_bits` using `filler` bytes.
#[derive(Debug, Clone, Copy)]
pub struct Padding {
    /// Alignment granularity, in bits. Must be a multiple of 8 for the
    /// octet codec (byte-oriented padding is the only mode this crate
    /// implements, consistent with the octet codec being the detailed
    /// target of this specification).
    pub quantum_bits: usize,
    /// The byte value to pad with.
    pub filler: u8,
    /// Whether the length field counts toward the measured span.
    pub mode: PaddingMode,
}

impl Padding {
    /// Builds a byte-quantum padding policy.
    pub const fn new(quantum_bits: usize, filler: u8, mode: PaddingMode) -> Self {
        Self { quantum_bits, filler, mode }
    }

    fn quantum_bytes(&self) -> usize {
        self.quantum_bits / 8
    }

    /// How many filler bytes are needed to round `span_bytes` up to the next
    /// multiple of the quantum. Pure, and deliberately blind to `self.mode`:
    /// the two modes write identical filler (same total frame size), they
    /// only disagree about what a length placeholder enclosing the padded
    /// span should report. That disagreement is resolved by the caller
    /// (`octet::Encoder::end_container`), not here.
    pub fn pad_amount(&self, span_bytes: usize) -> usize {
        let q = self.quantum_bytes();
        let remainder = span_bytes % q;
        if remainder == 0 { 0 } else { q - remainder }
    }

    /// Emits filler bytes so `span_bytes` — always the full envelope+payload
    /// span, regardless of `self.mode` — becomes a multiple of the quantum.
    pub fn pad_encode(&self, field: &str, buf: &mut Buffer<'_>, span_bytes: usize) -> Result<usize> {
        let n = self.pad_amount(span_bytes);
        if n > 0 {
            buf.fill(field, n, self.filler)?;
        }
        Ok(n)
    }

    /// Skips the same number of filler bytes on decode.
    pub fn pad_decode(&self, field: &str, buf: &mut Buffer<'_>, span_bytes: usize) -> Result<usize> {
        let n = self.pad_amount(span_bytes);
        if n > 0 {
            buf.advance(field, n as isize)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_up_to_quantum() {
        let mut data = [0u8; 8];
        let mut buf = Buffer::new(&mut data);
        buf.push_slice("payload", &[1, 2, 3]).unwrap();
        let pad = Padding::new(32, 0, PaddingMode::Exclusive);
        let written = pad.pad_encode("pad", &mut buf, 3).unwrap();
        assert_eq!(written, 1);
        assert_eq!(buf.offset(), 4);
    }

    #[test]
    fn no_padding_when_already_aligned() {
        let mut data = [0u8; 4];
        let mut buf = Buffer::new(&mut data);
        buf.push_slice("payload", &[1, 2, 3, 4]).unwrap();
        let pad = Padding::new(32, 0, PaddingMode::Exclusive);
        assert_eq!(pad.pad_encode("pad", &mut buf, 4).unwrap(), 0);
    }

    #[test]
    fn pad_amount_is_mode_invariant() {
        let inclusive = Padding::new(32, 0, PaddingMode::Inclusive);
        let exclusive = Padding::new(32, 0, PaddingMode::Exclusive);
        assert_eq!(inclusive.pad_amount(3), exclusive.pad_amount(3));
        assert_eq!(inclusive.pad_amount(3), 1);
    }
}
