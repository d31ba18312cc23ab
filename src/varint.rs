//! Protobuf varint codec (§6): LEB128-encoded values and field tags.
//!
//! Secondary to the octet codec — this module only implements the wire
//! primitives (varint read/write, field tag packing), not a schema-driven
//! message engine; a Protobuf message type is expected to call these
//! directly from hand-written `encode`/`decode` methods the same way a
//! Sequence calls [`crate::octet::Encoder`].

use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Protobuf wire types, the low 3 bits of a packed field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// LEB128 varint (int32, int64, bool, enum, sint via two's complement).
    Varint,
    /// 8-byte fixed-width (fixed64, double).
    Fixed64,
    /// Length-delimited (string, bytes, embedded message, packed repeated).
    LengthDelimited,
    /// 4-byte fixed-width (fixed32, float).
    Fixed32,
}

impl WireType {
    fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    fn bits(self) -> u64 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::Fixed32 => 5,
        }
    }
}

/// Writes `value` as a LEB128 varint, 7 bits per byte, continuation bit set
/// on every byte but the last.
pub fn write_varint(field: &str, buf: &mut Buffer<'_>, mut value: u64) -> Result<()> {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(field, byte)?;
            return Ok(());
        }
        buf.push(field, byte | 0x80)?;
    }
}

/// Reads a LEB128 varint. Per the Open Question resolved in DESIGN.md, a
/// signed value is carried as plain two's-complement across up to 10 bytes
/// rather than ZigZag-encoded, so this function is the single entry point
/// for both signed and unsigned fields.
pub fn read_varint(field: &str, buf: &mut Buffer<'_>) -> Result<u64> {
    let mut value: u64 = 0;
    for i in 0..10 {
        let byte = buf.pop(field)?;
        let payload = (byte & 0x7F) as u64;
        if i < 9 {
            value |= payload << (7 * i);
        } else if payload > 1 {
            // A 10th byte only ever carries the single sign-extension bit
            // of a negative 64-bit two's-complement value.
            return Err(Error::InvalidValue {
                field: field.into(),
                reason: "varint exceeds 64 bits".into(),
                offset: buf.offset(),
            });
        } else {
            value |= payload << 63;
        }
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(Error::InvalidValue { field: field.into(), reason: "varint too long".into(), offset: buf.offset() })
}

/// Packs `(field_number << 3) | wire_type` and writes it as a varint.
pub fn write_field_tag(field: &str, buf: &mut Buffer<'_>, field_number: u32, wire_type: WireType) -> Result<()> {
    let packed = ((field_number as u64) << 3) | wire_type.bits();
    write_varint(field, buf, packed)
}

/// Reads a packed field tag, splitting it into field number and wire type.
pub fn read_field_tag(field: &str, buf: &mut Buffer<'_>) -> Result<(u32, WireType)> {
    let packed = read_varint(field, buf)?;
    let wire_type = WireType::from_bits(packed & 0x7)
        .ok_or_else(|| Error::InvalidValue { field: field.into(), reason: "unknown wire type".into(), offset: buf.offset() })?;
    Ok(((packed >> 3) as u32, wire_type))
}

/// Writes a length-delimited field: varint length prefix then raw bytes.
pub fn write_length_delimited(field: &str, buf: &mut Buffer<'_>, bytes: &[u8]) -> Result<()> {
    write_varint(field, buf, bytes.len() as u64)?;
    buf.push_slice(field, bytes)
}

/// Reads a length-delimited field's payload.
pub fn read_length_delimited<'b>(field: &str, buf: &'b mut Buffer<'_>) -> Result<&'b [u8]> {
    let len = read_varint(field, buf)? as usize;
    buf.pop_slice(field, len)
}
