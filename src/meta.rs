//! Meta-info: the TAG and LEN metadata uniformly wrapping a field.
//!
//! A field's meta-info is, in the general case, an ordered list of `{kind,
//! IE}` pairs. The octet codec only ever needs at most one TAG followed by
//! at most one LEN — every worked scenario in the specification (S1, S2,
//! S4) shows this shape — so [`Meta`] models that common case directly
//! instead of a general list; BER's explicit/implicit double-tagging, which
//! genuinely needs nested meta-info, is handled by `ber` with its own
//! identifier-octet logic rather than by reusing this type.

use crate::error::Result;

/// A literal tag value prefixing a field, compared on decode.
#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    /// Width of the tag in bytes (1, 2, or 4 in practice).
    pub width: usize,
    /// The expected tag value.
    pub value: u64,
    /// If true, the tag is read without advancing the cursor (§4.4 "tag
    /// peeking"), so a following field can re-read it.
    pub peek: bool,
}

impl TagSpec {
    /// A non-peeking tag of the given width and value.
    pub const fn new(width: usize, value: u64) -> Self {
        Self { width, value, peek: false }
    }

    /// Same tag, marked as a peek.
    pub const fn peeking(self) -> Self {
        Self { peek: true, ..self }
    }
}

/// A length value preceding a field's payload, carrying its byte span.
#[derive(Debug, Clone, Copy)]
pub struct LenSpec {
    /// Width of the length field in bytes.
    pub width: usize,
    /// Offset applied when converting between the measured payload span and
    /// the encoded length value (§4.8's Δ).
    pub delta: i64,
    /// Optional bijection from raw payload length to the encoded value.
    /// Absent means "raw = bytes" (§4.4).
    pub value_to_length: Option<fn(u64) -> Result<u64>>,
    /// Optional inverse of `value_to_length`.
    pub length_to_value: Option<fn(u64) -> Result<u64>>,
}

impl LenSpec {
    /// A plain length field of the given width with no conversion and no
    /// delta.
    pub const fn new(width: usize) -> Self {
        Self { width, delta: 0, value_to_length: None, length_to_value: None }
    }

    /// Same length field with `delta` applied.
    pub const fn with_delta(self, delta: i64) -> Self {
        Self { delta, ..self }
    }

    /// Same length field with a value/length bijection installed.
    pub const fn with_conversion(
        self,
        value_to_length: fn(u64) -> Result<u64>,
        length_to_value: fn(u64) -> Result<u64>,
    ) -> Self {
        Self { value_to_length: Some(value_to_length), length_to_value: Some(length_to_value), ..self }
    }
}

/// The meta-info attached to a single field: an optional TAG followed by an
/// optional LEN, matching the outermost-to-innermost order the encoder and
/// decoder both walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Meta {
    /// The field's TAG meta-info, if any.
    pub tag: Option<TagSpec>,
    /// The field's LEN meta-info, if any.
    pub len: Option<LenSpec>,
}

impl Meta {
    /// No meta-info: a bare value with no TAG or LEN wrapping it.
    pub const NONE: Meta = Meta { tag: None, len: None };

    /// TAG-only meta-info (a "TV" field shape).
    pub const fn tag(tag: TagSpec) -> Self {
        Self { tag: Some(tag), len: None }
    }

    /// LEN-only meta-info (an "LV" field shape).
    pub const fn len(len: LenSpec) -> Self {
        Self { tag: None, len: Some(len) }
    }

    /// TAG+LEN meta-info (a "TLV" field shape).
    pub const fn tag_len(tag: TagSpec, len: LenSpec) -> Self {
        Self { tag: Some(tag), len: Some(len) }
    }
}
