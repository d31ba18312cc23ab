//! JSON-like text codec (§6): schema-driven object/array emission backed by
//! `simd-json` for the decode side's parse step.
//!
//! Secondary to the octet codec, like [`crate::ber`] and [`crate::varint`].
//! Encode is a thin hand-rolled writer (the schema dictates field order and
//! names, so there is no reflection step); decode parses the whole input
//! with `simd-json` into a borrowed value tree and the schema then pulls
//! named fields out of it, the mirror image of how [`crate::octet::Decoder`]
//! pulls tagged fields out of a buffer.

use crate::error::{Error, Result};
use simd_json::BorrowedValue;
use simd_json::prelude::*;

/// Appends a schema-driven JSON object or array, one member at a time.
///
/// The caller is responsible for declaration order matching the schema,
/// same as [`crate::octet::Encoder::mandatory`]/`optional` being called in
/// order by a hand-written message type. Each open container tracks
/// whether it has emitted a member yet, so a comma is placed before every
/// member but the first.
pub struct JsonWriter {
    out: String,
    pending_comma: Vec<bool>,
}

impl JsonWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { out: String::new(), pending_comma: Vec::new() }
    }

    /// Marks that a member is about to be written at the current depth,
    /// emitting a separating comma if one is needed first.
    fn before_member(&mut self) {
        if let Some(has_prior) = self.pending_comma.last_mut() {
            if *has_prior {
                self.out.push(',');
            }
            *has_prior = true;
        }
    }

    /// Opens a `{`.
    pub fn begin_object(&mut self) {
        self.before_member();
        self.out.push('{');
        self.pending_comma.push(false);
    }

    /// Closes the innermost `}`.
    pub fn end_object(&mut self) {
        self.out.push('}');
        self.pending_comma.pop();
    }

    /// Opens a `[`.
    pub fn begin_array(&mut self) {
        self.before_member();
        self.out.push('[');
        self.pending_comma.push(false);
    }

    /// Closes the innermost `]`.
    pub fn end_array(&mut self) {
        self.out.push(']');
        self.pending_comma.pop();
    }

    fn write_key(&mut self, name: &str) {
        self.before_member();
        self.out.push('"');
        escape_into(&mut self.out, name);
        self.out.push_str("\":");
    }

    /// Opens a nested object at key `name`.
    pub fn begin_object_field(&mut self, name: &str) {
        self.write_key(name);
        self.out.push('{');
        self.pending_comma.push(false);
    }

    /// Opens a nested array at key `name`.
    pub fn begin_array_field(&mut self, name: &str) {
        self.write_key(name);
        self.out.push('[');
        self.pending_comma.push(false);
    }

    /// Writes an unsigned integer as a bare array element.
    pub fn element_u64(&mut self, value: u64) {
        self.before_member();
        self.out.push_str(&value.to_string());
    }

    /// Writes `"name": <unsigned integer>`.
    pub fn field_u64(&mut self, name: &str, value: u64) {
        self.write_key(name);
        self.out.push_str(&value.to_string());
    }

    /// Writes `"name": <signed integer>`.
    pub fn field_i64(&mut self, name: &str, value: i64) {
        self.write_key(name);
        self.out.push_str(&value.to_string());
    }

    /// Writes `"name": true|false`.
    pub fn field_bool(&mut self, name: &str, value: bool) {
        self.write_key(name);
        self.out.push_str(if value { "true" } else { "false" });
    }

    /// Writes `"name": "value"`, with JSON string escaping applied.
    pub fn field_str(&mut self, name: &str, value: &str) {
        self.write_key(name);
        self.out.push('"');
        escape_into(&mut self.out, value);
        self.out.push('"');
    }

    /// Consumes the writer, returning the finished document. Caller must
    /// have closed every `begin_object`/`begin_array` it opened.
    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Parses `input` into a borrowed value tree, for the schema to pull named
/// fields out of. `input` is mutated in place by `simd-json`'s in-place
/// parser, mirroring how [`crate::buffer::Buffer`] treats its input as a
/// mutable working area rather than a read-only slice.
pub fn parse<'a>(field: &str, input: &'a mut [u8]) -> Result<BorrowedValue<'a>> {
    simd_json::to_borrowed_value(input).map_err(|e| Error::InvalidValue {
        field: field.into(),
        reason: e.to_string().into(),
        offset: 0,
    })
}

/// Looks up `name` in a parsed JSON object, erroring with `MissingIe` if
/// absent — the JSON-codec equivalent of a missing mandatory tag.
pub fn require_field<'v, 'a>(field: &str, object: &'v BorrowedValue<'a>, name: &str) -> Result<&'v BorrowedValue<'a>> {
    object
        .get(name)
        .ok_or_else(|| Error::MissingIe { field: field.into(), have: 0, min: 1 })
}

/// Reads a named field as an unsigned integer.
pub fn field_as_u64(field: &str, object: &BorrowedValue<'_>, name: &str) -> Result<u64> {
    let value = require_field(field, object, name)?;
    value.as_u64().ok_or_else(|| Error::InvalidValue {
        field: field.into(),
        reason: format!("field {name} is not an unsigned integer").into(),
        offset: 0,
    })
}

/// Reads a named field as a string.
pub fn field_as_str<'v>(field: &str, object: &'v BorrowedValue<'_>, name: &str) -> Result<&'v str> {
    let value = require_field(field, object, name)?;
    value.as_str().ok_or_else(|| Error::InvalidValue {
        field: field.into(),
        reason: format!("field {name} is not a string").into(),
        offset: 0,
    })
}

/// Reads a named field as a boolean.
pub fn field_as_bool(field: &str, object: &BorrowedValue<'_>, name: &str) -> Result<bool> {
    let value = require_field(field, object, name)?;
    value.as_bool().ok_or_else(|| Error::InvalidValue {
        field: field.into(),
        reason: format!("field {name} is not a boolean").into(),
        offset: 0,
    })
}
