//! The octet codec: the primary, most-detailed encoder/decoder flavor.
//!
//! `Encoder`/`Decoder` drive the buffer, meta-info, length placeholder, and
//! padding subsystems on behalf of hand-written message types — the same
//! role `rustyfix::tagvalue::decoder::Decoder` plays for its own byte-walking
//! parser: an imperative engine that a message's own `encode`/`decode`
//! methods call into, field by field, in declared order.

use crate::buffer::{Buffer, SizeGuard, State};
use crate::error::{Error, ErrorContext, Result};
use crate::field::{Condition, Mandatory, MultiField, Optional};
use crate::ie::Ie;
use crate::length::PlaceholderRegistry;
use crate::meta::{LenSpec, Meta, TagSpec};
use crate::padding::{Padding, PaddingMode};

/// Drives the octet codec's write side.
pub struct Encoder<'a> {
    buf: Buffer<'a>,
    lengths: PlaceholderRegistry,
}

impl<'a> Encoder<'a> {
    /// Wraps `data` for encoding from offset 0.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { buf: Buffer::new(data), lengths: PlaceholderRegistry::new() }
    }

    /// Current write offset.
    pub fn offset(&self) -> usize {
        self.buf.offset()
    }

    /// Opens a placeholder frame for a nested container (§4.4 step 7 is
    /// scoped per-container: each container only patches its own
    /// placeholders on exit).
    pub fn begin_container(&mut self) {
        self.lengths.push_frame();
    }

    /// Closes the current container's placeholder frame, back-patching
    /// every length placeholder reserved within it, then applies `padding`
    /// if configured.
    ///
    /// The filler written is always sized from the full envelope+payload
    /// span, identically in both padding modes — only the cursor reported to
    /// the placeholder patch varies: `Inclusive` counts the not-yet-written
    /// filler toward the length, `Exclusive` does not.
    pub fn end_container(&mut self, field: &str, start: usize, padding: Option<Padding>) -> Result<()> {
        let content_end = self.buf.offset();
        let span = content_end - start;
        let pad_amount = padding.map_or(0, |pad| pad.pad_amount(span));
        let reported_end = match padding {
            Some(pad) if pad.mode == PaddingMode::Inclusive => content_end + pad_amount,
            _ => content_end,
        };
        self.lengths.pop_frame_and_patch(field, &mut self.buf, reported_end)?;
        if let Some(pad) = padding {
            pad.pad_encode(field, &mut self.buf, span)?;
        }
        Ok(())
    }

    /// Reserves a standalone length placeholder (§4.8): `width` bytes are
    /// advanced now, undefined, and rewritten when the enclosing container
    /// closes with the span of everything encoded since.
    pub fn reserve_placeholder(&mut self, field: &str, spec: LenSpec, inclusive: bool) -> Result<()> {
        let at = self.buf.get_state();
        self.buf.advance(field, spec.width as isize)?;
        self.lengths.reserve(field, at, spec, inclusive)
    }

    /// Writes a literal tag value.
    pub fn write_tag(&mut self, field: &str, tag: &TagSpec) -> Result<()> {
        let bytes = tag.value.to_be_bytes();
        self.buf.push_slice(field, &bytes[8 - tag.width..])
    }

    /// Writes a field's ordinary (non-placeholder) meta-info: an optional
    /// TAG followed by an optional LEN computed directly from the IE's own
    /// `encoded_len` (§4.3's "outermost-to-innermost" order for the common
    /// TAG-then-LEN-then-VALUE shape).
    pub fn write_meta(&mut self, field: &str, meta: &Meta, body_len: usize) -> Result<()> {
        if let Some(tag) = &meta.tag {
            self.write_tag(field, tag)?;
        }
        if let Some(len) = &meta.len {
            let raw = if let Some(conv) = len.value_to_length {
                conv(body_len as u64)?
            } else {
                body_len as u64
            };
            let bytes = raw.to_be_bytes();
            self.buf.push_slice(field, &bytes[8 - len.width..])?;
        }
        Ok(())
    }

    /// Encodes a mandatory single-instance field: meta-info then payload.
    /// Fails with `MissingIe` if the field was never set (invariant 1).
    pub fn mandatory<T: Ie>(&mut self, field: &str, meta: Meta, value: &Mandatory<T>) -> Result<()> {
        let ie = value.require(field)?;
        self.write_meta(field, &meta, ie.encoded_len())?;
        ie.encode_body(field, &mut self.buf).field_context(field)
    }

    /// Encodes an optional single-instance field if set; a no-op otherwise
    /// (§4.4 step 3).
    pub fn optional<T: Ie>(&mut self, field: &str, meta: Meta, value: &Optional<T>) -> Result<()> {
        let Some(ie) = value.get() else { return Ok(()) };
        self.write_meta(field, &meta, ie.encoded_len())?;
        ie.encode_body(field, &mut self.buf).field_context(field)
    }

    /// Encodes an optional single-instance field only if `condition` holds
    /// (§4.4 step 4), even if it is set — matching the source's condition
    /// gating taking priority over mere presence.
    pub fn optional_if<T: Ie>(
        &mut self,
        field: &str,
        meta: Meta,
        value: &Optional<T>,
        condition: &Condition<'_>,
    ) -> Result<()> {
        if condition() {
            self.optional(field, meta, value)
        } else {
            Ok(())
        }
    }

    /// Encodes a multi-field with `[min, max]` checked and no explicit wire
    /// counter: each element gets its own meta-info and payload in turn.
    pub fn multi<T: Ie, const N: usize>(
        &mut self,
        field: &str,
        meta: Meta,
        values: &MultiField<T, N>,
        min: usize,
        max: usize,
    ) -> Result<()> {
        crate::field::check_arity(field, values.count(), min, max)?;
        for ie in values.iter() {
            self.write_meta(field, &meta, ie.encoded_len())?;
            ie.encode_body(field, &mut self.buf).field_context(field)?;
        }
        Ok(())
    }

    /// Encodes a multi-field preceded by an explicit counter IE carrying
    /// `count()` (§4.4 step 5 — the counter is written before any element).
    pub fn counted_multi<T: Ie, const N: usize>(
        &mut self,
        field: &str,
        counter_width: usize,
        meta: Meta,
        values: &MultiField<T, N>,
        min: usize,
        max: usize,
    ) -> Result<()> {
        crate::field::check_arity(field, values.count(), min, max)?;
        let count = values.count() as u64;
        let bytes = count.to_be_bytes();
        self.buf.push_slice(field, &bytes[8 - counter_width..])?;
        for ie in values.iter() {
            self.write_meta(field, &meta, ie.encoded_len())?;
            ie.encode_body(field, &mut self.buf).field_context(field)?;
        }
        Ok(())
    }

    /// Borrows the underlying buffer, for containers that need raw access
    /// (e.g. a Choice writing its own tag before delegating payload
    /// encoding to whichever alternative is selected).
    pub fn buffer_mut(&mut self) -> &mut Buffer<'a> {
        &mut self.buf
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        // `Buffer` borrows the full slice; everything up to the cursor has
        // been written.
        let offset = self.buf.offset();
        self.buf.as_written(offset)
    }
}

/// Drives the octet codec's read side.
pub struct Decoder<'a> {
    buf: Buffer<'a>,
}

/// Outcome of reading an optional field's meta-info.
pub enum OptionalMeta {
    /// The tag didn't match; the buffer was rewound and the field is absent.
    Absent,
    /// The tag matched (or there was none to match); encoding proceeds with
    /// an optional bounding size region.
    Present(Option<SizeGuard>),
}

impl<'a> Decoder<'a> {
    /// Wraps `data` for decoding from offset 0.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { buf: Buffer::new(data) }
    }

    /// Current read offset.
    pub fn offset(&self) -> usize {
        self.buf.offset()
    }

    /// Bytes remaining in the current size region (or whole buffer).
    pub fn remaining(&self) -> usize {
        self.buf.size()
    }

    /// True once the current size region (or whole buffer) is exhausted.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn read_tag_value(&mut self, field: &str, width: usize) -> Result<u64> {
        let raw = self.buf.pop_slice(field, width)?;
        let mut full = [0u8; 8];
        full[8 - width..].copy_from_slice(raw);
        Ok(u64::from_be_bytes(full))
    }

    /// Reads a `width`-byte big-endian value and advances past it. Exposed
    /// for containers (Choice, Set) that drive their own header dispatch
    /// directly rather than through [`Meta`].
    pub fn read_u64(&mut self, field: &str, width: usize) -> Result<u64> {
        self.read_tag_value(field, width)
    }

    /// Reads a tag value without advancing the cursor (§4.4's "tag
    /// peeking").
    pub fn peek_tag(&mut self, field: &str, width: usize) -> Result<u64> {
        let state = self.buf.get_state();
        let value = self.read_tag_value(field, width)?;
        self.buf.set_state(state);
        Ok(value)
    }

    /// Reads a mandatory field's meta-info: tag mismatch is `UnknownTag`;
    /// an optional returned size region must later be `finish`ed.
    pub fn read_meta_mandatory(&mut self, field: &str, meta: &Meta) -> Result<Option<SizeGuard>> {
        if let Some(tag) = &meta.tag {
            let got = if tag.peek { self.peek_tag(field, tag.width)? } else { self.read_tag_value(field, tag.width)? };
            if got != tag.value {
                return Err(Error::UnknownTag { field: field.into(), tag: got, offset: self.buf.offset() });
            }
        }
        self.read_len(field, meta)
    }

    /// Reads an optional field's meta-info. Tag mismatch rewinds the
    /// cursor and reports [`OptionalMeta::Absent`] rather than erroring.
    pub fn read_meta_optional(&mut self, field: &str, meta: &Meta) -> Result<OptionalMeta> {
        if let Some(tag) = &meta.tag {
            let before = self.buf.get_state();
            let got = self.read_tag_value(field, tag.width)?;
            if got != tag.value {
                self.buf.set_state(before);
                return Ok(OptionalMeta::Absent);
            }
            if tag.peek {
                self.buf.set_state(before);
            }
        }
        Ok(OptionalMeta::Present(self.read_len(field, meta)?))
    }

    fn read_len(&mut self, field: &str, meta: &Meta) -> Result<Option<SizeGuard>> {
        let Some(len) = &meta.len else { return Ok(None) };
        let raw = self.read_tag_value(field, len.width)?;
        let value = if let Some(conv) = len.value_to_length { conv(raw)? } else { raw };
        Ok(Some(self.buf.push_size(field, value as usize)?))
    }

    /// Decodes a mandatory single-instance field.
    pub fn mandatory<T: Ie>(&mut self, field: &str, meta: Meta, value: &mut Mandatory<T>) -> Result<()> {
        let guard = self.read_meta_mandatory(field, &meta)?;
        value.get_mut().decode_body(field, &mut self.buf).field_context(field)?;
        if let Some(g) = guard {
            g.finish(field, &mut self.buf)?;
        }
        Ok(())
    }

    /// Decodes an optional single-instance field; leaves it unset if the
    /// tag didn't match.
    pub fn optional<T: Ie>(&mut self, field: &str, meta: Meta, value: &mut Optional<T>) -> Result<()> {
        match self.read_meta_optional(field, &meta)? {
            OptionalMeta::Absent => Ok(()),
            OptionalMeta::Present(guard) => {
                value.get_mut().decode_body(field, &mut self.buf).field_context(field)?;
                if let Some(g) = guard {
                    g.finish(field, &mut self.buf)?;
                }
                Ok(())
            }
        }
    }

    /// Decodes a multi-field by looping while the enclosing size region (or
    /// buffer) has bytes remaining (the "`∞` multi-field" case in §4.4 step
    /// 4), checking `[min, max]` once the loop ends.
    ///
    /// Appends through [`MultiField::push_back`], so inline capacity is the
    /// effective ceiling here; a field that genuinely needs allocator
    /// overflow should decode element-by-element with
    /// [`MultiField::push_back_with`] instead of this convenience method.
    pub fn multi_while_remaining<T: Ie, const N: usize>(
        &mut self,
        field: &str,
        meta: Meta,
        values: &mut MultiField<T, N>,
        min: usize,
        max: usize,
    ) -> Result<()> {
        while !self.buf.is_empty() {
            match self.read_meta_optional(field, &meta)? {
                OptionalMeta::Absent => break,
                OptionalMeta::Present(guard) => {
                    let mut element = T::default();
                    element.decode_body(field, &mut self.buf).field_context(field)?;
                    if let Some(g) = guard {
                        g.finish(field, &mut self.buf)?;
                    }
                    values
                        .push_back(field, element)
                        .map_err(|_| Error::ExtraIe { field: field.into(), have: values.count() + 1, max })?;
                }
            }
        }
        crate::field::check_arity(field, values.count(), min, max)
    }

    /// Decodes a multi-field preceded by an explicit counter IE.
    pub fn counted_multi<T: Ie, const N: usize>(
        &mut self,
        field: &str,
        counter_width: usize,
        meta: Meta,
        values: &mut MultiField<T, N>,
        min: usize,
        max: usize,
    ) -> Result<()> {
        let count = self.read_tag_value(field, counter_width)? as usize;
        for _ in 0..count {
            let guard = self.read_meta_mandatory(field, &meta)?;
            let mut element = T::default();
            element.decode_body(field, &mut self.buf).field_context(field)?;
            if let Some(g) = guard {
                g.finish(field, &mut self.buf)?;
            }
            values
                .push_back(field, element)
                .map_err(|_| Error::ExtraIe { field: field.into(), have: values.count() + 1, max })?;
        }
        crate::field::check_arity(field, values.count(), min, max)
    }

    /// Pushes a bounding size region of `n` bytes, e.g. for a container
    /// whose own LEN meta-info was already read by the caller.
    pub fn push_size(&mut self, field: &str, n: usize) -> Result<SizeGuard> {
        self.buf.push_size(field, n)
    }

    /// Saves the cursor, for containers implementing their own peek logic
    /// beyond a single tag (e.g. Set's header dispatch).
    pub fn save_state(&self) -> State {
        self.buf.get_state()
    }

    /// Restores a previously saved cursor.
    pub fn restore_state(&mut self, state: State) {
        self.buf.set_state(state);
    }

    /// Borrows the underlying buffer for low-level access.
    pub fn buffer_mut(&mut self) -> &mut Buffer<'a> {
        &mut self.buf
    }
}
