//! The Choice engine: a tagged union of alternatives, lowered to an enum.
//!
//! Per the design notes ("Choice storage (tagged union of N types) → enum"),
//! this crate does not reimplement the source's aligned-storage-plus-index
//! layout; [`Alternatives`] is implemented by a plain Rust `enum` the user
//! declares, and [`Choice`] just tracks whether one is currently selected.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::octet::{Decoder, Encoder};

/// A closed set of alternatives a [`Choice`] can hold.
///
/// Implemented once, by hand or via a small match, on the user's enum —
/// the Rust equivalent of the source's per-alternative tag table.
pub trait Alternatives: Sized {
    /// The tag identifying this alternative's variant on the wire.
    fn tag(&self) -> u64;

    /// Writes this alternative's payload (not its tag).
    fn encode_body(&self, field: &str, buf: &mut Buffer<'_>) -> Result<()>;

    /// Constructs and decodes the alternative matching `tag`, or `Ok(None)`
    /// if no alternative accepts it (the caller turns that into
    /// `UnknownTag`).
    fn decode_variant(field: &str, tag: u64, buf: &mut Buffer<'_>) -> Result<Option<Self>>;
}

/// A tagged union holding at most one alternative at a time.
///
/// Selecting a different alternative overwrites the storage (Rust's enum
/// assignment does this by construction); selecting the same alternative
/// again is idempotent only in the sense that the old payload is dropped
/// and replaced — matching invariant 4.
#[derive(Debug, Clone, Default)]
pub struct Choice<E: Alternatives> {
    current: Option<E>,
}

impl<E: Alternatives> Choice<E> {
    /// An empty choice.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Selects `alt`, discarding whatever was previously stored.
    pub fn select(&mut self, alt: E) {
        self.current = Some(alt);
    }

    /// Borrows the currently selected alternative, if any.
    pub fn get(&self) -> Option<&E> {
        self.current.as_ref()
    }

    /// True once an alternative has been selected.
    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }

    /// Clears to the empty state.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Writes the selected alternative's tag then payload. Fails with
    /// `MissingIe` if nothing is selected.
    pub fn encode(&self, field: &str, tag_width: usize, enc: &mut Encoder<'_>) -> Result<()> {
        let alt = self.current.as_ref().ok_or_else(|| Error::MissingIe {
            field: field.into(),
            have: 0,
            min: 1,
        })?;
        let tag = alt.tag();
        let bytes = tag.to_be_bytes();
        enc.buffer_mut().push_slice(field, &bytes[8 - tag_width..])?;
        alt.encode_body(field, enc.buffer_mut())
    }

    /// Reads a tag, dispatches to the matching alternative, and decodes it
    /// in place. `UnknownTag` if no alternative matches.
    pub fn decode(&mut self, field: &str, tag_width: usize, dec: &mut Decoder<'_>) -> Result<()> {
        let offset_before = dec.offset();
        let tag = dec.read_u64(field, tag_width)?;
        let buf = dec.buffer_mut();
        match E::decode_variant(field, tag, buf)? {
            Some(alt) => {
                self.current = Some(alt);
                Ok(())
            }
            None => Err(Error::UnknownTag { field: field.into(), tag, offset: offset_before }),
        }
    }
}
