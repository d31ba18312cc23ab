//! The Set engine: tag-dispatched decode, declaration-order encode.
//!
//! A Set's direct-children tags must be mutually distinct; this crate
//! checks that once, at construction, rather than at Rust's compile time
//! (true compile-time tag-uniqueness checking would need const-eval over a
//! heterogeneous type list, which the redesign notes accept lowering to a
//! runtime assertion when the source's template trick doesn't carry over
//! cleanly). [`SetSchema::new`] panics on a duplicate tag, so the check
//! still fires before any message is ever encoded or decoded, just not at
//! `rustc` compile time.

use crate::octet::Decoder;

/// One member of a Set: a known tag, a human name for error reporting, and
/// a width for reading its header tag.
#[derive(Debug, Clone, Copy)]
pub struct SetMember {
    /// Declared name, used in error messages.
    pub name: &'static str,
    /// The tag identifying this member on the wire.
    pub tag: u64,
}

/// The declared tag list for a Set container, checked for uniqueness once.
#[derive(Debug, Clone)]
pub struct SetSchema {
    members: Vec<SetMember>,
}

impl SetSchema {
    /// Builds a schema from `members`, panicking if any two share a tag —
    /// the "compile-time" uniqueness constraint in §4.6, enforced as early
    /// as this crate can enforce it.
    pub fn new(members: Vec<SetMember>) -> Self {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                assert!(a.tag != b.tag, "duplicate Set tag {:#x} ({} and {})", a.tag, a.name, b.name);
            }
        }
        Self { members }
    }

    /// Finds the member matching `tag`, first match in declaration order.
    pub fn dispatch(&self, tag: u64) -> Option<&SetMember> {
        self.members.iter().find(|m| m.tag == tag)
    }
}

/// Reads one Set element's header tag (without consuming it), for the
/// caller to dispatch against a [`SetSchema`] and then decode the matching
/// field's body through the same [`Decoder`].
///
/// Returns `None` once the enclosing size region is exhausted — the signal
/// to stop looping (§4.6 decode step: "loop while the enclosing size region
/// has bytes").
pub fn peek_next_tag(dec: &mut Decoder<'_>, field: &str, tag_width: usize) -> Option<u64> {
    if dec.is_empty() {
        return None;
    }
    dec.peek_tag(field, tag_width).ok()
}

/// Drains an unknown tag's TLV payload (tag already peeked, `len_width`
/// bytes of length follow it) so a decode loop can tolerate unrecognized
/// members instead of the default `UnknownTag` rejection.
pub fn skip_unknown(dec: &mut Decoder<'_>, field: &str, tag_width: usize, len_width: usize) -> crate::error::Result<()> {
    dec.buffer_mut().advance(field, tag_width as isize)?;
    let len_bytes = dec.buffer_mut().pop_slice(field, len_width)?;
    let mut full = [0u8; 8];
    full[8 - len_width..].copy_from_slice(len_bytes);
    let len = u64::from_be_bytes(full) as isize;
    dec.buffer_mut().advance(field, len)
}

/// Set containers are hand-written message types whose `encode` method
/// calls `Encoder::mandatory` / `Encoder::optional` once per member, in the
/// order the schema declares them — that declaration order alone satisfies
/// §4.6's "canonical order" encode requirement, with no dispatch step
/// needed (dispatch is a decode-only concern, handled by [`SetSchema`]).
