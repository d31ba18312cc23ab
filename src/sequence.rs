//! The Sequence engine: ordered traversal with presence, arity, counter,
//! and condition handling (§4.4).
//!
//! A Sequence is the ordinary case of a message type: a struct whose fields
//! are [`crate::field::Mandatory`]/[`crate::field::Optional`]/
//! [`crate::field::MultiField`] wrappers, and whose `encode`/`decode`
//! methods call [`crate::octet::Encoder`]/[`crate::octet::Decoder`] once per
//! field, in the order the schema declares them. That declaration order is
//! itself what makes a hand-written struct a faithful Sequence — there is
//! no separate generic `Sequence<IES…>` type to instantiate.
//!
//! What this module adds on top of the bare field-by-field calls is the
//! container-scoped bookkeeping every Sequence needs at its boundary: a
//! placeholder frame for any length placeholders declared inside it (§4.8),
//! and the padding pass once every member has been written (§4.9). Both are
//! opened on entry and closed on exit, so nested sequences each own only
//! their own placeholders — exactly [`crate::octet::Encoder::begin_container`]
//! and [`crate::octet::Encoder::end_container`].

use crate::error::Result;
use crate::field::Setter;
use crate::octet::Encoder;
use crate::padding::Padding;

/// Runs `body` as one Sequence's encode pass: opens a placeholder frame,
/// runs `body`, then patches placeholders and applies `padding` on exit.
///
/// Equivalent to calling `begin_container`/`end_container` by hand, but
/// ensures the frame is always closed even if `body` returns early via `?`.
pub fn encode_sequence<'a, 'b>(
    enc: &'b mut Encoder<'a>,
    field: &str,
    padding: Option<Padding>,
    body: impl FnOnce(&mut Encoder<'a>) -> Result<()>,
) -> Result<()> {
    let start = enc.offset();
    enc.begin_container();
    let result = body(enc);
    // Always attempt to patch and pad, even on error, so a caller inspecting
    // the partially-written buffer after a failure sees consistent bytes
    // for everything already resolved — but propagate the original error.
    let patched = enc.end_container(field, start, padding);
    result.and(patched)
}

/// Invokes a [`Setter`] before encoding the computed field it populates
/// (§4.4 step 1), matching the order the algorithm specifies: setters run
/// before the length placeholder and presence checks that follow them.
pub fn run_setter<T>(setter: Option<&mut Setter<'_, T>>, target: &mut T) {
    if let Some(setter) = setter {
        setter(target);
    }
}
