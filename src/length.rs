//! Length placeholders and back-patch bookkeeping.
//!
//! A length placeholder reserves space for a length field whose value isn't
//! known until the enclosing container finishes encoding. The registry here
//! tracks one [`Snapshot`] per outstanding placeholder, keyed by the order
//! placeholders were reserved within their container — matching the source's
//! "snapshot map keyed by placeholder identity", each consumed exactly once
//! at container close (invariant 5).

use crate::buffer::{Buffer, State};
use crate::error::{Error, Result};
use crate::meta::LenSpec;

/// A reserved-but-unwritten length slot, captured at the moment its bytes
/// were reserved in the buffer.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    /// Cursor position where the length bytes were reserved.
    cursor: State,
    /// Width of the reserved length field, in bytes.
    width: usize,
    /// The Δ this placeholder was declared with.
    delta: i64,
    /// Whether Δ is applied inclusive (counts the length field's own
    /// bytes) or exclusive of the measured span.
    inclusive: bool,
    spec: LenSpec,
}

/// Per-container stack of outstanding placeholder snapshots.
///
/// Callers push a new frame on container entry and pop it on container
/// exit, patching every snapshot in the popped frame — this is what makes
/// nested containers each responsible only for their own placeholders.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    frames: Vec<Vec<Snapshot>>,
}

impl PlaceholderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { frames: vec![Vec::new()] }
    }

    /// Opens a new frame for a nested container's placeholders.
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Records a reservation at `cursor`, spanning `width` bytes, under the
    /// given length spec and inclusive/exclusive policy.
    ///
    /// Fails if called with no open frame (a caller popped more frames than
    /// it pushed before reserving).
    pub fn reserve(&mut self, field: &str, cursor: State, spec: LenSpec, inclusive: bool) -> Result<()> {
        let frame = self.frames.last_mut().ok_or_else(|| Error::InvalidValue {
            field: field.into(),
            reason: "reserve called with no open placeholder frame".into(),
            offset: reserved_at_offset(cursor),
        })?;
        frame.push(Snapshot { cursor, width: spec.width, delta: spec.delta, inclusive, spec });
        Ok(())
    }

    /// Pops the current frame and back-patches every snapshot it holds
    /// against `current_cursor`, using `buf` to seek and rewrite each
    /// length field. Consumes each snapshot exactly once.
    pub fn pop_frame_and_patch(
        &mut self,
        field: &str,
        buf: &mut Buffer<'_>,
        current_cursor: usize,
    ) -> Result<()> {
        let frame = self.frames.pop().ok_or_else(|| Error::InvalidValue {
            field: field.into(),
            reason: "pop_frame_and_patch called without a matching push_frame".into(),
            offset: current_cursor,
        })?;
        let resume = buf.get_state();
        for snap in frame {
            let reserved_at = snap.cursor;
            let span = if snap.inclusive {
                current_cursor as i64 - reserved_at_offset(reserved_at) as i64 - snap.delta
            } else {
                current_cursor as i64 - reserved_at_offset(reserved_at) as i64
                    - snap.width as i64
                    - snap.delta
            };
            if span < 0 {
                return Err(Error::InvalidValue {
                    field: field.into(),
                    reason: "negative length placeholder span".into(),
                    offset: current_cursor,
                });
            }
            let length = if let Some(conv) = snap.spec.length_to_value {
                conv(span as u64)?
            } else {
                span as u64
            };
            buf.set_state(reserved_at);
            let bytes = length.to_be_bytes();
            buf.push_slice(field, &bytes[8 - snap.width..])?;
        }
        buf.set_state(resume);
        Ok(())
    }
}

fn reserved_at_offset(state: State) -> usize {
    state.raw()
}
