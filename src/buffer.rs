//! Cursor-based buffer with save/restore state and scoped size regions.

use crate::error::{Error, Result};
use smallvec::SmallVec;

/// Owned byte storage for encoding, backed by an inline small-vector buffer.
///
/// Mirrors `rustyasn::buffers::MessageBuffer`: most protocol messages fit
/// comfortably inline, so the common case never touches the allocator.
#[derive(Debug, Clone, Default)]
pub struct OwnedBuffer {
    inner: SmallVec<[u8; 256]>,
}

impl OwnedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with at least `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Borrows the buffer's contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// True if no element has spilled onto the heap.
    pub fn is_inline(&self) -> bool {
        !self.inner.spilled()
    }
}

/// A saved cursor position, restorable via [`Buffer::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    cursor: usize,
}

impl State {
    /// Raw cursor offset this state captured. Crate-private: only the
    /// length back-patch registry needs to do arithmetic on it directly.
    pub(crate) fn raw(self) -> usize {
        self.cursor
    }
}

/// Guard returned by [`Buffer::push_size`]; restores the previous `end` when
/// dropped. Nested guards unwind LIFO, matching the size-region invariant.
pub struct SizeGuard {
    prior_end: usize,
}

impl SizeGuard {
    /// Consumes the guard early, restoring the buffer's prior `end`.
    pub fn pop(self, buf: &mut Buffer<'_>) {
        buf.end = self.prior_end;
    }

    /// Consumes the guard, asserting the region was fully read before
    /// restoring the buffer's prior `end`. Any unread bytes are reported as
    /// an [`Error::Overflow`] — per §4.4 step 5, a size region that unwinds
    /// with bytes unconsumed is the inner field's failure to exhaust it.
    pub fn finish(self, field: &str, buf: &mut Buffer<'_>) -> Result<()> {
        if !buf.is_empty() {
            return Err(Error::Overflow {
                field: field.into(),
                needed: 0,
                available: buf.size(),
                offset: buf.offset(),
            });
        }
        buf.end = self.prior_end;
        Ok(())
    }
}

/// A contiguous byte region with a read/write cursor and an `end` marker that
/// can be narrowed by [`Buffer::push_size`] to bound a length-delimited
/// payload.
///
/// The same buffer serves encode (writing into `data`) and decode (reading
/// from `data`); which mode is in use is a matter of how the caller drives it
/// — the cursor bookkeeping is identical either way.
pub struct Buffer<'a> {
    data: &'a mut [u8],
    cursor: usize,
    end: usize,
}

impl<'a> Buffer<'a> {
    /// Wraps `data` as a buffer spanning its full length.
    pub fn new(data: &'a mut [u8]) -> Self {
        let end = data.len();
        Self { data, cursor: 0, end }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// Bytes remaining between the cursor and the current `end`.
    pub fn size(&self) -> usize {
        self.end - self.cursor
    }

    /// True if the cursor has reached `end`.
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.end
    }

    /// Writes a single byte, failing with [`Error::Overflow`] at the end.
    pub fn push(&mut self, field: &str, byte: u8) -> Result<()> {
        self.require(field, 1)?;
        self.data[self.cursor] = byte;
        self.cursor += 1;
        Ok(())
    }

    /// Writes `bytes`, failing with [`Error::Overflow`] if they don't fit.
    pub fn push_slice(&mut self, field: &str, bytes: &[u8]) -> Result<()> {
        self.require(field, bytes.len())?;
        self.data[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(())
    }

    /// Reads a single byte, failing with [`Error::Overflow`] at the end.
    pub fn pop(&mut self, field: &str) -> Result<u8> {
        self.require(field, 1)?;
        let byte = self.data[self.cursor];
        self.cursor += 1;
        Ok(byte)
    }

    /// Reads `n` bytes and returns them as a slice into the underlying data.
    pub fn pop_slice(&mut self, field: &str, n: usize) -> Result<&[u8]> {
        self.require(field, n)?;
        let slice = &self.data[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(slice)
    }

    /// Moves the cursor by `n` bytes (positive or negative), failing with
    /// [`Error::Overflow`] if the result would fall outside `[0, end]`.
    pub fn advance(&mut self, field: &str, n: isize) -> Result<()> {
        let target = self.cursor as isize + n;
        if target < 0 || target as usize > self.end {
            return Err(Error::Overflow {
                field: field.into(),
                needed: n.unsigned_abs(),
                available: self.size(),
                offset: self.cursor,
            });
        }
        self.cursor = target as usize;
        Ok(())
    }

    /// Writes `n` copies of `filler`, failing with [`Error::Overflow`].
    pub fn fill(&mut self, field: &str, n: usize, filler: u8) -> Result<()> {
        self.require(field, n)?;
        self.data[self.cursor..self.cursor + n].fill(filler);
        self.cursor += n;
        Ok(())
    }

    /// Saves the current cursor.
    pub fn get_state(&self) -> State {
        State { cursor: self.cursor }
    }

    /// Restores a previously saved cursor. The `end` marker is untouched —
    /// restoring a state never escapes an enclosing size region.
    pub fn set_state(&mut self, state: State) {
        debug_assert!(state.cursor <= self.end);
        self.cursor = state.cursor;
    }

    /// Narrows `end` to `cursor + n`, returning a guard that restores the
    /// prior `end` when dropped or explicitly [`SizeGuard::pop`]ped. Nested
    /// regions nest LIFO because each guard only remembers its own parent.
    pub fn push_size(&mut self, field: &str, n: usize) -> Result<SizeGuard> {
        let new_end = self.cursor + n;
        if new_end > self.end {
            return Err(Error::Overflow {
                field: field.into(),
                needed: n,
                available: self.size(),
                offset: self.cursor,
            });
        }
        let prior_end = self.end;
        self.end = new_end;
        log::trace!("push_size({field}): narrowed end {prior_end} -> {new_end}");
        Ok(SizeGuard { prior_end })
    }

    /// Returns the first `upto` bytes of the underlying storage, regardless
    /// of the current cursor or `end` — used by callers that want to
    /// inspect everything written so far.
    pub fn as_written(&self, upto: usize) -> &[u8] {
        &self.data[..upto]
    }

    fn require(&self, field: &str, n: usize) -> Result<()> {
        if self.cursor + n > self.end {
            return Err(Error::Overflow {
                field: field.into(),
                needed: n,
                available: self.size(),
                offset: self.cursor,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_roundtrip() {
        let mut data = [0u8; 4];
        let mut buf = Buffer::new(&mut data);
        buf.push("a", 0x11).unwrap();
        buf.push("b", 0x22).unwrap();
        assert_eq!(buf.offset(), 2);
        buf.set_state(State { cursor: 0 });
        assert_eq!(buf.pop("a").unwrap(), 0x11);
        assert_eq!(buf.pop("b").unwrap(), 0x22);
    }

    #[test]
    fn overflow_on_short_buffer() {
        let mut data = [0u8; 1];
        let mut buf = Buffer::new(&mut data);
        buf.push("a", 1).unwrap();
        let err = buf.push("a", 2).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn size_region_nests_lifo() {
        let mut data = [0u8; 10];
        let mut buf = Buffer::new(&mut data);
        let outer = buf.push_size("outer", 8).unwrap();
        assert_eq!(buf.size(), 8);
        let inner = buf.push_size("inner", 4).unwrap();
        assert_eq!(buf.size(), 4);
        inner.pop(&mut buf);
        assert_eq!(buf.size(), 8);
        outer.pop(&mut buf);
        assert_eq!(buf.size(), 10);
    }

    #[test]
    fn size_region_rejects_beyond_end() {
        let mut data = [0u8; 4];
        let mut buf = Buffer::new(&mut data);
        assert!(buf.push_size("too-big", 5).is_err());
    }

    #[test]
    fn advance_bounds_checked() {
        let mut data = [0u8; 4];
        let mut buf = Buffer::new(&mut data);
        assert!(buf.advance("f", -1).is_err());
        buf.advance("f", 4).unwrap();
        assert!(buf.advance("f", 1).is_err());
    }
}
