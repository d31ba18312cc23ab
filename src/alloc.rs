//! Allocator trait for multi-field overflow storage.
//!
//! Multi-fields keep up to `INPLACE` elements inline; once that capacity is
//! exhausted, further elements are requested from an [`Allocator`] supplied
//! by the caller for the duration of a single encode or decode. A simple
//! bump allocator with no reclamation is sufficient and matches the
//! behavior the source exhibits for unbounded multi-fields.

use crate::error::{Error, Result};

/// Supplies storage slots for multi-field overflow elements.
///
/// Implementors serve `allocate` requests in FIFO order. There is no
/// `deallocate`: per the open question in [`crate`]'s design notes,
/// `pop_back` on an externally stored element does not return the slot to
/// the allocator — storage is reclaimed only when the allocator itself is
/// dropped.
pub trait Allocator<T> {
    /// Hands out one more slot of storage for `T`, or `None` if exhausted.
    fn allocate(&mut self) -> Option<&mut Option<T>>;
}

/// A fixed-capacity bump allocator: a flat array of slots doled out in order.
///
/// Grounded on `rustyasn::buffers`' inline-first-then-spill layout, but
/// applied to the field level rather than the byte level: this is the
/// "allocator-supplied node" half of a multi-field's storage, not the
/// buffer itself.
pub struct BumpAllocator<T> {
    slots: Vec<Option<T>>,
    next: usize,
}

impl<T> BumpAllocator<T> {
    /// Creates an allocator with room for exactly `capacity` overflow
    /// elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, next: 0 }
    }

    /// Number of slots already handed out.
    pub fn len(&self) -> usize {
        self.next
    }

    /// True if no slot has been handed out yet.
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    /// Total capacity this allocator was constructed with.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T> Allocator<T> for BumpAllocator<T> {
    fn allocate(&mut self) -> Option<&mut Option<T>> {
        let slot = self.slots.get_mut(self.next)?;
        self.next += 1;
        Some(slot)
    }
}

/// Converts an allocator-exhaustion into the field's typed [`Error`].
pub(crate) fn out_of_memory(field: &str, element_size: usize) -> Error {
    Error::OutOfMemory {
        field: field.into(),
        size: element_size,
    }
}

/// Helper used by multi-field `push_back(ctx)` when inline storage and the
/// supplied allocator are both exhausted.
pub(crate) fn allocate_or_oom<'a, T>(
    field: &str,
    alloc: &'a mut dyn Allocator<T>,
) -> Result<&'a mut Option<T>> {
    alloc
        .allocate()
        .ok_or_else(|| out_of_memory(field, std::mem::size_of::<T>()))
}
