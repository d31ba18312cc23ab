//! Field wrappers: presence rules, arity bounds, and multi-field storage.

use crate::alloc::{allocate_or_oom, Allocator};
use crate::error::{Error, Result};
use crate::ie::Ie;
use smallvec::SmallVec;

/// Inline-then-allocator storage for a field with arity > 1.
///
/// Up to `INPLACE` elements live in a [`smallvec::SmallVec`] without
/// touching the allocator; once that's exhausted, further elements are
/// requested from a caller-supplied [`Allocator`] and kept in an owned
/// overflow vector. Per the open question in the design notes, `pop_back`
/// on an overflow element does not return its slot to the allocator.
#[derive(Debug, Clone, Default)]
pub struct MultiField<T, const INPLACE: usize> {
    inline: SmallVec<[T; INPLACE]>,
    overflow: Vec<T>,
}

impl<T, const INPLACE: usize> MultiField<T, INPLACE> {
    /// Creates an empty multi-field.
    pub fn new() -> Self {
        Self { inline: SmallVec::new(), overflow: Vec::new() }
    }

    /// Number of elements currently held.
    pub fn count(&self) -> usize {
        self.inline.len() + self.overflow.len()
    }

    /// True if no elements are held.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Appends `value` using only inline capacity.
    ///
    /// Fails with [`Error::OutOfMemory`] once `INPLACE` is exhausted — use
    /// [`Self::push_back_with`] to fall through to an allocator.
    pub fn push_back(&mut self, field: &str, value: T) -> Result<()> {
        if self.inline.len() < INPLACE {
            self.inline.push(value);
            Ok(())
        } else {
            Err(Error::OutOfMemory { field: field.into(), size: std::mem::size_of::<T>() })
        }
    }

    /// Appends `value`, falling through to `alloc` once inline capacity is
    /// exhausted.
    pub fn push_back_with(
        &mut self,
        field: &str,
        value: T,
        alloc: &mut dyn Allocator<T>,
    ) -> Result<()> {
        if self.inline.len() < INPLACE {
            self.inline.push(value);
            return Ok(());
        }
        let slot = allocate_or_oom(field, alloc)?;
        *slot = Some(value);
        // The allocator slot is the admission gate; the element itself is
        // kept in our own overflow vector so this field's storage is not
        // entangled with the allocator's lifetime.
        if let Some(v) = slot.take() {
            self.overflow.push(v);
        }
        Ok(())
    }

    /// Removes and drops the last element, if any.
    pub fn pop_back(&mut self) {
        if self.overflow.pop().is_none() {
            self.inline.pop();
        }
    }

    /// Removes the element at `index`, shifting later elements down.
    pub fn erase(&mut self, index: usize) -> Option<T> {
        let inline_len = self.inline.len();
        if index < inline_len {
            Some(self.inline.remove(index))
        } else if index - inline_len < self.overflow.len() {
            Some(self.overflow.remove(index - inline_len))
        } else {
            None
        }
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.inline.clear();
        self.overflow.clear();
    }

    /// Forward iteration over every element, inline then overflow.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inline.iter().chain(self.overflow.iter())
    }

    /// Element at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inline.get(index).or_else(|| self.overflow.get(index - self.inline.len()))
    }
}

/// Checks `count ∈ [min, max]`, raising `MissingIe`/`ExtraIe` otherwise.
///
/// Shared by encode (where an out-of-bounds count is a programming error in
/// the message being sent) and decode (where it reflects malformed input).
pub fn check_arity(field: &str, count: usize, min: usize, max: usize) -> Result<()> {
    if count < min {
        Err(Error::MissingIe { field: field.into(), have: count, min })
    } else if count > max {
        Err(Error::ExtraIe { field: field.into(), have: count, max })
    } else {
        Ok(())
    }
}

/// A mandatory single-instance field: `min = max = 1` by construction.
///
/// Encoding an unset mandatory field is an error (invariant 1).
#[derive(Debug, Clone, Default)]
pub struct Mandatory<T: Ie> {
    inner: T,
}

impl<T: Ie> Mandatory<T> {
    /// Wraps a freshly constructed, unset inner IE.
    pub fn new() -> Self {
        Self { inner: T::default() }
    }

    /// Borrows the inner IE.
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Mutably borrows the inner IE.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// True once the inner IE has been assigned or decoded.
    pub fn is_set(&self) -> bool {
        self.inner.is_set()
    }

    /// Checks presence, raising `MissingIe` if unset; used before encoding.
    pub fn require(&self, field: &str) -> Result<&T> {
        if self.inner.is_set() {
            Ok(&self.inner)
        } else {
            Err(Error::MissingIe { field: field.into(), have: 0, min: 1 })
        }
    }

    /// Resets the inner IE to unset.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// An optional single-instance field, `min = 0`.
#[derive(Debug, Clone, Default)]
pub struct Optional<T: Ie> {
    inner: T,
}

impl<T: Ie> Optional<T> {
    /// Wraps a freshly constructed, unset inner IE.
    pub fn new() -> Self {
        Self { inner: T::default() }
    }

    /// Borrows the inner IE, if set.
    pub fn get(&self) -> Option<&T> {
        self.inner.is_set().then_some(&self.inner)
    }

    /// Mutably borrows the inner IE regardless of presence (the caller
    /// typically follows with a `set` call on the returned IE).
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// True once the inner IE has been assigned or decoded.
    pub fn is_set(&self) -> bool {
        self.inner.is_set()
    }

    /// Resets the inner IE to unset.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// A condition predicate gating an [`Optional`] field's presence, evaluated
/// against the enclosing container's sibling state.
///
/// Modeled as a boxed closure rather than a context-object method per the
/// redesign note favoring idiomatic Rust composition: the closure captures
/// whatever sibling state it needs at construction time.
pub type Condition<'a> = Box<dyn Fn() -> bool + 'a>;

/// A setter invoked before encoding a mandatory computed field, e.g. a flags
/// byte derived from which sibling fields are set.
pub type Setter<'a, T> = Box<dyn FnMut(&mut T) + 'a>;

/// Returns a runtime element count for a multi-field whose count is carried
/// by another field rather than a dedicated counter IE.
pub type CountGetter<'a> = Box<dyn Fn() -> usize + 'a>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::Value;

    #[test]
    fn multi_field_spills_to_allocator_then_overflow_vec() {
        use crate::alloc::BumpAllocator;
        let mut field: MultiField<u32, 2> = MultiField::new();
        field.push_back("f", 1).unwrap();
        field.push_back("f", 2).unwrap();
        assert!(field.push_back("f", 3).is_err());

        let mut alloc: BumpAllocator<u32> = BumpAllocator::with_capacity(1);
        field.push_back_with("f", 3, &mut alloc).unwrap();
        assert_eq!(field.count(), 3);
        assert!(field.push_back_with("f", 4, &mut alloc).is_err());
    }

    #[test]
    fn pop_back_drops_overflow_before_inline() {
        let mut field: MultiField<u32, 1> = MultiField::new();
        field.push_back("f", 1).unwrap();
        field.overflow.push(2);
        field.pop_back();
        assert_eq!(field.count(), 1);
        assert_eq!(field.get(0), Some(&1));
    }

    #[test]
    fn mandatory_require_fails_when_unset() {
        let m: Mandatory<Value<2>> = Mandatory::new();
        assert!(m.require("f").is_err());
    }

    #[test]
    fn arity_checks() {
        assert!(check_arity("f", 2, 2, 5).is_ok());
        assert!(matches!(check_arity("f", 1, 2, 5), Err(Error::MissingIe { .. })));
        assert!(matches!(check_arity("f", 6, 2, 5), Err(Error::ExtraIe { .. })));
    }
}
