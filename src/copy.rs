//! Structural deep copy (§4.10): recursively copying a present IE's value
//! into a destination of the same or a differently-shaped message.
//!
//! The trait mirrors [`crate::ie::Ie`]'s shape deliberately: copying a field
//! is "decode from the source's state" rather than "decode from a buffer",
//! so the same `Mandatory`/`Optional`/`MultiField` wrappers drive it.

use crate::field::{Mandatory, MultiField, Optional};
use crate::ie::Ie;

/// A value that can be deep-copied into a same-typed destination.
///
/// Implemented once per concrete IE, exactly like [`Ie`] — copying an
/// unset-aware leaf value is `if self.is_set() { dest.set(value) }`, no
/// buffer or allocator involved.
pub trait Copyable: Ie {
    /// Copies `self`'s current value into `dest`, leaving `dest` unset if
    /// `self` is unset.
    fn copy_into(&self, dest: &mut Self);
}

impl<const N: usize> Copyable for crate::ie::Value<N> {
    fn copy_into(&self, dest: &mut Self) {
        if let Some(v) = self.get() {
            dest.set(v);
        } else {
            dest.clear();
        }
    }
}

/// Copies a mandatory field: if the source is set, the destination ends up
/// set with the same value; otherwise the destination is cleared.
pub fn copy_mandatory<T: Copyable>(src: &Mandatory<T>, dest: &mut Mandatory<T>) {
    src.get().copy_into(dest.get_mut());
}

/// Copies an optional field, leaving the destination unset if the source
/// was unset.
pub fn copy_optional<T: Copyable>(src: &Optional<T>, dest: &mut Optional<T>) {
    match src.get() {
        Some(value) => value.copy_into(dest.get_mut()),
        None => dest.clear(),
    }
}

/// Copies a multi-field: clears the destination, then re-appends every
/// source element using the destination's own inline-then-allocator
/// storage (§4.10: "clear destination and re-append using destination's
/// allocator"). Stops with whatever the destination's `push_back` accepted
/// if inline capacity differs between source and destination shapes.
pub fn copy_multi<T: Copyable + Clone, const N: usize, const M: usize>(
    src: &MultiField<T, N>,
    dest: &mut MultiField<T, M>,
) {
    dest.clear();
    for element in src.iter() {
        if dest.push_back("copy", element.clone()).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ie::Value;

    #[test]
    fn copy_mandatory_carries_value() {
        let mut src: Mandatory<Value<2>> = Mandatory::new();
        src.get_mut().set(0x1234);
        let mut dest: Mandatory<Value<2>> = Mandatory::new();
        copy_mandatory(&src, &mut dest);
        assert_eq!(dest.get().get(), Some(0x1234));
    }

    #[test]
    fn copy_optional_clears_destination_when_source_unset() {
        let src: Optional<Value<1>> = Optional::new();
        let mut dest: Optional<Value<1>> = Optional::new();
        dest.get_mut().set(9);
        copy_optional(&src, &mut dest);
        assert!(!dest.is_set());
    }

    fn value1(v: u64) -> Value<1> {
        let mut value = Value::<1>::plain();
        value.set(v);
        value
    }

    #[test]
    fn copy_multi_reappends_into_destination_storage() {
        let mut src: MultiField<Value<1>, 4> = MultiField::new();
        src.push_back("f", value1(1)).unwrap();
        src.push_back("f", value1(2)).unwrap();
        let mut dest: MultiField<Value<1>, 4> = MultiField::new();
        dest.push_back("f", value1(99)).unwrap();
        copy_multi(&src, &mut dest);
        assert_eq!(dest.count(), 2);
        assert_eq!(dest.get(0).unwrap().get(), Some(1));
        assert_eq!(dest.get(1).unwrap().get(), Some(2));
    }

    #[test]
    fn copy_multi_stops_at_smaller_destination_capacity() {
        let mut src: MultiField<Value<1>, 4> = MultiField::new();
        src.push_back("f", value1(1)).unwrap();
        src.push_back("f", value1(2)).unwrap();
        src.push_back("f", value1(3)).unwrap();
        let mut dest: MultiField<Value<1>, 2> = MultiField::new();
        copy_multi(&src, &mut dest);
        assert_eq!(dest.count(), 2);
    }
}
