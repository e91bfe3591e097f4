//! Address-identified wrappers over raw LLVM handles.
//!
//! Every object this crate hands out is ultimately a pointer the LLVM side
//! owns. `Handle` stores such a pointer without ever dereferencing it and
//! defines equality and hashing by address, so two wrappers built
//! independently around the same native object are interchangeable.
//! Nullability is pushed into the type system: a `Handle` is always
//! non-null, and absent handles are `Option::None`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

/// A non-null, address-compared reference to a foreign-owned object.
pub(crate) struct Handle<T>(NonNull<T>);

impl<T> Handle<T> {
    /// Wraps a raw pointer, mapping null to `None`.
    pub(crate) fn new(raw: *mut T) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    /// The raw pointer, for handing back to the foreign interface.
    pub(crate) fn as_ptr(self) -> *mut T {
        self.0.as_ptr()
    }

    /// The underlying address.
    pub(crate) fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::ptr;

    fn hash_of(handle: Handle<u8>) -> u64 {
        let mut hasher = DefaultHasher::new();
        handle.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn null_is_absent() {
        assert!(Handle::<u8>::new(ptr::null_mut()).is_none());
    }

    proptest! {
        #[test]
        fn same_address_is_equal(addr in 1usize..=usize::MAX) {
            let a = Handle::<u8>::new(addr as *mut u8).unwrap();
            let b = Handle::<u8>::new(addr as *mut u8).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(hash_of(a), hash_of(b));
        }

        #[test]
        fn distinct_addresses_are_unequal(a in 1usize..=usize::MAX, b in 1usize..=usize::MAX) {
            prop_assume!(a != b);
            let left = Handle::<u8>::new(a as *mut u8).unwrap();
            let right = Handle::<u8>::new(b as *mut u8).unwrap();
            prop_assert_ne!(left, right);
        }

        #[test]
        fn address_round_trips(addr in 1usize..=usize::MAX) {
            let handle = Handle::<u8>::new(addr as *mut u8).unwrap();
            prop_assert_eq!(handle.addr(), addr);
        }
    }
}
