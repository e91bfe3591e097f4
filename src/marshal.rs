//! Conversions between foreign and native representations.
//!
//! The LLVM-C API reports booleans as a C `int` and strings either as
//! borrowed `char*` pointers or as messages the caller must hand back to
//! `LLVMDisposeMessage`. These helpers keep that bookkeeping in one place.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;

use llvm_sys::core::LLVMDisposeMessage;
use llvm_sys::prelude::LLVMBool;

/// Converts a foreign boolean to a native one.
///
/// The foreign side encodes booleans as a C `int` that is 0 or 1; any other
/// value means the foreign contract was broken, which is not a recoverable
/// condition.
pub(crate) fn from_llvm_bool(value: LLVMBool) -> bool {
    assert!(
        value == 0 || value == 1,
        "foreign bool out of range: {value}"
    );
    value == 1
}

/// Converts a string to the NUL-terminated form the foreign interface wants.
///
/// # Panics
///
/// Panics if the string contains an interior NUL byte.
pub(crate) fn to_cstring(text: &str) -> CString {
    CString::new(text).expect("string contains an interior NUL byte")
}

/// Converts a filesystem path for the foreign interface.
pub(crate) fn path_to_cstring(path: &Path) -> CString {
    to_cstring(&path.to_string_lossy())
}

/// Copies a foreign-allocated message and releases it.
///
/// A null message becomes the empty string.
///
/// # Safety
///
/// `message` must be null or a message allocated by LLVM that has not been
/// disposed yet; it must not be used afterwards.
pub(crate) unsafe fn take_message(message: *mut c_char) -> String {
    if message.is_null() {
        return String::new();
    }
    let text = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    unsafe { LLVMDisposeMessage(message) };
    text
}

/// Copies a borrowed foreign C string, mapping null to `None`.
///
/// # Safety
///
/// `text` must be null or a valid NUL-terminated string that outlives the
/// call.
pub(crate) unsafe fn cstr_to_string(text: *const c_char) -> Option<String> {
    if text.is_null() {
        None
    } else {
        Some(
            unsafe { CStr::from_ptr(text) }
                .to_string_lossy()
                .into_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llvm_sys::core::LLVMCreateMessage;

    #[test]
    fn zero_is_false() {
        assert!(!from_llvm_bool(0));
    }

    #[test]
    fn one_is_true() {
        assert!(from_llvm_bool(1));
    }

    #[test]
    #[should_panic(expected = "foreign bool out of range")]
    fn other_values_are_rejected() {
        from_llvm_bool(2);
    }

    #[test]
    fn message_round_trips() {
        let original = to_cstring("bad bitcode header");
        let message = unsafe { LLVMCreateMessage(original.as_ptr()) };
        assert_eq!(unsafe { take_message(message) }, "bad bitcode header");
    }

    #[test]
    fn null_message_is_empty() {
        assert_eq!(unsafe { take_message(std::ptr::null_mut()) }, "");
    }
}
