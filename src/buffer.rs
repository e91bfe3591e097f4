//! Scoped ownership of foreign memory buffers.

use std::path::Path;
use std::ptr;
use std::slice;

use llvm_sys::core::{
    LLVMCreateMemoryBufferWithContentsOfFile, LLVMDisposeMemoryBuffer, LLVMGetBufferSize,
    LLVMGetBufferStart,
};
use llvm_sys::prelude::LLVMMemoryBufferRef;
use llvm_sys::LLVMMemoryBuffer;

use crate::error::LlvmError;
use crate::handle::Handle;
use crate::marshal;

/// A foreign-allocated byte buffer, typically the contents of a file.
///
/// The buffer is released when the wrapper goes out of scope, on every
/// path. Foreign calls that consume the buffer themselves take it through
/// [`MemoryBuffer::into_raw`] instead, which forfeits the wrapper's
/// ownership.
pub struct MemoryBuffer {
    raw: Handle<LLVMMemoryBuffer>,
}

impl MemoryBuffer {
    /// Reads a file into a foreign-owned buffer.
    pub fn from_file(path: &Path) -> Result<MemoryBuffer, LlvmError> {
        let c_path = marshal::path_to_cstring(path);
        let mut raw = ptr::null_mut();
        let mut message = ptr::null_mut();
        let failed = unsafe {
            LLVMCreateMemoryBufferWithContentsOfFile(c_path.as_ptr(), &mut raw, &mut message)
        };
        if marshal::from_llvm_bool(failed) {
            return Err(LlvmError::ReadFile {
                path: path.to_owned(),
                message: unsafe { marshal::take_message(message) },
            });
        }
        let raw = Handle::new(raw).expect("file read succeeded but buffer is null");
        Ok(MemoryBuffer { raw })
    }

    /// The number of bytes in the buffer.
    pub fn len(&self) -> usize {
        unsafe { LLVMGetBufferSize(self.raw.as_ptr()) }
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.len();
        if len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(LLVMGetBufferStart(self.raw.as_ptr()).cast(), len) }
    }

    /// The raw handle, for foreign calls that borrow the buffer.
    pub(crate) fn raw(&self) -> LLVMMemoryBufferRef {
        self.raw.as_ptr()
    }

    /// Transfers ownership to a foreign call that destroys the buffer
    /// itself, such as the IR parser.
    pub(crate) fn into_raw(self) -> LLVMMemoryBufferRef {
        let raw = self.raw.as_ptr();
        std::mem::forget(self);
        raw
    }
}

impl Drop for MemoryBuffer {
    fn drop(&mut self) {
        unsafe { LLVMDisposeMemoryBuffer(self.raw.as_ptr()) };
    }
}
