//! Target data layouts for size, alignment and offset queries.

use llvm_sys::target::{
    LLVMABIAlignmentOfType, LLVMABISizeOfType, LLVMCopyStringRepOfTargetData, LLVMCreateTargetData,
    LLVMDisposeTargetData, LLVMOpaqueTargetData, LLVMTargetDataRef,
};

use crate::handle::Handle;
use crate::marshal;
use crate::types::TypeRef;

/// A parsed data layout, answering target-dependent layout questions.
///
/// Created from a data layout string such as the one a module reports;
/// released exactly once, on [`TargetData::dispose`] or drop.
pub struct TargetData {
    raw: Option<Handle<LLVMOpaqueTargetData>>,
}

impl TargetData {
    /// Parses a data layout from its string representation. The empty
    /// string yields the default layout.
    pub fn create(layout: &str) -> TargetData {
        let c_layout = marshal::to_cstring(layout);
        TargetData {
            raw: Handle::new(unsafe { LLVMCreateTargetData(c_layout.as_ptr()) }),
        }
    }

    /// The raw handle, for calls into the foreign interface.
    ///
    /// # Panics
    ///
    /// Panics if the target data was already disposed.
    pub(crate) fn raw(&self) -> LLVMTargetDataRef {
        match self.raw {
            Some(handle) => handle.as_ptr(),
            None => panic!("target data used after dispose"),
        }
    }

    /// The string representation of this data layout.
    pub fn string_rep(&self) -> String {
        unsafe { marshal::take_message(LLVMCopyStringRepOfTargetData(self.raw())) }
    }

    /// The ABI size of `ty` in bytes under this layout.
    pub fn abi_size(&self, ty: TypeRef<'_>) -> u64 {
        unsafe { LLVMABISizeOfType(self.raw(), ty.raw()) }
    }

    /// The ABI alignment of `ty` in bytes under this layout.
    pub fn abi_alignment(&self, ty: TypeRef<'_>) -> u32 {
        unsafe { LLVMABIAlignmentOfType(self.raw(), ty.raw()) }
    }

    /// Releases the data layout. A second call is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.raw.take() {
            unsafe { LLVMDisposeTargetData(handle.as_ptr()) };
        }
    }
}

impl Drop for TargetData {
    fn drop(&mut self) {
        self.dispose();
    }
}
