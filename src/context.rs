//! The top-level container for all LLVM global data.

use std::path::Path;

use llvm_sys::core::{LLVMContextCreate, LLVMContextDispose, LLVMGetGlobalContext};
use llvm_sys::prelude::LLVMContextRef;
use llvm_sys::LLVMContext;
use tracing::trace;

use crate::error::LlvmError;
use crate::handle::Handle;
use crate::module::Module;

/// An arena owning every module, value and type created within it.
///
/// Disposing a context invalidates everything created under it, which is
/// why the child wrappers of this crate borrow the context: the borrow
/// checker refuses code that would touch a child after the context is
/// gone. Owned contexts release their native object exactly once, either
/// through [`Context::dispose`] or on drop.
pub struct Context {
    raw: Option<Handle<LLVMContext>>,
    owned: bool,
}

impl Context {
    /// Creates a new, independent context.
    pub fn create() -> Context {
        let raw = unsafe { LLVMContextCreate() };
        trace!(context = raw as usize, "created context");
        Context {
            raw: Handle::new(raw),
            owned: true,
        }
    }

    /// Returns the process-wide global context.
    ///
    /// The returned wrapper does not own the native context; disposing it
    /// only invalidates this wrapper and leaves the global context alive
    /// for every other holder.
    pub fn global() -> Context {
        Context {
            raw: Handle::new(unsafe { LLVMGetGlobalContext() }),
            owned: false,
        }
    }

    /// Wraps a context handle owned by some other object.
    pub(crate) fn from_raw_unowned(raw: LLVMContextRef) -> Context {
        Context {
            raw: Handle::new(raw),
            owned: false,
        }
    }

    /// The raw handle, for calls into the foreign interface.
    ///
    /// # Panics
    ///
    /// Panics if the context was already disposed.
    pub(crate) fn raw(&self) -> LLVMContextRef {
        match self.raw {
            Some(handle) => handle.as_ptr(),
            None => panic!("context used after dispose"),
        }
    }

    /// Creates a new, empty module owned by this context.
    pub fn create_module(&self, name: &str) -> Module<'_> {
        Module::create_in(name, self)
    }

    /// Parses a module from a file holding either bitcode or textual IR.
    ///
    /// See [`Module::parse_ir`].
    pub fn parse_ir(&self, path: impl AsRef<Path>) -> Result<Module<'_>, LlvmError> {
        Module::parse_ir(self, path)
    }

    /// Parses a module from a bitcode file.
    ///
    /// See [`Module::parse_bitcode`].
    pub fn parse_bitcode(&self, path: impl AsRef<Path>) -> Result<Module<'_>, LlvmError> {
        Module::parse_bitcode(self, path)
    }

    /// Whether this wrapper has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.raw.is_none()
    }

    /// Releases the context. A second call is a no-op.
    ///
    /// Everything created in this context becomes invalid; the lifetimes
    /// on child wrappers keep such uses from compiling.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.raw.take() {
            if self.owned {
                trace!(context = handle.addr(), "disposing context");
                unsafe { LLVMContextDispose(handle.as_ptr()) };
            }
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.dispose();
    }
}
