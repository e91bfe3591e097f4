//! The main container for a unit of LLVM IR.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::ptr;

use llvm_sys::bit_reader::LLVMParseBitcodeInContext2;
use llvm_sys::bit_writer::LLVMWriteBitcodeToFile;
use llvm_sys::core::{
    LLVMDisposeModule, LLVMDumpModule, LLVMGetDataLayoutStr, LLVMGetFirstFunction,
    LLVMGetFirstGlobal, LLVMGetLastFunction, LLVMGetLastGlobal, LLVMGetModuleContext,
    LLVMGetNamedFunction, LLVMGetNamedGlobal, LLVMGetTarget, LLVMGetTypeByName2,
    LLVMModuleCreateWithName, LLVMModuleCreateWithNameInContext, LLVMPrintModuleToString,
};
use llvm_sys::ir_reader::LLVMParseIRInContext;
use llvm_sys::prelude::LLVMModuleRef;
use llvm_sys::LLVMModule;
use tracing::debug;

use crate::buffer::MemoryBuffer;
use crate::context::Context;
use crate::error::LlvmError;
use crate::function::Function;
use crate::handle::Handle;
use crate::iter::SiblingIter;
use crate::marshal;
use crate::types::TypeRef;
use crate::value::Value;

/// A compilation unit: an ordered list of functions and global values.
///
/// A module belongs to exactly one [`Context`], fixed at creation, and the
/// wrapper borrows that context so the module cannot outlive it. Owned
/// modules release the native object exactly once, through
/// [`Module::dispose`] or on drop.
pub struct Module<'ctx> {
    raw: Option<Handle<LLVMModule>>,
    owned: bool,
    _context: PhantomData<&'ctx Context>,
}

impl<'ctx> Module<'ctx> {
    /// Creates a new, empty module in the global context.
    pub fn create(name: &str) -> Module<'static> {
        let c_name = marshal::to_cstring(name);
        let raw = unsafe { LLVMModuleCreateWithName(c_name.as_ptr()) };
        Module::from_raw_owned(raw)
    }

    /// Creates a new, empty module in the given context.
    pub fn create_in(name: &str, context: &'ctx Context) -> Module<'ctx> {
        let c_name = marshal::to_cstring(name);
        let raw = unsafe { LLVMModuleCreateWithNameInContext(c_name.as_ptr(), context.raw()) };
        Module::from_raw_owned(raw)
    }

    /// Parses a module from a file holding either bitcode or textual IR.
    ///
    /// The file is read into a scoped memory buffer which the foreign
    /// parser consumes and releases on every path, success or failure. On
    /// failure no module is constructed and the foreign diagnostic is
    /// carried in the error.
    pub fn parse_ir(context: &'ctx Context, path: impl AsRef<Path>) -> Result<Module<'ctx>, LlvmError> {
        let path = path.as_ref();
        let buffer = MemoryBuffer::from_file(path)?;
        let mut raw = ptr::null_mut();
        let mut message = ptr::null_mut();
        // The IR parser takes ownership of the buffer.
        let failed = unsafe {
            LLVMParseIRInContext(context.raw(), buffer.into_raw(), &mut raw, &mut message)
        };
        if marshal::from_llvm_bool(failed) {
            let message = unsafe { marshal::take_message(message) };
            debug!(path = %path.display(), %message, "IR parse failed");
            return Err(LlvmError::Parse {
                path: path.to_owned(),
                message,
            });
        }
        debug!(path = %path.display(), "parsed module");
        Ok(Module::from_raw_owned(raw))
    }

    /// Parses a module from a bitcode file.
    ///
    /// Unlike [`Module::parse_ir`] this rejects textual IR. The memory
    /// buffer stays owned by this side and is released when the call
    /// returns, whatever the outcome.
    pub fn parse_bitcode(
        context: &'ctx Context,
        path: impl AsRef<Path>,
    ) -> Result<Module<'ctx>, LlvmError> {
        let path = path.as_ref();
        let buffer = MemoryBuffer::from_file(path)?;
        let mut raw = ptr::null_mut();
        let failed =
            unsafe { LLVMParseBitcodeInContext2(context.raw(), buffer.raw(), &mut raw) };
        drop(buffer);
        if marshal::from_llvm_bool(failed) {
            debug!(path = %path.display(), "bitcode parse failed");
            return Err(LlvmError::Parse {
                path: path.to_owned(),
                message: "malformed bitcode".to_owned(),
            });
        }
        debug!(path = %path.display(), "parsed bitcode module");
        Ok(Module::from_raw_owned(raw))
    }

    fn from_raw_owned(raw: LLVMModuleRef) -> Module<'static> {
        Module {
            raw: Handle::new(raw),
            owned: true,
            _context: PhantomData,
        }
    }

    /// Wraps a module handle owned by some other object.
    pub(crate) fn from_raw_unowned(raw: LLVMModuleRef) -> Module<'ctx> {
        Module {
            raw: Handle::new(raw),
            owned: false,
            _context: PhantomData,
        }
    }

    /// The raw handle, for calls into the foreign interface.
    ///
    /// # Panics
    ///
    /// Panics if the module was already disposed.
    pub(crate) fn raw(&self) -> LLVMModuleRef {
        match self.raw {
            Some(handle) => handle.as_ptr(),
            None => panic!("module used after dispose"),
        }
    }

    /// The context this module was created in.
    ///
    /// The lookup is constant-time and the returned wrapper does not own
    /// the native context.
    pub fn context(&self) -> Context {
        Context::from_raw_unowned(unsafe { LLVMGetModuleContext(self.raw()) })
    }

    /// The data layout string of this module.
    pub fn data_layout(&self) -> String {
        unsafe { marshal::cstr_to_string(LLVMGetDataLayoutStr(self.raw())) }.unwrap_or_default()
    }

    /// The target triple of this module.
    pub fn target_triple(&self) -> String {
        unsafe { marshal::cstr_to_string(LLVMGetTarget(self.raw())) }.unwrap_or_default()
    }

    /// Looks up a named struct type registered in this module's context.
    pub fn get_type_by_name(&self, name: &str) -> Option<TypeRef<'_>> {
        let c_name = marshal::to_cstring(name);
        let context = unsafe { LLVMGetModuleContext(self.raw()) };
        TypeRef::from_raw(unsafe { LLVMGetTypeByName2(context, c_name.as_ptr()) })
    }

    /// Looks up a global value by name. Absence is a normal outcome.
    pub fn get_named_global(&self, name: &str) -> Option<Value<'_>> {
        let c_name = marshal::to_cstring(name);
        Value::from_raw(unsafe { LLVMGetNamedGlobal(self.raw(), c_name.as_ptr()) })
    }

    /// Looks up a function by name. Absence is a normal outcome.
    pub fn get_named_function(&self, name: &str) -> Option<Function<'_>> {
        let c_name = marshal::to_cstring(name);
        Value::from_raw(unsafe { LLVMGetNamedFunction(self.raw(), c_name.as_ptr()) })
            .map(Function::from_value_unchecked)
    }

    /// The first function in this module, if any.
    pub fn first_function(&self) -> Option<Function<'_>> {
        Value::from_raw(unsafe { LLVMGetFirstFunction(self.raw()) })
            .map(Function::from_value_unchecked)
    }

    /// The last function in this module, if any.
    pub fn last_function(&self) -> Option<Function<'_>> {
        Value::from_raw(unsafe { LLVMGetLastFunction(self.raw()) })
            .map(Function::from_value_unchecked)
    }

    /// Iterates over the functions of this module in list order.
    pub fn functions(&self) -> SiblingIter<Function<'_>> {
        SiblingIter::new(
            self.first_function(),
            self.last_function(),
            Function::next_function,
        )
    }

    /// The first global value in this module, if any.
    pub fn first_global(&self) -> Option<Value<'_>> {
        Value::from_raw(unsafe { LLVMGetFirstGlobal(self.raw()) })
    }

    /// The last global value in this module, if any.
    pub fn last_global(&self) -> Option<Value<'_>> {
        Value::from_raw(unsafe { LLVMGetLastGlobal(self.raw()) })
    }

    /// Iterates over the global values of this module in list order.
    pub fn globals(&self) -> SiblingIter<Value<'_>> {
        SiblingIter::new(self.first_global(), self.last_global(), Value::next_global)
    }

    /// Serializes this module as bitcode to the given path.
    pub fn write_bitcode_to_file(&self, path: impl AsRef<Path>) -> Result<(), LlvmError> {
        let path = path.as_ref();
        let c_path = marshal::path_to_cstring(path);
        let status = unsafe { LLVMWriteBitcodeToFile(self.raw(), c_path.as_ptr()) };
        if status != 0 {
            return Err(LlvmError::WriteBitcode {
                path: path.to_owned(),
                status,
            });
        }
        debug!(path = %path.display(), "wrote bitcode");
        Ok(())
    }

    /// Dumps a representation of this module to stderr.
    pub fn dump(&self) {
        unsafe { LLVMDumpModule(self.raw()) };
    }

    /// Whether this wrapper has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.raw.is_none()
    }

    /// Releases the module. A second call is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.raw.take() {
            if self.owned {
                unsafe { LLVMDisposeModule(handle.as_ptr()) };
            }
        }
    }
}

impl fmt::Display for Module<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = unsafe { marshal::take_message(LLVMPrintModuleToString(self.raw())) };
        f.write_str(&text)
    }
}

impl Drop for Module<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}
