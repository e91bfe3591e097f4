//! Functions: containers of basic blocks and parameters.

use std::fmt;
use std::ptr;

use llvm_sys::core::{
    LLVMCountBasicBlocks, LLVMCountParams, LLVMDeleteFunction, LLVMGetEntryBasicBlock,
    LLVMGetFirstBasicBlock, LLVMGetFirstParam, LLVMGetFunctionCallConv, LLVMGetGC,
    LLVMGetIntrinsicID, LLVMGetLastBasicBlock, LLVMGetLastParam, LLVMGetNextFunction,
    LLVMGetParam, LLVMGetParams, LLVMGetPreviousFunction,
};
use llvm_sys::prelude::LLVMValueRef;

use crate::block::BasicBlock;
use crate::iter::SiblingIter;
use crate::marshal;
use crate::value::{CallConv, Value};

/// A function value: the typed result of refining a [`Value`] through
/// [`Value::is_function`].
///
/// Everything a plain value offers is reachable through
/// [`Function::as_value`]; this type adds the accessors that are only
/// defined for functions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Function<'a> {
    value: Value<'a>,
}

impl<'a> Function<'a> {
    /// Wraps a value the foreign interface already guarantees to be a
    /// function, skipping the predicate check.
    pub(crate) fn from_value_unchecked(value: Value<'a>) -> Function<'a> {
        Function { value }
    }

    pub(crate) fn raw(self) -> LLVMValueRef {
        self.value.raw()
    }

    /// This function as a plain [`Value`].
    pub fn as_value(self) -> Value<'a> {
        self.value
    }

    /// The name of this function.
    pub fn name(self) -> String {
        self.value.name()
    }

    /// The next function in the module list, if any.
    pub fn next_function(self) -> Option<Function<'a>> {
        Value::from_raw(unsafe { LLVMGetNextFunction(self.raw()) })
            .map(Function::from_value_unchecked)
    }

    /// The previous function in the module list, if any.
    pub fn previous_function(self) -> Option<Function<'a>> {
        Value::from_raw(unsafe { LLVMGetPreviousFunction(self.raw()) })
            .map(Function::from_value_unchecked)
    }

    /// The number of basic blocks in this function.
    pub fn count_basic_blocks(self) -> u32 {
        unsafe { LLVMCountBasicBlocks(self.raw()) }
    }

    /// The first basic block of this function, if any.
    pub fn first_basic_block(self) -> Option<BasicBlock<'a>> {
        BasicBlock::from_raw(unsafe { LLVMGetFirstBasicBlock(self.raw()) })
    }

    /// The last basic block of this function, if any.
    pub fn last_basic_block(self) -> Option<BasicBlock<'a>> {
        BasicBlock::from_raw(unsafe { LLVMGetLastBasicBlock(self.raw()) })
    }

    /// The entry block of this function, if the function has a body.
    pub fn entry_basic_block(self) -> Option<BasicBlock<'a>> {
        BasicBlock::from_raw(unsafe { LLVMGetEntryBasicBlock(self.raw()) })
    }

    /// Iterates over the basic blocks of this function in order.
    pub fn basic_blocks(self) -> SiblingIter<BasicBlock<'a>> {
        SiblingIter::new(
            self.first_basic_block(),
            self.last_basic_block(),
            BasicBlock::next_basic_block,
        )
    }

    /// The number of parameters of this function.
    pub fn count_params(self) -> u32 {
        unsafe { LLVMCountParams(self.raw()) }
    }

    /// The parameters of this function, in order.
    pub fn params(self) -> Vec<Value<'a>> {
        let count = self.count_params() as usize;
        let mut raw = vec![ptr::null_mut(); count];
        if count > 0 {
            unsafe { LLVMGetParams(self.raw(), raw.as_mut_ptr()) };
        }
        raw.into_iter()
            .map(|param| Value::from_raw(param).expect("parameter handle is null"))
            .collect()
    }

    /// The parameter at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn param(self, index: u32) -> Value<'a> {
        assert!(
            index < self.count_params(),
            "parameter index {index} out of range for {} parameters",
            self.count_params()
        );
        Value::from_raw(unsafe { LLVMGetParam(self.raw(), index) })
            .expect("parameter handle is null")
    }

    /// The first parameter of this function, if any.
    pub fn first_param(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetFirstParam(self.raw()) })
    }

    /// The last parameter of this function, if any.
    pub fn last_param(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetLastParam(self.raw()) })
    }

    /// The calling convention of this function.
    pub fn call_conv(self) -> CallConv {
        CallConv::from_raw(unsafe { LLVMGetFunctionCallConv(self.raw()) })
    }

    /// The name of the garbage collector used during code generation, if
    /// one is set.
    pub fn gc_name(self) -> Option<String> {
        unsafe { marshal::cstr_to_string(LLVMGetGC(self.raw())) }
    }

    /// The intrinsic ID of this function; zero for non-intrinsics.
    pub fn intrinsic_id(self) -> u32 {
        unsafe { LLVMGetIntrinsicID(self.raw()) }
    }

    /// Removes this function from its module and deletes it.
    pub fn delete(self) {
        unsafe { LLVMDeleteFunction(self.raw()) };
    }
}

impl<'a> From<Function<'a>> for Value<'a> {
    fn from(function: Function<'a>) -> Value<'a> {
        function.as_value()
    }
}

impl fmt::Display for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.value).finish()
    }
}
