//! Basic blocks: straight-line containers of instructions.

use std::fmt;
use std::marker::PhantomData;

use llvm_sys::core::{
    LLVMBasicBlockAsValue, LLVMGetBasicBlockName, LLVMGetBasicBlockParent,
    LLVMGetBasicBlockTerminator, LLVMGetFirstInstruction, LLVMGetLastInstruction,
    LLVMGetNextBasicBlock, LLVMGetPreviousBasicBlock,
};
use llvm_sys::prelude::LLVMBasicBlockRef;
use llvm_sys::LLVMBasicBlock;

use crate::function::Function;
use crate::handle::Handle;
use crate::iter::SiblingIter;
use crate::marshal;
use crate::value::Value;

/// A single basic block: an ordered sequence of instructions belonging to
/// exactly one function.
///
/// Identity is defined by the underlying handle. Sibling blocks form a
/// doubly-linked list navigable in both directions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicBlock<'a> {
    handle: Handle<LLVMBasicBlock>,
    _arena: PhantomData<&'a ()>,
}

impl<'a> BasicBlock<'a> {
    pub(crate) fn from_raw(raw: LLVMBasicBlockRef) -> Option<BasicBlock<'a>> {
        Handle::new(raw).map(|handle| BasicBlock {
            handle,
            _arena: PhantomData,
        })
    }

    pub(crate) fn raw(self) -> LLVMBasicBlockRef {
        self.handle.as_ptr()
    }

    /// The address of the underlying handle.
    pub fn address(self) -> usize {
        self.handle.addr()
    }

    /// The label of this block; empty for unnamed blocks.
    pub fn name(self) -> String {
        unsafe { marshal::cstr_to_string(LLVMGetBasicBlockName(self.raw())) }.unwrap_or_default()
    }

    /// This block as a [`Value`], e.g. for use as a branch target operand.
    pub fn as_value(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMBasicBlockAsValue(self.raw()) })
            .expect("basic block has no value form")
    }

    /// The function this block belongs to.
    pub fn parent(self) -> Function<'a> {
        Value::from_raw(unsafe { LLVMGetBasicBlockParent(self.raw()) })
            .map(Function::from_value_unchecked)
            .expect("basic block has no parent")
    }

    /// The next block of the owning function; `None` at the end.
    pub fn next_basic_block(self) -> Option<BasicBlock<'a>> {
        BasicBlock::from_raw(unsafe { LLVMGetNextBasicBlock(self.raw()) })
    }

    /// The previous block of the owning function; `None` at the start.
    pub fn previous_basic_block(self) -> Option<BasicBlock<'a>> {
        BasicBlock::from_raw(unsafe { LLVMGetPreviousBasicBlock(self.raw()) })
    }

    /// The first instruction of this block, if any.
    pub fn first_instruction(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetFirstInstruction(self.raw()) })
    }

    /// The last instruction of this block, if any.
    pub fn last_instruction(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetLastInstruction(self.raw()) })
    }

    /// The terminator of this block, if the block is well-formed.
    pub fn terminator(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetBasicBlockTerminator(self.raw()) })
    }

    /// Iterates over the instructions of this block in order.
    pub fn instructions(self) -> SiblingIter<Value<'a>> {
        SiblingIter::new(
            self.first_instruction(),
            self.last_instruction(),
            Value::next_instruction,
        )
    }
}

impl fmt::Debug for BasicBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BasicBlock").field(&self.handle).finish()
    }
}
