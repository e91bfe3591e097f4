//! The universal wrapper for individual IR nodes.
//!
//! The foreign interface hands out one flat value handle for every node
//! category: arguments, instructions, constants, globals, functions and
//! basic-block references all arrive as the same type, refined at runtime
//! through checked-downcast predicates rather than a class hierarchy. This
//! module mirrors that shape: [`Value`] is a single type, the `is_*`
//! family reports which tags apply (tags overlap: every instruction is
//! also a user), and the typed accessors built on top of a predicate are
//! preconditions, not fallible operations.

use std::fmt;
use std::marker::PhantomData;

use llvm_sys::core::*;
use llvm_sys::prelude::{LLVMUseRef, LLVMValueRef};
use llvm_sys::{LLVMIntPredicate, LLVMLinkage, LLVMOpcode, LLVMUse, LLVMValue, LLVMVisibility};

use crate::block::BasicBlock;
use crate::function::Function;
use crate::handle::Handle;
use crate::iter::SiblingIter;
use crate::marshal;
use crate::module::Module;
use crate::types::TypeRef;

/// Opcode of an instruction, or of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Opcode {
    Ret,
    Br,
    Switch,
    IndirectBr,
    Invoke,
    Unreachable,
    CallBr,
    FNeg,
    Add,
    FAdd,
    Sub,
    FSub,
    Mul,
    FMul,
    UDiv,
    SDiv,
    FDiv,
    URem,
    SRem,
    FRem,
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,
    Alloca,
    Load,
    Store,
    GetElementPtr,
    Trunc,
    ZExt,
    SExt,
    FPToUI,
    FPToSI,
    UIToFP,
    SIToFP,
    FPTrunc,
    FPExt,
    PtrToInt,
    IntToPtr,
    BitCast,
    AddrSpaceCast,
    ICmp,
    FCmp,
    Phi,
    Call,
    Select,
    UserOp1,
    UserOp2,
    VAArg,
    ExtractElement,
    InsertElement,
    ShuffleVector,
    ExtractValue,
    InsertValue,
    Freeze,
    Fence,
    AtomicCmpXchg,
    AtomicRMW,
    Resume,
    LandingPad,
    CleanupRet,
    CatchRet,
    CatchPad,
    CleanupPad,
    CatchSwitch,
}

impl Opcode {
    fn from_raw(raw: LLVMOpcode) -> Opcode {
        match raw {
            LLVMOpcode::LLVMRet => Opcode::Ret,
            LLVMOpcode::LLVMBr => Opcode::Br,
            LLVMOpcode::LLVMSwitch => Opcode::Switch,
            LLVMOpcode::LLVMIndirectBr => Opcode::IndirectBr,
            LLVMOpcode::LLVMInvoke => Opcode::Invoke,
            LLVMOpcode::LLVMUnreachable => Opcode::Unreachable,
            LLVMOpcode::LLVMCallBr => Opcode::CallBr,
            LLVMOpcode::LLVMFNeg => Opcode::FNeg,
            LLVMOpcode::LLVMAdd => Opcode::Add,
            LLVMOpcode::LLVMFAdd => Opcode::FAdd,
            LLVMOpcode::LLVMSub => Opcode::Sub,
            LLVMOpcode::LLVMFSub => Opcode::FSub,
            LLVMOpcode::LLVMMul => Opcode::Mul,
            LLVMOpcode::LLVMFMul => Opcode::FMul,
            LLVMOpcode::LLVMUDiv => Opcode::UDiv,
            LLVMOpcode::LLVMSDiv => Opcode::SDiv,
            LLVMOpcode::LLVMFDiv => Opcode::FDiv,
            LLVMOpcode::LLVMURem => Opcode::URem,
            LLVMOpcode::LLVMSRem => Opcode::SRem,
            LLVMOpcode::LLVMFRem => Opcode::FRem,
            LLVMOpcode::LLVMShl => Opcode::Shl,
            LLVMOpcode::LLVMLShr => Opcode::LShr,
            LLVMOpcode::LLVMAShr => Opcode::AShr,
            LLVMOpcode::LLVMAnd => Opcode::And,
            LLVMOpcode::LLVMOr => Opcode::Or,
            LLVMOpcode::LLVMXor => Opcode::Xor,
            LLVMOpcode::LLVMAlloca => Opcode::Alloca,
            LLVMOpcode::LLVMLoad => Opcode::Load,
            LLVMOpcode::LLVMStore => Opcode::Store,
            LLVMOpcode::LLVMGetElementPtr => Opcode::GetElementPtr,
            LLVMOpcode::LLVMTrunc => Opcode::Trunc,
            LLVMOpcode::LLVMZExt => Opcode::ZExt,
            LLVMOpcode::LLVMSExt => Opcode::SExt,
            LLVMOpcode::LLVMFPToUI => Opcode::FPToUI,
            LLVMOpcode::LLVMFPToSI => Opcode::FPToSI,
            LLVMOpcode::LLVMUIToFP => Opcode::UIToFP,
            LLVMOpcode::LLVMSIToFP => Opcode::SIToFP,
            LLVMOpcode::LLVMFPTrunc => Opcode::FPTrunc,
            LLVMOpcode::LLVMFPExt => Opcode::FPExt,
            LLVMOpcode::LLVMPtrToInt => Opcode::PtrToInt,
            LLVMOpcode::LLVMIntToPtr => Opcode::IntToPtr,
            LLVMOpcode::LLVMBitCast => Opcode::BitCast,
            LLVMOpcode::LLVMAddrSpaceCast => Opcode::AddrSpaceCast,
            LLVMOpcode::LLVMICmp => Opcode::ICmp,
            LLVMOpcode::LLVMFCmp => Opcode::FCmp,
            LLVMOpcode::LLVMPHI => Opcode::Phi,
            LLVMOpcode::LLVMCall => Opcode::Call,
            LLVMOpcode::LLVMSelect => Opcode::Select,
            LLVMOpcode::LLVMUserOp1 => Opcode::UserOp1,
            LLVMOpcode::LLVMUserOp2 => Opcode::UserOp2,
            LLVMOpcode::LLVMVAArg => Opcode::VAArg,
            LLVMOpcode::LLVMExtractElement => Opcode::ExtractElement,
            LLVMOpcode::LLVMInsertElement => Opcode::InsertElement,
            LLVMOpcode::LLVMShuffleVector => Opcode::ShuffleVector,
            LLVMOpcode::LLVMExtractValue => Opcode::ExtractValue,
            LLVMOpcode::LLVMInsertValue => Opcode::InsertValue,
            LLVMOpcode::LLVMFreeze => Opcode::Freeze,
            LLVMOpcode::LLVMFence => Opcode::Fence,
            LLVMOpcode::LLVMAtomicCmpXchg => Opcode::AtomicCmpXchg,
            LLVMOpcode::LLVMAtomicRMW => Opcode::AtomicRMW,
            LLVMOpcode::LLVMResume => Opcode::Resume,
            LLVMOpcode::LLVMLandingPad => Opcode::LandingPad,
            LLVMOpcode::LLVMCleanupRet => Opcode::CleanupRet,
            LLVMOpcode::LLVMCatchRet => Opcode::CatchRet,
            LLVMOpcode::LLVMCatchPad => Opcode::CatchPad,
            LLVMOpcode::LLVMCleanupPad => Opcode::CleanupPad,
            LLVMOpcode::LLVMCatchSwitch => Opcode::CatchSwitch,
            #[allow(unreachable_patterns)]
            other => panic!("unhandled opcode {other:?}"),
        }
    }

    /// Whether this opcode terminates a basic block.
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            Opcode::Ret
                | Opcode::Br
                | Opcode::Switch
                | Opcode::IndirectBr
                | Opcode::Invoke
                | Opcode::Unreachable
                | Opcode::CallBr
                | Opcode::Resume
                | Opcode::CleanupRet
                | Opcode::CatchRet
                | Opcode::CatchSwitch
        )
    }
}

/// Predicate of an integer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    /// Equal.
    EQ,
    /// Not equal.
    NE,
    /// Unsigned greater than.
    UGT,
    /// Unsigned greater or equal.
    UGE,
    /// Unsigned less than.
    ULT,
    /// Unsigned less or equal.
    ULE,
    /// Signed greater than.
    SGT,
    /// Signed greater or equal.
    SGE,
    /// Signed less than.
    SLT,
    /// Signed less or equal.
    SLE,
}

impl IntPredicate {
    fn from_raw(raw: LLVMIntPredicate) -> IntPredicate {
        match raw {
            LLVMIntPredicate::LLVMIntEQ => IntPredicate::EQ,
            LLVMIntPredicate::LLVMIntNE => IntPredicate::NE,
            LLVMIntPredicate::LLVMIntUGT => IntPredicate::UGT,
            LLVMIntPredicate::LLVMIntUGE => IntPredicate::UGE,
            LLVMIntPredicate::LLVMIntULT => IntPredicate::ULT,
            LLVMIntPredicate::LLVMIntULE => IntPredicate::ULE,
            LLVMIntPredicate::LLVMIntSGT => IntPredicate::SGT,
            LLVMIntPredicate::LLVMIntSGE => IntPredicate::SGE,
            LLVMIntPredicate::LLVMIntSLT => IntPredicate::SLT,
            LLVMIntPredicate::LLVMIntSLE => IntPredicate::SLE,
        }
    }
}

/// Linkage of a global value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Linkage {
    /// Externally visible.
    External,
    /// Available for inspection, not emission.
    AvailableExternally,
    /// Keep one copy when linking (inline).
    LinkOnceAny,
    /// Same, but only replaced by something equivalent.
    LinkOnceODR,
    /// Obsolete.
    LinkOnceODRAutoHide,
    /// Keep one copy when linking (weak).
    WeakAny,
    /// Same, but only replaced by something equivalent.
    WeakODR,
    /// Special purpose, only applies to global arrays.
    Appending,
    /// Rename collisions when linking (static functions).
    Internal,
    /// Like `Internal`, but omitted from the symbol table.
    Private,
    /// Obsolete.
    DLLImport,
    /// Obsolete.
    DLLExport,
    /// Externally weak.
    ExternalWeak,
    /// Obsolete.
    Ghost,
    /// Tentative definitions.
    Common,
    /// Like `Private`, but the linker removes it.
    LinkerPrivate,
    /// Like `LinkerPrivate`, but weak.
    LinkerPrivateWeak,
}

impl Linkage {
    fn from_raw(raw: LLVMLinkage) -> Linkage {
        match raw {
            LLVMLinkage::LLVMExternalLinkage => Linkage::External,
            LLVMLinkage::LLVMAvailableExternallyLinkage => Linkage::AvailableExternally,
            LLVMLinkage::LLVMLinkOnceAnyLinkage => Linkage::LinkOnceAny,
            LLVMLinkage::LLVMLinkOnceODRLinkage => Linkage::LinkOnceODR,
            LLVMLinkage::LLVMLinkOnceODRAutoHideLinkage => Linkage::LinkOnceODRAutoHide,
            LLVMLinkage::LLVMWeakAnyLinkage => Linkage::WeakAny,
            LLVMLinkage::LLVMWeakODRLinkage => Linkage::WeakODR,
            LLVMLinkage::LLVMAppendingLinkage => Linkage::Appending,
            LLVMLinkage::LLVMInternalLinkage => Linkage::Internal,
            LLVMLinkage::LLVMPrivateLinkage => Linkage::Private,
            LLVMLinkage::LLVMDLLImportLinkage => Linkage::DLLImport,
            LLVMLinkage::LLVMDLLExportLinkage => Linkage::DLLExport,
            LLVMLinkage::LLVMExternalWeakLinkage => Linkage::ExternalWeak,
            LLVMLinkage::LLVMGhostLinkage => Linkage::Ghost,
            LLVMLinkage::LLVMCommonLinkage => Linkage::Common,
            LLVMLinkage::LLVMLinkerPrivateLinkage => Linkage::LinkerPrivate,
            LLVMLinkage::LLVMLinkerPrivateWeakLinkage => Linkage::LinkerPrivateWeak,
            #[allow(unreachable_patterns)]
            other => panic!("unhandled linkage {other:?}"),
        }
    }
}

/// Visibility of a global value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The global value is visible.
    Default,
    /// The global value is hidden.
    Hidden,
    /// The global value is protected.
    Protected,
}

impl Visibility {
    fn from_raw(raw: LLVMVisibility) -> Visibility {
        match raw {
            LLVMVisibility::LLVMDefaultVisibility => Visibility::Default,
            LLVMVisibility::LLVMHiddenVisibility => Visibility::Hidden,
            LLVMVisibility::LLVMProtectedVisibility => Visibility::Protected,
        }
    }
}

/// Calling convention of a function or call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallConv {
    /// The default C calling convention.
    C,
    /// Fast calling convention.
    Fast,
    /// Cold calling convention.
    Cold,
    /// Calling convention used by the Glasgow Haskell Compiler.
    GHC,
    /// Calling convention used by the High-Performance Erlang compiler.
    HiPE,
    /// WebKit JavaScript calling convention.
    WebKitJS,
    /// Any-register calling convention.
    AnyReg,
    /// Preserve-most calling convention.
    PreserveMost,
    /// Preserve-all calling convention.
    PreserveAll,
    /// Swift calling convention.
    Swift,
    /// Calling convention for access functions of C++ fast TLS.
    CXXFastTLS,
    /// x86 `stdcall`.
    X86Stdcall,
    /// x86 `fastcall`.
    X86Fastcall,
}

impl CallConv {
    fn from_raw(raw: u32) -> CallConv {
        match raw {
            0 => CallConv::C,
            8 => CallConv::Fast,
            9 => CallConv::Cold,
            10 => CallConv::GHC,
            11 => CallConv::HiPE,
            12 => CallConv::WebKitJS,
            13 => CallConv::AnyReg,
            14 => CallConv::PreserveMost,
            15 => CallConv::PreserveAll,
            16 => CallConv::Swift,
            17 => CallConv::CXXFastTLS,
            64 => CallConv::X86Stdcall,
            65 => CallConv::X86Fastcall,
            other => panic!("unhandled calling convention id {other}"),
        }
    }
}

/// An individual node of the IR graph.
///
/// Identity is defined by the underlying handle, so two wrappers built
/// independently around the same node compare equal and hash alike. The
/// lifetime parameter borrows the arena ([`Module`] or
/// [`Context`](crate::Context)) the value came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value<'a> {
    handle: Handle<LLVMValue>,
    _arena: PhantomData<&'a ()>,
}

macro_rules! is_a {
    ($(#[$attr:meta])* $name:ident, $ffi:ident) => {
        $(#[$attr])*
        pub fn $name(self) -> bool {
            unsafe { !$ffi(self.raw()).is_null() }
        }
    };
}

impl<'a> Value<'a> {
    pub(crate) fn from_raw(raw: LLVMValueRef) -> Option<Value<'a>> {
        Handle::new(raw).map(|handle| Value {
            handle,
            _arena: PhantomData,
        })
    }

    pub(crate) fn raw(self) -> LLVMValueRef {
        self.handle.as_ptr()
    }

    /// The address of the underlying handle.
    pub fn address(self) -> usize {
        self.handle.addr()
    }

    /// The IR type of this value.
    pub fn type_of(self) -> TypeRef<'a> {
        TypeRef::from_raw(unsafe { LLVMTypeOf(self.raw()) }).expect("value has no type")
    }

    /// The name of this value; empty for unnamed values.
    pub fn name(self) -> String {
        let mut len = 0usize;
        unsafe { marshal::cstr_to_string(LLVMGetValueName2(self.raw(), &mut len)) }
            .unwrap_or_default()
    }

    /// Dumps a representation of this value to stderr.
    pub fn dump(self) {
        unsafe { LLVMDumpValue(self.raw()) };
    }

    // Dynamic type refinement. Each predicate performs a foreign checked
    // downcast and reports the outcome as a plain boolean; the tags are
    // not mutually exclusive.
    is_a!(
        /// Whether this value is a function argument.
        is_argument, LLVMIsAArgument
    );
    is_a!(
        /// Whether this value is a basic block used as a value.
        is_a_basic_block, LLVMIsABasicBlock
    );
    is_a!(
        /// Whether this value is inline assembly.
        is_inline_asm, LLVMIsAInlineAsm
    );
    is_a!(
        /// Whether this value has operands of its own.
        is_user, LLVMIsAUser
    );
    is_a!(
        /// Whether this value is a constant of any kind.
        is_a_constant, LLVMIsAConstant
    );
    is_a!(
        /// Whether this value is an all-zero constant aggregate.
        is_constant_aggregate_zero, LLVMIsAConstantAggregateZero
    );
    is_a!(
        /// Whether this value is a constant array.
        is_constant_array, LLVMIsAConstantArray
    );
    is_a!(
        /// Whether this value is a constant expression.
        is_constant_expr, LLVMIsAConstantExpr
    );
    is_a!(
        /// Whether this value is a floating-point constant.
        is_constant_fp, LLVMIsAConstantFP
    );
    is_a!(
        /// Whether this value is an integer constant.
        is_constant_int, LLVMIsAConstantInt
    );
    is_a!(
        /// Whether this value is a constant null pointer.
        is_constant_pointer_null, LLVMIsAConstantPointerNull
    );
    is_a!(
        /// Whether this value is a constant struct.
        is_constant_struct, LLVMIsAConstantStruct
    );
    is_a!(
        /// Whether this value is a constant vector.
        is_constant_vector, LLVMIsAConstantVector
    );
    is_a!(
        /// Whether this value is a global value of any kind.
        is_global_value, LLVMIsAGlobalValue
    );
    is_a!(
        /// Whether this value is a function.
        is_function, LLVMIsAFunction
    );
    is_a!(
        /// Whether this value is a global alias.
        is_global_alias, LLVMIsAGlobalAlias
    );
    is_a!(
        /// Whether this value is a global variable.
        is_global_variable, LLVMIsAGlobalVariable
    );
    is_a!(
        /// Whether this value is an undefined value.
        is_undef_value, LLVMIsAUndefValue
    );
    is_a!(
        /// Whether this value is an instruction.
        is_instruction, LLVMIsAInstruction
    );
    is_a!(
        /// Whether this value is a binary operator instruction.
        is_binary_operator, LLVMIsABinaryOperator
    );
    is_a!(
        /// Whether this value is a call instruction.
        is_call_inst, LLVMIsACallInst
    );
    is_a!(
        /// Whether this value is a call to an intrinsic.
        is_intrinsic_inst, LLVMIsAIntrinsicInst
    );
    is_a!(
        /// Whether this value is a debug-info intrinsic call.
        is_dbg_info_intrinsic, LLVMIsADbgInfoIntrinsic
    );
    is_a!(
        /// Whether this value is a `llvm.dbg.declare` call.
        is_dbg_declare_inst, LLVMIsADbgDeclareInst
    );
    is_a!(
        /// Whether this value is a memory intrinsic call.
        is_mem_intrinsic, LLVMIsAMemIntrinsic
    );
    is_a!(
        /// Whether this value is a `llvm.memcpy` call.
        is_mem_cpy_inst, LLVMIsAMemCpyInst
    );
    is_a!(
        /// Whether this value is a `llvm.memmove` call.
        is_mem_move_inst, LLVMIsAMemMoveInst
    );
    is_a!(
        /// Whether this value is a `llvm.memset` call.
        is_mem_set_inst, LLVMIsAMemSetInst
    );
    is_a!(
        /// Whether this value is a comparison instruction.
        is_cmp_inst, LLVMIsACmpInst
    );
    is_a!(
        /// Whether this value is a floating-point comparison.
        is_fcmp_inst, LLVMIsAFCmpInst
    );
    is_a!(
        /// Whether this value is an integer comparison.
        is_icmp_inst, LLVMIsAICmpInst
    );
    is_a!(
        /// Whether this value is an `extractelement` instruction.
        is_extract_element_inst, LLVMIsAExtractElementInst
    );
    is_a!(
        /// Whether this value is an `insertelement` instruction.
        is_insert_element_inst, LLVMIsAInsertElementInst
    );
    is_a!(
        /// Whether this value is an `insertvalue` instruction.
        is_insert_value_inst, LLVMIsAInsertValueInst
    );
    is_a!(
        /// Whether this value is a phi node.
        is_phi_node, LLVMIsAPHINode
    );
    is_a!(
        /// Whether this value is a `select` instruction.
        is_select_inst, LLVMIsASelectInst
    );
    is_a!(
        /// Whether this value is a `shufflevector` instruction.
        is_shuffle_vector_inst, LLVMIsAShuffleVectorInst
    );
    is_a!(
        /// Whether this value is a store instruction.
        is_store_inst, LLVMIsAStoreInst
    );
    is_a!(
        /// Whether this value is a conditional or unconditional branch.
        is_branch_inst, LLVMIsABranchInst
    );
    is_a!(
        /// Whether this value is an indirect branch.
        is_indirect_branch_inst, LLVMIsAIndirectBrInst
    );
    is_a!(
        /// Whether this value is an `invoke` instruction.
        is_invoke_inst, LLVMIsAInvokeInst
    );
    is_a!(
        /// Whether this value is a return instruction.
        is_return_inst, LLVMIsAReturnInst
    );
    is_a!(
        /// Whether this value is a `switch` instruction.
        is_switch_inst, LLVMIsASwitchInst
    );
    is_a!(
        /// Whether this value is an `unreachable` instruction.
        is_unreachable_inst, LLVMIsAUnreachableInst
    );
    is_a!(
        /// Whether this value is a unary instruction (casts, loads, ...).
        is_unary_instruction, LLVMIsAUnaryInstruction
    );
    is_a!(
        /// Whether this value is an `alloca` instruction.
        is_alloca_inst, LLVMIsAAllocaInst
    );
    is_a!(
        /// Whether this value is a cast instruction of any kind.
        is_cast_inst, LLVMIsACastInst
    );
    is_a!(
        /// Whether this value is a `bitcast` instruction.
        is_bit_cast_inst, LLVMIsABitCastInst
    );
    is_a!(
        /// Whether this value is an `fpext` instruction.
        is_fp_ext_inst, LLVMIsAFPExtInst
    );
    is_a!(
        /// Whether this value is an `fptosi` instruction.
        is_fp_to_si_inst, LLVMIsAFPToSIInst
    );
    is_a!(
        /// Whether this value is an `fptoui` instruction.
        is_fp_to_ui_inst, LLVMIsAFPToUIInst
    );
    is_a!(
        /// Whether this value is an `fptrunc` instruction.
        is_fp_trunc_inst, LLVMIsAFPTruncInst
    );
    is_a!(
        /// Whether this value is an `inttoptr` instruction.
        is_int_to_ptr_inst, LLVMIsAIntToPtrInst
    );
    is_a!(
        /// Whether this value is a `ptrtoint` instruction.
        is_ptr_to_int_inst, LLVMIsAPtrToIntInst
    );
    is_a!(
        /// Whether this value is a `sext` instruction.
        is_sext_inst, LLVMIsASExtInst
    );
    is_a!(
        /// Whether this value is a `sitofp` instruction.
        is_si_to_fp_inst, LLVMIsASIToFPInst
    );
    is_a!(
        /// Whether this value is a `trunc` instruction.
        is_trunc_inst, LLVMIsATruncInst
    );
    is_a!(
        /// Whether this value is a `uitofp` instruction.
        is_ui_to_fp_inst, LLVMIsAUIToFPInst
    );
    is_a!(
        /// Whether this value is a `zext` instruction.
        is_zext_inst, LLVMIsAZExtInst
    );
    is_a!(
        /// Whether this value is an `extractvalue` instruction.
        is_extract_value_inst, LLVMIsAExtractValueInst
    );
    is_a!(
        /// Whether this value is a load instruction.
        is_load_inst, LLVMIsALoadInst
    );
    is_a!(
        /// Whether this value is a `va_arg` instruction.
        is_va_arg_inst, LLVMIsAVAArgInst
    );

    /// Whether this value is a GEP, in either its instruction or its
    /// constant-expression form. The two forms compute the same address
    /// arithmetic, so they are reported as one logical operation.
    pub fn is_get_element_ptr_inst(self) -> bool {
        unsafe {
            !LLVMIsAGetElementPtrInst(self.raw()).is_null()
                || (!LLVMIsAConstantExpr(self.raw()).is_null()
                    && LLVMGetConstOpcode(self.raw()) == LLVMOpcode::LLVMGetElementPtr)
        }
    }

    /// Whether this value is an instruction that terminates a basic block.
    pub fn is_terminator_inst(self) -> bool {
        self.is_instruction() && self.opcode().is_terminator()
    }

    /// Whether this value is a constant.
    pub fn is_constant(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsConstant(self.raw()) })
    }

    /// Whether this value is the null constant of its type.
    pub fn is_null_value(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsNull(self.raw()) })
    }

    /// Whether this value is undefined.
    pub fn is_undef(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsUndef(self.raw()) })
    }

    /// Casts this value to a [`Function`].
    ///
    /// # Panics
    ///
    /// Panics if [`Value::is_function`] does not hold.
    pub fn as_function(self) -> Function<'a> {
        assert!(self.is_function(), "value is not a function");
        Function::from_value_unchecked(self)
    }

    /// Whether this value can be converted to a [`BasicBlock`].
    pub fn is_basic_block(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMValueIsBasicBlock(self.raw()) })
    }

    /// Converts this value to a [`BasicBlock`].
    ///
    /// # Panics
    ///
    /// Panics if [`Value::is_basic_block`] does not hold.
    pub fn as_basic_block(self) -> BasicBlock<'a> {
        assert!(self.is_basic_block(), "value is not a basic block");
        BasicBlock::from_raw(unsafe { LLVMValueAsBasicBlock(self.raw()) })
            .expect("basic block handle is null")
    }

    /// The number of operands of this user.
    pub fn num_operands(self) -> u32 {
        unsafe { LLVMGetNumOperands(self.raw()) as u32 }
    }

    /// The operand at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn operand(self, index: u32) -> Value<'a> {
        assert!(
            index < self.num_operands(),
            "operand index {index} out of range for {} operands",
            self.num_operands()
        );
        Value::from_raw(unsafe { LLVMGetOperand(self.raw(), index) })
            .expect("operand handle is null")
    }

    /// Replaces the operand at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_operand(self, index: u32, value: Value<'a>) {
        assert!(
            index < self.num_operands(),
            "operand index {index} out of range for {} operands",
            self.num_operands()
        );
        unsafe { LLVMSetOperand(self.raw(), index, value.raw()) };
    }

    /// Iterates over the uses of this value.
    pub fn uses(self) -> SiblingIter<Use<'a>> {
        let first = Use::from_raw(unsafe { LLVMGetFirstUse(self.raw()) });
        SiblingIter::new(first, None, Use::next)
    }

    /// The opcode of this instruction.
    ///
    /// # Panics
    ///
    /// Panics if this value is not an instruction.
    pub fn opcode(self) -> Opcode {
        assert!(self.is_instruction(), "value is not an instruction");
        Opcode::from_raw(unsafe { LLVMGetInstructionOpcode(self.raw()) })
    }

    /// The opcode of this constant expression.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a constant expression.
    pub fn const_opcode(self) -> Opcode {
        assert!(self.is_constant_expr(), "value is not a constant expression");
        Opcode::from_raw(unsafe { LLVMGetConstOpcode(self.raw()) })
    }

    /// The comparison predicate of this integer comparison.
    ///
    /// # Panics
    ///
    /// Panics if this value is not an `icmp`.
    pub fn icmp_predicate(self) -> IntPredicate {
        assert!(self.is_icmp_inst(), "value is not an integer comparison");
        IntPredicate::from_raw(unsafe { LLVMGetICmpPredicate(self.raw()) })
    }

    /// The value returned by this return instruction, or `None` for a
    /// bare `ret void`.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a return instruction.
    pub fn return_value(self) -> Option<Value<'a>> {
        assert!(self.is_return_inst(), "value is not a return instruction");
        if self.num_operands() > 0 {
            Some(self.operand(0))
        } else {
            None
        }
    }

    /// Whether this branch is conditional.
    pub fn is_conditional(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsConditional(self.raw()) })
    }

    /// The condition of this conditional branch.
    ///
    /// # Panics
    ///
    /// Panics if [`Value::is_conditional`] does not hold.
    pub fn condition(self) -> Value<'a> {
        assert!(self.is_conditional(), "branch is not conditional");
        Value::from_raw(unsafe { LLVMGetCondition(self.raw()) })
            .expect("condition handle is null")
    }

    /// The address of a basic block, usable as a value.
    pub fn block_address(function: Function<'a>, block: BasicBlock<'a>) -> Value<'a> {
        Value::from_raw(unsafe { LLVMBlockAddress(function.raw(), block.raw()) })
            .expect("block address handle is null")
    }

    // Global values.

    /// The module this global value belongs to, as a non-owning view.
    pub fn global_parent(self) -> Module<'a> {
        Module::from_raw_unowned(unsafe { LLVMGetGlobalParent(self.raw()) })
    }

    /// Whether this global is a declaration without a body.
    pub fn is_declaration(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsDeclaration(self.raw()) })
    }

    /// The linkage of this global value.
    pub fn linkage(self) -> Linkage {
        Linkage::from_raw(unsafe { LLVMGetLinkage(self.raw()) })
    }

    /// The section this global value is placed in, if any.
    pub fn section(self) -> Option<String> {
        unsafe { marshal::cstr_to_string(LLVMGetSection(self.raw())) }
    }

    /// The visibility of this global value.
    pub fn visibility(self) -> Visibility {
        Visibility::from_raw(unsafe { LLVMGetVisibility(self.raw()) })
    }

    /// The alignment of this value in bytes.
    pub fn alignment(self) -> u32 {
        unsafe { LLVMGetAlignment(self.raw()) }
    }

    /// The type a global value holds. For functions this is the function
    /// type, for global variables the type of the stored value.
    pub fn global_value_type(self) -> TypeRef<'a> {
        TypeRef::from_raw(unsafe { LLVMGlobalGetValueType(self.raw()) })
            .expect("global has no value type")
    }

    /// The next global variable in the module list, if any.
    pub fn next_global(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetNextGlobal(self.raw()) })
    }

    /// The previous global variable in the module list, if any.
    pub fn previous_global(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetPreviousGlobal(self.raw()) })
    }

    /// The initializer of this global variable, if it has one.
    pub fn initializer(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetInitializer(self.raw()) })
    }

    /// Whether this global variable is externally initialized.
    pub fn is_externally_initialized(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsExternallyInitialized(self.raw()) })
    }

    /// Whether this global variable is thread-local.
    pub fn is_thread_local(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsThreadLocal(self.raw()) })
    }

    /// Whether this global variable is constant.
    pub fn is_global_constant(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsGlobalConstant(self.raw()) })
    }

    // Constant integers.

    /// The value of this integer constant, zero-extended.
    pub fn zext_value(self) -> u64 {
        unsafe { LLVMConstIntGetZExtValue(self.raw()) }
    }

    /// The value of this integer constant, sign-extended.
    pub fn sext_value(self) -> i64 {
        unsafe { LLVMConstIntGetSExtValue(self.raw()) }
    }

    // Instructions.

    /// The basic block this instruction belongs to.
    ///
    /// # Panics
    ///
    /// Panics if this value is not an instruction.
    pub fn instruction_parent(self) -> BasicBlock<'a> {
        assert!(self.is_instruction(), "value is not an instruction");
        BasicBlock::from_raw(unsafe { LLVMGetInstructionParent(self.raw()) })
            .expect("instruction has no parent block")
    }

    /// The instruction after this one in its block; `None` at the end.
    pub fn next_instruction(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetNextInstruction(self.raw()) })
    }

    /// The instruction before this one in its block; `None` at the start.
    pub fn previous_instruction(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetPreviousInstruction(self.raw()) })
    }

    /// The calling convention of this call instruction.
    pub fn instruction_call_conv(self) -> CallConv {
        CallConv::from_raw(unsafe { LLVMGetInstructionCallConv(self.raw()) })
    }

    /// Whether this call instruction is a tail call.
    pub fn is_tail_call(self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMIsTailCall(self.raw()) })
    }

    /// The type allocated by this `alloca`.
    ///
    /// # Panics
    ///
    /// Panics if this value is not an `alloca`.
    pub fn allocated_type(self) -> TypeRef<'a> {
        assert!(self.is_alloca_inst(), "value is not an alloca");
        TypeRef::from_raw(unsafe { LLVMGetAllocatedType(self.raw()) })
            .expect("alloca has no allocated type")
    }

    /// The number of incoming edges of this phi node.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a phi node.
    pub fn count_incoming(self) -> u32 {
        assert!(self.is_phi_node(), "value is not a phi node");
        unsafe { LLVMCountIncoming(self.raw()) }
    }

    /// The incoming value of this phi node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a phi node or `index` is out of range.
    pub fn incoming_value(self, index: u32) -> Value<'a> {
        assert!(
            index < self.count_incoming(),
            "incoming index {index} out of range"
        );
        Value::from_raw(unsafe { LLVMGetIncomingValue(self.raw(), index) })
            .expect("incoming value handle is null")
    }

    /// The incoming block of this phi node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a phi node or `index` is out of range.
    pub fn incoming_block(self, index: u32) -> BasicBlock<'a> {
        assert!(
            index < self.count_incoming(),
            "incoming index {index} out of range"
        );
        BasicBlock::from_raw(unsafe { LLVMGetIncomingBlock(self.raw(), index) })
            .expect("incoming block handle is null")
    }

    /// The number of successors of this terminator.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a terminator.
    pub fn num_successors(self) -> u32 {
        assert!(self.is_terminator_inst(), "value is not a terminator");
        unsafe { LLVMGetNumSuccessors(self.raw()) }
    }

    /// The successor block of this terminator at `index`.
    ///
    /// # Panics
    ///
    /// Panics if this value is not a terminator or `index` is out of range.
    pub fn successor(self, index: u32) -> BasicBlock<'a> {
        assert!(
            index < self.num_successors(),
            "successor index {index} out of range"
        );
        BasicBlock::from_raw(unsafe { LLVMGetSuccessor(self.raw(), index) })
            .expect("successor handle is null")
    }

    // Metadata.

    /// Whether this instruction has any metadata attached.
    pub fn has_metadata(self) -> bool {
        unsafe { LLVMHasMetadata(self.raw()) != 0 }
    }

    /// The metadata of the given kind attached to this instruction.
    pub fn metadata(self, kind_id: u32) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetMetadata(self.raw(), kind_id) })
    }

    /// Attaches metadata of the given kind to this instruction.
    pub fn set_metadata(self, kind_id: u32, node: Value<'a>) {
        unsafe { LLVMSetMetadata(self.raw(), kind_id, node.raw()) };
    }

    // Arguments.

    /// The function this argument belongs to.
    pub fn param_parent(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMGetParamParent(self.raw()) })
            .expect("argument has no parent")
    }

    /// The next argument of the owning function, if any.
    pub fn next_param(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetNextParam(self.raw()) })
    }

    /// The previous argument of the owning function, if any.
    pub fn previous_param(self) -> Option<Value<'a>> {
        Value::from_raw(unsafe { LLVMGetPreviousParam(self.raw()) })
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = unsafe { marshal::take_message(LLVMPrintValueToString(self.raw())) };
        f.write_str(&text)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.handle).finish()
    }
}

/// One edge of the use list: a user and the value it uses.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Use<'a> {
    handle: Handle<LLVMUse>,
    _arena: PhantomData<&'a ()>,
}

impl<'a> Use<'a> {
    fn from_raw(raw: LLVMUseRef) -> Option<Use<'a>> {
        Handle::new(raw).map(|handle| Use {
            handle,
            _arena: PhantomData,
        })
    }

    /// The value holding this use as an operand.
    pub fn user(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMGetUser(self.handle.as_ptr()) })
            .expect("use without a user")
    }

    /// The value being used.
    pub fn used_value(self) -> Value<'a> {
        Value::from_raw(unsafe { LLVMGetUsedValue(self.handle.as_ptr()) })
            .expect("use without a used value")
    }

    pub(crate) fn next(self) -> Option<Use<'a>> {
        Use::from_raw(unsafe { LLVMGetNextUse(self.handle.as_ptr()) })
    }
}

impl fmt::Debug for Use<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Use").field(&self.handle).finish()
    }
}
