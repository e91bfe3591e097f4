//! Pass managers: pipelines of foreign optimization passes.
//!
//! The passes themselves live entirely on the LLVM side; this module only
//! owns the pipeline object and schedules passes into it. The foreign
//! booleans returned by the run entry points report whether any pass
//! modified the IR, not success or failure.

use std::marker::PhantomData;

use llvm_sys::core::{
    LLVMCreateFunctionPassManagerForModule, LLVMCreatePassManager, LLVMDisposePassManager,
    LLVMFinalizeFunctionPassManager, LLVMInitializeFunctionPassManager, LLVMRunFunctionPassManager,
    LLVMRunPassManager,
};
use llvm_sys::prelude::LLVMPassManagerRef;
use llvm_sys::transforms::instcombine::LLVMAddInstructionCombiningPass;
use llvm_sys::transforms::ipo::{
    LLVMAddConstantMergePass, LLVMAddDeadArgEliminationPass, LLVMAddFunctionAttrsPass,
    LLVMAddFunctionInliningPass, LLVMAddGlobalDCEPass, LLVMAddGlobalOptimizerPass,
    LLVMAddIPSCCPPass, LLVMAddInternalizePass, LLVMAddStripDeadPrototypesPass,
    LLVMAddStripSymbolsPass,
};
use llvm_sys::transforms::scalar::{
    LLVMAddAggressiveDCEPass, LLVMAddCFGSimplificationPass, LLVMAddDeadStoreEliminationPass,
    LLVMAddDemoteMemoryToRegisterPass, LLVMAddGVNPass, LLVMAddIndVarSimplifyPass,
    LLVMAddJumpThreadingPass, LLVMAddLICMPass, LLVMAddLoopDeletionPass, LLVMAddLoopRotatePass,
    LLVMAddLoopUnrollPass, LLVMAddMemCpyOptPass, LLVMAddReassociatePass, LLVMAddSCCPPass,
    LLVMAddScalarReplAggregatesPass, LLVMAddScalarReplAggregatesPassWithThreshold,
    LLVMAddTailCallEliminationPass, LLVMAddVerifierPass,
};
use llvm_sys::transforms::util::LLVMAddPromoteMemoryToRegisterPass;
use llvm_sys::LLVMPassManager;
use tracing::trace;

use crate::function::Function;
use crate::handle::Handle;
use crate::marshal;
use crate::module::Module;

macro_rules! add_pass {
    ($(#[$attr:meta])* $name:ident, $ffi:ident) => {
        $(#[$attr])*
        pub fn $name(&self) {
            unsafe { $ffi(self.raw()) };
        }
    };
}

/// A pipeline of foreign passes, disposed exactly once.
///
/// Whole-module pipelines come from [`PassManager::create`] and run over a
/// module; function-by-function pipelines come from
/// [`PassManager::create_for_module`] and run over one function at a time,
/// bracketed by [`PassManager::initialize`] and [`PassManager::finalize`].
pub struct PassManager<'m> {
    raw: Option<Handle<LLVMPassManager>>,
    _module: PhantomData<&'m ()>,
}

impl<'m> PassManager<'m> {
    /// Constructs a whole-module pass pipeline, suitable for link-time
    /// optimization and whole-module transformations.
    pub fn create() -> PassManager<'static> {
        PassManager {
            raw: Handle::new(unsafe { LLVMCreatePassManager() }),
            _module: PhantomData,
        }
    }

    /// Constructs a function-by-function pass pipeline over `module`. The
    /// pipeline does not take ownership of the module.
    pub fn create_for_module(module: &'m Module<'_>) -> PassManager<'m> {
        PassManager {
            raw: Handle::new(unsafe { LLVMCreateFunctionPassManagerForModule(module.raw()) }),
            _module: PhantomData,
        }
    }

    /// The raw handle, for calls into the foreign interface.
    ///
    /// # Panics
    ///
    /// Panics if the pass manager was already disposed.
    fn raw(&self) -> LLVMPassManagerRef {
        match self.raw {
            Some(handle) => handle.as_ptr(),
            None => panic!("pass manager used after dispose"),
        }
    }

    /// Runs the scheduled passes over `module`. Returns whether any pass
    /// modified the module.
    pub fn run(&self, module: &Module<'_>) -> bool {
        trace!("running module pass pipeline");
        marshal::from_llvm_bool(unsafe { LLVMRunPassManager(self.raw(), module.raw()) })
    }

    /// Initializes the scheduled function passes. Returns whether any pass
    /// modified the module during initialization.
    pub fn initialize(&self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMInitializeFunctionPassManager(self.raw()) })
    }

    /// Runs the scheduled function passes over `function`. Returns whether
    /// any pass modified the function.
    pub fn run_function(&self, function: Function<'_>) -> bool {
        trace!(function = %function.name(), "running function pass pipeline");
        marshal::from_llvm_bool(unsafe { LLVMRunFunctionPassManager(self.raw(), function.raw()) })
    }

    /// Finalizes the scheduled function passes. Returns whether any pass
    /// modified the module during finalization.
    pub fn finalize(&self) -> bool {
        marshal::from_llvm_bool(unsafe { LLVMFinalizeFunctionPassManager(self.raw()) })
    }

    add_pass!(
        /// Schedules aggressive dead code elimination.
        add_aggressive_dce_pass, LLVMAddAggressiveDCEPass
    );
    add_pass!(
        /// Schedules control-flow graph simplification.
        add_cfg_simplification_pass, LLVMAddCFGSimplificationPass
    );
    add_pass!(
        /// Schedules dead store elimination.
        add_dead_store_elimination_pass, LLVMAddDeadStoreEliminationPass
    );
    add_pass!(
        /// Schedules global value numbering.
        add_gvn_pass, LLVMAddGVNPass
    );
    add_pass!(
        /// Schedules induction variable simplification.
        add_ind_var_simplify_pass, LLVMAddIndVarSimplifyPass
    );
    add_pass!(
        /// Schedules instruction combining.
        add_instruction_combining_pass, LLVMAddInstructionCombiningPass
    );
    add_pass!(
        /// Schedules jump threading.
        add_jump_threading_pass, LLVMAddJumpThreadingPass
    );
    add_pass!(
        /// Schedules loop-invariant code motion.
        add_licm_pass, LLVMAddLICMPass
    );
    add_pass!(
        /// Schedules dead loop deletion.
        add_loop_deletion_pass, LLVMAddLoopDeletionPass
    );
    add_pass!(
        /// Schedules loop rotation.
        add_loop_rotate_pass, LLVMAddLoopRotatePass
    );
    add_pass!(
        /// Schedules loop unrolling.
        add_loop_unroll_pass, LLVMAddLoopUnrollPass
    );
    add_pass!(
        /// Schedules `memcpy` optimization.
        add_mem_cpy_opt_pass, LLVMAddMemCpyOptPass
    );
    add_pass!(
        /// Schedules expression reassociation.
        add_reassociate_pass, LLVMAddReassociatePass
    );
    add_pass!(
        /// Schedules sparse conditional constant propagation.
        add_sccp_pass, LLVMAddSCCPPass
    );
    add_pass!(
        /// Schedules scalar replacement of aggregates.
        add_scalar_repl_aggregates_pass, LLVMAddScalarReplAggregatesPass
    );
    add_pass!(
        /// Schedules tail call elimination.
        add_tail_call_elimination_pass, LLVMAddTailCallEliminationPass
    );
    add_pass!(
        /// Schedules demotion of register values back to memory.
        add_demote_memory_to_register_pass, LLVMAddDemoteMemoryToRegisterPass
    );
    add_pass!(
        /// Schedules promotion of memory slots to registers.
        add_promote_memory_to_register_pass, LLVMAddPromoteMemoryToRegisterPass
    );
    add_pass!(
        /// Schedules the module verifier.
        add_verifier_pass, LLVMAddVerifierPass
    );
    add_pass!(
        /// Schedules merging of duplicate global constants.
        add_constant_merge_pass, LLVMAddConstantMergePass
    );
    add_pass!(
        /// Schedules dead argument elimination.
        add_dead_arg_elimination_pass, LLVMAddDeadArgEliminationPass
    );
    add_pass!(
        /// Schedules function attribute deduction.
        add_function_attrs_pass, LLVMAddFunctionAttrsPass
    );
    add_pass!(
        /// Schedules function inlining.
        add_function_inlining_pass, LLVMAddFunctionInliningPass
    );
    add_pass!(
        /// Schedules global dead code elimination.
        add_global_dce_pass, LLVMAddGlobalDCEPass
    );
    add_pass!(
        /// Schedules the global variable optimizer.
        add_global_optimizer_pass, LLVMAddGlobalOptimizerPass
    );
    add_pass!(
        /// Schedules interprocedural sparse conditional constant
        /// propagation.
        add_ipsccp_pass, LLVMAddIPSCCPPass
    );
    add_pass!(
        /// Schedules removal of dead prototypes.
        add_strip_dead_prototypes_pass, LLVMAddStripDeadPrototypesPass
    );
    add_pass!(
        /// Schedules stripping of symbols.
        add_strip_symbols_pass, LLVMAddStripSymbolsPass
    );

    /// Schedules scalar replacement of aggregates with an explicit size
    /// threshold.
    pub fn add_scalar_repl_aggregates_pass_with_threshold(&self, threshold: i32) {
        unsafe { LLVMAddScalarReplAggregatesPassWithThreshold(self.raw(), threshold) };
    }

    /// Schedules internalization of global symbols. When `all_but_main` is
    /// set, everything except `main` is internalized.
    pub fn add_internalize_pass(&self, all_but_main: bool) {
        unsafe { LLVMAddInternalizePass(self.raw(), all_but_main as u32) };
    }

    /// Whether this wrapper has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.raw.is_none()
    }

    /// Releases the pipeline. A second call is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.raw.take() {
            trace!("disposing pass manager");
            unsafe { LLVMDisposePassManager(handle.as_ptr()) };
        }
    }
}

impl Drop for PassManager<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}
