//! Pass pipeline scheduling, execution and disposal.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use llvm_view::{Context, Module, Opcode, PassManager};

const PROMOTABLE: &str = r#"
define i64 @stash(i64 %x) {
entry:
  %slot = alloca i64
  store i64 %x, ptr %slot
  %out = load i64, ptr %slot
  ret i64 %out
}

define i64 @forward(i64 %x) {
entry:
  %r = call i64 @stash(i64 %x)
  ret i64 %r
}
"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

#[test]
fn module_pipeline_promotes_memory_to_registers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "promotable.ll", PROMOTABLE);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let pm = PassManager::create();
    pm.add_verifier_pass();
    pm.add_promote_memory_to_register_pass();
    pm.add_cfg_simplification_pass();

    let modified = pm.run(&module);
    assert!(modified);

    // After mem2reg the alloca/store/load chain collapses to a plain return.
    let entry = module
        .get_named_function("stash")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let instructions: Vec<_> = entry.instructions().collect();
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].opcode(), Opcode::Ret);
}

#[test]
fn rerunning_a_pipeline_settles() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "promotable.ll", PROMOTABLE);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let pm = PassManager::create();
    pm.add_promote_memory_to_register_pass();
    assert!(pm.run(&module));
    // A second run has nothing left to promote.
    assert!(!pm.run(&module));
}

#[test]
fn function_pipeline_runs_per_function() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "promotable.ll", PROMOTABLE);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let fpm = PassManager::create_for_module(&module);
    fpm.add_promote_memory_to_register_pass();
    fpm.add_gvn_pass();
    fpm.initialize();

    let mut any_modified = false;
    for function in module.functions() {
        any_modified |= fpm.run_function(function);
    }
    assert!(any_modified);

    fpm.finalize();
}

#[test]
fn pass_manager_disposal_is_idempotent() {
    let mut pm = PassManager::create();
    pm.add_gvn_pass();
    assert!(!pm.is_disposed());
    pm.dispose();
    pm.dispose();
    assert!(pm.is_disposed());
}

#[test]
#[should_panic(expected = "pass manager used after dispose")]
fn using_a_disposed_pass_manager_panics() {
    let mut pm = PassManager::create();
    pm.dispose();
    pm.add_gvn_pass();
}
