//! Graph navigation: lists, iterators, identity and dynamic refinement.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use tempfile::TempDir;

use llvm_view::{CallConv, Context, IntPredicate, Module, Opcode, TypeKind};

const TWO_FUNCTIONS: &str = r#"
define i32 @add(i32 %a, i32 %b) {
entry:
  %sum = add i32 %a, %b
  ret i32 %sum
}

define i32 @select_sign(i32 %x) {
entry:
  %neg = icmp slt i32 %x, 0
  br i1 %neg, label %below, label %above

below:
  br label %join

above:
  br label %join

join:
  %r = phi i32 [ -1, %below ], [ 1, %above ]
  ret i32 %r
}
"#;

const CALLER: &str = r#"
define i32 @add(i32 %a, i32 %b) {
entry:
  %sum = add i32 %a, %b
  ret i32 %sum
}

define i32 @caller() {
entry:
  %r = call i32 @add(i32 1, i32 2)
  ret i32 %r
}
"#;

const GEP_FORMS: &str = r#"
@arr = global [4 x i32] zeroinitializer
@second = global ptr getelementptr ([4 x i32], ptr @arr, i64 0, i64 1)

define ptr @index(i64 %i) {
entry:
  %p = getelementptr [4 x i32], ptr @arr, i64 0, i64 %i
  ret ptr %p
}
"#;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

#[test]
fn function_iteration_visits_each_function_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let visited: Vec<_> = module.functions().collect();
    assert_eq!(visited.len(), 2);
    assert_eq!(visited[0].name(), "add");
    assert_eq!(visited[1].name(), "select_sign");
    // The final element is the list tail itself.
    assert_eq!(visited[1], module.last_function().unwrap());
    assert_eq!(visited[0], module.first_function().unwrap());
}

#[test]
fn function_list_is_doubly_linked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let first = module.first_function().unwrap();
    let second = first.next_function().unwrap();
    assert_eq!(second.previous_function().unwrap(), first);
    assert!(second.next_function().is_none());
    assert!(first.previous_function().is_none());
}

#[test]
fn lookups_of_one_function_are_interchangeable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let a = module.get_named_function("add").unwrap();
    let b = module.get_named_function("add").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_value().address(), b.as_value().address());

    let mut hash_a = DefaultHasher::new();
    let mut hash_b = DefaultHasher::new();
    a.hash(&mut hash_a);
    b.hash(&mut hash_b);
    assert_eq!(hash_a.finish(), hash_b.finish());

    let other = module.get_named_function("select_sign").unwrap();
    assert_ne!(a, other);
}

#[test]
fn missing_names_resolve_to_absence() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    assert!(module.get_named_function("does_not_exist").is_none());
    assert!(module.get_named_global("does_not_exist").is_none());
}

#[test]
fn entry_block_counts_match_the_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap();
    assert_eq!(add.count_basic_blocks(), 1);

    let select_sign = module.get_named_function("select_sign").unwrap();
    assert_eq!(select_sign.count_basic_blocks(), 4);

    let names: Vec<_> = select_sign.basic_blocks().map(|b| b.name()).collect();
    assert_eq!(names, ["entry", "below", "above", "join"]);
}

#[test]
fn block_list_is_doubly_linked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let select_sign = module.get_named_function("select_sign").unwrap();
    let entry = select_sign.entry_basic_block().unwrap();
    assert_eq!(entry, select_sign.first_basic_block().unwrap());

    let below = entry.next_basic_block().unwrap();
    assert_eq!(below.name(), "below");
    assert_eq!(below.previous_basic_block().unwrap(), entry);
    assert_eq!(below.parent(), select_sign);

    let join = select_sign.last_basic_block().unwrap();
    assert_eq!(join.name(), "join");
    assert!(join.next_basic_block().is_none());
}

#[test]
fn instruction_iteration_terminates_at_the_known_last_instruction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap();
    let entry = add.entry_basic_block().unwrap();
    let instructions: Vec<_> = entry.instructions().collect();
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0].opcode(), Opcode::Add);
    assert_eq!(instructions[1].opcode(), Opcode::Ret);
    assert_eq!(instructions[1], entry.last_instruction().unwrap());

    let select_entry = module
        .get_named_function("select_sign")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let last = select_entry.instructions().last().unwrap();
    assert_eq!(last.opcode(), Opcode::Br);
    assert_eq!(last, select_entry.last_instruction().unwrap());
}

#[test]
fn instruction_list_is_doubly_linked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let entry = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let sum = entry.first_instruction().unwrap();
    let ret = sum.next_instruction().unwrap();
    assert_eq!(ret.previous_instruction().unwrap(), sum);
    assert!(ret.next_instruction().is_none());
    assert!(sum.previous_instruction().is_none());
    assert_eq!(sum.instruction_parent(), entry);
    assert_eq!(sum.name(), "sum");
}

#[test]
fn branch_condition_and_successors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let entry = module
        .get_named_function("select_sign")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let cmp = entry.first_instruction().unwrap();
    assert!(cmp.is_icmp_inst());
    assert!(cmp.is_cmp_inst());
    assert!(cmp.is_instruction());
    assert!(cmp.is_user());
    assert_eq!(cmp.icmp_predicate(), IntPredicate::SLT);
    assert_eq!(cmp.type_of().kind(), TypeKind::Integer);
    assert_eq!(cmp.type_of().int_width(), 1);

    let branch = entry.last_instruction().unwrap();
    assert!(branch.is_branch_inst());
    assert!(branch.is_terminator_inst());
    assert!(branch.is_conditional());
    assert_eq!(branch.condition(), cmp);
    assert_eq!(branch.num_successors(), 2);
    assert_eq!(branch.successor(0).name(), "below");
    assert_eq!(branch.successor(1).name(), "above");
    assert_eq!(entry.terminator().unwrap(), branch);
}

#[test]
fn phi_nodes_report_incoming_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let join = module
        .get_named_function("select_sign")
        .unwrap()
        .last_basic_block()
        .unwrap();
    let phi = join.first_instruction().unwrap();
    assert!(phi.is_phi_node());
    assert_eq!(phi.opcode(), Opcode::Phi);
    assert_eq!(phi.count_incoming(), 2);
    assert_eq!(phi.incoming_block(0).name(), "below");
    assert_eq!(phi.incoming_block(1).name(), "above");

    let below_value = phi.incoming_value(0);
    assert!(below_value.is_constant_int());
    assert_eq!(below_value.sext_value(), -1);
    assert_eq!(phi.incoming_value(1).sext_value(), 1);
}

#[test]
fn operands_connect_users_to_their_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let entry = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let sum = entry.first_instruction().unwrap();
    let ret = entry.last_instruction().unwrap();

    assert!(ret.is_return_inst());
    assert_eq!(ret.num_operands(), 1);
    assert_eq!(ret.operand(0), sum);
    assert_eq!(ret.return_value().unwrap(), sum);
    assert_eq!(sum.num_operands(), 2);
}

#[test]
fn use_lists_point_back_at_users() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let entry = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let sum = entry.first_instruction().unwrap();

    let uses: Vec<_> = sum.uses().collect();
    assert_eq!(uses.len(), 1);
    assert!(uses[0].user().is_return_inst());
    assert_eq!(uses[0].used_value(), sum);
}

#[test]
fn call_instructions_resolve_their_callee() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "caller.ll", CALLER);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let caller = module.get_named_function("caller").unwrap();
    assert_eq!(caller.call_conv(), CallConv::C);
    assert_eq!(caller.count_params(), 0);
    assert_eq!(caller.intrinsic_id(), 0);
    assert!(caller.gc_name().is_none());

    let call = caller
        .entry_basic_block()
        .unwrap()
        .first_instruction()
        .unwrap();
    assert!(call.is_call_inst());
    assert_eq!(call.opcode(), Opcode::Call);
    assert_eq!(call.instruction_call_conv(), CallConv::C);
    assert!(!call.is_tail_call());

    // The callee is the final operand of a call.
    assert_eq!(call.num_operands(), 3);
    let callee = call.operand(2);
    assert!(callee.is_function());
    assert_eq!(
        callee.as_function(),
        module.get_named_function("add").unwrap()
    );

    // The called function is in turn used by the call site.
    let uses: Vec<_> = callee.uses().collect();
    assert_eq!(uses.len(), 1);
    assert!(uses[0].user().is_call_inst());
}

#[test]
fn parameters_are_navigable_in_both_directions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap();
    assert_eq!(add.count_params(), 2);

    let params = add.params();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name(), "a");
    assert_eq!(params[1].name(), "b");
    assert!(params[0].is_argument());

    assert_eq!(add.param(0), params[0]);
    assert_eq!(add.first_param().unwrap(), params[0]);
    assert_eq!(add.last_param().unwrap(), params[1]);
    assert_eq!(params[0].next_param().unwrap(), params[1]);
    assert!(params[1].next_param().is_none());
    assert_eq!(params[1].previous_param().unwrap(), params[0]);
    assert_eq!(params[0].param_parent(), add.as_value());
}

#[test]
fn functions_refine_through_predicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap().as_value();
    assert!(add.is_function());
    assert!(add.is_global_value());
    assert!(add.is_a_constant());
    assert!(!add.is_instruction());
    assert!(!add.is_declaration());
    assert_eq!(add.as_function().name(), "add");

    let block = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap();
    let block_value = block.as_value();
    assert!(block_value.is_basic_block());
    assert!(block_value.is_a_basic_block());
    assert_eq!(block_value.as_basic_block(), block);
    assert_eq!(block_value.type_of().kind(), TypeKind::Label);
}

#[test]
fn global_parent_leads_back_to_the_module() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap().as_value();
    let parent = add.global_parent();
    assert!(parent.get_named_function("select_sign").is_some());
}

#[test]
fn gep_predicate_covers_both_forms() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "gep.ll", GEP_FORMS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    // The instruction form.
    let gep = module
        .get_named_function("index")
        .unwrap()
        .entry_basic_block()
        .unwrap()
        .first_instruction()
        .unwrap();
    assert!(gep.is_get_element_ptr_inst());
    assert_eq!(gep.opcode(), Opcode::GetElementPtr);
    assert!(!gep.is_constant_expr());

    // The constant-expression form is the same logical operation.
    let folded = module
        .get_named_global("second")
        .unwrap()
        .initializer()
        .unwrap();
    assert!(folded.is_constant_expr());
    assert!(folded.is_get_element_ptr_inst());
    assert_eq!(folded.const_opcode(), Opcode::GetElementPtr);
    assert!(!folded.is_instruction());

    // Unrelated values stay outside the predicate.
    let arr = module.get_named_global("arr").unwrap();
    assert!(!arr.is_get_element_ptr_inst());
    assert!(!arr.initializer().unwrap().is_get_element_ptr_inst());
}

#[test]
#[should_panic(expected = "out of range")]
fn out_of_range_operand_panics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let ret = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap()
        .last_instruction()
        .unwrap();
    let _ = ret.operand(5);
}

#[test]
#[should_panic(expected = "not a function")]
fn downcasting_an_instruction_to_a_function_panics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let sum = module
        .get_named_function("add")
        .unwrap()
        .entry_basic_block()
        .unwrap()
        .first_instruction()
        .unwrap();
    let _ = sum.as_function();
}

#[test]
#[should_panic(expected = "not an instruction")]
fn asking_a_function_for_an_opcode_panics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "two.ll", TWO_FUNCTIONS);
    let context = Context::create();
    let module = Module::parse_ir(&context, &path).unwrap();

    let add = module.get_named_function("add").unwrap().as_value();
    let _ = add.opcode();
}
