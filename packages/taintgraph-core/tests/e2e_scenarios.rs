//! End-to-end scenarios grounded on the reference implementation's own test
//! programs (`switcher_test.go`/`analysis_test.go`), one function pair per
//! scenario, run through the full `Runner` pipeline rather than against the
//! solver or switcher in isolation.

use pretty_assertions::assert_eq;

use taintgraph_core::config::RunConfig;
use taintgraph_core::features::ssa::domain::{Callee, Instruction, Program};
use taintgraph_core::features::ssa::infrastructure::FunctionBuilder;
use taintgraph_core::pipeline::Runner;
use taintgraph_core::shared::FuncId;

fn run(program: Program) -> taintgraph_core::pipeline::RunOutput {
    Runner::new(RunConfig::new(vec!["pkg".into()])).run(program).unwrap()
}

#[test]
fn direct_command_injection_flags_a_sink_edge() {
    let mut program = Program::new();
    let sink_id = program.push(
        FunctionBuilder::new("os/exec.Command", "os/exec")
            .param("cmd")
            .results(1)
            .no_body()
            .build_single_block(),
    );
    program.push(
        FunctionBuilder::new("pkg.runCommand", "pkg")
            .param("command")
            .results(0)
            .instr(Instruction::Call {
                result: "_".into(),
                callee: Callee::Static(sink_id),
                receiver: None,
                args: vec!["command".into()],
                num_results: 1,
            })
            .instr(Instruction::Return { results: vec![] })
            .build_single_block(),
    );

    let output = run(program);
    let summary = output.summaries.get("pkg.runCommand").unwrap();
    assert!(summary.params[0].is_empty());
    assert!(summary.results.is_empty());

    let edge = output
        .taint_graph
        .edges
        .values()
        .find(|e| e.from == "pkg.runCommand" && e.to == "os/exec.Command")
        .expect("sink edge recorded");
    assert_eq!(edge.from_index, 0);
    assert_eq!(edge.to_index, 0);
    assert!(edge.to_is_sink);
}

#[test]
fn interface_method_call_is_a_pass_through_with_an_edge_to_the_call_site() {
    let mut program = Program::new();
    program.push(
        FunctionBuilder::new("(pkg.T).String", "pkg")
            .receiver("t")
            .results(1)
            .implements("fmt.Stringer", "String")
            .instr(Instruction::Return { results: vec!["t".into()] })
            .build_single_block(),
    );
    let process_id = program.push(
        FunctionBuilder::new("pkg.process", "pkg")
            .param("i")
            .results(0)
            .instr(Instruction::Call {
                result: "_".into(),
                callee: Callee::Method {
                    interface: "fmt.Stringer".into(),
                    method_id: "String".into(),
                    signature: "func() string".into(),
                },
                receiver: Some("i".into()),
                args: vec![],
                num_results: 1,
            })
            .instr(Instruction::Return { results: vec![] })
            .build_single_block(),
    );
    program.push(
        FunctionBuilder::new("pkg.hello", "pkg")
            .param("i")
            .results(0)
            .instr(Instruction::Call {
                result: "_".into(),
                callee: Callee::Static(process_id),
                receiver: None,
                args: vec!["i".into()],
                num_results: 0,
            })
            .instr(Instruction::Return { results: vec![] })
            .build_single_block(),
    );

    let output = run(program);

    let process_summary = output.summaries.get("pkg.process").unwrap();
    assert!(!process_summary.has_recv());
    assert!(process_summary.params[0].is_empty());

    assert!(output
        .taint_graph
        .edges
        .values()
        .any(|e| e.from == "pkg.hello" && e.from_index == 0 && e.to == "pkg.process" && e.to_index == 0));
}

#[test]
fn identity_function_passes_its_only_parameter_through_to_callers() {
    let mut program = Program::new();
    let id_fn = program.push(
        FunctionBuilder::new("pkg.id", "pkg")
            .param("x")
            .results(1)
            .instr(Instruction::Return { results: vec!["x".into()] })
            .build_single_block(),
    );
    program.push(
        FunctionBuilder::new("pkg.caller", "pkg")
            .param("a")
            .results(1)
            .instr(Instruction::Call {
                result: "y".into(),
                callee: Callee::Static(id_fn),
                receiver: None,
                args: vec!["a".into()],
                num_results: 1,
            })
            .instr(Instruction::Return { results: vec!["y".into()] })
            .build_single_block(),
    );

    let output = run(program);
    let id_summary = output.summaries.get("pkg.id").unwrap();
    assert_eq!(id_summary.results[0], vec![0]);
    assert!(id_summary.params[0].is_empty());

    let caller_summary = output.summaries.get("pkg.caller").unwrap();
    assert_eq!(caller_summary.results[0], vec![0]);
}

#[test]
fn multi_return_extraction_carries_the_argument_s_taint_into_both_results() {
    let mut program = Program::new();
    let split_fn = program.push(
        FunctionBuilder::new("pkg.split", "pkg")
            .param("a")
            .results(2)
            .instr(Instruction::Return { results: vec!["a".into(), "a".into()] })
            .build_single_block(),
    );
    program.push(
        FunctionBuilder::new("pkg.caller", "pkg")
            .param("t")
            .results(2)
            .instr(Instruction::Call {
                result: "t0".into(),
                callee: Callee::Static(split_fn),
                receiver: None,
                args: vec!["t".into()],
                num_results: 2,
            })
            .instr(Instruction::Return { results: vec!["t0.0".into(), "t0.1".into()] })
            .build_single_block(),
    );

    let output = run(program);
    let split_summary = output.summaries.get("pkg.split").unwrap();
    assert_eq!(split_summary.results[0], vec![0]);
    assert_eq!(split_summary.results[1], vec![0]);

    let caller_summary = output.summaries.get("pkg.caller").unwrap();
    assert_eq!(caller_summary.results[0], vec![0]);
    assert_eq!(caller_summary.results[1], vec![0]);
}

#[test]
fn direct_recursion_resolves_to_a_null_summary_without_looping() {
    let mut program = Program::new();
    let self_id = FuncId(0);
    program.push(
        FunctionBuilder::new("pkg.f", "pkg")
            .param("x")
            .results(1)
            .instr(Instruction::Call {
                result: "y".into(),
                callee: Callee::Static(self_id),
                receiver: None,
                args: vec!["x".into()],
                num_results: 1,
            })
            .instr(Instruction::Return { results: vec!["y".into()] })
            .build_single_block(),
    );

    let output = run(program);
    let summary = output.summaries.get("pkg.f").unwrap();
    assert!(summary.results[0].is_empty());
}

#[test]
fn type_assertion_passes_taint_through_and_comma_ok_leaves_the_flag_untainted() {
    let mut program = Program::new();
    program.push(
        FunctionBuilder::new("pkg.assert", "pkg")
            .param("i")
            .results(1)
            .instr(Instruction::TypeAssert { result: "y".into(), x: "i".into(), comma_ok: false })
            .instr(Instruction::Return { results: vec!["y".into()] })
            .build_single_block(),
    );
    program.push(
        FunctionBuilder::new("pkg.assertCommaOk", "pkg")
            .param("i")
            .results(2)
            .instr(Instruction::TypeAssert { result: "y".into(), x: "i".into(), comma_ok: true })
            .instr(Instruction::Return { results: vec!["y.0".into(), "y.1".into()] })
            .build_single_block(),
    );

    let output = run(program);

    let plain = output.summaries.get("pkg.assert").unwrap();
    assert_eq!(plain.results[0], vec![0]);

    let comma_ok = output.summaries.get("pkg.assertCommaOk").unwrap();
    assert_eq!(comma_ok.results[0], vec![0]);
    assert!(comma_ok.results[1].is_empty());
}
