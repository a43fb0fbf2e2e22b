// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hand-built programs for exercising the engine by hand, one function per
//! language feature, in the spirit of a parser's fixture tests: build a
//! small tree, run it, see what comes out. No parser lives in this crate —
//! these are the `Program`s a real one would have produced.

use cmdforge_core::{
    Command, CommandContent, DecoratorRef, NamedParameter, ParamValue, PatternBranch, Program, VarGroup, Variable,
};

fn literal(text: &str) -> CommandContent {
    CommandContent::shell(vec![cmdforge_core::ShellPart::Literal(text.to_string())])
}

/// A chain of operators: pipe into a conjunction.
fn pipeline_and_conjunction() -> Command {
    Command::new("build", vec![literal("echo compiling | grep compiling && echo done")])
        .with_doc("compile, confirming the expected log line, then report completion")
}

/// One command invoking another by name via the `cmd` value/action decorator.
fn cross_command_reference() -> Command {
    let call = CommandContent::shell(vec![cmdforge_core::ShellPart::Action(DecoratorRef::new(
        "cmd",
        vec![NamedParameter::positional("build")],
    ))]);
    Command::new("deploy", vec![call, literal("echo shipped")]).with_doc("build, then ship")
}

/// `parallel` fanning out three independent branches.
fn parallel_fanout() -> Command {
    let branches = vec![
        literal("echo unit tests"),
        literal("echo integration tests"),
        literal("echo lint"),
    ];
    let params = vec![NamedParameter::named("concurrency", ParamValue::from(3i64))];
    Command::new("test", vec![CommandContent::block("parallel", params, branches)]).with_doc("run all checks concurrently")
}

/// `retry` wrapping `timeout`, demonstrating block decorator nesting.
fn retry_with_timeout() -> Command {
    let timeout_params = vec![NamedParameter::named("duration", ParamValue::from(std::time::Duration::from_secs(5)))];
    let timed = CommandContent::block("timeout", timeout_params, vec![literal("curl https://example.invalid/health")]);
    let retry_params = vec![
        NamedParameter::named("attempts", ParamValue::from(3i64)),
        NamedParameter::named("delay", ParamValue::from(std::time::Duration::from_secs(2))),
    ];
    Command::new("healthcheck", vec![CommandContent::block("retry", retry_params, vec![timed])])
        .with_doc("poll a health endpoint, tolerating a few flaky attempts")
}

/// `when` branching on a variable, with a `default` fallback.
fn conditional_release() -> Command {
    let branches = vec![
        PatternBranch::new("production", vec![literal("echo deploying to prod")]),
        PatternBranch::new("staging", vec![literal("echo deploying to staging")]),
        PatternBranch::new("default", vec![literal("echo deploying to a scratch environment")]),
    ];
    let params = vec![NamedParameter::named("variable", ParamValue::Identifier("environment".to_string()))];
    Command::new("release", vec![CommandContent::pattern("when", params, branches)]).with_doc("deploy to the target environment")
}

/// `try`/`catch`/`finally`, demonstrating pattern-decorator error recovery.
fn cleanup_with_fallback() -> Command {
    let branches = vec![
        PatternBranch::new("main", vec![literal("echo running migration")]),
        PatternBranch::new("catch", vec![literal("echo rolling back")]),
        PatternBranch::new("finally", vec![literal("echo releasing lock")]),
    ];
    Command::new("migrate", vec![CommandContent::pattern("try", vec![], branches)]).with_doc("run a migration with rollback on failure")
}

/// `var`/`env` splicing a seeded variable and the host environment into a
/// single shell fragment.
fn variable_splice() -> Command {
    let var_ref = cmdforge_core::ShellPart::Value(DecoratorRef::new(
        "var",
        vec![NamedParameter::named("name", ParamValue::Identifier("version".to_string()))],
    ));
    let env_ref = cmdforge_core::ShellPart::Value(DecoratorRef::new(
        "env",
        vec![NamedParameter::named("name", ParamValue::Identifier("HOME".to_string()))],
    ));
    let body = CommandContent::shell(vec![
        cmdforge_core::ShellPart::Literal("echo releasing version ".to_string()),
        var_ref,
        cmdforge_core::ShellPart::Literal(" from ".to_string()),
        env_ref,
    ]);
    Command::new("announce", vec![body]).with_doc("print the release version and the invoking user's home directory")
}

/// Assembles every fixture above into one program, with a `version`
/// variable and an `environment` var group seeded for `release`/`announce`
/// to read.
pub fn sample_program() -> Program {
    let mut program = Program::new();
    program.variables.push(Variable::new("version", "1.4.0"));
    program.var_groups.push(VarGroup::new(
        "deployment",
        vec![Variable::new("environment", "staging")],
    ));
    program.commands = vec![
        pipeline_and_conjunction(),
        cross_command_reference(),
        parallel_fanout(),
        retry_with_timeout(),
        conditional_release(),
        cleanup_with_fallback(),
        variable_splice(),
    ];
    program
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod tests;
