// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine driver: owns a [`Program`] for the duration of a run, seeds
//! variables into freshly built contexts, and dispatches each requested
//! command through the matching [`crate::strategy`]. Also implements
//! [`CommandRunner`] itself, so the `cmd` decorator can call back into a
//! different top-level command without this module depending on anything
//! above it.

use crate::context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
use crate::decorator::{CommandRunner, Registry};
use crate::error::DecoratorError;
use crate::strategy::{GeneratorStrategy, InterpreterStrategy, PlanStrategy};
use cmdforge_core::{
    validate_program, CapturedEnvironment, Command, CommandResult, ExecutionData, ExecutionMode, ExecutionResult,
    ModelError, PlanElement, Program,
};

pub struct EngineDriver<'a> {
    program: &'a Program,
    registry: Registry,
    env: CapturedEnvironment,
}

impl<'a> EngineDriver<'a> {
    pub fn new(program: &'a Program, env: CapturedEnvironment) -> Self {
        Self::with_registry(program, env, Registry::with_builtins())
    }

    pub fn with_registry(program: &'a Program, env: CapturedEnvironment, registry: Registry) -> Self {
        Self { program, registry, env }
    }

    /// Resolve, seed variables into, and run one top-level command in the
    /// given mode. Runs whole-program reference validation first, so a
    /// dangling `@cmd` reference or a command cycle is reported the same way
    /// regardless of which mode was requested.
    pub fn run_command(&self, name: &str, mode: ExecutionMode) -> ExecutionResult {
        if let Err(errors) = validate_program(self.program) {
            return ExecutionResult::err(mode, render_model_errors(&errors));
        }
        let Some(command) = self.program.command(name) else {
            return ExecutionResult::err(mode, ModelError::UnknownCommand { name: name.to_string() }.to_string());
        };
        self.dispatch(command, mode)
    }

    /// Run every top-level command. Generator mode orders commands
    /// topologically by `cmd`-reference edges so a generated entry point
    /// never forward-references one not yet emitted; the other two modes
    /// preserve declaration order.
    pub fn run_all(&self, mode: ExecutionMode) -> Vec<(String, ExecutionResult)> {
        if let Err(errors) = validate_program(self.program) {
            let message = render_model_errors(&errors);
            return self
                .program
                .commands
                .iter()
                .map(|c| (c.name.clone(), ExecutionResult::err(mode, message.clone())))
                .collect();
        }
        let ordered: Vec<&Command> = match mode {
            ExecutionMode::Generator => self.topological_order(),
            ExecutionMode::Interpreter | ExecutionMode::Plan => self.program.commands.iter().collect(),
        };
        ordered.into_iter().map(|c| (c.name.clone(), self.dispatch(c, mode))).collect()
    }

    fn dispatch(&self, command: &Command, mode: ExecutionMode) -> ExecutionResult {
        match mode {
            ExecutionMode::Interpreter => self.run_interpreter_entry(command),
            ExecutionMode::Generator => self.run_generator_entry(command),
            ExecutionMode::Plan => self.run_plan_entry(command),
        }
    }

    fn run_interpreter_entry(&self, command: &Command) -> ExecutionResult {
        let mut ctx = InterpreterContext::new(self.env.clone());
        self.seed_variables(&mut ctx);
        let strategy = InterpreterStrategy::new(&self.registry, self);
        match strategy.run_body(&mut ctx, &command.body) {
            Ok(result) if result.success() => ExecutionResult::ok(ExecutionMode::Interpreter, ExecutionData::Text(result.stdout)),
            Ok(result) => {
                let mut exec = ExecutionResult::ok(ExecutionMode::Interpreter, ExecutionData::Text(result.stdout));
                exec.error = Some(format!("command '{}' exited with status {}", command.name, result.exit_code));
                exec
            }
            Err(err) => ExecutionResult::err(ExecutionMode::Interpreter, err.to_string()),
        }
    }

    fn run_generator_entry(&self, command: &Command) -> ExecutionResult {
        let mut ctx = GeneratorContext::new(self.env.clone());
        self.seed_variables(&mut ctx);
        let strategy = GeneratorStrategy::new(&self.registry, self);
        match strategy.run_body(&ctx, &command.body) {
            Ok(body_source) => {
                let function_name = to_camel_case(&command.name);
                let imports = ctx.imports();
                let env_vars = ctx.env_vars_needed();
                let mut source = String::from("// Depends on: cmdforge-runtime = \"0.1.0\"\n");
                for import in &imports {
                    source.push_str(&format!("use {import};\n"));
                }
                source.push_str(&format!(
                    "\nfn {function_name}(working_dir: Option<&str>) -> cmdforge_runtime::CommandResult {{\n    \
                     let vars: std::collections::HashMap<String, String> = {};\n    \
                     let env: std::collections::HashMap<String, String> = std::env::vars().collect();\n{body_source}\n}}\n",
                    render_vars_literal(&ctx.variables())
                ));
                if !env_vars.is_empty() {
                    source.push_str(&format!("// captured-environment variables this entry point needs at its own startup: {}\n", env_vars.join(", ")));
                }
                ExecutionResult::ok(ExecutionMode::Generator, ExecutionData::Text(source))
            }
            Err(err) => ExecutionResult::err(ExecutionMode::Generator, err.to_string()),
        }
    }

    fn run_plan_entry(&self, command: &Command) -> ExecutionResult {
        let mut ctx = PlanContext::new(self.env.clone());
        self.seed_variables(&mut ctx);
        let strategy = PlanStrategy::new(&self.registry, self);
        match strategy.run_body(&ctx, &command.body) {
            Ok(plan) => ExecutionResult::ok(ExecutionMode::Plan, ExecutionData::Plan(plan)),
            Err(err) => ExecutionResult::err(ExecutionMode::Plan, err.to_string()),
        }
    }

    fn seed_variables(&self, ctx: &mut impl ExecutionContext) {
        for variable in &self.program.variables {
            ctx.set_variable(variable.name.clone(), variable.value.to_value_string());
        }
        for group in &self.program.var_groups {
            for variable in &group.variables {
                ctx.set_variable(variable.name.clone(), variable.value.to_value_string());
            }
        }
    }

    /// DFS postorder over `@cmd` reference edges. Safe to assume acyclic:
    /// the caller always runs [`validate_program`] first.
    fn topological_order(&self) -> Vec<&Command> {
        fn visit<'p>(program: &'p Program, name: &str, seen: &mut std::collections::HashSet<String>, order: &mut Vec<&'p Command>) {
            if !seen.insert(name.to_string()) {
                return;
            }
            let Some(command) = program.command(name) else {
                return;
            };
            for dependency in command.referenced_commands() {
                visit(program, &dependency, seen, order);
            }
            order.push(command);
        }

        let mut seen = std::collections::HashSet::new();
        let mut order = Vec::with_capacity(self.program.commands.len());
        for command in &self.program.commands {
            visit(self.program, &command.name, &mut seen, &mut order);
        }
        order
    }

    fn resolve_command(&self, name: &str) -> Result<&Command, DecoratorError> {
        self.program.command(name).ok_or_else(|| DecoratorError::Reference {
            decorator: "cmd".to_string(),
            source: ModelError::UnknownCommand { name: name.to_string() },
        })
    }
}

impl<'a> CommandRunner for EngineDriver<'a> {
    fn run_interpreter(&self, ctx: &mut InterpreterContext, command_name: &str) -> Result<CommandResult, DecoratorError> {
        let command = self.resolve_command(command_name)?;
        let child_id = ctx.next_shell_id() + 1;
        let mut child_ctx = ctx.child(child_id);
        let strategy = InterpreterStrategy::new(&self.registry, self);
        strategy.run_body(&mut child_ctx, &command.body)
    }

    fn run_generator(&self, ctx: &GeneratorContext, command_name: &str) -> Result<String, DecoratorError> {
        let command = self.resolve_command(command_name)?;
        let child_id = ctx.next_shell_id() + 1;
        let child_ctx = ctx.child(child_id);
        let strategy = GeneratorStrategy::new(&self.registry, self);
        strategy.run_body(&child_ctx, &command.body)
    }

    fn run_plan(&self, ctx: &PlanContext, command_name: &str) -> Result<PlanElement, DecoratorError> {
        let command = self.resolve_command(command_name)?;
        let child_id = ctx.next_shell_id() + 1;
        let child_ctx = ctx.child(child_id);
        let strategy = PlanStrategy::new(&self.registry, self);
        strategy.run_body(&child_ctx, &command.body)
    }
}

fn render_model_errors(errors: &[ModelError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Bakes a program's seeded variables into a `HashMap::from([...])` literal,
/// sorted by name for deterministic generated output.
fn render_vars_literal(vars: &std::collections::HashMap<String, String>) -> String {
    let mut entries: Vec<_> = vars.iter().collect();
    entries.sort_by_key(|(name, _)| name.as_str());
    let pairs = entries
        .iter()
        .map(|(name, value)| format!("({name:?}.to_string(), {value:?}.to_string())"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("std::collections::HashMap::from([{pairs}])")
}

/// Generated-identifier casing: fold `-`/`_`/` ` separators into camelCase,
/// per the generator's identifier convention.
fn to_camel_case(name: &str) -> String {
    let mut out = String::new();
    let mut capitalize_next = false;
    for ch in name.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
