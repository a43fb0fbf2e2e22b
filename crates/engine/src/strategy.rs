// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three driving strategies: walk a command body's [`CommandContent`]
//! items, compiling each shell fragment into a [`cmdforge_shell::Chain`] and
//! applying its operator semantics, dispatching block/pattern items through
//! the [`Registry`]. One strategy per mode; each also implements the
//! matching `Runner` trait from [`crate::decorator`] so builtins can recurse
//! into nested content without depending on the driver directly.

use crate::context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
use crate::decorator::{CommandRunner, GeneratorRunner, InterpreterRunner, PlanRunner, Registry};
use crate::error::DecoratorError;
use cmdforge_core::{CommandContent, CommandResult, PlanElement, PlanElementKind, ShellPart};
use cmdforge_shell::{parse_chain, ChainElement, ChainOperator, TextFragment};
use std::io::Write as _;
use std::process::{Command as ProcessCommand, Stdio};

/// The host shell invoked as `<shell> -c <command-string>`. Fixed, per the
/// shell binary being a collaborator external to this crate.
const DEFAULT_SHELL: &str = "sh";

fn io_err(decorator: &str, source: std::io::Error) -> DecoratorError {
    DecoratorError::Io {
        decorator: decorator.to_string(),
        source,
    }
}

fn wiring(what: impl Into<String>) -> DecoratorError {
    DecoratorError::Wiring { what: what.into() }
}

/// Runs the host shell, capturing stdout/stderr while still forwarding them
/// to this process's own streams once the child exits.
fn run_shell(ctx: &InterpreterContext, command: &str, stdin_data: Option<&str>) -> Result<CommandResult, DecoratorError> {
    let span = tracing::info_span!("shell", command = %command);
    let _entered = span.enter();

    let mut cmd = ProcessCommand::new(DEFAULT_SHELL);
    cmd.arg("-c").arg(command);
    if let Some(dir) = ctx.working_dir() {
        cmd.current_dir(dir);
    }
    cmd.stdin(if stdin_data.is_some() { Stdio::piped() } else { Stdio::inherit() });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let start = ctx.clock().now();
    let mut child = cmd.spawn().map_err(|e| io_err("shell", e))?;
    if let Some(data) = stdin_data {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data.as_bytes()).map_err(|e| io_err("shell", e))?;
        }
    }
    let output = child.wait_with_output().map_err(|e| io_err("shell", e))?;
    let elapsed = ctx.clock().now().duration_since(start);

    std::io::stdout().write_all(&output.stdout).ok();
    std::io::stderr().write_all(&output.stderr).ok();

    let exit_code = output.status.code().unwrap_or(-1);
    tracing::info!(elapsed_ms = elapsed.as_millis() as u64, exit_code, "shell fragment completed");

    Ok(CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code,
    })
}

/// `>>`: append `data` to `path`, creating it (mode 0644) if absent.
fn append_to_file(path: &str, data: &str) -> Result<CommandResult, DecoratorError> {
    use std::fs::OpenOptions;
    #[cfg(unix)]
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path).map_err(|e| io_err("shell", e))?;
    file.write_all(data.as_bytes()).map_err(|e| io_err("shell", e))?;
    Ok(CommandResult::ok_empty())
}

/// The operator immediately preceding `elements[i]`, or `None` for the first
/// element (chain invariants guarantee command/operator elements alternate).
fn preceding_operator(elements: &[ChainElement], i: usize) -> Option<ChainOperator> {
    if i == 0 {
        return None;
    }
    match &elements[i - 1] {
        ChainElement::Operator { op, .. } => Some(*op),
        _ => None,
    }
}

/// Drives a [`CommandContent`] body in interpreter mode: executes shell
/// fragments via the host shell, dispatches decorators through the registry.
pub struct InterpreterStrategy<'a> {
    registry: &'a Registry,
    commands: &'a dyn CommandRunner,
}

impl<'a> InterpreterStrategy<'a> {
    pub fn new(registry: &'a Registry, commands: &'a dyn CommandRunner) -> Self {
        Self { registry, commands }
    }

    /// Runs every item in `body` in order. Items are independent statements,
    /// not joined by an implicit `&&`: a non-zero exit does not stop the next
    /// item from running, matching a plain sequential script. The exit status
    /// reported back is the *first* failing item's, per the command's overall
    /// output contract; if nothing failed, the last item's result is returned.
    pub fn run_body(&self, ctx: &mut InterpreterContext, body: &[CommandContent]) -> Result<CommandResult, DecoratorError> {
        let mut first_failure = None;
        let mut last = CommandResult::ok_empty();
        for item in body {
            last = self.run_item(ctx, item)?;
            if !last.success() && first_failure.is_none() {
                first_failure = Some(last.clone());
            }
        }
        Ok(first_failure.unwrap_or(last))
    }

    fn run_item(&self, ctx: &mut InterpreterContext, item: &CommandContent) -> Result<CommandResult, DecoratorError> {
        match item {
            CommandContent::Shell(parts) => self.run_chain(ctx, parts),
            CommandContent::Block { name, params, content } => {
                let decorator = self.registry.block(name).ok_or_else(|| wiring(format!("block decorator '{name}'")))?;
                decorator.execute_interpreter(ctx, params, content, self)?;
                Ok(CommandResult::ok_empty())
            }
            CommandContent::Pattern { name, params, branches } => {
                let decorator = self.registry.pattern(name).ok_or_else(|| wiring(format!("pattern decorator '{name}'")))?;
                decorator.execute_interpreter(ctx, params, branches, self)?;
                Ok(CommandResult::ok_empty())
            }
        }
    }

    fn run_chain(&self, ctx: &mut InterpreterContext, parts: &[ShellPart]) -> Result<CommandResult, DecoratorError> {
        let chain = parse_chain(parts).map_err(|e| DecoratorError::execution("shell", e.to_string()))?;
        let elements = chain.elements();
        let mut last = CommandResult::ok_empty();
        let mut i = 0;
        while i < elements.len() {
            if ctx.cancel_token().is_cancelled() {
                return Err(DecoratorError::Cancellation {
                    decorator: "shell".to_string(),
                    reason: "parent context was cancelled".to_string(),
                });
            }
            let op = preceding_operator(elements, i);
            let should_run = match op {
                None => true,
                Some(ChainOperator::And) => last.success(),
                Some(ChainOperator::Or) => !last.success(),
                Some(ChainOperator::Pipe) | Some(ChainOperator::Append) => true,
            };
            if should_run {
                last = self.run_element(ctx, &elements[i], op, &last)?;
            }
            i += 2;
        }
        Ok(last)
    }

    fn run_element(
        &self,
        ctx: &mut InterpreterContext,
        element: &ChainElement,
        preceding_op: Option<ChainOperator>,
        last: &CommandResult,
    ) -> Result<CommandResult, DecoratorError> {
        match element {
            ChainElement::Action { decorator, .. } => {
                let action = self.registry.action(&decorator.name).ok_or_else(|| wiring(format!("action decorator '{}'", decorator.name)))?;
                action.execute_interpreter(ctx, &decorator.params, self.commands)
            }
            ChainElement::Text { parts, .. } => {
                let text = self.expand_text(ctx, parts)?;
                match preceding_op {
                    Some(ChainOperator::Append) => append_to_file(&text, &last.stdout),
                    Some(ChainOperator::Pipe) => run_shell(ctx, &text, Some(&last.stdout)),
                    _ => run_shell(ctx, &text, None),
                }
            }
            ChainElement::Operator { .. } => unreachable!("stride-2 walk never visits an operator element"),
        }
    }

    fn expand_text(&self, ctx: &mut InterpreterContext, parts: &[TextFragment]) -> Result<String, DecoratorError> {
        let mut out = String::new();
        for part in parts {
            match part {
                TextFragment::Literal(s) => out.push_str(s),
                TextFragment::Value(decorator) => {
                    let value = self.registry.value(&decorator.name).ok_or_else(|| wiring(format!("value decorator '{}'", decorator.name)))?;
                    out.push_str(&value.expand_interpreter(ctx, &decorator.params, self.commands)?);
                }
            }
        }
        Ok(out)
    }
}

impl<'a> InterpreterRunner for InterpreterStrategy<'a> {
    fn run(&self, ctx: &mut InterpreterContext, content: &[CommandContent]) -> Result<CommandResult, DecoratorError> {
        self.run_body(ctx, content)
    }
}

/// Drives a [`CommandContent`] body in generator mode: emits a self-contained
/// Rust statement block per item, stitched together by the caller.
pub struct GeneratorStrategy<'a> {
    registry: &'a Registry,
    commands: &'a dyn CommandRunner,
}

impl<'a> GeneratorStrategy<'a> {
    pub fn new(registry: &'a Registry, commands: &'a dyn CommandRunner) -> Self {
        Self { registry, commands }
    }

    pub fn run_body(&self, ctx: &GeneratorContext, body: &[CommandContent]) -> Result<String, DecoratorError> {
        let mut out = Vec::with_capacity(body.len());
        for item in body {
            out.push(self.run_item(ctx, item)?);
        }
        Ok(out.join("\n"))
    }

    fn run_item(&self, ctx: &GeneratorContext, item: &CommandContent) -> Result<String, DecoratorError> {
        match item {
            CommandContent::Shell(parts) => self.run_chain(ctx, parts),
            CommandContent::Block { name, params, content } => {
                let decorator = self.registry.block(name).ok_or_else(|| wiring(format!("block decorator '{name}'")))?;
                for import in decorator.import_requirements() {
                    ctx.record_import(*import);
                }
                decorator.execute_generator(ctx, params, content, self)
            }
            CommandContent::Pattern { name, params, branches } => {
                let decorator = self.registry.pattern(name).ok_or_else(|| wiring(format!("pattern decorator '{name}'")))?;
                decorator.execute_generator(ctx, params, branches, self)
            }
        }
    }

    /// Emits a block maintaining a local `last_result`, one labelled section
    /// per chain element, with helper closures conditioned on a usage scan
    /// of the chain so unused helpers are never emitted.
    fn run_chain(&self, ctx: &GeneratorContext, parts: &[ShellPart]) -> Result<String, DecoratorError> {
        let chain = parse_chain(parts).map_err(|e| DecoratorError::execution("shell", e.to_string()))?;
        let elements = chain.elements();
        let needs_pipe = elements.iter().any(|e| matches!(e, ChainElement::Operator { op: ChainOperator::Pipe, .. }));
        let needs_append = elements.iter().any(|e| matches!(e, ChainElement::Operator { op: ChainOperator::Append, .. }));
        ctx.record_import("std::process::Command");

        let mut body = String::from("let mut last_result = cmdforge_runtime::CommandResult::default();\n");
        body.push_str("let execute_shell_command = |command: &str| cmdforge_runtime::execute_shell_command(command, working_dir.as_deref());\n");
        if needs_pipe {
            body.push_str(
                "let execute_shell_command_with_input = |command: &str, input: &str| cmdforge_runtime::execute_shell_command_with_input(command, input, working_dir.as_deref());\n",
            );
        }
        if needs_append {
            body.push_str("let append_to_file = |path: &str, data: &str| cmdforge_runtime::append_to_file(path, data);\n");
        }

        let mut i = 0;
        while i < elements.len() {
            let op = preceding_operator(elements, i);
            let step = self.emit_element(ctx, &elements[i], op)?;
            match op {
                Some(ChainOperator::And) => body.push_str(&format!("if last_result.success() {{ {step} }}\n")),
                Some(ChainOperator::Or) => body.push_str(&format!("if !last_result.success() {{ {step} }}\n")),
                _ => body.push_str(&format!("{step}\n")),
            }
            i += 2;
        }
        body.push_str("last_result");
        Ok(format!("{{\n{body}\n}}"))
    }

    fn emit_element(&self, ctx: &GeneratorContext, element: &ChainElement, preceding_op: Option<ChainOperator>) -> Result<String, DecoratorError> {
        match element {
            ChainElement::Action { decorator, .. } => {
                let action = self.registry.action(&decorator.name).ok_or_else(|| wiring(format!("action decorator '{}'", decorator.name)))?;
                let call = action.execute_generator(ctx, &decorator.params, self.commands)?;
                Ok(format!("last_result = {{ {call} }};"))
            }
            ChainElement::Text { parts, .. } => {
                let expr = self.expand_text_generator(ctx, parts)?;
                match preceding_op {
                    Some(ChainOperator::Append) => Ok(format!(
                        "append_to_file(&{expr}, &last_result.stdout)?;\nlast_result = cmdforge_runtime::CommandResult::default();"
                    )),
                    Some(ChainOperator::Pipe) => Ok(format!("last_result = execute_shell_command_with_input(&{expr}, &last_result.stdout);")),
                    _ => Ok(format!("last_result = execute_shell_command(&{expr});")),
                }
            }
            ChainElement::Operator { .. } => unreachable!("stride-2 walk never visits an operator element"),
        }
    }

    /// Builds a `format!(...)` expression string that reproduces the
    /// element's command text at generated-program runtime.
    fn expand_text_generator(&self, ctx: &GeneratorContext, parts: &[TextFragment]) -> Result<String, DecoratorError> {
        let mut template = String::new();
        let mut args = Vec::new();
        for part in parts {
            match part {
                TextFragment::Literal(s) => template.push_str(&s.replace('{', "{{").replace('}', "}}")),
                TextFragment::Value(decorator) => {
                    let value = self.registry.value(&decorator.name).ok_or_else(|| wiring(format!("value decorator '{}'", decorator.name)))?;
                    template.push_str("{}");
                    args.push(value.expand_generator(ctx, &decorator.params, self.commands)?);
                }
            }
        }
        if args.is_empty() {
            Ok(format!("{template:?}.to_string()"))
        } else {
            Ok(format!("format!({template:?}, {})", args.join(", ")))
        }
    }
}

impl<'a> GeneratorRunner for GeneratorStrategy<'a> {
    fn run(&self, ctx: &GeneratorContext, content: &[CommandContent]) -> Result<String, DecoratorError> {
        self.run_body(ctx, content)
    }
}

/// Drives a [`CommandContent`] body in plan mode: a side-effect-free tree of
/// [`PlanElement`]s, one per top-level item (bare sequences of more than one
/// item are wrapped under a synthetic `sequence` root).
pub struct PlanStrategy<'a> {
    registry: &'a Registry,
    commands: &'a dyn CommandRunner,
}

impl<'a> PlanStrategy<'a> {
    pub fn new(registry: &'a Registry, commands: &'a dyn CommandRunner) -> Self {
        Self { registry, commands }
    }

    pub fn run_body(&self, ctx: &PlanContext, body: &[CommandContent]) -> Result<PlanElement, DecoratorError> {
        match body {
            [] => Ok(PlanElement::leaf(PlanElementKind::Shell, "empty", "")),
            [only] => self.run_item(ctx, only),
            many => {
                let children = many.iter().map(|item| self.run_item(ctx, item)).collect::<Result<Vec<_>, _>>()?;
                Ok(PlanElement::leaf(PlanElementKind::Decorator, "sequence", format!("{} steps", children.len())).with_children(children))
            }
        }
    }

    fn run_item(&self, ctx: &PlanContext, item: &CommandContent) -> Result<PlanElement, DecoratorError> {
        match item {
            CommandContent::Shell(parts) => {
                let description = self.render_chain(ctx, parts)?;
                Ok(PlanElement::leaf(PlanElementKind::Shell, "shell", description))
            }
            CommandContent::Block { name, params, content } => {
                let decorator = self.registry.block(name).ok_or_else(|| wiring(format!("block decorator '{name}'")))?;
                decorator.execute_plan(ctx, params, content, self)
            }
            CommandContent::Pattern { name, params, branches } => {
                let decorator = self.registry.pattern(name).ok_or_else(|| wiring(format!("pattern decorator '{name}'")))?;
                decorator.execute_plan(ctx, params, branches, self)
            }
        }
    }

    fn render_chain(&self, ctx: &PlanContext, parts: &[ShellPart]) -> Result<String, DecoratorError> {
        let chain = parse_chain(parts).map_err(|e| DecoratorError::execution("shell", e.to_string()))?;
        let mut rendered = Vec::with_capacity(chain.len());
        for element in chain.elements() {
            match element {
                ChainElement::Text { parts, .. } => rendered.push(self.render_text(ctx, parts)?),
                ChainElement::Action { decorator, .. } => rendered.push(format!("@{}({})", decorator.name, render_params(&decorator.params))),
                ChainElement::Operator { op, .. } => rendered.push(op.as_str().to_string()),
            }
        }
        Ok(rendered.join(" "))
    }

    fn render_text(&self, ctx: &PlanContext, parts: &[TextFragment]) -> Result<String, DecoratorError> {
        let mut out = String::new();
        for part in parts {
            match part {
                TextFragment::Literal(s) => out.push_str(s),
                TextFragment::Value(decorator) => {
                    let value = self.registry.value(&decorator.name).ok_or_else(|| wiring(format!("value decorator '{}'", decorator.name)))?;
                    let resolved = value.expand_plan(ctx, &decorator.params, self.commands)?;
                    out.push_str(&format!("@{}({resolved})", decorator.name));
                }
            }
        }
        Ok(out)
    }
}

impl<'a> PlanRunner for PlanStrategy<'a> {
    fn run(&self, ctx: &PlanContext, content: &[CommandContent]) -> Result<PlanElement, DecoratorError> {
        self.run_body(ctx, content)
    }
}

fn render_params(params: &[cmdforge_core::NamedParameter]) -> String {
    params
        .iter()
        .map(|p| match (p.is_positional(), &p.value) {
            (true, v) => render_param_value(v),
            (false, v) => format!("{}={}", p.name, render_param_value(v)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_param_value(value: &cmdforge_core::ParamValue) -> String {
    match value {
        cmdforge_core::ParamValue::Identifier(s) => s.clone(),
        cmdforge_core::ParamValue::Literal(l) => match l {
            cmdforge_core::Literal::String(s) => format!("{s:?}"),
            cmdforge_core::Literal::Integer(n) => n.to_string(),
            cmdforge_core::Literal::Boolean(b) => b.to_string(),
            cmdforge_core::Literal::Duration(d) => cmdforge_core::format_duration(*d),
        },
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
