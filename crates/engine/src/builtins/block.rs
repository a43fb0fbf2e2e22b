// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `parallel`, `timeout`, `retry`, `workdir`, and `confirm` — the five block
//! decorators. Each wraps a sequence of [`cmdforge_core::CommandContent`] and
//! changes how it runs rather than what it produces.

use crate::context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
use crate::decorator::{resolve, BlockDecorator, GeneratorRunner, InterpreterRunner, PlanRunner, ResolvedParams};
use crate::error::DecoratorError;
use cmdforge_core::{format_duration, is_safe_path, CommandContent, CommandResult, NamedParameter, ParamSchema, ParamType, PlanElement, PlanElementKind, CI_INDICATOR_VARS};
use std::io::{BufRead, Write};
use std::time::Duration;

fn bounded_duration(
    resolved: &ResolvedParams,
    name: &str,
    decorator: &str,
    default: Duration,
    min: Duration,
    max: Duration,
) -> Result<Duration, DecoratorError> {
    let value = resolved.duration(name).unwrap_or(default);
    if value < min || value > max {
        return Err(DecoratorError::execution(
            decorator,
            format!(
                "{name} must be between {} and {}, got {}",
                format_duration(min),
                format_duration(max),
                format_duration(value)
            ),
        ));
    }
    Ok(value)
}

pub(crate) fn propagate_exit(decorator: &str, result: CommandResult) -> Result<(), DecoratorError> {
    if result.success() {
        Ok(())
    } else {
        Err(DecoratorError::execution(decorator, format!("child command exited with status {}", result.exit_code)))
    }
}

/// Runs its branches concurrently, one OS thread per branch, in batches
/// bounded by `concurrency` (or a default derived from the batch size and
/// CPU count). Each branch gets its own isolated child context — variables
/// a branch sets never leak to siblings or to the parent.
pub struct Parallel;

impl Parallel {
    const SCHEMA: [ParamSchema; 3] = [
        ParamSchema::optional("concurrency", ParamType::Integer),
        ParamSchema::optional("failOnFirstError", ParamType::Boolean),
        ParamSchema::optional("uncapped", ParamType::Boolean),
    ];

    fn default_permit_cap() -> usize {
        std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1) * 2
    }

    fn permits(resolved: &ResolvedParams, branch_count: usize) -> Result<usize, DecoratorError> {
        let uncapped = resolved.boolean("uncapped").unwrap_or(false);
        let requested = match resolved.int("concurrency") {
            Some(n) if !(1..=1000).contains(&n) => {
                return Err(DecoratorError::execution(
                    "parallel",
                    format!("concurrency must be between 1 and 1000, got {n}"),
                ));
            }
            Some(n) => n as usize,
            None => branch_count.max(1),
        };
        let capped = if uncapped { requested } else { requested.min(Self::default_permit_cap()) };
        Ok(capped.max(1))
    }
}

impl BlockDecorator for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("parallel", self.schema(), params)?;
        let fail_fast = resolved.boolean("failOnFirstError").unwrap_or(false);
        let batch_size = Self::permits(&resolved, content.len())?;

        let mut failures = Vec::new();
        let mut index = 0usize;
        for batch in content.chunks(batch_size) {
            let batch_start = index;
            let outcomes: Vec<Result<CommandResult, DecoratorError>> = std::thread::scope(|scope| {
                let handles: Vec<_> = batch
                    .iter()
                    .enumerate()
                    .map(|(offset, branch)| {
                        let mut child_ctx = ctx.child((batch_start + offset) as u64 + 1);
                        let branch_slice = std::slice::from_ref(branch);
                        scope.spawn(move || runner.run(&mut child_ctx, branch_slice))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|_| Err(DecoratorError::execution("parallel", "branch thread panicked"))))
                    .collect()
            });
            index += batch.len();

            for outcome in outcomes {
                match outcome {
                    Ok(result) if result.success() => {}
                    Ok(result) => failures.push(format!("exit code {}", result.exit_code)),
                    Err(err) => failures.push(err.to_string()),
                }
            }
            if fail_fast && !failures.is_empty() {
                ctx.cancel_token().cancel();
                break;
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DecoratorError::aggregate(failures))
        }
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("parallel", self.schema(), params)?;
        let _ = Self::permits(&resolved, content.len())?;
        ctx.record_import("std::thread");

        let mut spawns = Vec::with_capacity(content.len());
        for branch in content {
            let body = runner.run(ctx, std::slice::from_ref(branch))?;
            spawns.push(format!("        scope.spawn(|| -> Result<(), Box<dyn std::error::Error + Send + Sync>> {{ {body} Ok(()) }});"));
        }
        Ok(format!("std::thread::scope(|scope| {{\n{}\n}});", spawns.join("\n")))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("parallel", self.schema(), params)?;
        let permits = Self::permits(&resolved, content.len())?;

        let mut children = Vec::with_capacity(content.len());
        for branch in content {
            children.push(runner.run(ctx, std::slice::from_ref(branch))?);
        }
        Ok(PlanElement::leaf(
            PlanElementKind::Decorator,
            "parallel",
            format!("run {} branch(es), up to {permits} concurrently", content.len()),
        )
        .with_children(children))
    }
}

/// Runs its content with a cooperative deadline. Interpretation derives a
/// child context whose cancel token fires after `duration`; a command that
/// notices cancellation and bails out is reported as a timeout rather than
/// whatever error it happened to surface.
pub struct Timeout;

impl Timeout {
    const SCHEMA: [ParamSchema; 1] = [ParamSchema::optional("duration", ParamType::Duration)];
    const DEFAULT: Duration = Duration::from_secs(30);
    const MIN: Duration = Duration::from_millis(1);
    const MAX: Duration = Duration::from_secs(24 * 60 * 60);
}

impl BlockDecorator for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("timeout", self.schema(), params)?;
        let duration = bounded_duration(&resolved, "duration", "timeout", Self::DEFAULT, Self::MIN, Self::MAX)?;
        let (mut derived, token) = ctx.with_timeout(duration);

        match runner.run(&mut derived, content) {
            Ok(result) => propagate_exit("timeout", result),
            Err(_) if token.is_cancelled() => Err(DecoratorError::Timeout {
                decorator: "timeout".to_string(),
                elapsed_ms: duration.as_millis() as u64,
            }),
            Err(err) => Err(err),
        }
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("timeout", self.schema(), params)?;
        let duration = bounded_duration(&resolved, "duration", "timeout", Self::DEFAULT, Self::MIN, Self::MAX)?;
        ctx.record_import("tokio::time::timeout");
        let body = runner.run(ctx, content)?;
        Ok(format!(
            "tokio::time::timeout(std::time::Duration::from_millis({}), async {{ {body} }}).await.map_err(|_| \"timed out\")??;",
            duration.as_millis()
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("timeout", self.schema(), params)?;
        let duration = bounded_duration(&resolved, "duration", "timeout", Self::DEFAULT, Self::MIN, Self::MAX)?;
        let nested = runner.run(ctx, content)?;
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "timeout", format!("fail if not complete within {}", format_duration(duration)))
            .with_children(vec![nested]))
    }
}

/// Re-runs its content up to `attempts` times, sleeping `delay` between
/// tries, stopping at the first success.
pub struct Retry;

impl Retry {
    const SCHEMA: [ParamSchema; 2] = [
        ParamSchema::required("attempts", ParamType::Integer),
        ParamSchema::optional("delay", ParamType::Duration),
    ];
    const MAX_ATTEMPTS: i64 = 100;
    const DEFAULT_DELAY: Duration = Duration::from_secs(1);
    const MIN_DELAY: Duration = Duration::from_millis(1);
    const MAX_DELAY: Duration = Duration::from_secs(60 * 60);

    fn attempts(resolved: &ResolvedParams) -> Result<i64, DecoratorError> {
        let attempts = resolved.require_int("retry", "attempts")?;
        if !(1..=Self::MAX_ATTEMPTS).contains(&attempts) {
            return Err(DecoratorError::execution(
                "retry",
                format!("attempts must be between 1 and {}, got {attempts}", Self::MAX_ATTEMPTS),
            ));
        }
        Ok(attempts)
    }
}

impl BlockDecorator for Retry {
    fn name(&self) -> &'static str {
        "retry"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("retry", self.schema(), params)?;
        let attempts = Self::attempts(&resolved)?;
        let delay = bounded_duration(&resolved, "delay", "retry", Self::DEFAULT_DELAY, Self::MIN_DELAY, Self::MAX_DELAY)?;

        let mut last_error = None;
        for attempt in 1..=attempts {
            match runner.run(ctx, content) {
                Ok(result) if result.success() => return Ok(()),
                Ok(result) => last_error = Some(DecoratorError::execution("retry", format!("exit code {}", result.exit_code))),
                Err(err) => last_error = Some(err),
            }
            if attempt < attempts {
                std::thread::sleep(delay);
            }
        }
        Err(last_error.unwrap_or_else(|| DecoratorError::execution("retry", "no attempts were executed")))
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("retry", self.schema(), params)?;
        let attempts = Self::attempts(&resolved)?;
        let delay = bounded_duration(&resolved, "delay", "retry", Self::DEFAULT_DELAY, Self::MIN_DELAY, Self::MAX_DELAY)?;
        let body = runner.run(ctx, content)?;
        Ok(format!(
            "for attempt in 1..={attempts} {{\n    match (|| -> Result<(), Box<dyn std::error::Error>> {{ {body} Ok(()) }})() {{\n        Ok(()) => break,\n        Err(e) if attempt == {attempts} => return Err(e),\n        Err(_) => std::thread::sleep(std::time::Duration::from_millis({})),\n    }}\n}}",
            delay.as_millis()
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("retry", self.schema(), params)?;
        let attempts = Self::attempts(&resolved)?;
        let delay = bounded_duration(&resolved, "delay", "retry", Self::DEFAULT_DELAY, Self::MIN_DELAY, Self::MAX_DELAY)?;
        let nested = runner.run(ctx, content)?;
        Ok(PlanElement::leaf(
            PlanElementKind::Decorator,
            "retry",
            format!("retry up to {attempts} time(s), {} apart", format_duration(delay)),
        )
        .with_children(vec![nested]))
    }
}

/// Runs its content with a derived working directory. Never touches the
/// host process's current directory — the directory is carried on the
/// child context and consulted wherever a shell fragment is actually run.
pub struct Workdir;

impl Workdir {
    const SCHEMA: [ParamSchema; 2] = [
        ParamSchema::required("path", ParamType::String),
        ParamSchema::optional("createIfNotExists", ParamType::Boolean),
    ];

    fn checked_path(resolved: &ResolvedParams) -> Result<&str, DecoratorError> {
        let path = resolved.require_str("workdir", "path")?;
        if is_safe_path(path) {
            Ok(path)
        } else {
            Err(DecoratorError::execution("workdir", format!("unsafe path '{path}'")))
        }
    }
}

impl BlockDecorator for Workdir {
    fn name(&self) -> &'static str {
        "workdir"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("workdir", self.schema(), params)?;
        let path = Self::checked_path(&resolved)?;
        if resolved.boolean("createIfNotExists").unwrap_or(false) {
            std::fs::create_dir_all(path).map_err(|source| DecoratorError::Io {
                decorator: "workdir".to_string(),
                source,
            })?;
        }
        let mut derived = ctx.with_working_dir(path);
        let result = runner.run(&mut derived, content)?;
        propagate_exit("workdir", result)
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("workdir", self.schema(), params)?;
        let path = Self::checked_path(&resolved)?;
        let create = resolved.boolean("createIfNotExists").unwrap_or(false);
        let derived = ctx.with_working_dir(path);
        let body = runner.run(&derived, content)?;
        let mkdir = if create { format!("std::fs::create_dir_all(\"{path}\")?;\n") } else { String::new() };
        Ok(format!(
            "{mkdir}let __prev_dir = std::env::current_dir()?;\nstd::env::set_current_dir(\"{path}\")?;\n{body}\nstd::env::set_current_dir(&__prev_dir)?;"
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("workdir", self.schema(), params)?;
        let path = Self::checked_path(&resolved)?;
        let derived = ctx.with_working_dir(path);
        let nested = runner.run(&derived, content)?;
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "workdir", format!("run in directory '{path}'")).with_children(vec![nested]))
    }
}

/// Gates its content on an interactive yes/no prompt, auto-confirmed under
/// CI unless disabled.
pub struct Confirm;

impl Confirm {
    const SCHEMA: [ParamSchema; 5] = [
        ParamSchema::optional("message", ParamType::String),
        ParamSchema::optional("defaultYes", ParamType::Boolean),
        ParamSchema::optional("abortOnNo", ParamType::Boolean),
        ParamSchema::optional("caseSensitive", ParamType::Boolean),
        ParamSchema::optional("ci", ParamType::Boolean),
    ];
    const DEFAULT_MESSAGE: &'static str = "Do you want to continue?";

    fn ci_detected(ctx: &impl ExecutionContext) -> bool {
        CI_INDICATOR_VARS.iter().any(|name| ctx.get_env(name).is_some_and(|v| !v.is_empty()))
    }

    fn prompt_stdin(message: &str, default_yes: bool, case_sensitive: bool) -> Result<bool, DecoratorError> {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        print!("{message} {hint} ");
        std::io::stdout().flush().map_err(|source| DecoratorError::Io {
            decorator: "confirm".to_string(),
            source,
        })?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).map_err(|source| DecoratorError::Io {
            decorator: "confirm".to_string(),
            source,
        })?;
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default_yes);
        }
        let normalized = if case_sensitive { answer.to_string() } else { answer.to_lowercase() };
        match normalized.as_str() {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Ok(default_yes),
        }
    }
}

impl BlockDecorator for Confirm {
    fn name(&self) -> &'static str {
        "confirm"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("confirm", self.schema(), params)?;
        let message = resolved.str("message").unwrap_or(Self::DEFAULT_MESSAGE);
        let default_yes = resolved.boolean("defaultYes").unwrap_or(false);
        let abort_on_no = resolved.boolean("abortOnNo").unwrap_or(true);
        let case_sensitive = resolved.boolean("caseSensitive").unwrap_or(false);
        let honor_ci = resolved.boolean("ci").unwrap_or(true);

        let confirmed = if honor_ci && Self::ci_detected(ctx) {
            true
        } else {
            Self::prompt_stdin(message, default_yes, case_sensitive)?
        };

        if confirmed {
            let result = runner.run(ctx, content)?;
            propagate_exit("confirm", result)
        } else if abort_on_no {
            Err(DecoratorError::UserAbort { decorator: "confirm".to_string() })
        } else {
            Ok(())
        }
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("confirm", self.schema(), params)?;
        let message = resolved.str("message").unwrap_or(Self::DEFAULT_MESSAGE);
        let default_yes = resolved.boolean("defaultYes").unwrap_or(false);
        let abort_on_no = resolved.boolean("abortOnNo").unwrap_or(true);
        let honor_ci = resolved.boolean("ci").unwrap_or(true);
        ctx.record_import("std::io");
        let body = runner.run(ctx, content)?;
        let abort_stmt = if abort_on_no {
            "return Err(\"user declined confirmation\".into());"
        } else {
            "return Ok(());"
        };
        Ok(format!(
            "if {honor_ci} && cmdforge_looks_like_ci() {{\n    {body}\n}} else if cmdforge_prompt_yes_no(\"{message}\", {default_yes})? {{\n    {body}\n}} else {{\n    {abort_stmt}\n}}"
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("confirm", self.schema(), params)?;
        let message = resolved.str("message").unwrap_or(Self::DEFAULT_MESSAGE);
        let nested = runner.run(ctx, content)?;
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "confirm", format!("prompt: \"{message}\""))
            .with_children(vec![nested]))
    }
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
