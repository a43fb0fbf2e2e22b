// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `when` and `try` — the two pattern decorators, each wrapping an ordered
//! list of [`PatternBranch`] rather than a flat content sequence.

use crate::builtins::block::propagate_exit;
use crate::context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
use crate::decorator::{resolve, GeneratorRunner, InterpreterRunner, PatternDecorator, PlanRunner};
use crate::error::DecoratorError;
use cmdforge_core::{
    validate_pattern, ModelError, NamedParameter, ParamSchema, ParamType, PatternBranch, PatternSchema, PlanElement,
    PlanElementKind,
};
use std::collections::BTreeMap;

/// Branches on a variable's (or, failing that, the environment's) value,
/// falling back to a `default` branch when nothing matches.
pub struct When;

impl When {
    const SCHEMA: [ParamSchema; 1] = [ParamSchema::required("variable", ParamType::Identifier)];

    fn pattern_shape() -> PatternSchema {
        PatternSchema {
            allowed: &[],
            required: &[],
            allow_default: true,
            allow_arbitrary_identifiers: true,
        }
    }

    fn lookup(ctx: &impl ExecutionContext, name: &str) -> Option<String> {
        ctx.get_variable(name).or_else(|| ctx.get_env(name).map(str::to_string))
    }

    fn select<'a>(branches: &'a [PatternBranch], value: &str) -> Result<&'a PatternBranch, DecoratorError> {
        branches
            .iter()
            .find(|b| b.pattern == value)
            .or_else(|| branches.iter().find(|b| b.is_default()))
            .ok_or_else(|| DecoratorError::execution("when", format!("no branch matches '{value}' and no default branch is present")))
    }
}

impl PatternDecorator for When {
    fn name(&self) -> &'static str {
        "when"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn pattern_schema(&self) -> PatternSchema {
        Self::pattern_shape()
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let resolved = resolve("when", self.schema(), params)?;
        validate_pattern(&Self::pattern_shape(), branches).map_err(|e| DecoratorError::validation("when", e))?;
        let name = resolved.require_str("when", "variable")?;
        let value = Self::lookup(ctx, name).ok_or_else(|| DecoratorError::Reference {
            decorator: "when".to_string(),
            source: ModelError::UnknownVariable { name: name.to_string() },
        })?;
        let branch = Self::select(branches, &value)?;
        let result = runner.run(ctx, &branch.content)?;
        propagate_exit("when", result)
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("when", self.schema(), params)?;
        validate_pattern(&Self::pattern_shape(), branches).map_err(|e| DecoratorError::validation("when", e))?;
        let name = resolved.require_str("when", "variable")?;
        ctx.record_env_usage(name);

        let mut arms = Vec::with_capacity(branches.len());
        for branch in branches {
            let body = runner.run(ctx, &branch.content)?;
            let pattern = if branch.is_default() {
                "_".to_string()
            } else {
                format!("{:?}", branch.pattern)
            };
            arms.push(format!("        {pattern} => {{ {body} }}"));
        }
        Ok(format!(
            "match vars.get(\"{name}\").cloned().or_else(|| env.get(\"{name}\").cloned()).unwrap_or_default().as_str() {{\n{}\n    }}",
            arms.join("\n")
        ))
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("when", self.schema(), params)?;
        validate_pattern(&Self::pattern_shape(), branches).map_err(|e| DecoratorError::validation("when", e))?;
        let name = resolved.require_str("when", "variable")?;
        let value = Self::lookup(ctx, name);
        let selected_name = value
            .as_deref()
            .and_then(|v| branches.iter().find(|b| b.pattern == v))
            .or_else(|| branches.iter().find(|b| b.is_default()))
            .map(|b| b.pattern.clone());

        let mut children = Vec::with_capacity(branches.len());
        for branch in branches {
            let nested = runner.run(ctx, &branch.content)?;
            let selected = selected_name.as_deref() == Some(branch.pattern.as_str());
            let mut parameters = BTreeMap::new();
            parameters.insert("selected".to_string(), selected.to_string());
            children.push(nested.with_parameters(parameters));
        }

        let mut root_parameters = BTreeMap::new();
        root_parameters.insert("selectedBranch".to_string(), selected_name.unwrap_or_else(|| "none".to_string()));
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "when", format!("branch on '{name}'"))
            .with_parameters(root_parameters)
            .with_children(children))
    }
}

/// Runs `main`, falling back to `catch` on error, always running `finally`
/// last. `catch`/`finally` failures are logged but never override the
/// reported error: precedence is `main` over `catch` over `finally`.
pub struct Try;

impl Try {
    const SCHEMA: [ParamSchema; 0] = [];

    fn pattern_shape() -> PatternSchema {
        PatternSchema {
            allowed: &["main", "catch", "finally"],
            required: &["main"],
            allow_default: false,
            allow_arbitrary_identifiers: false,
        }
    }

    fn branches(branches: &[PatternBranch]) -> Result<(&PatternBranch, Option<&PatternBranch>, Option<&PatternBranch>), DecoratorError> {
        validate_pattern(&Self::pattern_shape(), branches).map_err(|e| DecoratorError::validation("try", e))?;
        let main = branches
            .iter()
            .find(|b| b.pattern == "main")
            .ok_or_else(|| DecoratorError::execution("try", "missing required pattern branch 'main'"))?;
        let catch = branches.iter().find(|b| b.pattern == "catch");
        let finally = branches.iter().find(|b| b.pattern == "finally");
        if catch.is_none() && finally.is_none() {
            return Err(DecoratorError::execution("try", "try requires at least one of 'catch' or 'finally'"));
        }
        Ok((main, catch, finally))
    }
}

impl PatternDecorator for Try {
    fn name(&self) -> &'static str {
        "try"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn pattern_schema(&self) -> PatternSchema {
        Self::pattern_shape()
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError> {
        let _ = resolve("try", self.schema(), params)?;
        let (main, catch, finally) = Self::branches(branches)?;

        let main_outcome = runner.run(ctx, &main.content);
        let main_failed = match &main_outcome {
            Err(_) => true,
            Ok(result) => !result.success(),
        };
        if main_failed {
            if let Some(catch_branch) = catch {
                if let Err(catch_err) = runner.run(ctx, &catch_branch.content) {
                    eprintln!("try: catch branch failed: {catch_err}");
                }
            }
        }

        let finally_error = finally.and_then(|branch| match runner.run(ctx, &branch.content) {
            Ok(_) => None,
            Err(err) => {
                eprintln!("try: finally branch failed: {err}");
                Some(err)
            }
        });

        match main_outcome {
            Err(err) => Err(err),
            Ok(result) if !result.success() => {
                Err(DecoratorError::execution("try", format!("main exited with status {}", result.exit_code)))
            }
            Ok(_) => finally_error.map_or(Ok(()), Err),
        }
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError> {
        let _ = resolve("try", self.schema(), params)?;
        let (main, catch, finally) = Self::branches(branches)?;

        let main_body = runner.run(ctx, &main.content)?;
        let mut out = format!("let __try_result = (|| -> Result<(), Box<dyn std::error::Error>> {{ {main_body} Ok(()) }})();\n");
        if let Some(catch_branch) = catch {
            let catch_body = runner.run(ctx, &catch_branch.content)?;
            out.push_str(&format!("if __try_result.is_err() {{ {catch_body} }}\n"));
        }
        if let Some(finally_branch) = finally {
            let finally_body = runner.run(ctx, &finally_branch.content)?;
            out.push_str(&format!("{finally_body}\n"));
        }
        out.push_str("__try_result?;");
        Ok(out)
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let _ = resolve("try", self.schema(), params)?;
        let (main, catch, finally) = Self::branches(branches)?;

        let mut children = vec![runner.run(ctx, &main.content)?];
        if let Some(branch) = catch {
            children.push(runner.run(ctx, &branch.content)?);
        }
        if let Some(branch) = finally {
            children.push(runner.run(ctx, &branch.content)?);
        }
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "try", "run main, falling back to catch/finally on error")
            .with_children(children))
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
