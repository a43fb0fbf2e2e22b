// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `var`, `env`, and `cmd` — the three value/action decorators that splice a
//! string into a shell fragment rather than wrapping content.

use crate::context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
use crate::decorator::{resolve, ActionDecorator, CommandRunner, ValueDecorator};
use crate::error::DecoratorError;
use cmdforge_core::{CommandResult, ModelError, NamedParameter, ParamSchema, ParamType, PlanElement, PlanElementKind};

/// Splices a resolved variable's value into a shell fragment.
pub struct Var;

impl Var {
    const SCHEMA: [ParamSchema; 1] = [ParamSchema::required("name", ParamType::Identifier)];
}

impl ValueDecorator for Var {
    fn name(&self) -> &'static str {
        "var"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn expand_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("var", self.schema(), params)?;
        let name = resolved.require_str("var", "name")?;
        ctx.get_variable(name).ok_or_else(|| DecoratorError::Reference {
            decorator: "var".to_string(),
            source: ModelError::UnknownVariable { name: name.to_string() },
        })
    }

    fn expand_generator(
        &self,
        _ctx: &GeneratorContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("var", self.schema(), params)?;
        let name = resolved.require_str("var", "name")?;
        Ok(format!("vars.get(\"{name}\").cloned().unwrap_or_default()"))
    }

    fn expand_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("var", self.schema(), params)?;
        let name = resolved.require_str("var", "name")?;
        Ok(ctx.get_variable(name).unwrap_or_else(|| "<undefined>".to_string()))
    }
}

/// Reads a name from the captured environment.
pub struct Env;

impl Env {
    const SCHEMA: [ParamSchema; 1] = [ParamSchema::required("name", ParamType::Identifier)];
}

impl ValueDecorator for Env {
    fn name(&self) -> &'static str {
        "env"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn expand_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("env", self.schema(), params)?;
        let name = resolved.require_str("env", "name")?;
        ctx.get_env(name).map(str::to_string).ok_or_else(|| DecoratorError::Reference {
            decorator: "env".to_string(),
            source: ModelError::UnknownVariable { name: name.to_string() },
        })
    }

    fn expand_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("env", self.schema(), params)?;
        let name = resolved.require_str("env", "name")?;
        ctx.record_env_usage(name);
        Ok(format!("env.get(\"{name}\").cloned().unwrap_or_default()"))
    }

    fn expand_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("env", self.schema(), params)?;
        let name = resolved.require_str("env", "name")?;
        Ok(ctx.get_env(name).map(str::to_string).unwrap_or_else(|| "<undefined>".to_string()))
    }
}

/// Both value and action decorator: reads another top-level command's stdout
/// when used as a value, or runs it and yields its [`CommandResult`] when
/// used as a standalone chain step.
pub struct Cmd;

impl Cmd {
    const SCHEMA: [ParamSchema; 1] = [ParamSchema::required("name", ParamType::String)];
}

impl ValueDecorator for Cmd {
    fn name(&self) -> &'static str {
        "cmd"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn expand_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        let result = commands.run_interpreter(ctx, name)?;
        Ok(result.stdout)
    }

    fn expand_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        commands.run_generator(ctx, name)
    }

    fn expand_plan(
        &self,
        _ctx: &PlanContext,
        params: &[NamedParameter],
        _commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        Ok(format!("<output of {name}>"))
    }
}

impl ActionDecorator for Cmd {
    fn name(&self) -> &'static str {
        "cmd"
    }

    fn schema(&self) -> &'static [ParamSchema] {
        &Self::SCHEMA
    }

    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<CommandResult, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        commands.run_interpreter(ctx, name)
    }

    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        commands.run_generator(ctx, name)
    }

    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<PlanElement, DecoratorError> {
        let resolved = resolve("cmd", self.schema(), params)?;
        let name = resolved.require_str("cmd", "name")?;
        let nested = commands.run_plan(ctx, name)?;
        Ok(PlanElement::leaf(PlanElementKind::Decorator, "cmd", format!("invoke command '{name}'"))
            .with_children(vec![nested]))
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
