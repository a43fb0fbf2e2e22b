// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The decorator protocol: four kinds of decorator, each with per-mode
//! entry points, plus the name-keyed registries the engine driver consults.
//!
//! Block and pattern decorators recurse into nested [`CommandContent`] —
//! rather than calling back into the driver directly (which would make this
//! module depend on the driver that depends on it), they're handed a
//! `Runner` for their mode and call back through that.

use crate::context::{GeneratorContext, InterpreterContext, PlanContext};
use crate::error::DecoratorError;
use cmdforge_core::{
    CommandResult, Literal, NamedParameter, ParamSchema, ParamValue, PatternBranch, PatternSchema,
    PlanElement,
};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;

/// A decorator's resolved parameters, looked up by schema name. Built from
/// [`cmdforge_core::validate_params`]'s output so lookups can't fail with
/// "unknown parameter" once a decorator has validated its call.
pub struct ResolvedParams(pub Vec<(&'static str, ParamValue)>);

impl ResolvedParams {
    pub fn new(resolved: Vec<(&'static str, ParamValue)>) -> Self {
        Self(resolved)
    }

    fn value(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            ParamValue::Literal(Literal::String(s)) => Some(s.as_str()),
            ParamValue::Identifier(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            ParamValue::Literal(Literal::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            ParamValue::Literal(Literal::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn duration(&self, name: &str) -> Option<Duration> {
        match self.value(name)? {
            ParamValue::Literal(Literal::Duration(d)) => Some(*d),
            _ => None,
        }
    }

    /// Read back a parameter the schema marks required, without `unwrap`.
    /// Unreachable once [`resolve`] has succeeded against a schema that
    /// actually requires `name`, but builtins still surface a real error
    /// instead of panicking if that invariant is ever violated.
    pub fn require_str(&self, decorator: &str, name: &str) -> Result<&str, DecoratorError> {
        self.str(name)
            .ok_or_else(|| DecoratorError::execution(decorator, format!("missing required parameter '{name}'")))
    }

    pub fn require_int(&self, decorator: &str, name: &str) -> Result<i64, DecoratorError> {
        self.int(name)
            .ok_or_else(|| DecoratorError::execution(decorator, format!("missing required parameter '{name}'")))
    }
}

/// Resolve and bounds-check a decorator's parameters in one call, wrapping
/// schema violations with the decorator's name.
pub fn resolve(
    decorator: &str,
    schema: &[ParamSchema],
    given: &[NamedParameter],
) -> Result<ResolvedParams, DecoratorError> {
    cmdforge_core::validate_params(schema, given)
        .map(ResolvedParams::new)
        .map_err(|e| DecoratorError::validation(decorator, e))
}

/// Callback into the engine driver for running nested content, one per mode
/// so block/pattern decorators never need to know which mode they're in
/// beyond the methods they implement.
pub trait InterpreterRunner: Send + Sync {
    fn run(
        &self,
        ctx: &mut InterpreterContext,
        content: &[cmdforge_core::CommandContent],
    ) -> Result<CommandResult, DecoratorError>;
}

pub trait GeneratorRunner: Send + Sync {
    fn run(
        &self,
        ctx: &GeneratorContext,
        content: &[cmdforge_core::CommandContent],
    ) -> Result<String, DecoratorError>;
}

pub trait PlanRunner: Send + Sync {
    fn run(
        &self,
        ctx: &PlanContext,
        content: &[cmdforge_core::CommandContent],
    ) -> Result<PlanElement, DecoratorError>;
}

/// Callback the `cmd` decorator uses to run a *different* top-level command
/// by name, in whichever mode the caller is running in.
pub trait CommandRunner: Send + Sync {
    fn run_interpreter(&self, ctx: &mut InterpreterContext, command_name: &str) -> Result<CommandResult, DecoratorError>;
    fn run_generator(&self, ctx: &GeneratorContext, command_name: &str) -> Result<String, DecoratorError>;
    fn run_plan(&self, ctx: &PlanContext, command_name: &str) -> Result<PlanElement, DecoratorError>;
}

/// Appears inside a shell fragment; produces a value spliced into the
/// surrounding command text.
pub trait ValueDecorator: Send + Sync {
    fn name(&self) -> &'static str;
    fn schema(&self) -> &'static [ParamSchema];
    fn import_requirements(&self) -> &'static [&'static str] {
        &[]
    }
    fn expand_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError>;
    fn expand_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError>;
    fn expand_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError>;
}

/// Appears inside a shell fragment as a standalone chain step; executes
/// something and yields a [`CommandResult`].
pub trait ActionDecorator: Send + Sync {
    fn name(&self) -> &'static str;
    fn schema(&self) -> &'static [ParamSchema];
    fn import_requirements(&self) -> &'static [&'static str] {
        &[]
    }
    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<CommandResult, DecoratorError>;
    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<String, DecoratorError>;
    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        commands: &dyn CommandRunner,
    ) -> Result<PlanElement, DecoratorError>;
}

/// Wraps a sequence of [`cmdforge_core::CommandContent`].
pub trait BlockDecorator: Send + Sync {
    fn name(&self) -> &'static str;
    fn schema(&self) -> &'static [ParamSchema];
    fn import_requirements(&self) -> &'static [&'static str] {
        &[]
    }
    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        content: &[cmdforge_core::CommandContent],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError>;
    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        content: &[cmdforge_core::CommandContent],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError>;
    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        content: &[cmdforge_core::CommandContent],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError>;
}

/// Wraps an ordered list of [`PatternBranch`]; exactly the branches its
/// [`PatternSchema`] admits.
pub trait PatternDecorator: Send + Sync {
    fn name(&self) -> &'static str;
    fn schema(&self) -> &'static [ParamSchema];
    fn pattern_schema(&self) -> PatternSchema;
    fn execute_interpreter(
        &self,
        ctx: &mut InterpreterContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn InterpreterRunner,
    ) -> Result<(), DecoratorError>;
    fn execute_generator(
        &self,
        ctx: &GeneratorContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn GeneratorRunner,
    ) -> Result<String, DecoratorError>;
    fn execute_plan(
        &self,
        ctx: &PlanContext,
        params: &[NamedParameter],
        branches: &[PatternBranch],
        runner: &dyn PlanRunner,
    ) -> Result<PlanElement, DecoratorError>;
}

/// Name-keyed lookup for all four decorator kinds. Populated once, by
/// [`Registry::with_builtins`] — no reflection-based auto-registration.
#[derive(Clone, Default)]
pub struct Registry {
    values: IndexMap<&'static str, Arc<dyn ValueDecorator>>,
    actions: IndexMap<&'static str, Arc<dyn ActionDecorator>>,
    blocks: IndexMap<&'static str, Arc<dyn BlockDecorator>>,
    patterns: IndexMap<&'static str, Arc<dyn PatternDecorator>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_value(Arc::new(crate::builtins::value::Var));
        registry.register_value(Arc::new(crate::builtins::value::Env));
        registry.register_value(Arc::new(crate::builtins::value::Cmd));
        registry.register_action(Arc::new(crate::builtins::value::Cmd));

        registry.register_block(Arc::new(crate::builtins::block::Parallel));
        registry.register_block(Arc::new(crate::builtins::block::Timeout));
        registry.register_block(Arc::new(crate::builtins::block::Retry));
        registry.register_block(Arc::new(crate::builtins::block::Workdir));
        registry.register_block(Arc::new(crate::builtins::block::Confirm));

        registry.register_pattern(Arc::new(crate::builtins::pattern::When));
        registry.register_pattern(Arc::new(crate::builtins::pattern::Try));
        registry
    }

    pub fn register_value(&mut self, decorator: Arc<dyn ValueDecorator>) {
        self.values.insert(decorator.name(), decorator);
    }

    pub fn register_action(&mut self, decorator: Arc<dyn ActionDecorator>) {
        self.actions.insert(decorator.name(), decorator);
    }

    pub fn register_block(&mut self, decorator: Arc<dyn BlockDecorator>) {
        self.blocks.insert(decorator.name(), decorator);
    }

    pub fn register_pattern(&mut self, decorator: Arc<dyn PatternDecorator>) {
        self.patterns.insert(decorator.name(), decorator);
    }

    pub fn value(&self, name: &str) -> Option<&Arc<dyn ValueDecorator>> {
        self.values.get(name)
    }

    pub fn action(&self, name: &str) -> Option<&Arc<dyn ActionDecorator>> {
        self.actions.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&Arc<dyn BlockDecorator>> {
        self.blocks.get(name)
    }

    pub fn pattern(&self, name: &str) -> Option<&Arc<dyn PatternDecorator>> {
        self.patterns.get(name)
    }

    /// Union of every registered decorator's import requirements. Used by
    /// generator mode once a run is complete to know which were actually
    /// exercised is the driver's job; this just exposes the full catalogue.
    pub fn all_import_requirements(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = self
            .values
            .values()
            .flat_map(|d| d.import_requirements().iter().copied())
            .chain(self.actions.values().flat_map(|d| d.import_requirements().iter().copied()))
            .chain(self.blocks.values().flat_map(|d| d.import_requirements().iter().copied()))
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}

#[cfg(test)]
#[path = "decorator_tests.rs"]
mod tests;
