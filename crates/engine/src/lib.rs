// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cmdforge-engine: the execution engine. Walks a [`cmdforge_core::Program`]'s
//! command bodies under one of three strategies (interpreter, generator,
//! plan), dispatching decorators through a [`decorator::Registry`] and
//! compiling shell fragments via [`cmdforge_shell`]'s chain parser.

pub mod builtins;
pub mod cancel;
pub mod context;
pub mod decorator;
pub mod driver;
pub mod error;
pub mod strategy;

pub use cancel::CancelToken;
pub use context::{ExecutionContext, GeneratorContext, InterpreterContext, PlanContext};
pub use decorator::{
    ActionDecorator, BlockDecorator, CommandRunner, GeneratorRunner, InterpreterRunner, PatternDecorator, PlanRunner,
    Registry, ResolvedParams, ValueDecorator,
};
pub use driver::EngineDriver;
pub use error::DecoratorError;
pub use strategy::{GeneratorStrategy, InterpreterStrategy, PlanStrategy};
