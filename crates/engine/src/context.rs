// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three execution context variants: Interpreter, Generator, Plan.
//!
//! They share one contract (`ExecutionContext`) and one internal carrier
//! (`BaseContext`) for variables, captured environment, working directory,
//! cancellation, and the per-context shell-fragment counter — but are never
//! interchanged at a call site. A decorator statically requires the variant
//! it needs; the engine driver picks the matching context once, up front,
//! rather than dispatching through a shared virtual interface on every call.

use crate::cancel::CancelToken;
use cmdforge_core::{CapturedEnvironment, Clock, SystemClock};
use indexmap::IndexSet;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Stride between sibling children's shell-counter spaces. Large enough
/// that no single sub-execution plausibly generates this many identifiers,
/// guaranteeing no collisions between independently generated code in
/// concurrent `parallel` branches.
pub const CHILD_COUNTER_STRIDE: u64 = 1000;

/// Shared contract across all three context variants.
pub trait ExecutionContext {
    fn mode(&self) -> cmdforge_core::ExecutionMode;
    fn get_variable(&self, name: &str) -> Option<String>;
    fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>);
    fn get_env(&self, name: &str) -> Option<&str>;
    fn working_dir(&self) -> Option<&Path>;
    fn cancel_token(&self) -> &CancelToken;
    fn next_shell_id(&self) -> u64;
}

#[derive(Clone)]
struct BaseContext {
    variables: HashMap<String, String>,
    env: CapturedEnvironment,
    working_dir: Option<PathBuf>,
    cancel: CancelToken,
    shell_counter: Arc<AtomicU64>,
}

impl BaseContext {
    fn new(env: CapturedEnvironment) -> Self {
        Self {
            variables: HashMap::new(),
            env,
            working_dir: None,
            cancel: CancelToken::new(),
            shell_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    fn get_env(&self, name: &str) -> Option<&str> {
        self.env.get(name)
    }

    fn with_working_dir(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(path.into()),
            ..self.clone()
        }
    }

    fn with_cancel(&self) -> (Self, CancelToken) {
        let token = self.cancel.child();
        (
            Self {
                cancel: token.clone(),
                ..self.clone()
            },
            token,
        )
    }

    /// Fires `token.cancel()` from a plain OS thread after `duration` elapses.
    /// No async runtime is involved: interpreter-mode execution is entirely
    /// synchronous, and `CancelToken::cancel` is a synchronous send.
    fn with_timeout(&self, duration: Duration) -> (Self, CancelToken) {
        let (derived, token) = self.with_cancel();
        let timer_token = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(duration);
            timer_token.cancel();
        });
        (derived, token)
    }

    fn child(&self, child_id: u64) -> Self {
        let base = self.shell_counter.load(Ordering::SeqCst);
        Self {
            variables: self.variables.clone(),
            env: self.env.clone(),
            working_dir: self.working_dir.clone(),
            cancel: self.cancel.child(),
            shell_counter: Arc::new(AtomicU64::new(base + child_id * CHILD_COUNTER_STRIDE)),
        }
    }

    fn next_shell_id(&self) -> u64 {
        self.shell_counter.fetch_add(1, Ordering::SeqCst)
    }
}

/// Adds `ExecuteShell` capability: runs fragments via the host shell with
/// streams inherited, and tracks wall-clock elapsed time for tracing.
pub struct InterpreterContext<C: Clock = SystemClock> {
    base: BaseContext,
    clock: C,
}

impl InterpreterContext<SystemClock> {
    pub fn new(env: CapturedEnvironment) -> Self {
        Self::with_clock(env, SystemClock)
    }
}

impl<C: Clock> InterpreterContext<C> {
    pub fn with_clock(env: CapturedEnvironment, clock: C) -> Self {
        Self {
            base: BaseContext::new(env),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn with_working_dir(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            base: self.base.with_working_dir(path),
            clock: self.clock.clone(),
        }
    }

    pub fn with_cancel(&self) -> (Self, CancelToken) {
        let (base, token) = self.base.with_cancel();
        (
            Self {
                base,
                clock: self.clock.clone(),
            },
            token,
        )
    }

    pub fn with_timeout(&self, duration: Duration) -> (Self, CancelToken) {
        let (base, token) = self.base.with_timeout(duration);
        (
            Self {
                base,
                clock: self.clock.clone(),
            },
            token,
        )
    }

    pub fn child(&self, child_id: u64) -> Self {
        Self {
            base: self.base.child(child_id),
            clock: self.clock.clone(),
        }
    }
}

impl<C: Clock> ExecutionContext for InterpreterContext<C> {
    fn mode(&self) -> cmdforge_core::ExecutionMode {
        cmdforge_core::ExecutionMode::Interpreter
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.base.get_variable(name)
    }

    fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.base.set_variable(name, value);
    }

    fn get_env(&self, name: &str) -> Option<&str> {
        self.base.get_env(name)
    }

    fn working_dir(&self) -> Option<&Path> {
        self.base.working_dir.as_deref()
    }

    fn cancel_token(&self) -> &CancelToken {
        &self.base.cancel
    }

    fn next_shell_id(&self) -> u64 {
        self.base.next_shell_id()
    }
}

/// Adds `GenerateShellCode` capability, plus bookkeeping for the import set
/// and the captured-environment variable names the generated program must
/// snapshot at its own startup.
pub struct GeneratorContext {
    base: BaseContext,
    imports: RefCell<IndexSet<String>>,
    env_vars_needed: RefCell<IndexSet<String>>,
}

impl GeneratorContext {
    pub fn new(env: CapturedEnvironment) -> Self {
        Self {
            base: BaseContext::new(env),
            imports: RefCell::new(IndexSet::new()),
            env_vars_needed: RefCell::new(IndexSet::new()),
        }
    }

    pub fn record_import(&self, name: impl Into<String>) {
        self.imports.borrow_mut().insert(name.into());
    }

    pub fn record_env_usage(&self, name: impl Into<String>) {
        self.env_vars_needed.borrow_mut().insert(name.into());
    }

    pub fn imports(&self) -> Vec<String> {
        self.imports.borrow().iter().cloned().collect()
    }

    pub fn env_vars_needed(&self) -> Vec<String> {
        self.env_vars_needed.borrow().iter().cloned().collect()
    }

    /// The program's own variables as seeded into this context, for baking
    /// into the generated function's `vars` snapshot.
    pub fn variables(&self) -> HashMap<String, String> {
        self.base.variables.clone()
    }

    pub fn with_working_dir(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            base: self.base.with_working_dir(path),
            imports: RefCell::new(self.imports.borrow().clone()),
            env_vars_needed: RefCell::new(self.env_vars_needed.borrow().clone()),
        }
    }

    pub fn with_cancel(&self) -> (Self, CancelToken) {
        let (base, token) = self.base.with_cancel();
        (
            Self {
                base,
                imports: RefCell::new(self.imports.borrow().clone()),
                env_vars_needed: RefCell::new(self.env_vars_needed.borrow().clone()),
            },
            token,
        )
    }

    pub fn with_timeout(&self, duration: Duration) -> (Self, CancelToken) {
        let (base, token) = self.base.with_timeout(duration);
        (
            Self {
                base,
                imports: RefCell::new(self.imports.borrow().clone()),
                env_vars_needed: RefCell::new(self.env_vars_needed.borrow().clone()),
            },
            token,
        )
    }

    pub fn child(&self, child_id: u64) -> Self {
        Self {
            base: self.base.child(child_id),
            imports: RefCell::new(self.imports.borrow().clone()),
            env_vars_needed: RefCell::new(self.env_vars_needed.borrow().clone()),
        }
    }
}

impl ExecutionContext for GeneratorContext {
    fn mode(&self) -> cmdforge_core::ExecutionMode {
        cmdforge_core::ExecutionMode::Generator
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.base.get_variable(name)
    }

    fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.base.set_variable(name, value);
    }

    fn get_env(&self, name: &str) -> Option<&str> {
        self.base.get_env(name)
    }

    fn working_dir(&self) -> Option<&Path> {
        self.base.working_dir.as_deref()
    }

    fn cancel_token(&self) -> &CancelToken {
        &self.base.cancel
    }

    fn next_shell_id(&self) -> u64 {
        self.base.next_shell_id()
    }
}

/// Adds `GenerateShellPlan` capability: builds a description rather than
/// running or emitting anything.
pub struct PlanContext {
    base: BaseContext,
}

impl PlanContext {
    pub fn new(env: CapturedEnvironment) -> Self {
        Self {
            base: BaseContext::new(env),
        }
    }

    pub fn with_working_dir(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            base: self.base.with_working_dir(path),
        }
    }

    pub fn with_cancel(&self) -> (Self, CancelToken) {
        let (base, token) = self.base.with_cancel();
        (Self { base }, token)
    }

    pub fn with_timeout(&self, duration: Duration) -> (Self, CancelToken) {
        let (base, token) = self.base.with_timeout(duration);
        (Self { base }, token)
    }

    pub fn child(&self, child_id: u64) -> Self {
        Self {
            base: self.base.child(child_id),
        }
    }
}

impl ExecutionContext for PlanContext {
    fn mode(&self) -> cmdforge_core::ExecutionMode {
        cmdforge_core::ExecutionMode::Plan
    }

    fn get_variable(&self, name: &str) -> Option<String> {
        self.base.get_variable(name)
    }

    fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.base.set_variable(name, value);
    }

    fn get_env(&self, name: &str) -> Option<&str> {
        self.base.get_env(name)
    }

    fn working_dir(&self) -> Option<&Path> {
        self.base.working_dir.as_deref()
    }

    fn cancel_token(&self) -> &CancelToken {
        &self.base.cancel
    }

    fn next_shell_id(&self) -> u64 {
        self.base.next_shell_id()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
