// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cmdforge-core: the data model and decorator protocol shared by every
//! other cmdforge crate. No execution logic lives here — only the types
//! an external parser produces, the schema decorators validate against,
//! and the mode-tagged results that flow back out.

pub mod clock;
pub mod content;
pub mod decorator;
pub mod env;
pub mod error;
pub mod id;
pub mod program;
pub mod result;
pub mod time_fmt;
pub mod value;

pub use clock::{Clock, FakeClock, SystemClock};
pub use content::{CommandContent, DecoratorRef, NamedParameter, ParamValue, PatternBranch, ShellPart};
pub use decorator::{
    is_safe_path, validate_params, validate_pattern, ParamSchema, ParamType, PatternSchema, SchemaError,
};
pub use env::{CapturedEnvironment, CI_INDICATOR_VARS};
pub use error::{validate_program, ModelError};
pub use id::{AtomicIdGen, IdGen, ShortId};
pub use program::{Command, Program, VarGroup, Variable};
pub use result::{CommandResult, ExecutionData, ExecutionMode, ExecutionResult, PlanElement, PlanElementKind};
pub use time_fmt::format_duration;
pub use value::Literal;
