// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cmdforge-shell: the shell-fragment compiler's chain parser.
//!
//! Turns a command's [`cmdforge_core::CommandContent::Shell`] parts into a
//! verified, ordered [`Chain`] of [`ChainElement`]s. Parsing is pure and
//! side-effect-free — driving the chain through the interpreter, generator,
//! or plan strategy is the engine crate's job.

pub mod chain;
pub mod error;
pub mod span;

pub use chain::{parse_chain, Chain, ChainElement, ChainOperator, TextFragment};
pub use error::ChainError;
pub use span::{context_snippet, diagnostic_context, locate_span, Span};
