// Cinder - A sandboxed scripting language compiler with budgeted loops
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Runner module: executing compiled chunks and watching scripts.
//!
//! This module provides functionality to:
//! - Run a `Chunk` on the stack machine, enforcing the loop budget
//! - Watch a script file and re-run it on changes

mod value;
mod vm;
mod watcher;

pub use value::Value;
pub use vm::Vm;
pub use watcher::SourceWatcher;

use thiserror::Error;

/// Errors raised while a script runs.
///
/// A raise aborts the current invocation; nothing after it executes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// The loop budget of this invocation is used up.
    #[error("Resource budget exceeded: loop counter limit of {limit} reached")]
    ResourceBudgetExceeded { limit: u32 },

    /// Integral division or remainder by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// The operand stack was empty; the chunk is malformed.
    #[error("Stack underflow at {pc:04}")]
    StackUnderflow { pc: usize },

    /// An instruction met operands it cannot handle; the chunk is malformed.
    #[error("Invalid operand at {pc:04}: {message}")]
    InvalidOperand { pc: usize, message: String },
}

/// Errors that can occur while watching scripts.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Error watching files.
    #[error("File watch error: {0}")]
    WatchError(String),
}

/// The outcome of one successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// The value returned by the script, `Value::Void` if none.
    pub value: Value,
    /// Lines printed by `print`, in order.
    pub output: Vec<String>,
}
