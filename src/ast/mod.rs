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

//! Abstract Syntax Tree (AST) definitions for the Cinder compiler.
//!
//! This module defines the data structures that represent a parsed script.
//! Nodes start out bare from the parser and are annotated in place by the
//! analyzer; see [`Node`] for the phase order.

mod expr;
mod node;
mod stmt;
mod types;

pub use expr::*;
pub use node::Node;
pub use stmt::*;
pub use types::*;

use crate::error::Span;
use crate::settings::CompilerSettings;

/// Index of a variable in the routine frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub usize);

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete script. The script body is the only routine.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
    pub settings: CompilerSettings,
    pub flow: ControlFlow,
    /// Number of frame slots the routine needs, set by analysis.
    pub frame_size: usize,
    /// Budget counter slot reserved by analysis.
    pub loop_counter: Option<Slot>,
}

impl Program {
    /// Create a new program from parsed statements.
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self {
            statements,
            span,
            settings: CompilerSettings::default(),
            flow: ControlFlow::default(),
            frame_size: 0,
            loop_counter: None,
        }
    }
}

/// A block of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements in this block.
    pub statements: Vec<Statement>,
    /// The source span of this block.
    pub span: Span,
    pub flow: ControlFlow,
}

impl Block {
    /// Create a new block.
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self {
            statements,
            span,
            flow: ControlFlow::default(),
        }
    }

    /// Create an empty block.
    pub fn empty(span: Span) -> Self {
        Self::new(Vec::new(), span)
    }

    /// Check if this block is empty.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
