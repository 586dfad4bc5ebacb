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

//! Semantic analyzer module for the Cinder compiler.
//!
//! This module performs semantic analysis on the AST:
//! - Symbol resolution and frame slot assignment
//! - Type checking and implicit casts
//! - Constant folding
//! - Control-flow checks (unreachable code, loops that never repeat or never end)
//! - Budget counter wiring for loops
//!
//! Analysis consumes the tree and returns the annotated replacement. The
//! first error aborts compilation.

mod builtins;
mod context;
mod control_flow;
mod expressions;
mod operators;
mod scope;
mod statements;
mod symbol;
mod symbol_table;
mod type_check;

pub use builtins::{signature, Param, Signature};
pub use context::StatementContext;
pub use symbol::Symbol;
pub use symbol_table::{SymbolTable, LOOP_COUNTER};

use tracing::debug;

use crate::ast::Program;
use crate::error::{CompileError, ErrorCode, Result};
use crate::settings::CompilerSettings;
use statements::StatementAnalyzer;

/// The semantic analyzer for one routine.
#[derive(Debug)]
pub struct Analyzer {
    /// Scopes of the routine being analyzed.
    pub(crate) symbols: SymbolTable,
}

impl Analyzer {
    /// Create an analyzer; the budget counter is reserved when `settings` enable it.
    pub fn new(settings: &CompilerSettings) -> Self {
        Self {
            symbols: SymbolTable::new(settings.budget_enabled()),
        }
    }

    /// Analyze a configured program.
    pub fn analyze_program(&mut self, program: Program) -> Result<Program> {
        if program.statements.is_empty() {
            return Err(CompileError::new(
                ErrorCode::EmptyScript,
                "Cannot compile an empty script",
                program.span,
            ));
        }

        let (statements, flow) =
            self.analyze_statements(program.statements, StatementContext::routine())?;
        let frame_size = self.symbols.frame_size();
        let loop_counter = self.symbols.get_reserved(LOOP_COUNTER).map(|s| s.slot);

        debug!(
            frame_size,
            counter = ?loop_counter,
            statement_count = flow.statement_count,
            "analyzed script"
        );

        Ok(Program {
            statements,
            flow,
            frame_size,
            loop_counter,
            ..program
        })
    }
}

/// Analyze a configured program, using the settings stored on it.
pub fn analyze(program: Program) -> Result<Program> {
    let mut analyzer = Analyzer::new(&program.settings);
    analyzer.analyze_program(program)
}
