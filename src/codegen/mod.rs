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

//! Code generator module for the Cinder compiler.
//!
//! This module generates stack machine code from an analyzed AST.
//! The script body becomes a single routine:
//! - A prologue storing the loop budget into the counter slot
//! - The statements in order
//! - A final `RETURN_VOID` when the script can fall off its end
//!
//! The code generator is split into several submodules:
//! - `instructions`: Instruction set and the `Chunk` container
//! - `labels`: Label creation and jump resolution
//! - `emit`: Low-level emission helpers
//! - `expressions`: Expression code generation
//! - `statements`: Declarations, expression statements and blocks
//! - `control_flow`: if/while/do/for/break/continue/return

mod control_flow;
mod emit;
mod expressions;
mod instructions;
mod labels;
mod statements;

pub use control_flow::ControlFlowEmitter;
pub use emit::EmitHelpers;
pub use expressions::ExpressionEmitter;
pub use instructions::{Chunk, Instruction};
pub use labels::{Label, LabelManager, LoopTargets, PendingJump};
pub use statements::StatementEmitter;

use tracing::debug;

use crate::ast::{Constant, Program};
use crate::error::CompileError;

/// Code generator state for one script.
#[derive(Debug, Default)]
pub struct CodeGenerator {
    /// The generated instructions.
    code: Vec<Instruction>,
    /// Label positions, indexed by label id (`None` until defined).
    labels: Vec<Option<usize>>,
    /// Jumps to patch once all labels are defined.
    pending_jumps: Vec<PendingJump>,
}

impl CodeGenerator {
    /// Create a new code generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate code for an analyzed program.
    pub fn generate(mut self, program: &Program) -> Result<Chunk, CompileError> {
        let max_loop_counter = program.settings.max_loop_counter();

        if let Some(slot) = program.loop_counter {
            self.emit(Instruction::PushConst(Constant::Long(i64::from(
                max_loop_counter,
            ))));
            self.emit(Instruction::Store(slot));
        }

        for stmt in &program.statements {
            self.generate_statement(stmt, None)?;
        }

        if !program.flow.all_escape {
            self.emit(Instruction::ReturnVoid);
        }

        self.resolve_labels()?;

        debug!(
            instructions = self.code.len(),
            labels = self.labels.len(),
            frame_size = program.frame_size,
            "generated chunk"
        );

        Ok(Chunk {
            instructions: self.code,
            frame_size: program.frame_size,
            loop_counter: program.loop_counter,
            max_loop_counter,
        })
    }
}

/// Generate code for an analyzed program.
pub fn generate(program: &Program) -> Result<Chunk, CompileError> {
    CodeGenerator::new().generate(program)
}
