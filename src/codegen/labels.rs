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

//! Label and jump management for code generation.
//!
//! This module handles:
//! - Labels, created before their position is known
//! - Pending jumps, patched once every label is defined
//! - Loop targets for break/continue
//! - LabelManager trait for label creation and resolution

use tracing::trace;

use super::instructions::Instruction;
use super::CodeGenerator;
use crate::error::{CompileError, Span};

/// A jump target inside the chunk being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);

impl Label {
    pub fn id(&self) -> usize {
        self.0
    }
}

/// A jump whose target label is not resolved yet.
#[derive(Debug, Clone)]
pub struct PendingJump {
    /// Index of the jump instruction.
    pub code_offset: usize,
    /// Label this jump should jump to.
    pub target_label: Label,
}

/// Where `continue` and `break` of the innermost loop go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    /// Target of `continue`.
    pub begin: Label,
    /// Target of `break`.
    pub end: Label,
}

/// Extension trait for label management.
pub trait LabelManager {
    /// Create a new, undefined label. `prefix` only names it in traces.
    fn make_label(&mut self, prefix: &str) -> Label;

    /// Define a label at the next instruction index.
    fn define_label(&mut self, label: Label);

    /// Patch all pending jumps with their label positions.
    fn resolve_labels(&mut self) -> Result<(), CompileError>;
}

impl LabelManager for CodeGenerator {
    fn make_label(&mut self, prefix: &str) -> Label {
        let label = Label(self.labels.len());
        self.labels.push(None);
        trace!(label = label.0, prefix, "created label");
        label
    }

    fn define_label(&mut self, label: Label) {
        let position = self.code.len();
        if let Some(entry) = self.labels.get_mut(label.0) {
            *entry = Some(position);
        }
    }

    fn resolve_labels(&mut self) -> Result<(), CompileError> {
        for jump in &self.pending_jumps {
            let target = self
                .labels
                .get(jump.target_label.0)
                .copied()
                .flatten()
                .ok_or_else(|| {
                    CompileError::illegal_tree(
                        format!("Jump to undefined label {}", jump.target_label.0),
                        Span::default(),
                    )
                })?;

            match self.code.get_mut(jump.code_offset) {
                Some(Instruction::Jump(operand))
                | Some(Instruction::JumpIfFalse(operand))
                | Some(Instruction::JumpIfTrue(operand)) => *operand = target,
                other => {
                    return Err(CompileError::illegal_tree(
                        format!("Pending jump points at {:?}", other),
                        Span::default(),
                    ))
                }
            }
        }

        self.pending_jumps.clear();
        Ok(())
    }
}
