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

//! Emit helper methods for code generation.
//!
//! This module provides the low-level emission utilities the statement and
//! expression emitters build on:
//! - Plain instruction emission
//! - Jumps with label targets
//! - Discarding values and charging the loop budget

use super::instructions::Instruction;
use super::labels::{Label, PendingJump};
use super::CodeGenerator;
use crate::ast::{Slot, Type};

/// Extension trait for low-level code emission.
pub trait EmitHelpers {
    /// Append an instruction.
    fn emit(&mut self, instruction: Instruction);

    /// Emit an unconditional jump to `label`.
    fn emit_jump(&mut self, label: Label);

    /// Emit a jump to `label` taken when the popped boolean is false.
    fn emit_jump_if_false(&mut self, label: Label);

    /// Emit a jump to `label` taken when the popped boolean is true.
    fn emit_jump_if_true(&mut self, label: Label);

    /// Drop a value of `value_type` from the stack.
    fn emit_discard(&mut self, value_type: Type);

    /// Charge `cost` against the budget counter in `slot`.
    fn emit_loop_counter(&mut self, slot: Slot, cost: u32);
}

impl CodeGenerator {
    fn emit_pending(&mut self, instruction: Instruction, label: Label) {
        let offset = self.code.len();
        self.code.push(instruction);
        self.pending_jumps.push(PendingJump {
            code_offset: offset,
            target_label: label,
        });
    }
}

impl EmitHelpers for CodeGenerator {
    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    fn emit_jump(&mut self, label: Label) {
        self.emit_pending(Instruction::Jump(0), label); // Placeholder
    }

    fn emit_jump_if_false(&mut self, label: Label) {
        self.emit_pending(Instruction::JumpIfFalse(0), label);
    }

    fn emit_jump_if_true(&mut self, label: Label) {
        self.emit_pending(Instruction::JumpIfTrue(0), label);
    }

    fn emit_discard(&mut self, value_type: Type) {
        for _ in 0..value_type.stack_size() {
            self.emit(Instruction::Pop);
        }
    }

    fn emit_loop_counter(&mut self, slot: Slot, cost: u32) {
        self.emit(Instruction::LoopCounter { slot, cost });
    }
}
