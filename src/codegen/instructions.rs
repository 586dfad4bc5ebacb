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

//! Instruction set of the Cinder stack machine.
//!
//! Every value occupies one operand stack entry. Typed instructions carry the
//! operand type chosen by analysis, so the VM never has to infer one.
//! Jump targets are instruction indices.

use std::fmt;

use crate::ast::{BinaryOp, Builtin, Constant, Slot, Type};

/// A single stack machine instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Push a constant.
    PushConst(Constant),
    /// Push the value of a frame slot.
    Load(Slot),
    /// Pop into a frame slot.
    Store(Slot),
    /// Duplicate the top of the stack.
    Dup,
    /// Drop the top of the stack.
    Pop,
    /// Pop two operands of `operand_type`, push the result of `op`.
    ///
    /// `&&` and `||` are never encoded this way; they compile to jumps.
    Binary { op: BinaryOp, operand_type: Type },
    /// Arithmetic negation.
    Neg(Type),
    /// Boolean negation.
    Not,
    /// Numeric conversion of the top of the stack.
    Convert { from: Type, to: Type },
    /// Unconditional jump.
    Jump(usize),
    /// Pop a boolean, jump when it is false.
    JumpIfFalse(usize),
    /// Pop a boolean, jump when it is true.
    JumpIfTrue(usize),
    /// Charge `cost` against the budget counter in `slot`.
    LoopCounter { slot: Slot, cost: u32 },
    /// Call a built-in; arguments are on the stack in order.
    CallBuiltin(Builtin),
    /// Pop the result and leave the script.
    Return,
    /// Leave the script without a result.
    ReturnVoid,
}

/// Mnemonic of a non-logical binary operator.
fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "ADD",
        BinaryOp::Sub => "SUB",
        BinaryOp::Mul => "MUL",
        BinaryOp::Div => "DIV",
        BinaryOp::Mod => "REM",
        BinaryOp::Equal => "EQ",
        BinaryOp::NotEqual => "NE",
        BinaryOp::Less => "LT",
        BinaryOp::Greater => "GT",
        BinaryOp::LessEqual => "LE",
        BinaryOp::GreaterEqual => "GE",
        BinaryOp::And => "AND",
        BinaryOp::Or => "OR",
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::PushConst(value) => write!(f, "PUSH {}", value),
            Instruction::Load(slot) => write!(f, "LOAD {}", slot),
            Instruction::Store(slot) => write!(f, "STORE {}", slot),
            Instruction::Dup => f.write_str("DUP"),
            Instruction::Pop => f.write_str("POP"),
            Instruction::Binary { op, operand_type } => {
                write!(f, "{} {}", binary_mnemonic(*op), operand_type)
            }
            Instruction::Neg(ty) => write!(f, "NEG {}", ty),
            Instruction::Not => f.write_str("NOT"),
            Instruction::Convert { from, to } => write!(f, "CONVERT {} -> {}", from, to),
            Instruction::Jump(target) => write!(f, "JUMP {:04}", target),
            Instruction::JumpIfFalse(target) => write!(f, "JUMP_IF_FALSE {:04}", target),
            Instruction::JumpIfTrue(target) => write!(f, "JUMP_IF_TRUE {:04}", target),
            Instruction::LoopCounter { slot, cost } => write!(f, "LOOP_COUNTER {} {}", slot, cost),
            Instruction::CallBuiltin(builtin) => write!(f, "CALL {}", builtin.name()),
            Instruction::Return => f.write_str("RETURN"),
            Instruction::ReturnVoid => f.write_str("RETURN_VOID"),
        }
    }
}

/// A compiled script, ready for the VM.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub instructions: Vec<Instruction>,
    /// Number of frame slots the script needs.
    pub frame_size: usize,
    /// Slot of the budget counter, if budgeting is enabled.
    pub loop_counter: Option<Slot>,
    /// Budget the prologue stores into the counter.
    pub max_loop_counter: u32,
}

impl Chunk {
    /// Render one instruction per line, prefixed by its index.
    pub fn disassemble(&self) -> String {
        self.to_string()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:04} {}", index, instruction)?;
        }
        Ok(())
    }
}
