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

//! The stack machine executing compiled chunks.
//!
//! Each call to [`Vm::run`] is one invocation: a fresh frame, a fresh operand
//! stack and fresh output. A runtime error ends the invocation on the spot,
//! so nothing after the failing instruction is observable.

use tracing::{debug, trace};

use super::value::Value;
use super::RuntimeError;
use crate::ast::{BinaryOp, Builtin, Slot, Type};
use crate::codegen::{Chunk, Instruction};

/// The Cinder virtual machine.
#[derive(Debug, Default)]
pub struct Vm {
    stack: Vec<Value>,
    frame: Vec<Value>,
    output: Vec<String>,
}

impl Vm {
    /// Create a new VM.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines printed by the last invocation, up to where it stopped.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Take the printed lines out of the VM.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Execute a chunk from its first instruction.
    pub fn run(&mut self, chunk: &Chunk) -> Result<Value, RuntimeError> {
        self.stack.clear();
        self.output.clear();
        self.frame = vec![Value::Void; chunk.frame_size];

        let result = self.execute(chunk);
        match &result {
            Ok(value) => debug!(%value, lines = self.output.len(), "invocation finished"),
            Err(error) => debug!(%error, lines = self.output.len(), "invocation aborted"),
        }
        result
    }

    fn execute(&mut self, chunk: &Chunk) -> Result<Value, RuntimeError> {
        let mut pc = 0;
        loop {
            let Some(instruction) = chunk.instructions.get(pc) else {
                return Ok(Value::Void);
            };
            let at = pc;
            pc += 1;

            match instruction {
                Instruction::PushConst(constant) => self.stack.push(Value::from(*constant)),
                Instruction::Load(slot) => {
                    let value = self.slot(*slot, at)?;
                    self.stack.push(value);
                }
                Instruction::Store(slot) => {
                    let value = self.pop(at)?;
                    *self.slot_mut(*slot, at)? = value;
                }
                Instruction::Dup => {
                    let value = self.peek(at)?;
                    self.stack.push(value);
                }
                Instruction::Pop => {
                    self.pop(at)?;
                }
                Instruction::Binary { op, operand_type } => {
                    let right = self.pop(at)?;
                    let left = self.pop(at)?;
                    let value = binary(*op, *operand_type, left, right, at)?;
                    self.stack.push(value);
                }
                Instruction::Neg(operand_type) => {
                    let value = match self.pop(at)? {
                        Value::Int(v) => Value::Int(v.wrapping_neg()),
                        Value::Long(v) => Value::Long(v.wrapping_neg()),
                        Value::Double(v) => Value::Double(-v),
                        other => {
                            return Err(invalid(at, format!("NEG {} of {:?}", operand_type, other)))
                        }
                    };
                    self.stack.push(value);
                }
                Instruction::Not => {
                    let value = self.pop_bool(at)?;
                    self.stack.push(Value::Bool(!value));
                }
                Instruction::Convert { from, to } => {
                    let value = self.pop(at)?;
                    let converted = value
                        .convert(*to)
                        .filter(|_| value.value_type() == *from)
                        .ok_or_else(|| {
                            invalid(at, format!("CONVERT {} -> {} of {:?}", from, to, value))
                        })?;
                    self.stack.push(converted);
                }
                Instruction::Jump(target) => pc = *target,
                Instruction::JumpIfFalse(target) => {
                    if !self.pop_bool(at)? {
                        pc = *target;
                    }
                }
                Instruction::JumpIfTrue(target) => {
                    if self.pop_bool(at)? {
                        pc = *target;
                    }
                }
                Instruction::LoopCounter { slot, cost } => {
                    self.charge(*slot, *cost, chunk.max_loop_counter, at)?;
                }
                Instruction::CallBuiltin(builtin) => self.call(*builtin, at)?,
                Instruction::Return => return self.pop(at),
                Instruction::ReturnVoid => return Ok(Value::Void),
            }
        }
    }

    fn pop(&mut self, at: usize) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow { pc: at })
    }

    fn peek(&self, at: usize) -> Result<Value, RuntimeError> {
        self.stack.last().copied().ok_or(RuntimeError::StackUnderflow { pc: at })
    }

    fn pop_bool(&mut self, at: usize) -> Result<bool, RuntimeError> {
        match self.pop(at)? {
            Value::Bool(value) => Ok(value),
            other => Err(invalid(at, format!("expected boolean, found {:?}", other))),
        }
    }

    fn pop_long(&mut self, at: usize) -> Result<i64, RuntimeError> {
        match self.pop(at)? {
            Value::Long(value) => Ok(value),
            other => Err(invalid(at, format!("expected long, found {:?}", other))),
        }
    }

    fn slot(&self, slot: Slot, at: usize) -> Result<Value, RuntimeError> {
        self.frame
            .get(slot.0)
            .copied()
            .ok_or_else(|| invalid(at, format!("slot {} outside frame", slot)))
    }

    fn slot_mut(&mut self, slot: Slot, at: usize) -> Result<&mut Value, RuntimeError> {
        self.frame
            .get_mut(slot.0)
            .ok_or_else(|| invalid(at, format!("slot {} outside frame", slot)))
    }

    /// Subtract `cost` from the budget counter; a negative result aborts.
    fn charge(
        &mut self,
        slot: Slot,
        cost: u32,
        limit: u32,
        at: usize,
    ) -> Result<(), RuntimeError> {
        let counter = self.slot_mut(slot, at)?;
        let Value::Long(remaining) = *counter else {
            return Err(invalid(at, format!("budget counter holds {:?}", counter)));
        };

        let remaining = remaining - i64::from(cost);
        if remaining < 0 {
            return Err(RuntimeError::ResourceBudgetExceeded { limit });
        }
        *counter = Value::Long(remaining);
        trace!(remaining, cost, "charged loop budget");
        Ok(())
    }

    fn call(&mut self, builtin: Builtin, at: usize) -> Result<(), RuntimeError> {
        match builtin {
            Builtin::Print => {
                let value = self.pop(at)?;
                self.output.push(value.to_string());
            }
            Builtin::Min | Builtin::Max => {
                let right = self.pop_long(at)?;
                let left = self.pop_long(at)?;
                let value = if builtin == Builtin::Min {
                    left.min(right)
                } else {
                    left.max(right)
                };
                self.stack.push(Value::Long(value));
            }
            Builtin::Abs => match self.pop(at)? {
                Value::Double(value) => self.stack.push(Value::Double(value.abs())),
                other => return Err(invalid(at, format!("abs of {:?}", other))),
            },
        }
        Ok(())
    }
}

fn invalid(pc: usize, message: String) -> RuntimeError {
    RuntimeError::InvalidOperand { pc, message }
}

fn binary(
    op: BinaryOp,
    operand_type: Type,
    left: Value,
    right: Value,
    at: usize,
) -> Result<Value, RuntimeError> {
    use std::cmp::Ordering;

    fn compare(op: BinaryOp, ordering: Option<Ordering>) -> Option<bool> {
        let ordering = ordering?;
        Some(match op {
            BinaryOp::Equal => ordering == Ordering::Equal,
            BinaryOp::NotEqual => ordering != Ordering::Equal,
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::Greater => ordering == Ordering::Greater,
            BinaryOp::LessEqual => ordering != Ordering::Greater,
            BinaryOp::GreaterEqual => ordering != Ordering::Less,
            _ => return None,
        })
    }

    let value = match (left, right) {
        (Value::Int(l), Value::Int(r)) => match op {
            BinaryOp::Add => Some(Value::Int(l.wrapping_add(r))),
            BinaryOp::Sub => Some(Value::Int(l.wrapping_sub(r))),
            BinaryOp::Mul => Some(Value::Int(l.wrapping_mul(r))),
            BinaryOp::Div | BinaryOp::Mod if r == 0 => return Err(RuntimeError::DivisionByZero),
            BinaryOp::Div => Some(Value::Int(l.wrapping_div(r))),
            BinaryOp::Mod => Some(Value::Int(l.wrapping_rem(r))),
            _ => compare(op, Some(l.cmp(&r))).map(Value::Bool),
        },
        (Value::Long(l), Value::Long(r)) => match op {
            BinaryOp::Add => Some(Value::Long(l.wrapping_add(r))),
            BinaryOp::Sub => Some(Value::Long(l.wrapping_sub(r))),
            BinaryOp::Mul => Some(Value::Long(l.wrapping_mul(r))),
            BinaryOp::Div | BinaryOp::Mod if r == 0 => return Err(RuntimeError::DivisionByZero),
            BinaryOp::Div => Some(Value::Long(l.wrapping_div(r))),
            BinaryOp::Mod => Some(Value::Long(l.wrapping_rem(r))),
            _ => compare(op, Some(l.cmp(&r))).map(Value::Bool),
        },
        (Value::Double(l), Value::Double(r)) => match op {
            BinaryOp::Add => Some(Value::Double(l + r)),
            BinaryOp::Sub => Some(Value::Double(l - r)),
            BinaryOp::Mul => Some(Value::Double(l * r)),
            BinaryOp::Div => Some(Value::Double(l / r)),
            BinaryOp::Mod => Some(Value::Double(l % r)),
            // NaN compares unequal to everything.
            BinaryOp::NotEqual => Some(Value::Bool(l != r)),
            _ if op.is_comparison() => {
                Some(Value::Bool(compare(op, l.partial_cmp(&r)).unwrap_or(false)))
            }
            _ => None,
        },
        (Value::Bool(l), Value::Bool(r)) => match op {
            BinaryOp::Equal => Some(Value::Bool(l == r)),
            BinaryOp::NotEqual => Some(Value::Bool(l != r)),
            _ => None,
        },
        _ => None,
    };

    value.filter(|_| left.value_type() == operand_type).ok_or_else(|| {
        invalid(
            at,
            format!("{} {} on {:?} and {:?}", op, operand_type, left, right),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Constant;

    fn chunk(instructions: Vec<Instruction>, frame_size: usize) -> Chunk {
        Chunk {
            instructions,
            frame_size,
            loop_counter: None,
            max_loop_counter: 0,
        }
    }

    #[test]
    fn test_arithmetic_and_return() {
        let code = chunk(
            vec![
                Instruction::PushConst(Constant::Long(40)),
                Instruction::PushConst(Constant::Long(2)),
                Instruction::Binary {
                    op: BinaryOp::Add,
                    operand_type: Type::Long,
                },
                Instruction::Return,
            ],
            0,
        );
        assert_eq!(Vm::new().run(&code).unwrap(), Value::Long(42));
    }

    #[test]
    fn test_runtime_division_by_zero() {
        let code = chunk(
            vec![
                Instruction::PushConst(Constant::Int(1)),
                Instruction::PushConst(Constant::Int(0)),
                Instruction::Binary {
                    op: BinaryOp::Div,
                    operand_type: Type::Int,
                },
                Instruction::Return,
            ],
            0,
        );
        assert_eq!(Vm::new().run(&code).unwrap_err(), RuntimeError::DivisionByZero);
    }

    #[test]
    fn test_budget_counter_goes_to_zero_then_fails() {
        let code = Chunk {
            instructions: vec![
                Instruction::PushConst(Constant::Long(3)),
                Instruction::Store(Slot(0)),
                Instruction::LoopCounter {
                    slot: Slot(0),
                    cost: 3,
                },
                Instruction::LoopCounter {
                    slot: Slot(0),
                    cost: 1,
                },
                Instruction::ReturnVoid,
            ],
            frame_size: 1,
            loop_counter: Some(Slot(0)),
            max_loop_counter: 3,
        };
        assert_eq!(
            Vm::new().run(&code).unwrap_err(),
            RuntimeError::ResourceBudgetExceeded { limit: 3 }
        );
    }

    #[test]
    fn test_print_collects_output() {
        let code = chunk(
            vec![
                Instruction::PushConst(Constant::Double(1.5)),
                Instruction::CallBuiltin(Builtin::Print),
                Instruction::PushConst(Constant::Bool(true)),
                Instruction::CallBuiltin(Builtin::Print),
                Instruction::ReturnVoid,
            ],
            0,
        );
        let mut vm = Vm::new();
        assert_eq!(vm.run(&code).unwrap(), Value::Void);
        assert_eq!(vm.output(), &["1.5".to_string(), "true".to_string()]);
    }

    #[test]
    fn test_stack_underflow() {
        let code = chunk(vec![Instruction::Pop], 0);
        assert_eq!(
            Vm::new().run(&code).unwrap_err(),
            RuntimeError::StackUnderflow { pc: 0 }
        );
    }

    #[test]
    fn test_falling_off_the_end_returns_void() {
        let code = chunk(vec![Instruction::PushConst(Constant::Int(1))], 0);
        assert_eq!(Vm::new().run(&code).unwrap(), Value::Void);
    }

    #[test]
    fn test_mismatched_operand_type() {
        let code = chunk(
            vec![
                Instruction::PushConst(Constant::Int(1)),
                Instruction::PushConst(Constant::Int(2)),
                Instruction::Binary {
                    op: BinaryOp::Add,
                    operand_type: Type::Long,
                },
            ],
            0,
        );
        assert!(matches!(
            Vm::new().run(&code).unwrap_err(),
            RuntimeError::InvalidOperand { pc: 2, .. }
        ));
    }
}
