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

//! Expression code generation.
//!
//! Expressions arrive fully analyzed: every node has its type and slot, and
//! implicit conversions are explicit cast nodes. A node missing one of these
//! is an internal error, not a script error.

use super::emit::EmitHelpers;
use super::instructions::Instruction;
use super::labels::LabelManager;
use super::CodeGenerator;
use crate::ast::{
    AssignOp, BinaryOp, Builtin, Constant, Expr, ExprKind, IncDecOp, Slot, Type, UnaryOp,
};
use crate::error::{CompileError, Result, Span};

/// Extension trait for expression code generation.
pub trait ExpressionEmitter {
    /// Generate code leaving the expression's value (if any) on the stack.
    fn generate_expression(&mut self, expr: &Expr) -> Result<()>;
}

fn missing(what: &str, expr: &Expr) -> CompileError {
    CompileError::illegal_tree(format!("Expression '{}' has no {}", expr, what), expr.span)
}

fn resolved<T: Copy>(value: Option<T>, what: &str, expr: &Expr) -> Result<T> {
    value.ok_or_else(|| missing(what, expr))
}

fn one(value_type: Type, span: Span) -> Result<Constant> {
    match value_type {
        Type::Int => Ok(Constant::Int(1)),
        Type::Long => Ok(Constant::Long(1)),
        Type::Double => Ok(Constant::Double(1.0)),
        other => Err(CompileError::illegal_tree(
            format!("Increment of a {} variable", other),
            span,
        )),
    }
}

impl ExpressionEmitter for CodeGenerator {
    fn generate_expression(&mut self, expr: &Expr) -> Result<()> {
        match &expr.kind {
            ExprKind::Literal(constant) => {
                self.emit(Instruction::PushConst(*constant));
            }

            ExprKind::Variable { slot, .. } => {
                self.emit(Instruction::Load(resolved(*slot, "slot", expr)?));
            }

            ExprKind::Assign {
                op,
                value,
                slot,
                target_type,
                operation_type,
                ..
            } => {
                let slot = resolved(*slot, "slot", expr)?;
                let target_type = resolved(*target_type, "target type", expr)?;
                self.generate_assign(expr, *op, value, slot, target_type, *operation_type)?;
            }

            ExprKind::IncDec {
                op,
                prefix,
                slot,
                target_type,
                ..
            } => {
                let slot = resolved(*slot, "slot", expr)?;
                let target_type = resolved(*target_type, "target type", expr)?;
                self.generate_inc_dec(expr, *op, *prefix, slot, target_type)?;
            }

            ExprKind::Binary {
                left,
                op,
                right,
                operand_type,
            } => match op {
                BinaryOp::And | BinaryOp::Or => self.generate_logical(*op, left, right)?,
                _ => {
                    let operand_type = resolved(*operand_type, "operand type", expr)?;
                    self.generate_expression(left)?;
                    self.generate_expression(right)?;
                    self.emit(Instruction::Binary {
                        op: *op,
                        operand_type,
                    });
                }
            },

            ExprKind::Unary {
                op,
                operand,
                operand_type,
            } => {
                self.generate_expression(operand)?;
                match op {
                    UnaryOp::Not => self.emit(Instruction::Not),
                    UnaryOp::Negate => {
                        let operand_type = resolved(*operand_type, "operand type", expr)?;
                        self.emit(Instruction::Neg(operand_type));
                    }
                    // Analysis replaces unary plus by its operand.
                    UnaryOp::Plus => return Err(missing("replacement for unary '+'", expr)),
                }
            }

            ExprKind::Call { args, builtin, .. } => {
                let builtin: Builtin = resolved(*builtin, "resolved function", expr)?;
                for arg in args {
                    self.generate_expression(arg)?;
                }
                self.emit(Instruction::CallBuiltin(builtin));
            }

            ExprKind::Cast { target, expr: inner, .. } => {
                let from = resolved(inner.actual, "type", inner)?;
                self.generate_expression(inner)?;
                if from != *target {
                    self.emit(Instruction::Convert { from, to: *target });
                }
            }
        }

        Ok(())
    }
}

impl CodeGenerator {
    fn generate_assign(
        &mut self,
        expr: &Expr,
        op: AssignOp,
        value: &Expr,
        slot: Slot,
        target_type: Type,
        operation_type: Option<Type>,
    ) -> Result<()> {
        match op.binary_op() {
            None => self.generate_expression(value)?,
            Some(binary) => {
                let operation_type = resolved(operation_type, "operation type", expr)?;
                self.emit(Instruction::Load(slot));
                if target_type != operation_type {
                    self.emit(Instruction::Convert {
                        from: target_type,
                        to: operation_type,
                    });
                }
                self.generate_expression(value)?;
                self.emit(Instruction::Binary {
                    op: binary,
                    operand_type: operation_type,
                });
                if target_type != operation_type {
                    self.emit(Instruction::Convert {
                        from: operation_type,
                        to: target_type,
                    });
                }
            }
        }

        if expr.read {
            self.emit(Instruction::Dup);
        }
        self.emit(Instruction::Store(slot));
        Ok(())
    }

    fn generate_inc_dec(
        &mut self,
        expr: &Expr,
        op: IncDecOp,
        prefix: bool,
        slot: Slot,
        target_type: Type,
    ) -> Result<()> {
        let binary = match op {
            IncDecOp::Increment => BinaryOp::Add,
            IncDecOp::Decrement => BinaryOp::Sub,
        };

        self.emit(Instruction::Load(slot));
        // Postfix leaves the old value below the updated one.
        if expr.read && !prefix {
            self.emit(Instruction::Dup);
        }
        self.emit(Instruction::PushConst(one(target_type, expr.span)?));
        self.emit(Instruction::Binary {
            op: binary,
            operand_type: target_type,
        });
        if expr.read && prefix {
            self.emit(Instruction::Dup);
        }
        self.emit(Instruction::Store(slot));
        Ok(())
    }

    /// Short-circuit `&&` and `||`: the left value stays when it decides.
    fn generate_logical(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<()> {
        let end = self.make_label("logical_end");

        self.generate_expression(left)?;
        self.emit(Instruction::Dup);
        if op == BinaryOp::And {
            self.emit_jump_if_false(end);
        } else {
            self.emit_jump_if_true(end);
        }
        self.emit(Instruction::Pop);
        self.generate_expression(right)?;
        self.define_label(end);
        Ok(())
    }
}
