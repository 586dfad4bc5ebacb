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

//! Operator checking for the semantic analyzer.
//!
//! This module decides which type the operands of an operator are converted
//! to before the operation runs:
//! - Arithmetic operators (+, -, *, /, %) promote to the wider numeric type
//! - Equality (==, !=) works on two booleans or two promoted numbers
//! - Ordering (<, >, <=, >=) works on promoted numbers
//! - Logical operators (&&, ||, !) work on booleans

use super::Analyzer;
use crate::ast::{BinaryOp, Type, UnaryOp};
use crate::error::{CompileError, ErrorCode, Span};

/// Extension trait for operator type checking.
pub trait OperatorChecker {
    /// Type both operands of `op` are converted to.
    fn binary_operand_type(
        &self,
        op: BinaryOp,
        left: Type,
        right: Type,
        span: Span,
    ) -> Result<Type, CompileError>;

    /// Type the operand of `op` must have.
    fn unary_operand_type(&self, op: UnaryOp, operand: Type, span: Span)
        -> Result<Type, CompileError>;
}

/// Type produced by `op` when its operands have `operand_type`.
pub fn binary_result_type(op: BinaryOp, operand_type: Type) -> Type {
    if op.is_comparison() || op.is_logical() {
        Type::Boolean
    } else {
        operand_type
    }
}

fn invalid_operands(op: impl std::fmt::Display, left: Type, right: Type, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::InvalidOperatorForType,
        format!("Operator '{}' cannot be applied to {} and {}", op, left, right),
        span,
    )
}

impl OperatorChecker for Analyzer {
    fn binary_operand_type(
        &self,
        op: BinaryOp,
        left: Type,
        right: Type,
        span: Span,
    ) -> Result<Type, CompileError> {
        if op.is_logical() {
            return Ok(Type::Boolean);
        }

        if matches!(op, BinaryOp::Equal | BinaryOp::NotEqual)
            && left == Type::Boolean
            && right == Type::Boolean
        {
            return Ok(Type::Boolean);
        }

        Type::promote(&left, &right).ok_or_else(|| invalid_operands(op, left, right, span))
    }

    fn unary_operand_type(
        &self,
        op: UnaryOp,
        operand: Type,
        span: Span,
    ) -> Result<Type, CompileError> {
        match op {
            UnaryOp::Not => Ok(Type::Boolean),
            UnaryOp::Negate | UnaryOp::Plus if operand.is_numeric() => Ok(operand),
            UnaryOp::Negate | UnaryOp::Plus => Err(CompileError::new(
                ErrorCode::InvalidOperatorForType,
                format!("Operator '{}' cannot be applied to {}", op, operand),
                span,
            )),
        }
    }
}
