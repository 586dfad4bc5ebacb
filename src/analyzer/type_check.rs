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

//! The cast engine and compile-time constant evaluation.
//!
//! [`TypeChecker::cast`] reconciles an analyzed expression's `actual` type
//! with the `expected` type its parent set. It returns the node to use in
//! place of the input: the input itself, a folded literal, or the input
//! wrapped in an implicit cast node.

use super::Analyzer;
use crate::ast::{BinaryOp, Constant, Expr, ExprKind, UnaryOp};
use crate::error::{CompileError, ErrorCode, Result, Span};

/// Extension trait for type conversions.
pub trait TypeChecker {
    /// Apply the implicit conversion from `expr.actual` to `expr.expected`.
    fn cast(&self, expr: Expr) -> Result<Expr>;
}

impl TypeChecker for Analyzer {
    fn cast(&self, expr: Expr) -> Result<Expr> {
        let Some(actual) = expr.actual else {
            return Err(CompileError::illegal_tree(
                "Cast of an expression that was never analyzed",
                expr.span,
            ));
        };
        let Some(expected) = expr.expected else {
            return Ok(expr);
        };
        if actual == expected {
            return Ok(expr);
        }

        if !actual.widens_to(&expected) {
            let mut error = CompileError::new(
                ErrorCode::TypeMismatch,
                format!("Cannot convert {} to {}", actual, expected),
                expr.span,
            );
            if actual.casts_to(&expected) {
                error = error.with_hint(format!(
                    "use an explicit cast, e.g. '({}) value'",
                    expected
                ));
            }
            return Err(error);
        }

        if let Some(constant) = expr.constant.and_then(|c| c.cast_to(expected)) {
            return Ok(folded(&expr, constant));
        }

        let span = expr.span;
        let read = expr.read;
        Ok(Expr {
            read,
            expected: Some(expected),
            actual: Some(expected),
            ..Expr::new(
                ExprKind::Cast {
                    target: expected,
                    expr: Box::new(expr),
                    explicit: false,
                },
                span,
            )
        })
    }
}

/// Replace `expr` by a literal holding `constant`, keeping its context flags.
pub fn folded(expr: &Expr, constant: Constant) -> Expr {
    Expr {
        read: expr.read,
        expected: expr.expected,
        actual: Some(constant.value_type()),
        constant: Some(constant),
        ..Expr::literal(constant, expr.span)
    }
}

fn division_by_zero(span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::DivisionByZero,
        "Division by zero in constant expression",
        span,
    )
}

/// Evaluate a binary operator on two constants of the operand type.
///
/// Integer arithmetic wraps. Integral division or remainder by zero is a
/// compile error; double division follows IEEE-754.
pub fn fold_binary(op: BinaryOp, left: Constant, right: Constant, span: Span) -> Result<Constant> {
    use Constant::*;

    let value = match (left, right) {
        (Int(l), Int(r)) => match op {
            BinaryOp::Add => Int(l.wrapping_add(r)),
            BinaryOp::Sub => Int(l.wrapping_sub(r)),
            BinaryOp::Mul => Int(l.wrapping_mul(r)),
            BinaryOp::Div if r == 0 => return Err(division_by_zero(span)),
            BinaryOp::Div => Int(l.wrapping_div(r)),
            BinaryOp::Mod if r == 0 => return Err(division_by_zero(span)),
            BinaryOp::Mod => Int(l.wrapping_rem(r)),
            _ if op.is_comparison() => Bool(compare(op, l.cmp(&r))),
            _ => return Err(mismatched(op, span)),
        },
        (Long(l), Long(r)) => match op {
            BinaryOp::Add => Long(l.wrapping_add(r)),
            BinaryOp::Sub => Long(l.wrapping_sub(r)),
            BinaryOp::Mul => Long(l.wrapping_mul(r)),
            BinaryOp::Div if r == 0 => return Err(division_by_zero(span)),
            BinaryOp::Div => Long(l.wrapping_div(r)),
            BinaryOp::Mod if r == 0 => return Err(division_by_zero(span)),
            BinaryOp::Mod => Long(l.wrapping_rem(r)),
            _ if op.is_comparison() => Bool(compare(op, l.cmp(&r))),
            _ => return Err(mismatched(op, span)),
        },
        (Double(l), Double(r)) => match op {
            BinaryOp::Add => Double(l + r),
            BinaryOp::Sub => Double(l - r),
            BinaryOp::Mul => Double(l * r),
            BinaryOp::Div => Double(l / r),
            BinaryOp::Mod => Double(l % r),
            BinaryOp::Equal => Bool(l == r),
            BinaryOp::NotEqual => Bool(l != r),
            BinaryOp::Less => Bool(l < r),
            BinaryOp::Greater => Bool(l > r),
            BinaryOp::LessEqual => Bool(l <= r),
            BinaryOp::GreaterEqual => Bool(l >= r),
            _ => return Err(mismatched(op, span)),
        },
        (Bool(l), Bool(r)) => match op {
            BinaryOp::And => Bool(l && r),
            BinaryOp::Or => Bool(l || r),
            BinaryOp::Equal => Bool(l == r),
            BinaryOp::NotEqual => Bool(l != r),
            _ => return Err(mismatched(op, span)),
        },
        _ => return Err(mismatched(op, span)),
    };

    Ok(value)
}

fn compare(op: BinaryOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinaryOp::Equal => ordering == Equal,
        BinaryOp::NotEqual => ordering != Equal,
        BinaryOp::Less => ordering == Less,
        BinaryOp::Greater => ordering == Greater,
        BinaryOp::LessEqual => ordering != Greater,
        BinaryOp::GreaterEqual => ordering != Less,
        _ => false,
    }
}

fn mismatched(op: BinaryOp, span: Span) -> CompileError {
    CompileError::illegal_tree(
        format!("Constant operands of '{}' were not promoted to one type", op),
        span,
    )
}

/// Evaluate a unary operator on a constant.
pub fn fold_unary(op: UnaryOp, operand: Constant, span: Span) -> Result<Constant> {
    let value = match (op, operand) {
        (UnaryOp::Not, Constant::Bool(v)) => Constant::Bool(!v),
        (UnaryOp::Negate, Constant::Int(v)) => Constant::Int(v.wrapping_neg()),
        (UnaryOp::Negate, Constant::Long(v)) => Constant::Long(v.wrapping_neg()),
        (UnaryOp::Negate, Constant::Double(v)) => Constant::Double(-v),
        (UnaryOp::Plus, value) if value.value_type().is_numeric() => value,
        _ => {
            return Err(CompileError::illegal_tree(
                format!("Operator '{}' applied to constant {}", op, operand),
                span,
            ))
        }
    };
    Ok(value)
}
