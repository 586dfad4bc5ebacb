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

//! Expression analysis for the semantic analyzer.
//!
//! Every function here consumes an expression and returns the node that
//! replaces it. Constant subtrees come back as literals, `+x` comes back as
//! `x`, and operands needing a conversion come back wrapped in a cast.

use super::builtins::{signature, Param};
use super::operators::{binary_result_type, OperatorChecker};
use super::type_check::{fold_binary, fold_unary, folded, TypeChecker};
use super::Analyzer;
use crate::ast::{AssignOp, BinaryOp, Builtin, Expr, ExprKind, IncDecOp, Type, UnaryOp};
use crate::error::{CompileError, ErrorCode, Result, Span};

/// Extension trait for expression analysis.
pub trait ExpressionAnalyzer {
    /// Analyze an expression, returning its replacement.
    fn analyze_expression(&mut self, expr: Expr) -> Result<Expr>;

    /// Analyze an expression and convert it to `expected`.
    fn analyze_operand(&mut self, expr: Expr, expected: Type) -> Result<Expr>;

    /// Analyze a loop or if condition; the result is boolean.
    fn analyze_condition(&mut self, expr: Expr) -> Result<Expr>;

    /// Analyze an expression whose value is discarded.
    ///
    /// Only assignments, increments and calls may be used this way.
    fn analyze_statement_expression(&mut self, expr: Expr) -> Result<Expr>;
}

/// The type analysis inferred for `expr`.
pub fn actual_of(expr: &Expr) -> Result<Type> {
    expr.actual.ok_or_else(|| {
        CompileError::illegal_tree(format!("Expression '{}' has no type", expr), expr.span)
    })
}

impl ExpressionAnalyzer for Analyzer {
    fn analyze_expression(&mut self, expr: Expr) -> Result<Expr> {
        let Expr {
            kind,
            span,
            read,
            expected,
            ..
        } = expr;

        let mut analyzed = match kind {
            ExprKind::Literal(constant) => Expr {
                actual: Some(constant.value_type()),
                constant: Some(constant),
                ..Expr::literal(constant, span)
            },
            ExprKind::Variable { name, .. } => {
                let symbol = self.symbols.lookup(&name, span)?;
                Expr {
                    actual: Some(symbol.var_type),
                    ..Expr::new(
                        ExprKind::Variable {
                            slot: Some(symbol.slot),
                            name,
                        },
                        span,
                    )
                }
            }
            ExprKind::Assign {
                name, op, value, ..
            } => self.analyze_assign(name, op, *value, span, read)?,
            ExprKind::IncDec {
                name, op, prefix, ..
            } => self.analyze_inc_dec(name, op, prefix, span, read)?,
            ExprKind::Binary {
                left, op, right, ..
            } => self.analyze_binary(*left, op, *right, span)?,
            ExprKind::Unary { op, operand, .. } => self.analyze_unary(op, *operand, span)?,
            ExprKind::Call { name, args, .. } => self.analyze_call(name, args, span)?,
            ExprKind::Cast { target, expr, .. } => self.analyze_explicit_cast(target, *expr, span)?,
        };

        analyzed.read = read;
        analyzed.expected = expected;
        Ok(analyzed)
    }

    fn analyze_operand(&mut self, expr: Expr, expected: Type) -> Result<Expr> {
        let mut analyzed = self.analyze_expression(expr)?;
        analyzed.expected = Some(expected);
        self.cast(analyzed)
    }

    fn analyze_condition(&mut self, expr: Expr) -> Result<Expr> {
        self.analyze_operand(expr, Type::Boolean)
    }

    fn analyze_statement_expression(&mut self, mut expr: Expr) -> Result<Expr> {
        expr.read = false;
        let mut analyzed = self.analyze_expression(expr)?;

        if !analyzed.statement {
            return Err(CompileError::new(
                ErrorCode::NotAStatement,
                format!("'{}' is not a statement", analyzed),
                analyzed.span,
            )
            .with_hint("only assignments, increments and calls can stand alone"));
        }

        analyzed.expected = analyzed.actual;
        self.cast(analyzed)
    }
}

impl Analyzer {
    fn analyze_assign(
        &mut self,
        name: String,
        op: AssignOp,
        value: Expr,
        span: Span,
        read: bool,
    ) -> Result<Expr> {
        let symbol = self.symbols.lookup(&name, span)?.clone();
        let var_type = symbol.var_type;

        let (value, operation_type) = match op.binary_op() {
            None => (self.analyze_operand(value, var_type)?, None),
            Some(binary) => {
                let value = self.analyze_expression(value)?;
                let operation_type =
                    self.binary_operand_type(binary, var_type, actual_of(&value)?, span)?;
                let mut value = value;
                value.expected = Some(operation_type);
                (self.cast(value)?, Some(operation_type))
            }
        };

        Ok(Expr {
            statement: true,
            actual: Some(if read { var_type } else { Type::Void }),
            ..Expr::new(
                ExprKind::Assign {
                    name,
                    op,
                    value: Box::new(value),
                    slot: Some(symbol.slot),
                    target_type: Some(var_type),
                    operation_type,
                },
                span,
            )
        })
    }

    fn analyze_inc_dec(
        &mut self,
        name: String,
        op: IncDecOp,
        prefix: bool,
        span: Span,
        read: bool,
    ) -> Result<Expr> {
        let symbol = self.symbols.lookup(&name, span)?;
        if !symbol.var_type.is_numeric() {
            return Err(CompileError::new(
                ErrorCode::InvalidOperatorForType,
                format!("Operator '{}' cannot be applied to {}", op.as_str(), symbol.var_type),
                span,
            ));
        }
        let (var_type, slot) = (symbol.var_type, symbol.slot);

        Ok(Expr {
            statement: true,
            actual: Some(if read { var_type } else { Type::Void }),
            ..Expr::new(
                ExprKind::IncDec {
                    name,
                    op,
                    prefix,
                    slot: Some(slot),
                    target_type: Some(var_type),
                },
                span,
            )
        })
    }

    fn analyze_binary(&mut self, left: Expr, op: BinaryOp, right: Expr, span: Span) -> Result<Expr> {
        let left = self.analyze_expression(left)?;
        let right = self.analyze_expression(right)?;
        let operand_type =
            self.binary_operand_type(op, actual_of(&left)?, actual_of(&right)?, span)?;

        let mut left = left;
        left.expected = Some(operand_type);
        let left = self.cast(left)?;
        let mut right = right;
        right.expected = Some(operand_type);
        let right = self.cast(right)?;

        let node = Expr {
            actual: Some(binary_result_type(op, operand_type)),
            ..Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                    operand_type: Some(operand_type),
                },
                span,
            )
        };

        if let ExprKind::Binary { left, right, .. } = &node.kind {
            if let (Some(l), Some(r)) = (left.constant, right.constant) {
                let constant = fold_binary(op, l, r, span)?;
                return Ok(folded(&node, constant));
            }
        }
        Ok(node)
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: Expr, span: Span) -> Result<Expr> {
        let operand = self.analyze_expression(operand)?;
        let operand_type = self.unary_operand_type(op, actual_of(&operand)?, span)?;
        let mut operand = operand;
        operand.expected = Some(operand_type);
        let operand = self.cast(operand)?;

        if op == UnaryOp::Plus {
            return Ok(Expr { span, ..operand });
        }

        let node = Expr {
            actual: Some(operand_type),
            ..Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                    operand_type: Some(operand_type),
                },
                span,
            )
        };

        if let ExprKind::Unary { operand, .. } = &node.kind {
            if let Some(constant) = operand.constant {
                let constant = fold_unary(op, constant, span)?;
                return Ok(folded(&node, constant));
            }
        }
        Ok(node)
    }

    fn analyze_call(&mut self, name: String, args: Vec<Expr>, span: Span) -> Result<Expr> {
        let builtin = Builtin::from_name(&name).ok_or_else(|| {
            CompileError::new(
                ErrorCode::UndefinedFunction,
                format!("Unknown function '{}'", name),
                span,
            )
            .with_hint("available functions are print, min, max and abs")
        })?;

        let sig = signature(builtin);
        if args.len() != sig.params.len() {
            return Err(CompileError::new(
                ErrorCode::WrongNumberOfArguments,
                format!(
                    "Function '{}' expects {} argument(s), found {}",
                    name,
                    sig.params.len(),
                    args.len()
                ),
                span,
            ));
        }

        let mut analyzed = Vec::with_capacity(args.len());
        for (arg, param) in args.into_iter().zip(sig.params) {
            let arg = match param {
                Param::Typed(expected) => self.analyze_operand(arg, *expected)?,
                Param::Any => {
                    let arg = self.analyze_expression(arg)?;
                    if actual_of(&arg)? == Type::Void {
                        return Err(CompileError::new(
                            ErrorCode::TypeMismatch,
                            format!("Cannot pass a void value to '{}'", name),
                            arg.span,
                        ));
                    }
                    arg
                }
            };
            analyzed.push(arg);
        }

        Ok(Expr {
            statement: true,
            actual: Some(sig.returns),
            ..Expr::new(
                ExprKind::Call {
                    name,
                    args: analyzed,
                    builtin: Some(builtin),
                },
                span,
            )
        })
    }

    fn analyze_explicit_cast(&mut self, target: Type, expr: Expr, span: Span) -> Result<Expr> {
        let inner = self.analyze_expression(expr)?;
        let from = actual_of(&inner)?;

        if !from.casts_to(&target) {
            return Err(CompileError::new(
                ErrorCode::TypeMismatch,
                format!("Cannot cast {} to {}", from, target),
                span,
            ));
        }
        if from == target {
            return Ok(Expr { span, ..inner });
        }

        let node = Expr {
            actual: Some(target),
            ..Expr::new(
                ExprKind::Cast {
                    target,
                    expr: Box::new(inner),
                    explicit: true,
                },
                span,
            )
        };
        if let ExprKind::Cast { expr, .. } = &node.kind {
            if let Some(constant) = expr.constant.and_then(|c| c.cast_to(target)) {
                return Ok(folded(&node, constant));
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Constant;
    use crate::settings::CompilerSettings;

    fn analyzer_with(variables: &[(&str, Type)]) -> Analyzer {
        let mut analyzer = Analyzer::new(&CompilerSettings::default());
        for (name, var_type) in variables {
            analyzer
                .symbols
                .declare(name, *var_type, Span::default())
                .unwrap();
        }
        analyzer
    }

    fn parse_expr(source: &str) -> Expr {
        let tokens = crate::lexer::tokenize(&format!("{};", source)).unwrap();
        let program = crate::parser::parse(&tokens).unwrap();
        match program.statements.into_iter().next().map(|s| s.kind) {
            Some(crate::ast::StatementKind::Expression(expr)) => expr,
            other => panic!("Expected expression, got {:?}", other),
        }
    }

    // ========================================
    // Folding and replacement
    // ========================================

    #[test]
    fn test_constant_expression_is_replaced_by_literal() {
        let expr = analyzer_with(&[])
            .analyze_expression(parse_expr("2 * 3 + 1"))
            .unwrap();
        assert_eq!(expr.kind, ExprKind::Literal(Constant::Int(7)));
        assert_eq!(expr.constant, Some(Constant::Int(7)));
    }

    #[test]
    fn test_mixed_constant_promotes() {
        let expr = analyzer_with(&[])
            .analyze_expression(parse_expr("1 + 2L"))
            .unwrap();
        assert_eq!(expr.constant, Some(Constant::Long(3)));
    }

    #[test]
    fn test_comparison_folds_to_boolean() {
        let expr = analyzer_with(&[])
            .analyze_condition(parse_expr("1 < 0"))
            .unwrap();
        assert_eq!(expr.constant, Some(Constant::Bool(false)));
    }

    #[test]
    fn test_unary_plus_is_removed() {
        let expr = analyzer_with(&[("x", Type::Int)])
            .analyze_expression(parse_expr("+x"))
            .unwrap();
        assert!(matches!(expr.kind, ExprKind::Variable { .. }));
    }

    #[test]
    fn test_explicit_cast_folds() {
        let expr = analyzer_with(&[])
            .analyze_expression(parse_expr("(int) 2.9"))
            .unwrap();
        assert_eq!(expr.constant, Some(Constant::Int(2)));
    }

    #[test]
    fn test_constant_division_by_zero() {
        let err = analyzer_with(&[])
            .analyze_expression(parse_expr("1 / 0"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DivisionByZero);
    }

    // ========================================
    // Variables and assignment
    // ========================================

    #[test]
    fn test_variable_resolves_slot() {
        let expr = analyzer_with(&[("a", Type::Int), ("b", Type::Long)])
            .analyze_expression(parse_expr("b"))
            .unwrap();
        assert_eq!(expr.actual, Some(Type::Long));
        assert!(matches!(
            expr.kind,
            ExprKind::Variable {
                slot: Some(crate::ast::Slot(2)),
                ..
            }
        ));
    }

    #[test]
    fn test_assignment_as_statement_is_void() {
        let expr = analyzer_with(&[("x", Type::Long)])
            .analyze_statement_expression(parse_expr("x = 1"))
            .unwrap();
        assert!(expr.statement);
        assert!(!expr.read);
        assert_eq!(expr.actual, Some(Type::Void));
        match expr.kind {
            ExprKind::Assign { value, .. } => assert_eq!(value.constant, Some(Constant::Long(1))),
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_compound_assignment_operation_type() {
        let expr = analyzer_with(&[("x", Type::Int)])
            .analyze_statement_expression(parse_expr("x += 1.5"))
            .unwrap();
        match expr.kind {
            ExprKind::Assign { operation_type, .. } => {
                assert_eq!(operation_type, Some(Type::Double))
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_narrowing_rejected() {
        let err = analyzer_with(&[("x", Type::Int)])
            .analyze_statement_expression(parse_expr("x = 1L"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_not_a_statement() {
        let err = analyzer_with(&[("x", Type::Int)])
            .analyze_statement_expression(parse_expr("x + 1"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAStatement);
    }

    #[test]
    fn test_undeclared_variable() {
        let err = analyzer_with(&[])
            .analyze_statement_expression(parse_expr("x = 1"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredVariable);
    }

    #[test]
    fn test_increment_of_boolean() {
        let err = analyzer_with(&[("flag", Type::Boolean)])
            .analyze_statement_expression(parse_expr("flag++"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOperatorForType);
    }

    // ========================================
    // Calls
    // ========================================

    #[test]
    fn test_call_resolves_builtin() {
        let expr = analyzer_with(&[])
            .analyze_statement_expression(parse_expr("max(1, 2)"))
            .unwrap();
        assert_eq!(expr.actual, Some(Type::Long));
        match expr.kind {
            ExprKind::Call { builtin, args, .. } => {
                assert_eq!(builtin, Some(Builtin::Max));
                assert_eq!(args[0].constant, Some(Constant::Long(1)));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_function() {
        let err = analyzer_with(&[])
            .analyze_statement_expression(parse_expr("launch(1)"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedFunction);
    }

    #[test]
    fn test_wrong_arity() {
        let err = analyzer_with(&[])
            .analyze_statement_expression(parse_expr("min(1)"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::WrongNumberOfArguments);
    }

    #[test]
    fn test_print_of_void() {
        let err = analyzer_with(&[])
            .analyze_statement_expression(parse_expr("print(print(1))"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let err = analyzer_with(&[("i", Type::Int)])
            .analyze_condition(parse_expr("i"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TypeMismatch);
    }
}
