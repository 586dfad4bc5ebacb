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

//! Expression parsing for the parser.
//!
//! This module provides expression parsing functionality:
//! - Right associative assignment and compound assignment
//! - Precedence climbing for binary operators
//! - Unary operators, prefix increment/decrement and explicit casts
//! - Postfix increment/decrement
//! - Primary expressions (literals, identifiers, calls, grouping)

use super::helpers::ParserHelpers;
use super::types::TypeParser;
use super::Parser;
use crate::ast::{AssignOp, BinaryOp, Constant, Expr, ExprKind, IncDecOp, UnaryOp};
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;

/// Extension trait for expression parsing.
pub trait ExpressionParser {
    /// Parse an expression.
    fn parse_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse an assignment or anything of higher precedence.
    fn parse_assignment(&mut self) -> Result<Expr, CompileError>;

    /// Parse binary operators binding at least as tight as `min_precedence`.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, CompileError>;

    /// Parse a unary expression.
    fn parse_unary_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse a postfix expression.
    fn parse_postfix_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse a primary expression.
    fn parse_primary_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse the argument list of a call whose name was already consumed.
    fn parse_call_arguments(&mut self) -> Result<(Vec<Expr>, Span), CompileError>;
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    let op = match token {
        Token::OrOr => BinaryOp::Or,
        Token::AndAnd => BinaryOp::And,
        Token::EqualEqual => BinaryOp::Equal,
        Token::BangEqual => BinaryOp::NotEqual,
        Token::Less => BinaryOp::Less,
        Token::Greater => BinaryOp::Greater,
        Token::LessEqual => BinaryOp::LessEqual,
        Token::GreaterEqual => BinaryOp::GreaterEqual,
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

fn assign_op(token: &Token) -> Option<AssignOp> {
    let op = match token {
        Token::Equal => AssignOp::Assign,
        Token::PlusAssign => AssignOp::Add,
        Token::MinusAssign => AssignOp::Sub,
        Token::StarAssign => AssignOp::Mul,
        Token::SlashAssign => AssignOp::Div,
        Token::PercentAssign => AssignOp::Mod,
        _ => return None,
    };
    Some(op)
}

fn inc_dec_op(token: &Token) -> Option<IncDecOp> {
    match token {
        Token::PlusPlus => Some(IncDecOp::Increment),
        Token::MinusMinus => Some(IncDecOp::Decrement),
        _ => None,
    }
}

fn invalid_target(target: &Expr, op: &str) -> CompileError {
    CompileError::new(
        ErrorCode::InvalidAssignmentTarget,
        format!("Cannot apply '{}' to '{}'", op, target),
        target.span,
    )
    .with_hint("only variables can be assigned")
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, CompileError> {
        let target = self.parse_binary_expression(1)?;

        let Some(op) = self.peek().and_then(assign_op) else {
            return Ok(target);
        };
        self.advance();
        let value = self.parse_assignment()?;

        let ExprKind::Variable { name, .. } = &target.kind else {
            return Err(invalid_target(&target, op.as_str()));
        };
        let span = target.span.merge(&value.span);

        Ok(Expr::new(
            ExprKind::Assign {
                name: name.clone(),
                op,
                value: Box::new(value),
                slot: None,
                target_type: None,
                operation_type: None,
            },
            span,
        ))
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary_expression()?;

        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary_expression(op.precedence() + 1)?;
            let span = left.span.merge(&right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                    operand_type: None,
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, CompileError> {
        let start = self.current_span();

        let unary = match self.peek() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Negate),
            Some(Token::Plus) => Some(UnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = unary {
            self.advance();
            let operand = self.parse_unary_expression()?;
            let span = start.merge(&operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                    operand_type: None,
                },
                span,
            ));
        }

        if let Some(op) = self.peek().and_then(inc_dec_op) {
            self.advance();
            let operand = self.parse_unary_expression()?;
            let ExprKind::Variable { name, .. } = &operand.kind else {
                return Err(invalid_target(&operand, op.as_str()));
            };
            let span = start.merge(&operand.span);
            return Ok(Expr::new(
                ExprKind::IncDec {
                    name: name.clone(),
                    op,
                    prefix: true,
                    slot: None,
                    target_type: None,
                },
                span,
            ));
        }

        // `(type) operand`; types are keywords so this never clashes with grouping.
        if self.check(&Token::LeftParen)
            && self.peek_ahead(1).is_some_and(Token::is_type)
            && self.peek_ahead(2) == Some(&Token::RightParen)
        {
            self.advance();
            let target = self
                .parse_type()
                .ok_or_else(|| self.unexpected(ErrorCode::UnexpectedToken, "Expected a type"))?;
            self.expect(&Token::RightParen, "Expected ')' after cast type")?;
            let operand = self.parse_unary_expression()?;
            let span = start.merge(&operand.span);
            return Ok(Expr::new(
                ExprKind::Cast {
                    target,
                    expr: Box::new(operand),
                    explicit: true,
                },
                span,
            ));
        }

        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Expr, CompileError> {
        let operand = self.parse_primary_expression()?;

        let Some(op) = self.peek().and_then(inc_dec_op) else {
            return Ok(operand);
        };
        let op_span = self.current_span();
        self.advance();

        let ExprKind::Variable { name, .. } = &operand.kind else {
            return Err(invalid_target(&operand, op.as_str()));
        };
        let span = operand.span.merge(&op_span);
        Ok(Expr::new(
            ExprKind::IncDec {
                name: name.clone(),
                op,
                prefix: false,
                slot: None,
                target_type: None,
            },
            span,
        ))
    }

    fn parse_primary_expression(&mut self) -> Result<Expr, CompileError> {
        let span = self.current_span();

        let constant = match self.peek() {
            Some(Token::Integer(value)) => Some(Constant::Int(*value)),
            Some(Token::Long(value)) => Some(Constant::Long(*value)),
            Some(Token::Double(value)) => Some(Constant::Double(*value)),
            Some(Token::True) => Some(Constant::Bool(true)),
            Some(Token::False) => Some(Constant::Bool(false)),
            _ => None,
        };
        if let Some(constant) = constant {
            self.advance();
            return Ok(Expr::literal(constant, span));
        }

        if let Some(Token::Identifier(name)) = self.peek() {
            let name = name.clone();
            self.advance();
            if self.check(&Token::LeftParen) {
                let (args, args_span) = self.parse_call_arguments()?;
                return Ok(Expr::new(
                    ExprKind::Call {
                        name,
                        args,
                        builtin: None,
                    },
                    span.merge(&args_span),
                ));
            }
            return Ok(Expr::variable(name, span));
        }

        if self.match_token(&Token::LeftParen) {
            let mut inner = self.parse_expression()?;
            let close = self.expect(&Token::RightParen, "Expected ')' after expression")?;
            inner.span = span.merge(&close);
            return Ok(inner);
        }

        Err(self.unexpected(ErrorCode::ExpectedExpression, "Expected an expression"))
    }

    fn parse_call_arguments(&mut self) -> Result<(Vec<Expr>, Span), CompileError> {
        let open = self.expect(&Token::LeftParen, "Expected '('")?;
        let mut args = Vec::new();

        if !self.check(&Token::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }

        let close = self.expect(&Token::RightParen, "Expected ')' after arguments")?;
        Ok((args, open.merge(&close)))
    }
}
