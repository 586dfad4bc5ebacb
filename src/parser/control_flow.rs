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

//! Control flow statement parsing for the parser.
//!
//! This module provides control flow statement parsing:
//! - If/else statements
//! - While and do-while loops
//! - C-style for loops
//! - Break, continue and return statements
//!
//! Loop bodies that are empty (`;` or `{}`) are stored as absent.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::types::TypeParser;
use super::Parser;
use crate::ast::{
    Block, DoWhileStatement, Expr, ForInit, ForStatement, IfStatement, Statement, StatementKind,
    WhileStatement,
};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for control flow parsing.
pub trait ControlFlowParser {
    /// Parse an if statement.
    fn parse_if_statement(&mut self) -> Result<Statement, CompileError>;

    /// Parse a while statement.
    fn parse_while_statement(&mut self) -> Result<Statement, CompileError>;

    /// Parse a do-while statement.
    fn parse_do_while_statement(&mut self) -> Result<Statement, CompileError>;

    /// Parse a for statement.
    fn parse_for_statement(&mut self) -> Result<Statement, CompileError>;

    /// Parse a break, continue or return statement.
    fn parse_jump_statement(&mut self) -> Result<Statement, CompileError>;

    /// Parse `( expression )`.
    fn parse_condition(&mut self, keyword: &str) -> Result<Expr, CompileError>;
}

fn loop_body(block: Block) -> Option<Block> {
    if block.is_empty() {
        None
    } else {
        Some(block)
    }
}

impl<'a> ControlFlowParser for Parser<'a> {
    fn parse_if_statement(&mut self) -> Result<Statement, CompileError> {
        let start = self.expect(&Token::If, "Expected 'if'")?;
        let condition = self.parse_condition("if")?;
        let then_branch = self.parse_trailer()?;

        let else_branch = if self.match_token(&Token::Else) {
            Some(self.parse_trailer()?)
        } else {
            None
        };

        let span = start.merge(&self.previous_span());
        Ok(Statement::new(
            StatementKind::If(IfStatement {
                condition,
                then_branch,
                else_branch,
            }),
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, CompileError> {
        let start = self.expect(&Token::While, "Expected 'while'")?;
        let condition = self.parse_condition("while")?;
        let body = loop_body(self.parse_trailer()?);

        let span = start.merge(&self.previous_span());
        Ok(Statement::new(
            StatementKind::While(WhileStatement::new(condition, body)),
            span,
        ))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, CompileError> {
        let start = self.expect(&Token::Do, "Expected 'do'")?;
        if !self.check(&Token::LeftBrace) {
            return Err(self.unexpected(ErrorCode::ExpectedBlock, "Expected '{' after 'do'"));
        }
        let body = self.parse_block()?;
        self.expect(&Token::While, "Expected 'while' after do body")?;
        let condition = self.parse_condition("while")?;
        self.expect(&Token::Semicolon, "Expected ';' after do-while condition")?;

        let span = start.merge(&self.previous_span());
        Ok(Statement::new(
            StatementKind::DoWhile(DoWhileStatement::new(body, condition)),
            span,
        ))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, CompileError> {
        let start = self.expect(&Token::For, "Expected 'for'")?;
        self.expect(&Token::LeftParen, "Expected '(' after 'for'")?;

        let initializer = if self.check(&Token::Semicolon) {
            None
        } else if self.at_type() {
            Some(ForInit::Declaration(self.parse_declaration()?))
        } else {
            Some(ForInit::Expression(self.parse_expression()?))
        };
        self.expect(&Token::Semicolon, "Expected ';' after for initializer")?;

        let condition = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&Token::Semicolon, "Expected ';' after for condition")?;

        let afterthought = if self.check(&Token::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&Token::RightParen, "Expected ')' after for clauses")?;

        let body = loop_body(self.parse_trailer()?);

        let span = start.merge(&self.previous_span());
        Ok(Statement::new(
            StatementKind::For(ForStatement::new(initializer, condition, afterthought, body)),
            span,
        ))
    }

    fn parse_jump_statement(&mut self) -> Result<Statement, CompileError> {
        let start = self.current_span();

        let kind = match self.advance() {
            Some((Token::Break, _)) => StatementKind::Break,
            Some((Token::Continue, _)) => StatementKind::Continue,
            Some((Token::Return, _)) => {
                if self.check(&Token::Semicolon) {
                    StatementKind::Return(None)
                } else {
                    StatementKind::Return(Some(self.parse_expression()?))
                }
            }
            _ => {
                return Err(CompileError::new(
                    ErrorCode::UnexpectedToken,
                    "Expected 'break', 'continue' or 'return'",
                    start,
                ))
            }
        };
        self.expect(&Token::Semicolon, "Expected ';'")?;

        let span = start.merge(&self.previous_span());
        Ok(Statement::new(kind, span))
    }

    fn parse_condition(&mut self, keyword: &str) -> Result<Expr, CompileError> {
        self.expect(&Token::LeftParen, &format!("Expected '(' after '{}'", keyword))?;
        let condition = self.parse_expression()?;
        self.expect(&Token::RightParen, "Expected ')' after condition")?;
        Ok(condition)
    }
}
