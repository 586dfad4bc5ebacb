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

//! Statement and block parsing.

use super::control_flow::ControlFlowParser;
use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::types::TypeParser;
use super::Parser;
use crate::ast::{Block, DeclBlock, Declaration, Statement, StatementKind};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Trait for statement parsing operations.
pub trait StatementParser {
    /// Parse one statement. A bare `;` yields `None`.
    fn parse_statement(&mut self) -> Result<Option<Statement>, CompileError>;

    /// Parse `{ statement* }`.
    fn parse_block(&mut self) -> Result<Block, CompileError>;

    /// Parse the body of a control statement: a block, a single statement or
    /// a bare `;` (which yields an empty block).
    fn parse_trailer(&mut self) -> Result<Block, CompileError>;

    /// Parse `type name (= expr)? (, name (= expr)?)*` without the `;`.
    fn parse_declaration(&mut self) -> Result<DeclBlock, CompileError>;
}

impl<'a> StatementParser for Parser<'a> {
    fn parse_statement(&mut self) -> Result<Option<Statement>, CompileError> {
        let start = self.current_span();

        let kind = match self.peek() {
            Some(Token::Semicolon) => {
                self.advance();
                return Ok(None);
            }
            Some(Token::LeftBrace) => StatementKind::Block(self.parse_block()?),
            Some(Token::If) => return self.parse_if_statement().map(Some),
            Some(Token::While) => return self.parse_while_statement().map(Some),
            Some(Token::Do) => return self.parse_do_while_statement().map(Some),
            Some(Token::For) => return self.parse_for_statement().map(Some),
            Some(Token::Break) | Some(Token::Continue) | Some(Token::Return) => {
                return self.parse_jump_statement().map(Some)
            }
            Some(token) if token.is_type() => {
                let decl = self.parse_declaration()?;
                self.expect(&Token::Semicolon, "Expected ';' after declaration")?;
                StatementKind::Declaration(decl)
            }
            Some(_) => {
                let expr = self.parse_expression()?;
                self.expect(&Token::Semicolon, "Expected ';' after expression")?;
                StatementKind::Expression(expr)
            }
            None => {
                return Err(self.unexpected(ErrorCode::UnexpectedEndOfFile, "Expected a statement"))
            }
        };

        let span = start.merge(&self.previous_span());
        Ok(Some(Statement::new(kind, span)))
    }

    fn parse_block(&mut self) -> Result<Block, CompileError> {
        let open = self.expect(&Token::LeftBrace, "Expected '{'")?;
        let mut statements = Vec::new();

        while !self.check(&Token::RightBrace) {
            if self.is_at_end() {
                return Err(self.unexpected(ErrorCode::UnexpectedEndOfFile, "Expected '}'"));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        let close = self.expect(&Token::RightBrace, "Expected '}'")?;
        Ok(Block::new(statements, open.merge(&close)))
    }

    fn parse_trailer(&mut self) -> Result<Block, CompileError> {
        if self.check(&Token::LeftBrace) {
            return self.parse_block();
        }

        let start = self.current_span();
        Ok(match self.parse_statement()? {
            Some(statement) => {
                let span = statement.span;
                Block::new(vec![statement], span)
            }
            None => Block::empty(start),
        })
    }

    fn parse_declaration(&mut self) -> Result<DeclBlock, CompileError> {
        let start = self.current_span();
        let var_type = self
            .parse_type()
            .ok_or_else(|| self.unexpected(ErrorCode::UnexpectedToken, "Expected a type"))?;

        let mut declarations = Vec::new();
        loop {
            let (name, name_span) = self.expect_identifier("Expected a variable name")?;
            let initializer = if self.match_token(&Token::Equal) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            let span = initializer
                .as_ref()
                .map_or(name_span, |init| name_span.merge(&init.span));
            declarations.push(Declaration::new(name, initializer, span));

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(DeclBlock {
            var_type,
            declarations,
            span: start.merge(&self.previous_span()),
        })
    }
}
