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

//! Parser helper methods for token stream navigation and error handling.

use super::Parser;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;

/// Trait for parser helper operations.
pub trait ParserHelpers<'a> {
    /// Check if we've reached the end of the token stream.
    fn is_at_end(&self) -> bool;

    /// Peek at the current token without advancing.
    fn peek(&self) -> Option<&Token>;

    /// Peek at the current token's span.
    fn peek_span(&self) -> Option<Span>;

    /// Peek at a token ahead by n positions.
    fn peek_ahead(&self, n: usize) -> Option<&Token>;

    /// Get the previous token's span (for error reporting).
    fn previous_span(&self) -> Span;

    /// Span of the current token, or the end of the last one at EOF.
    fn current_span(&self) -> Span;

    /// Advance to the next token and return the current one.
    fn advance(&mut self) -> Option<(Token, Span)>;

    /// Check if the current token matches the expected kind.
    fn check(&self, expected: &Token) -> bool;

    /// Consume the current token if it matches the expected kind.
    fn match_token(&mut self, expected: &Token) -> bool;

    /// Expect the current token to match, or return an error.
    fn expect(&mut self, expected: &Token, message: &str) -> Result<Span, CompileError>;

    /// Consume an identifier and return its name.
    fn expect_identifier(&mut self, message: &str) -> Result<(String, Span), CompileError>;

    /// Error for an unexpected token (or end of input) at the current position.
    fn unexpected(&self, code: ErrorCode, message: &str) -> CompileError;
}

impl<'a> ParserHelpers<'a> for Parser<'a> {
    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Option<Span> {
        self.tokens.get(self.position).map(|(_, s)| *s)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n).map(|(t, _)| t)
    }

    fn previous_span(&self) -> Span {
        if self.position > 0 {
            self.tokens[self.position - 1].1
        } else {
            self.tokens.first().map_or(Span::new(0, 0), |(_, s)| *s)
        }
    }

    fn current_span(&self) -> Span {
        self.peek_span().unwrap_or_else(|| {
            let end = self.previous_span().end;
            Span::new(end, end)
        })
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let result = self.tokens.get(self.position).cloned();
        if result.is_some() {
            self.position += 1;
        }
        result
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, message: &str) -> Result<Span, CompileError> {
        if self.check(expected) {
            let span = self.current_span();
            self.position += 1;
            Ok(span)
        } else {
            Err(self.unexpected(ErrorCode::UnexpectedToken, message))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<(String, Span), CompileError> {
        match self.peek() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                let span = self.current_span();
                self.position += 1;
                Ok((name, span))
            }
            _ => Err(self.unexpected(ErrorCode::ExpectedIdentifier, message)),
        }
    }

    fn unexpected(&self, code: ErrorCode, message: &str) -> CompileError {
        match self.peek() {
            Some(token) => CompileError::new(
                code,
                format!("{}, found {}", message, token.describe()),
                self.current_span(),
            ),
            None => CompileError::new(
                ErrorCode::UnexpectedEndOfFile,
                format!("{}, found end of file", message),
                self.current_span(),
            ),
        }
    }
}
