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

//! Type keyword parsing.

use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::Type;
use crate::lexer::Token;

/// Trait for type parsing operations.
pub trait TypeParser<'a> {
    /// Consume a type keyword if one is next.
    fn parse_type(&mut self) -> Option<Type>;

    /// Check whether a type keyword is next without consuming it.
    fn at_type(&self) -> bool;
}

fn type_of(token: &Token) -> Option<Type> {
    match token {
        Token::Int => Some(Type::Int),
        Token::LongType => Some(Type::Long),
        Token::DoubleType => Some(Type::Double),
        Token::Boolean => Some(Type::Boolean),
        _ => None,
    }
}

impl<'a> TypeParser<'a> for Parser<'a> {
    fn parse_type(&mut self) -> Option<Type> {
        let parsed = self.peek().and_then(type_of)?;
        self.advance();
        Some(parsed)
    }

    fn at_type(&self) -> bool {
        self.peek().is_some_and(Token::is_type)
    }
}
