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

//! Lexer module for the Cinder compiler.
//!
//! The token set is generated by `logos`. This module only turns the
//! generated error kinds into [`CompileError`]s with the offending span.
//! Whitespace, `// line` and `/* block */` comments are skipped.

mod tokens;

pub use tokens::{LexError, Token};

use crate::error::{CompileError, ErrorCode, Span};
use logos::Logos;

/// Tokenize source code into a vector of tokens with their spans.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, CompileError> {
    let mut tokens = Vec::new();

    for (result, range) in Token::lexer(source).spanned() {
        let span = Span::from_range(range);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(LexError::InvalidNumber) => {
                return Err(CompileError::new(
                    ErrorCode::InvalidNumber,
                    format!("Number literal '{}' is out of range", &source[span.start..span.end]),
                    span,
                )
                .with_hint("use an 'L' suffix for 64-bit integers"));
            }
            Err(LexError::InvalidCharacter) => {
                return Err(CompileError::new(
                    ErrorCode::InvalidCharacter,
                    format!("Unexpected character '{}'", &source[span.start..span.end]),
                    span,
                ));
            }
            Err(LexError::UnterminatedComment) => {
                return Err(CompileError::new(
                    ErrorCode::InvalidCharacter,
                    "Unterminated block comment",
                    Span::new(span.start, span.start + 2),
                )
                .with_hint("close the comment with '*/'"));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    // ========================================
    // Literals
    // ========================================

    #[test]
    fn test_number_literals() {
        assert_eq!(
            kinds("42 42L 4.5"),
            vec![Token::Integer(42), Token::Long(42), Token::Double(4.5)]
        );
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = tokenize("int x = 3000000000;").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumber);
        assert_eq!(err.span, Span::new(8, 18));
    }

    #[test]
    fn test_long_literal_accepts_large_values() {
        assert_eq!(kinds("3000000000L"), vec![Token::Long(3_000_000_000)]);
    }

    // ========================================
    // Keywords and identifiers
    // ========================================

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(
            kinds("for fork int integer"),
            vec![
                Token::For,
                Token::Identifier("fork".to_string()),
                Token::Int,
                Token::Identifier("integer".to_string()),
            ]
        );
    }

    // ========================================
    // Operators
    // ========================================

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds("i++ <= += && !"),
            vec![
                Token::Identifier("i".to_string()),
                Token::PlusPlus,
                Token::LessEqual,
                Token::PlusAssign,
                Token::AndAnd,
                Token::Bang,
            ]
        );
    }

    // ========================================
    // Trivia
    // ========================================

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("// header\nbreak; /* inline\n comment */ continue;"),
            vec![Token::Break, Token::Semicolon, Token::Continue, Token::Semicolon]
        );
        assert_eq!(kinds("/**/ break;"), vec![Token::Break, Token::Semicolon]);
        assert_eq!(
            kinds("x /* a * b */ / 2 /***/;"),
            vec![
                Token::Identifier("x".to_string()),
                Token::Slash,
                Token::Integer(2),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_block_comment_ends_at_first_close() {
        assert_eq!(
            kinds("/* a */ break; /* b */"),
            vec![Token::Break, Token::Semicolon]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("break; /* never closed").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCharacter);
        assert_eq!(err.span, Span::new(7, 9));
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_spans_point_into_source() {
        let tokens = tokenize("for (;;)").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 3));
        assert_eq!(tokens[1].1, Span::new(4, 5));
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("int a = 1 # 2;").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCharacter);
        assert_eq!(err.span, Span::new(10, 11));
    }
}
