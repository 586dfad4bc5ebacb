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

//! Token definitions for the Cinder language.

use logos::{FilterResult, Lexer, Logos};
use std::fmt;

/// Lexical failure kinds produced by the generated lexer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    InvalidCharacter,
    InvalidNumber,
    UnterminatedComment,
}

fn parse_int(lex: &mut Lexer<Token>) -> Result<i32, LexError> {
    lex.slice().parse().map_err(|_| LexError::InvalidNumber)
}

fn parse_long(lex: &mut Lexer<Token>) -> Result<i64, LexError> {
    let slice = lex.slice();
    slice[..slice.len() - 1]
        .parse()
        .map_err(|_| LexError::InvalidNumber)
}

fn parse_double(lex: &mut Lexer<Token>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::InvalidNumber)
}

/// Skip a `/* ... */` comment. Block comments do not nest.
fn skip_block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(LexError::UnterminatedComment)
        }
    }
}

/// A token in the Cinder language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Literals
    /// 32-bit integer literal.
    #[regex(r"[0-9]+", parse_int)]
    Integer(i32),
    /// 64-bit integer literal with an `L` suffix.
    #[regex(r"[0-9]+[lL]", parse_long)]
    Long(i64),
    /// Floating point literal.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_double)]
    Double(f64),
    /// Identifier (variable or function name).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Start of a block comment; never emitted.
    #[token("/*", skip_block_comment)]
    BlockComment,

    // Type keywords
    #[token("int")]
    Int,
    #[token("long")]
    LongType,
    #[token("double")]
    DoubleType,
    #[token("boolean")]
    Boolean,

    // Control flow keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,

    // Boolean literals
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Arithmetic operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // Comparison operators
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,

    // Logical operators
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // Assignment operators
    #[token("=")]
    Equal,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,

    // Punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

impl Token {
    /// Check if this token is a type keyword.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Token::Int | Token::LongType | Token::DoubleType | Token::Boolean
        )
    }

    /// Check if this token is an assignment operator.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Token::Equal
                | Token::PlusAssign
                | Token::MinusAssign
                | Token::StarAssign
                | Token::SlashAssign
                | Token::PercentAssign
        )
    }

    /// Human readable form used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Integer(value) => format!("integer '{}'", value),
            Token::Long(value) => format!("long '{}L'", value),
            Token::Double(value) => format!("double '{}'", value),
            Token::Identifier(name) => format!("identifier '{}'", name),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Integer(value) => return write!(f, "{}", value),
            Token::Long(value) => return write!(f, "{}L", value),
            Token::Double(value) => return write!(f, "{}", value),
            Token::Identifier(name) => return write!(f, "{}", name),
            Token::BlockComment => "/*",
            Token::Int => "int",
            Token::LongType => "long",
            Token::DoubleType => "double",
            Token::Boolean => "boolean",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::Do => "do",
            Token::For => "for",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Return => "return",
            Token::True => "true",
            Token::False => "false",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::PlusPlus => "++",
            Token::MinusMinus => "--",
            Token::EqualEqual => "==",
            Token::BangEqual => "!=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Bang => "!",
            Token::Equal => "=",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
            Token::PercentAssign => "%=",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::Semicolon => ";",
            Token::Comma => ",",
        };
        f.write_str(text)
    }
}
