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

//! Error types for the Cinder compiler.
//!
//! Every stage from the lexer to the code generator reports problems as a
//! [`CompileError`]. The first error aborts the compilation of a script; there
//! is no recovery, so there is no error collection type either.

use ariadne::{Config, Label, Report, ReportKind, Source};
use std::ops::Range;
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span from a range.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::from_range(range)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Error codes for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical errors (E001-E002)
    InvalidCharacter,
    InvalidNumber,

    // Syntax errors (E100-E105)
    UnexpectedToken,
    UnexpectedEndOfFile,
    ExpectedExpression,
    ExpectedIdentifier,
    InvalidAssignmentTarget,
    ExpectedBlock,

    // Semantic errors (E200-E238)
    UndeclaredVariable,
    DuplicateVariable,
    TypeMismatch,
    InvalidOperatorForType,
    DivisionByZero,
    UndefinedFunction,
    WrongNumberOfArguments,
    NotAStatement,
    ExtraneousLoop,
    NoEscape,
    ExtraneousIf,
    UnreachableStatement,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    ExtraneousContinue,
    EmptyScript,

    // Internal errors (E900)
    IllegalTreeStructure,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::InvalidNumber => "E002",

            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",
            ErrorCode::ExpectedExpression => "E102",
            ErrorCode::ExpectedIdentifier => "E103",
            ErrorCode::InvalidAssignmentTarget => "E104",
            ErrorCode::ExpectedBlock => "E105",

            ErrorCode::UndeclaredVariable => "E200",
            ErrorCode::DuplicateVariable => "E201",
            ErrorCode::TypeMismatch => "E210",
            ErrorCode::InvalidOperatorForType => "E211",
            ErrorCode::DivisionByZero => "E212",
            ErrorCode::UndefinedFunction => "E220",
            ErrorCode::WrongNumberOfArguments => "E221",
            ErrorCode::NotAStatement => "E230",
            ErrorCode::ExtraneousLoop => "E231",
            ErrorCode::NoEscape => "E232",
            ErrorCode::ExtraneousIf => "E233",
            ErrorCode::UnreachableStatement => "E234",
            ErrorCode::BreakOutsideLoop => "E235",
            ErrorCode::ContinueOutsideLoop => "E236",
            ErrorCode::ExtraneousContinue => "E237",
            ErrorCode::EmptyScript => "E238",

            ErrorCode::IllegalTreeStructure => "E900",
        }
    }

    /// Whether this code signals a broken compiler invariant rather than a
    /// problem in the script text.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::IllegalTreeStructure)
    }
}

/// A compiler error with source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Shorthand for an [`ErrorCode::IllegalTreeStructure`] error.
    ///
    /// These are compiler bugs, so they are logged as they are created.
    pub fn illegal_tree(message: impl Into<String>, span: Span) -> Self {
        let error = Self::new(ErrorCode::IllegalTreeStructure, message, span);
        tracing::error!(start = span.start, end = span.end, "{}", error.message);
        error
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Source location with line and column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The content of the line.
    pub line_content: String,
}

impl SourceLocation {
    /// Calculate line and column from a byte offset in source code.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];

        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |i| offset + i);

        Self {
            line,
            column,
            line_content: source[line_start..line_end].to_string(),
        }
    }
}

/// Format an error with source context, rustc style, without colors.
pub fn format_error(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let loc = SourceLocation::from_offset(source, error.span.start);
    let filename = filename.unwrap_or("<input>");
    let gutter = loc.line.to_string().len();

    let mut output = format!("error[{}]: {}\n", error.code_str(), error.message);
    output.push_str(&format!("  --> {}:{}:{}\n", filename, loc.line, loc.column));
    output.push_str(&format!("{:>gutter$} |\n", ""));
    output.push_str(&format!("{:>gutter$} | {}\n", loc.line, loc.line_content));

    let indent = loc.column - 1;
    let carets = error
        .span
        .len()
        .max(1)
        .min(loc.line_content.chars().count().saturating_sub(indent).max(1));
    output.push_str(&format!(
        "{:>gutter$} | {:>indent$}{}\n",
        "",
        "",
        "^".repeat(carets)
    ));

    if let Some(hint) = &error.hint {
        output.push_str(&format!("{:>gutter$} = hint: {}\n", "", hint));
    }

    output
}

/// Render an error as an ariadne report.
///
/// Used by the command line front end; `color` should be false whenever the
/// output is not a terminal.
pub fn report_error(error: &CompileError, source: &str, filename: &str, color: bool) -> String {
    let start = error.span.start.min(source.len());
    let end = error.span.end.clamp(start, source.len());

    let mut report = Report::build(ReportKind::Error, filename, start)
        .with_code(error.code_str())
        .with_message(&error.message)
        .with_label(Label::new((filename, start..end)).with_message(&error.message))
        .with_config(Config::default().with_color(color));
    if let Some(hint) = &error.hint {
        report = report.with_help(hint);
    }

    let mut buffer = Vec::new();
    if report
        .finish()
        .write((filename, Source::from(source)), &mut buffer)
        .is_err()
    {
        return format_error(error, source, Some(filename));
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 9);
        let b = Span::new(1, 6);
        assert_eq!(a.merge(&b), Span::new(1, 9));
        assert_eq!(a.len(), 5);
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn test_error_codes_are_unique() {
        let codes = [
            ErrorCode::InvalidCharacter,
            ErrorCode::InvalidNumber,
            ErrorCode::UnexpectedToken,
            ErrorCode::UnexpectedEndOfFile,
            ErrorCode::ExpectedExpression,
            ErrorCode::ExpectedIdentifier,
            ErrorCode::InvalidAssignmentTarget,
            ErrorCode::ExpectedBlock,
            ErrorCode::UndeclaredVariable,
            ErrorCode::DuplicateVariable,
            ErrorCode::TypeMismatch,
            ErrorCode::InvalidOperatorForType,
            ErrorCode::DivisionByZero,
            ErrorCode::UndefinedFunction,
            ErrorCode::WrongNumberOfArguments,
            ErrorCode::NotAStatement,
            ErrorCode::ExtraneousLoop,
            ErrorCode::NoEscape,
            ErrorCode::ExtraneousIf,
            ErrorCode::UnreachableStatement,
            ErrorCode::BreakOutsideLoop,
            ErrorCode::ContinueOutsideLoop,
            ErrorCode::ExtraneousContinue,
            ErrorCode::EmptyScript,
            ErrorCode::IllegalTreeStructure,
        ];
        let unique: std::collections::HashSet<_> = codes.iter().map(|c| c.code()).collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_source_location_second_line() {
        let source = "int a = 1;\nfor (;;) {}\n";
        let loc = SourceLocation::from_offset(source, 11);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.line_content, "for (;;) {}");
    }

    #[test]
    fn test_source_location_clamps_offset() {
        let loc = SourceLocation::from_offset("abc", 99);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 4);
    }

    #[test]
    fn test_format_error() {
        let source = "int a = 1;\nx = 2;";
        let error = CompileError::new(
            ErrorCode::UndeclaredVariable,
            "Undeclared variable 'x'",
            Span::new(11, 12),
        )
        .with_hint("declare it first, e.g. 'int x = 0;'");
        let text = format_error(&error, source, Some("demo.cin"));
        assert_eq!(
            text,
            "error[E200]: Undeclared variable 'x'\n  --> demo.cin:2:1\n  |\n2 | x = 2;\n  | ^\n  = hint: declare it first, e.g. 'int x = 0;'\n"
        );
    }

    #[test]
    fn test_report_error_mentions_code() {
        let source = "for (;;) {}";
        let error = CompileError::new(ErrorCode::NoEscape, "Loop has no escape", Span::new(0, 11));
        let text = report_error(&error, source, "demo.cin", false);
        assert!(text.contains("E232"));
        assert!(text.contains("Loop has no escape"));
    }
}
