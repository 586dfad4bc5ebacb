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

//! Negative/Error tests for the Cinder compiler.
//!
//! These tests verify that the compiler rejects invalid scripts with the
//! right diagnostic code, and that the first error wins.

use cinder::{compile, compile_with_settings, CompilerSettings, ErrorCode};
use test_case::test_case;

fn error_code(source: &str) -> ErrorCode {
    match compile(source) {
        Ok(_) => panic!("Expected '{}' to be rejected", source),
        Err(err) => err.code,
    }
}

// ============================================================================
// Lexer Error Tests
// ============================================================================

#[test_case("int a = 1 @ 2;", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("int a = #1;", ErrorCode::InvalidCharacter; "hash")]
#[test_case("int a = \"text\";", ErrorCode::InvalidCharacter; "string_literal")]
#[test_case("int a = 99999999999;", ErrorCode::InvalidNumber; "int_overflow")]
#[test_case("long a = 99999999999999999999L;", ErrorCode::InvalidNumber; "long_overflow")]
fn test_lexer_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source), expected);
}

// ============================================================================
// Parser Error Tests
// ============================================================================

#[test_case("int a = 1", ErrorCode::UnexpectedEndOfFile; "missing_semicolon")]
#[test_case("while (true) {", ErrorCode::UnexpectedEndOfFile; "unclosed_block")]
#[test_case("int a = ;", ErrorCode::ExpectedExpression; "missing_initializer")]
#[test_case("for (;; {}", ErrorCode::ExpectedExpression; "missing_paren")]
#[test_case("int = 1;", ErrorCode::ExpectedIdentifier; "missing_name")]
#[test_case("1 = 2;", ErrorCode::InvalidAssignmentTarget; "assign_to_literal")]
#[test_case("int a = 0; do a++; while (a < 3);", ErrorCode::ExpectedBlock; "do_without_block")]
fn test_parser_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source), expected);
}

// ============================================================================
// Semantic Error Tests
// ============================================================================

#[test_case("x = 1;", ErrorCode::UndeclaredVariable; "undeclared")]
#[test_case("int a = 1; int a = 2;", ErrorCode::DuplicateVariable; "duplicate")]
#[test_case("int a = 1L;", ErrorCode::TypeMismatch; "narrowing")]
#[test_case("boolean b = 1;", ErrorCode::TypeMismatch; "int_to_boolean")]
#[test_case("boolean b = true; b++;", ErrorCode::InvalidOperatorForType; "increment_boolean")]
#[test_case("int a = 1 / 0;", ErrorCode::DivisionByZero; "constant_division")]
#[test_case("launch(1);", ErrorCode::UndefinedFunction; "unknown_function")]
#[test_case("print(1, 2);", ErrorCode::WrongNumberOfArguments; "too_many_arguments")]
#[test_case("int a = 1; a + 1;", ErrorCode::NotAStatement; "not_a_statement")]
#[test_case("// nothing to see", ErrorCode::EmptyScript; "empty_script")]
fn test_semantic_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source), expected);
}

// ============================================================================
// Control Flow Error Tests
// ============================================================================

#[test_case("for (;;) {}", ErrorCode::NoEscape; "for_ever_empty")]
#[test_case("for (;;);", ErrorCode::NoEscape; "for_ever_no_body")]
#[test_case("while (true);", ErrorCode::NoEscape; "while_true_no_body")]
#[test_case("for (; false; ) { x = 1; }", ErrorCode::ExtraneousLoop; "for_false")]
#[test_case("int i = 0; while (1 > 2) { i++; }", ErrorCode::ExtraneousLoop; "while_folded_false")]
#[test_case("int i = 0; do { } while (i < 3);", ErrorCode::ExtraneousLoop; "do_empty_body")]
#[test_case("int i = 0; for (; i < 3; i++) { break; }", ErrorCode::ExtraneousLoop; "body_always_breaks")]
#[test_case("int a = 0; if (true) { a = 1; }", ErrorCode::ExtraneousIf; "constant_if")]
#[test_case("int a = 0; if (a > 0) { }", ErrorCode::ExtraneousIf; "empty_then")]
#[test_case("int a = 0; if (a > 0) { a = 1; } else { }", ErrorCode::ExtraneousIf; "empty_else")]
#[test_case("return 1; int a = 2;", ErrorCode::UnreachableStatement; "after_return")]
#[test_case("int i = 0; for (;;) { i++; } return i;", ErrorCode::UnreachableStatement; "after_endless_loop")]
#[test_case("break;", ErrorCode::BreakOutsideLoop; "break_outside")]
#[test_case("int a = 0; if (a > 0) { continue; }", ErrorCode::ContinueOutsideLoop; "continue_outside")]
#[test_case("int i = 0; while (i < 3) { i++; continue; }", ErrorCode::ExtraneousContinue; "trailing_continue")]
fn test_control_flow_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source), expected);
}

// ============================================================================
// Error Details
// ============================================================================

#[test]
fn test_extraneous_loop_points_at_condition() {
    let source = "int a = 0; while (false) { a++; }";
    let err = compile(source).unwrap_err();
    assert_eq!(err.code, ErrorCode::ExtraneousLoop);
    assert_eq!(&source[err.span.start..err.span.end], "false");
}

#[test]
fn test_first_error_wins() {
    // The constant condition is reported before the undeclared `x` in the body.
    let err = compile("for (; false; ) { x = 1; } y = 2;").unwrap_err();
    assert_eq!(err.code, ErrorCode::ExtraneousLoop);
}

#[test]
fn test_loop_diagnostics_do_not_depend_on_budget() {
    let err = compile_with_settings("for (;;) {}", &CompilerSettings::unbudgeted()).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoEscape);
}

#[test]
fn test_error_codes_render() {
    let err = compile("for (;;) {}").unwrap_err();
    assert_eq!(err.code_str(), "E232");
    assert!(err.to_string().starts_with("[E232] "));
}
