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

//! Snapshot tests for the Cinder compiler.
//!
//! These tests use the `insta` crate to pin generated code and rendered
//! diagnostics.

use cinder::error::format_error;
use cinder::{compile, compile_with_settings, lexer, CompilerSettings, Span, Token};

/// Format tokens for snapshot comparison.
fn format_tokens(tokens: &[(Token, Span)]) -> String {
    let mut output = String::new();
    for (token, span) in tokens {
        output.push_str(&format!("{:?} @ {}..{}\n", token, span.start, span.end));
    }
    output
}

fn disassemble(source: &str, settings: &CompilerSettings) -> String {
    compile_with_settings(source, settings)
        .unwrap()
        .disassemble()
        .trim_end()
        .to_string()
}

// ============================================================================
// Lexer Snapshot Tests
// ============================================================================

#[test]
fn test_lexer_snapshot_for_header() {
    let tokens = lexer::tokenize("for (;i<5L;) // done").unwrap();
    insta::assert_snapshot!(format_tokens(&tokens).trim_end(), @r#"
    For @ 0..3
    LeftParen @ 4..5
    Semicolon @ 5..6
    Identifier("i") @ 6..7
    Less @ 7..8
    Long(5) @ 8..10
    Semicolon @ 10..11
    RightParen @ 11..12
    "#);
}

// ============================================================================
// Code Generation Snapshot Tests
// ============================================================================

#[test]
fn test_codegen_snapshot_budgeted_for() {
    let code = disassemble(
        include_str!("fixtures/spin.cin"),
        &CompilerSettings::default().with_max_loop_counter(10),
    );
    insta::assert_snapshot!(code, @r"
    0000 PUSH 10L
    0001 STORE 0
    0002 PUSH 0
    0003 STORE 1
    0004 LOAD 1
    0005 PUSH 1000000
    0006 LT int
    0007 JUMP_IF_FALSE 0014
    0008 LOOP_COUNTER 0 1
    0009 LOAD 1
    0010 PUSH 1
    0011 ADD int
    0012 STORE 1
    0013 JUMP 0004
    0014 RETURN_VOID
    ");
}

#[test]
fn test_codegen_snapshot_budgeted_do_while() {
    let code = disassemble(
        "int i = 0; do { i++; } while (i < 3);",
        &CompilerSettings::default().with_max_loop_counter(100),
    );
    insta::assert_snapshot!(code, @r"
    0000 PUSH 100L
    0001 STORE 0
    0002 PUSH 0
    0003 STORE 1
    0004 LOAD 1
    0005 PUSH 1
    0006 ADD int
    0007 STORE 1
    0008 LOAD 1
    0009 PUSH 3
    0010 LT int
    0011 JUMP_IF_FALSE 0014
    0012 LOOP_COUNTER 0 1
    0013 JUMP 0004
    0014 RETURN_VOID
    ");
}

#[test]
fn test_codegen_snapshot_continue_targets_afterthought() {
    let code = disassemble(
        "int n = 0; for (int i = 0; i < 3; i++) { if (i == 1) { continue; } n++; }",
        &CompilerSettings::unbudgeted(),
    );
    insta::assert_snapshot!(code, @r"
    0000 PUSH 0
    0001 STORE 0
    0002 PUSH 0
    0003 STORE 1
    0004 LOAD 1
    0005 PUSH 3
    0006 LT int
    0007 JUMP_IF_FALSE 0022
    0008 LOAD 1
    0009 PUSH 1
    0010 EQ int
    0011 JUMP_IF_FALSE 0013
    0012 JUMP 0017
    0013 LOAD 0
    0014 PUSH 1
    0015 ADD int
    0016 STORE 0
    0017 LOAD 1
    0018 PUSH 1
    0019 ADD int
    0020 STORE 1
    0021 JUMP 0004
    0022 RETURN_VOID
    ");
}

// ============================================================================
// Diagnostic Snapshot Tests
// ============================================================================

#[test]
fn test_error_snapshot_no_escape() {
    let source = include_str!("fixtures/no_escape.cin");
    let error = compile(source).unwrap_err();
    insta::assert_snapshot!(format_error(&error, source, Some("no_escape.cin")).trim_end(), @r"
    error[E232]: No paths escape from the for loop
      --> no_escape.cin:1:1
      |
    1 | for (;;) {}
      | ^^^^^^^^^^^
      = hint: the loop has no body and nothing stops it from repeating
    ");
}
