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

//! Cinder Compiler Library
//!
//! This library compiles scripts of a small, statically typed scripting
//! language to code for a stack machine, and runs them. Untrusted scripts
//! cannot spin forever: every loop iteration is charged against a per
//! invocation budget, and exhausting it raises `ResourceBudgetExceeded`.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`settings`] - Compiler settings (the loop budget)
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Parsing tokens into an AST
//! - [`ast`] - Abstract Syntax Tree definitions and the pre-analysis phases
//! - [`analyzer`] - Semantic analysis, type checking and loop diagnostics
//! - [`codegen`] - Stack machine code generation
//! - [`runner`] - The virtual machine and watch mode
//!
//! # Example
//!
//! ```no_run
//! use cinder::{run, CompilerSettings};
//!
//! let source = "int sum = 0; for (int i = 0; i < 5; i = i + 1) { sum = sum + i; } return sum;";
//! match run(source, &CompilerSettings::default()) {
//!     Ok(execution) => println!("result: {}", execution.value),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runner;
pub mod settings;

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use ast::Node;

// Re-export commonly used types
pub use ast::{Program, Type};
pub use codegen::{Chunk, Instruction};
pub use error::{format_error, CompileError, ErrorCode, Result, SourceLocation, Span};
pub use lexer::Token;
pub use runner::{Execution, RuntimeError, Value, Vm};
pub use settings::CompilerSettings;

/// The version of the Cinder compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "Cinder";

/// Any error a script can produce, at compile time or while running.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Compile source code with the default settings.
pub fn compile(source: &str) -> std::result::Result<Chunk, CompileError> {
    compile_with_settings(source, &CompilerSettings::default())
}

/// Compile source code.
///
/// Runs every phase in order: tokenize, parse, configure, collect free
/// variables, analyze and generate. The first error aborts the compilation.
///
/// # Example
///
/// ```no_run
/// use cinder::CompilerSettings;
///
/// let settings = CompilerSettings::default().with_max_loop_counter(10);
/// let chunk = cinder::compile_with_settings("for (int i = 0; i < 3; i++) {}", &settings).unwrap();
/// print!("{}", chunk.disassemble());
/// ```
pub fn compile_with_settings(
    source: &str,
    settings: &CompilerSettings,
) -> std::result::Result<Chunk, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let mut program = parser::parse(&tokens)?;

    program.configure(settings);
    let mut variables = BTreeSet::new();
    program.collect_free_variables(&mut variables);
    debug!(?variables, "collected variables");

    let program = analyzer::analyze(program)?;
    codegen::generate(&program)
}

/// Names of every variable a script declares or references.
pub fn free_variables(source: &str) -> std::result::Result<BTreeSet<String>, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(&tokens)?;

    let mut variables = BTreeSet::new();
    program.collect_free_variables(&mut variables);
    Ok(variables)
}

/// Compile and run a script once.
pub fn run(
    source: &str,
    settings: &CompilerSettings,
) -> std::result::Result<Execution, ScriptError> {
    let chunk = compile_with_settings(source, settings)?;
    let mut vm = Vm::new();
    let value = vm.run(&chunk)?;
    Ok(Execution {
        value,
        output: vm.take_output(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "Cinder");
    }

    #[test]
    fn test_run_sums_loop() {
        let source =
            "int sum = 0; for (int i = 0; i < 5; i = i + 1) { sum = sum + i; } return sum;";
        let execution = run(source, &CompilerSettings::default()).unwrap();
        assert_eq!(execution.value, Value::Int(10));
        assert!(execution.output.is_empty());
    }

    #[test]
    fn test_run_reports_budget() {
        let settings = CompilerSettings::default().with_max_loop_counter(10);
        let error = run("for (int i = 0; i < 1000000; i = i + 1) {}", &settings).unwrap_err();
        assert!(matches!(
            error,
            ScriptError::Runtime(RuntimeError::ResourceBudgetExceeded { limit: 10 })
        ));
    }

    #[test]
    fn test_compile_error_is_wrapped() {
        let error = run("for (;;) {}", &CompilerSettings::default()).unwrap_err();
        match error {
            ScriptError::Compile(e) => assert_eq!(e.code, ErrorCode::NoEscape),
            other => panic!("expected a compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_free_variables() {
        let variables = free_variables("int a = b; for (int i = 0; i < a; i++) { c = i; }").unwrap();
        let names: Vec<&str> = variables.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c", "i"]);
    }
}
