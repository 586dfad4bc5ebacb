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

//! Runtime tests: expressions, conversions and built-ins on the VM.

use cinder::{run, CompilerSettings, RuntimeError, ScriptError, Value};
use test_case::test_case;

fn value_of(source: &str) -> Value {
    match run(source, &CompilerSettings::default()) {
        Ok(execution) => execution.value,
        Err(e) => panic!("'{}' failed: {}", source, e),
    }
}

fn output_of(source: &str) -> Vec<String> {
    match run(source, &CompilerSettings::default()) {
        Ok(execution) => execution.output,
        Err(e) => panic!("'{}' failed: {}", source, e),
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test_case("int a = 7; int b = 3; return a + b;", Value::Int(10); "add")]
#[test_case("int a = 7; int b = 3; return a - b * 2;", Value::Int(1); "precedence")]
#[test_case("int a = 7; int b = 3; return (a - b) * 2;", Value::Int(8); "grouping")]
#[test_case("int a = -7; int b = 2; return a / b;", Value::Int(-3); "truncating_division")]
#[test_case("int a = -7; int b = 2; return a % b;", Value::Int(-1); "remainder_sign")]
#[test_case("int a = 2147483647; a++; return a;", Value::Int(-2147483648); "wrapping")]
#[test_case("long a = 3; return a * 2L;", Value::Long(6); "long_arithmetic")]
#[test_case("int a = 3; long b = 4L; return a + b;", Value::Long(7); "promotion_to_long")]
#[test_case("double d = 1.5; d = d * 2.0; return d;", Value::Double(3.0); "double_arithmetic")]
#[test_case("int a = 1; double d = 0.5; return a + d;", Value::Double(1.5); "promotion_to_double")]
fn test_arithmetic(source: &str, expected: Value) {
    assert_eq!(value_of(source), expected);
}

// ============================================================================
// Assignments
// ============================================================================

#[test_case("int a = 1; a += 4; return a;", Value::Int(5); "add_assign")]
#[test_case("int a = 9; a -= 4; a *= 3; return a;", Value::Int(15); "chained")]
#[test_case("int a = 9; a /= 2; a %= 3; return a;", Value::Int(1); "divide_and_remainder")]
#[test_case("int a = 3; a += 1.9; return a;", Value::Int(4); "narrowing_compound")]
#[test_case("int a = 1; int b = a++; return b * 10 + a;", Value::Int(12); "postfix")]
#[test_case("int a = 1; int b = ++a; return b * 10 + a;", Value::Int(22); "prefix")]
#[test_case("int a; int b; a = b = 4; return a + b;", Value::Int(8); "chained_assignment")]
fn test_assignments(source: &str, expected: Value) {
    assert_eq!(value_of(source), expected);
}

// ============================================================================
// Booleans and conditions
// ============================================================================

#[test_case("int a = 3; return a > 2 && a < 5;", Value::Bool(true); "and")]
#[test_case("int a = 3; return a < 2 || a == 3;", Value::Bool(true); "or")]
#[test_case("int a = 3; return !(a == 3);", Value::Bool(false); "not")]
#[test_case("boolean b = false; int a = 0; if (b || a == 0) { a = 5; } return a;", Value::Int(5); "if_or")]
#[test_case("int a = 2; if (a > 5) { a = 1; } else { a = 9; } return a;", Value::Int(9); "else_branch")]
fn test_conditions(source: &str, expected: Value) {
    assert_eq!(value_of(source), expected);
}

#[test]
fn test_and_short_circuits() {
    // The right operand would divide by zero.
    let source = "int z = 0; boolean b = z != 0 && 10 / z > 1; return b;";
    assert_eq!(value_of(source), Value::Bool(false));
}

// ============================================================================
// Conversions and built-ins
// ============================================================================

#[test_case("return (int) 2.9;", Value::Int(2); "constant_cast")]
#[test_case("double d = -2.9; return (int) d;", Value::Int(-2); "runtime_cast")]
#[test_case("long l = 5000000000L; return (int) (l / 2L);", Value::Int(-1794967296); "narrowing_wraps")]
#[test_case("return max(3, 7);", Value::Long(7); "max")]
#[test_case("int a = -4; return min(a, 2);", Value::Long(-4); "min")]
#[test_case("return abs(-2.5);", Value::Double(2.5); "abs")]
fn test_conversions_and_builtins(source: &str, expected: Value) {
    assert_eq!(value_of(source), expected);
}

#[test]
fn test_print_collects_output() {
    let output = output_of("int a = 2; print(a); print(a * 1.5); print(a > 1); print(7L);");
    assert_eq!(output, vec!["2", "3.0", "true", "7"]);
}

#[test]
fn test_script_without_return_is_void() {
    assert_eq!(value_of("int a = 2; a++;"), Value::Void);
    assert_eq!(value_of("int a = 2; if (a > 1) { return; } a++;"), Value::Void);
}

// ============================================================================
// Runtime errors
// ============================================================================

#[test]
fn test_division_by_zero() {
    let error = run("int a = 1; int z = 0; return a / z;", &CompilerSettings::default()).unwrap_err();
    assert!(matches!(error, ScriptError::Runtime(RuntimeError::DivisionByZero)));
    assert_eq!(error.to_string(), "Division by zero");
}

#[test]
fn test_double_division_by_zero_is_infinite() {
    assert_eq!(
        value_of("double a = 1.0; double z = 0.0; return a / z;"),
        Value::Double(f64::INFINITY)
    );
}
