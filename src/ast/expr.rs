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

//! Expression AST nodes for the Cinder compiler.

use crate::error::Span;

use super::{Slot, Type};

/// An expression in the Cinder language.
///
/// The parser only fills `kind` and `span`. Analysis annotates the rest and
/// code generation relies on those annotations being present.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    /// The source span of this expression.
    pub span: Span,
    /// Whether the value is consumed by the surrounding code.
    pub read: bool,
    /// Whether the expression may stand alone as a statement.
    pub statement: bool,
    /// Type required by the context, if any.
    pub expected: Option<Type>,
    /// Type inferred by analysis.
    pub actual: Option<Type>,
    /// Compile-time value, if the expression folds.
    pub constant: Option<Constant>,
}

impl Expr {
    /// Create a new, unanalyzed expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            read: true,
            statement: false,
            expected: None,
            actual: None,
            constant: None,
        }
    }

    /// Create a literal expression.
    pub fn literal(constant: Constant, span: Span) -> Self {
        Self::new(ExprKind::Literal(constant), span)
    }

    /// Create a variable reference.
    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(
            ExprKind::Variable {
                name: name.into(),
                slot: None,
            },
            span,
        )
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal value.
    Literal(Constant),

    /// A variable reference.
    Variable { name: String, slot: Option<Slot> },

    /// Simple or compound assignment to a variable.
    Assign {
        name: String,
        op: AssignOp,
        value: Box<Expr>,
        slot: Option<Slot>,
        /// Declared type of the target variable.
        target_type: Option<Type>,
        /// Type the compound operation is computed in.
        operation_type: Option<Type>,
    },

    /// Prefix or postfix increment/decrement of a variable.
    IncDec {
        name: String,
        op: IncDecOp,
        prefix: bool,
        slot: Option<Slot>,
        target_type: Option<Type>,
    },

    /// A binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        /// Type both operands were promoted to.
        operand_type: Option<Type>,
    },

    /// A unary operation.
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        operand_type: Option<Type>,
    },

    /// A built-in function call.
    Call {
        name: String,
        args: Vec<Expr>,
        builtin: Option<Builtin>,
    },

    /// A type conversion. Implicit casts are inserted by analysis.
    Cast {
        target: Type,
        expr: Box<Expr>,
        explicit: bool,
    },
}

/// A compile-time constant value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
}

impl Constant {
    /// The type of this constant.
    pub fn value_type(&self) -> Type {
        match self {
            Constant::Int(_) => Type::Int,
            Constant::Long(_) => Type::Long,
            Constant::Double(_) => Type::Double,
            Constant::Bool(_) => Type::Boolean,
        }
    }

    /// Convert to another type with explicit cast semantics.
    pub fn cast_to(&self, target: Type) -> Option<Constant> {
        let converted = match (*self, target) {
            (Constant::Int(v), Type::Int) => Constant::Int(v),
            (Constant::Int(v), Type::Long) => Constant::Long(v as i64),
            (Constant::Int(v), Type::Double) => Constant::Double(v as f64),
            (Constant::Long(v), Type::Int) => Constant::Int(v as i32),
            (Constant::Long(v), Type::Long) => Constant::Long(v),
            (Constant::Long(v), Type::Double) => Constant::Double(v as f64),
            (Constant::Double(v), Type::Int) => Constant::Int(v as i32),
            (Constant::Double(v), Type::Long) => Constant::Long(v as i64),
            (Constant::Double(v), Type::Double) => Constant::Double(v),
            (Constant::Bool(v), Type::Boolean) => Constant::Bool(v),
            _ => return None,
        };
        Some(converted)
    }

    /// The boolean payload, if this is a boolean constant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Long(v) => write!(f, "{}L", v),
            Constant::Double(v) => write!(f, "{:?}", v),
            Constant::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Get the precedence of this operator (higher = binds tighter).
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Equal | BinaryOp::NotEqual => 3,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEqual
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Get a string representation of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Unary plus (`+x`).
    Plus,
    /// Logical NOT (`!x`).
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    /// The arithmetic operator applied by a compound assignment.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }
}

/// Increment or decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

impl IncDecOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncDecOp::Increment => "++",
            IncDecOp::Decrement => "--",
        }
    }
}

/// The built-in functions a script may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `print(value)` appends a value to the invocation output.
    Print,
    /// `min(long, long)`
    Min,
    /// `max(long, long)`
    Max,
    /// `abs(double)`
    Abs,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "print" => Some(Builtin::Print),
            "min" => Some(Builtin::Min),
            "max" => Some(Builtin::Max),
            "abs" => Some(Builtin::Abs),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Abs => "abs",
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Literal(constant) => write!(f, "{}", constant),
            ExprKind::Variable { name, .. } => write!(f, "{}", name),
            ExprKind::Assign {
                name, op, value, ..
            } => write!(f, "({} {} {})", name, op.as_str(), value),
            ExprKind::IncDec {
                name, op, prefix, ..
            } => {
                if *prefix {
                    write!(f, "({}{})", op.as_str(), name)
                } else {
                    write!(f, "({}{})", name, op.as_str())
                }
            }
            ExprKind::Binary {
                left, op, right, ..
            } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Unary { op, operand, .. } => write!(f, "({}{})", op, operand),
            ExprKind::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Cast { target, expr, .. } => write!(f, "(({}) {})", target, expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_casts() {
        assert_eq!(Constant::Int(7).cast_to(Type::Long), Some(Constant::Long(7)));
        assert_eq!(Constant::Double(2.9).cast_to(Type::Int), Some(Constant::Int(2)));
        assert_eq!(
            Constant::Long(1 << 40).cast_to(Type::Int),
            Some(Constant::Int(0))
        );
        assert_eq!(Constant::Bool(true).cast_to(Type::Int), None);
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Constant::Long(3).to_string(), "3L");
        assert_eq!(Constant::Double(1.0).to_string(), "1.0");
        assert_eq!(Constant::Bool(false).to_string(), "false");
    }

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Less.precedence());
        assert!(BinaryOp::Less.precedence() > BinaryOp::Equal.precedence());
        assert!(BinaryOp::Equal.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(Builtin::from_name("print"), Some(Builtin::Print));
        assert_eq!(Builtin::from_name("printf"), None);
        assert_eq!(Builtin::Max.name(), "max");
    }
}
