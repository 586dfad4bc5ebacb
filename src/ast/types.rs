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

//! Type definitions for the Cinder compiler.

use super::Constant;

/// A type in the Cinder language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit IEEE-754 floating point.
    Double,
    /// Boolean value.
    Boolean,
    /// No value. Only produced by expressions, never declared.
    Void,
}

impl Type {
    /// Number of operand stack entries a value of this type occupies.
    pub fn stack_size(&self) -> usize {
        match self {
            Type::Void => 0,
            _ => 1,
        }
    }

    /// Check if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Long | Type::Double)
    }

    /// Check if this is an integral type.
    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Int | Type::Long)
    }

    fn rank(&self) -> Option<u8> {
        match self {
            Type::Int => Some(0),
            Type::Long => Some(1),
            Type::Double => Some(2),
            _ => None,
        }
    }

    /// Check if a value of this type converts to `target` without a cast.
    pub fn widens_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        match (self.rank(), target.rank()) {
            (Some(from), Some(to)) => from <= to,
            _ => false,
        }
    }

    /// Check if an explicit cast from this type to `target` is allowed.
    pub fn casts_to(&self, target: &Type) -> bool {
        self == target || (self.is_numeric() && target.is_numeric())
    }

    /// Binary numeric promotion: the wider of two numeric types.
    pub fn promote(left: &Type, right: &Type) -> Option<Type> {
        match (left.rank(), right.rank()) {
            (Some(l), Some(r)) => Some(if l >= r { *left } else { *right }),
            _ => None,
        }
    }

    /// The value an uninitialized variable of this type holds.
    pub fn zero_value(&self) -> Option<Constant> {
        match self {
            Type::Int => Some(Constant::Int(0)),
            Type::Long => Some(Constant::Long(0)),
            Type::Double => Some(Constant::Double(0.0)),
            Type::Boolean => Some(Constant::Bool(false)),
            Type::Void => None,
        }
    }

    /// Get the name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Long => "long",
            Type::Double => "double",
            Type::Boolean => "boolean",
            Type::Void => "void",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_size() {
        assert_eq!(Type::Void.stack_size(), 0);
        assert_eq!(Type::Long.stack_size(), 1);
        assert_eq!(Type::Boolean.stack_size(), 1);
    }

    #[test]
    fn test_widening() {
        assert!(Type::Int.widens_to(&Type::Long));
        assert!(Type::Int.widens_to(&Type::Double));
        assert!(Type::Long.widens_to(&Type::Double));
        assert!(!Type::Double.widens_to(&Type::Int));
        assert!(!Type::Boolean.widens_to(&Type::Int));
        assert!(Type::Boolean.widens_to(&Type::Boolean));
    }

    #[test]
    fn test_explicit_casts() {
        assert!(Type::Double.casts_to(&Type::Int));
        assert!(!Type::Int.casts_to(&Type::Boolean));
        assert!(!Type::Boolean.casts_to(&Type::Double));
    }

    #[test]
    fn test_promote() {
        assert_eq!(Type::promote(&Type::Int, &Type::Int), Some(Type::Int));
        assert_eq!(Type::promote(&Type::Int, &Type::Long), Some(Type::Long));
        assert_eq!(Type::promote(&Type::Double, &Type::Long), Some(Type::Double));
        assert_eq!(Type::promote(&Type::Boolean, &Type::Int), None);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Type::Int.zero_value(), Some(Constant::Int(0)));
        assert_eq!(Type::Boolean.zero_value(), Some(Constant::Bool(false)));
        assert_eq!(Type::Void.zero_value(), None);
    }
}
