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

//! Runtime values.

use std::fmt;

use crate::ast::{Constant, Type};

/// A value on the operand stack or in a frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    /// Result of a script that returns nothing; also the content of unset slots.
    #[default]
    Void,
}

impl Value {
    /// The static type matching this value.
    pub fn value_type(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Long(_) => Type::Long,
            Value::Double(_) => Type::Double,
            Value::Bool(_) => Type::Boolean,
            Value::Void => Type::Void,
        }
    }

    /// Numeric conversion with cast semantics.
    pub fn convert(&self, to: Type) -> Option<Value> {
        let converted = match (*self, to) {
            (Value::Int(v), Type::Int) => Value::Int(v),
            (Value::Int(v), Type::Long) => Value::Long(i64::from(v)),
            (Value::Int(v), Type::Double) => Value::Double(f64::from(v)),
            (Value::Long(v), Type::Int) => Value::Int(v as i32),
            (Value::Long(v), Type::Long) => Value::Long(v),
            (Value::Long(v), Type::Double) => Value::Double(v as f64),
            (Value::Double(v), Type::Int) => Value::Int(v as i32),
            (Value::Double(v), Type::Long) => Value::Long(v as i64),
            (Value::Double(v), Type::Double) => Value::Double(v),
            _ => return None,
        };
        Some(converted)
    }
}

impl From<Constant> for Value {
    fn from(constant: Constant) -> Self {
        match constant {
            Constant::Int(v) => Value::Int(v),
            Constant::Long(v) => Value::Long(v),
            Constant::Double(v) => Value::Double(v),
            Constant::Bool(v) => Value::Bool(v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Void => f.write_str("void"),
        }
    }
}
