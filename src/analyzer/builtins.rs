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

//! Signatures of the built-in functions.

use crate::ast::{Builtin, Type};

/// A built-in parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Any value type.
    Any,
    /// A value converted to this type.
    Typed(Type),
}

/// Parameter list and return type of a built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub params: &'static [Param],
    pub returns: Type,
}

/// Get the signature of a built-in function.
pub fn signature(builtin: Builtin) -> Signature {
    match builtin {
        // print(value) - append to the invocation output
        Builtin::Print => Signature {
            params: &[Param::Any],
            returns: Type::Void,
        },
        Builtin::Min | Builtin::Max => Signature {
            params: &[Param::Typed(Type::Long), Param::Typed(Type::Long)],
            returns: Type::Long,
        },
        Builtin::Abs => Signature {
            params: &[Param::Typed(Type::Double)],
            returns: Type::Double,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_returns_nothing() {
        let sig = signature(Builtin::Print);
        assert_eq!(sig.params, &[Param::Any]);
        assert_eq!(sig.returns, Type::Void);
    }

    #[test]
    fn test_min_max_take_two_longs() {
        for builtin in [Builtin::Min, Builtin::Max] {
            let sig = signature(builtin);
            assert_eq!(sig.params.len(), 2);
            assert_eq!(sig.returns, Type::Long);
        }
    }
}
