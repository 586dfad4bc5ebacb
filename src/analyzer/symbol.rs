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

//! Symbol table entries.

use crate::ast::{Slot, Type};
use crate::error::Span;

/// A declared variable bound to a frame slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The variable name.
    pub name: String,
    /// The declared type.
    pub var_type: Type,
    /// Frame slot holding the value at runtime.
    pub slot: Slot,
    /// The span where this symbol was declared.
    pub span: Span,
}

impl Symbol {
    pub fn new(name: impl Into<String>, var_type: Type, slot: Slot, span: Span) -> Self {
        Self {
            name: name.into(),
            var_type,
            slot,
            span,
        }
    }
}
