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

//! Scope management for the semantic analyzer.
//!
//! A scope represents a lexical region where variables are declared.
//! Besides user variables a scope can hold reserved entries, such as the
//! loop budget counter, which no identifier can name.

use super::symbol::Symbol;
use std::collections::HashMap;

/// A scope in the symbol table.
#[derive(Debug, Default)]
pub struct Scope {
    /// Symbols declared in this scope.
    symbols: HashMap<String, Symbol>,
    /// Compiler-internal entries, keyed by reserved name.
    reserved: HashMap<&'static str, Symbol>,
    /// First frame slot owned by this scope.
    first_slot: usize,
}

impl Scope {
    /// Create a new empty scope whose variables start at `first_slot`.
    pub fn new(first_slot: usize) -> Self {
        Self {
            first_slot,
            ..Self::default()
        }
    }

    /// Declare a symbol in this scope. Returns the existing symbol on a clash.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        if let Some(existing) = self.symbols.get(&symbol.name) {
            return Err(existing.clone());
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look up a symbol in this scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn reserve(&mut self, name: &'static str, symbol: Symbol) {
        self.reserved.insert(name, symbol);
    }

    pub fn reserved(&self, name: &str) -> Option<&Symbol> {
        self.reserved.get(name)
    }

    pub fn first_slot(&self) -> usize {
        self.first_slot
    }
}
