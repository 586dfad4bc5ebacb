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

//! Symbol table for the semantic analyzer.
//!
//! The symbol table is a stack of scopes for one routine. The bottom scope is
//! the routine scope; it is created once and is the only place the loop
//! budget counter is ever reserved. Child scopes hand their frame slots back
//! when popped, and the table remembers the highest slot count ever live as
//! the routine's frame size.

use super::scope::Scope;
use super::symbol::Symbol;
use crate::ast::{Slot, Type};
use crate::error::{CompileError, ErrorCode, Result, Span};

/// Reserved name of the per-invocation loop budget counter.
///
/// `#` cannot appear in an identifier, so scripts cannot shadow or touch it.
pub const LOOP_COUNTER: &str = "#loop";

/// The symbol table for semantic analysis.
#[derive(Debug)]
pub struct SymbolTable {
    /// The scope stack (innermost scope last).
    scopes: Vec<Scope>,
    /// Next free frame slot.
    next_slot: usize,
    /// High-water mark of `next_slot`.
    frame_size: usize,
}

impl SymbolTable {
    /// Create the routine scope, reserving the budget counter if requested.
    pub fn new(loop_counter: bool) -> Self {
        let mut table = Self {
            scopes: vec![Scope::new(0)],
            next_slot: 0,
            frame_size: 0,
        };

        if loop_counter {
            let slot = table.allocate_slot();
            let symbol = Symbol::new(LOOP_COUNTER, Type::Long, slot, Span::default());
            table.scopes[0].reserve(LOOP_COUNTER, symbol);
        }

        table
    }

    fn allocate_slot(&mut self) -> Slot {
        let slot = Slot(self.next_slot);
        self.next_slot += 1;
        self.frame_size = self.frame_size.max(self.next_slot);
        slot
    }

    fn current(&mut self) -> &mut Scope {
        // The routine scope is never popped.
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Open a child scope of the current one.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new(self.next_slot));
    }

    /// Close the current scope and release its slots.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                self.next_slot = scope.first_slot();
            }
        }
    }

    /// Declare a variable in the current scope.
    ///
    /// Shadowing a variable of an enclosing scope is allowed; declaring the
    /// same name twice in one scope is not.
    pub fn declare(&mut self, name: &str, var_type: Type, span: Span) -> Result<Symbol> {
        let symbol = Symbol::new(name, var_type, Slot(self.next_slot), span);
        if let Err(existing) = self.current().define(symbol.clone()) {
            return Err(CompileError::new(
                ErrorCode::DuplicateVariable,
                format!("Variable '{}' is already declared in this scope", name),
                span,
            )
            .with_hint(format!(
                "the earlier '{} {}' is still in scope; pick another name",
                existing.var_type, existing.name
            )));
        }

        // The slot is only taken once the name is accepted.
        self.allocate_slot();
        Ok(symbol)
    }

    /// Resolve a variable, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str, span: Span) -> Result<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
            .ok_or_else(|| {
                CompileError::new(
                    ErrorCode::UndeclaredVariable,
                    format!("Undeclared variable '{}'", name),
                    span,
                )
            })
    }

    /// Check whether any enclosing scope holds the reserved entry `name`.
    pub fn has_reserved(&self, name: &str) -> bool {
        self.get_reserved(name).is_some()
    }

    /// Find the reserved entry `name` in any enclosing scope.
    pub fn get_reserved(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.reserved(name))
    }

    /// Number of frame slots the routine needs.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Get the current scope depth.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 1)
    }

    // ========================================
    // Budget counter reservation
    // ========================================

    #[test]
    fn test_counter_reserved_in_routine_scope() {
        let table = SymbolTable::new(true);
        assert!(table.has_reserved(LOOP_COUNTER));
        assert_eq!(table.get_reserved(LOOP_COUNTER).map(|s| s.slot), Some(Slot(0)));
        assert_eq!(table.frame_size(), 1);
    }

    #[test]
    fn test_nested_scopes_share_the_counter() {
        let mut table = SymbolTable::new(true);
        table.push_scope();
        table.push_scope();
        assert_eq!(table.depth(), 3);
        assert_eq!(table.get_reserved(LOOP_COUNTER).map(|s| s.slot), Some(Slot(0)));
        table.pop_scope();
        table.pop_scope();
        assert_eq!(table.frame_size(), 1);
    }

    #[test]
    fn test_no_counter_without_budget() {
        let table = SymbolTable::new(false);
        assert!(!table.has_reserved(LOOP_COUNTER));
        assert_eq!(table.frame_size(), 0);
    }

    #[test]
    fn test_counter_not_visible_as_variable() {
        let table = SymbolTable::new(true);
        let err = table.lookup(LOOP_COUNTER, span()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredVariable);
    }

    // ========================================
    // Declarations and lookup
    // ========================================

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new(false);
        table.declare("i", Type::Int, span()).unwrap();
        let err = table.declare("i", Type::Long, span()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateVariable);
    }

    #[test]
    fn test_rejected_duplicate_takes_no_slot() {
        let mut table = SymbolTable::new(false);
        table.declare("i", Type::Int, span()).unwrap();
        assert!(table.declare("i", Type::Long, span()).is_err());
        let next = table.declare("j", Type::Int, span()).unwrap();
        assert_eq!(next.slot, Slot(1));
        assert_eq!(table.frame_size(), 2);
        assert_eq!(table.lookup("i", span()).unwrap().var_type, Type::Int);
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let mut table = SymbolTable::new(false);
        let outer = table.declare("i", Type::Int, span()).unwrap();
        table.push_scope();
        let inner = table.declare("i", Type::Double, span()).unwrap();
        assert_ne!(outer.slot, inner.slot);
        assert_eq!(table.lookup("i", span()).unwrap().var_type, Type::Double);
        table.pop_scope();
        assert_eq!(table.lookup("i", span()).unwrap().var_type, Type::Int);
    }

    #[test]
    fn test_popped_variables_are_gone() {
        let mut table = SymbolTable::new(false);
        table.push_scope();
        table.declare("tmp", Type::Int, span()).unwrap();
        table.pop_scope();
        let err = table.lookup("tmp", span()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredVariable);
    }

    #[test]
    fn test_sibling_scopes_reuse_slots() {
        let mut table = SymbolTable::new(true);
        table.push_scope();
        let a = table.declare("a", Type::Int, span()).unwrap();
        table.pop_scope();
        table.push_scope();
        let b = table.declare("b", Type::Int, span()).unwrap();
        table.declare("c", Type::Int, span()).unwrap();
        table.pop_scope();

        assert_eq!(a.slot, Slot(1));
        assert_eq!(b.slot, Slot(1));
        assert_eq!(table.frame_size(), 3);
    }

    #[test]
    fn test_routine_scope_is_never_popped() {
        let mut table = SymbolTable::new(false);
        table.declare("x", Type::Int, span()).unwrap();
        table.pop_scope();
        assert_eq!(table.depth(), 1);
        assert!(table.lookup("x", span()).is_ok());
    }
}
