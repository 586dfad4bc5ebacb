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

//! Statement context for the semantic analyzer.
//!
//! The context is a small value handed down from parent to child statement.
//! It is never stored on the analyzer, so a loop cannot forget to restore it.

/// Where a statement sits relative to the innermost enclosing loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementContext {
    /// Inside some loop body (`break`/`continue` are legal).
    pub in_loop: bool,
    /// This block is the body of a loop.
    pub begin_loop: bool,
    /// This statement is the last one executed in a loop body iteration.
    pub last_loop: bool,
}

impl StatementContext {
    /// Context of a top-level script statement.
    pub fn routine() -> Self {
        Self::default()
    }

    /// Context of a loop body block.
    pub fn loop_body() -> Self {
        Self {
            in_loop: true,
            begin_loop: true,
            last_loop: false,
        }
    }

    /// Context of the `index`-th of `count` statements inside a block.
    pub fn child(self, index: usize, count: usize) -> Self {
        let is_last = index + 1 == count;
        Self {
            in_loop: self.in_loop,
            begin_loop: false,
            last_loop: (self.begin_loop || self.last_loop) && is_last,
        }
    }

    /// Context of a block nested in a statement (if branches, plain blocks).
    pub fn nested(self) -> Self {
        Self {
            begin_loop: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_statement_of_loop_body() {
        let body = StatementContext::loop_body();
        assert!(!body.child(0, 2).last_loop);
        assert!(body.child(1, 2).last_loop);
        assert!(body.child(1, 2).in_loop);
    }

    #[test]
    fn test_last_loop_propagates_through_nested_blocks() {
        let last = StatementContext::loop_body().child(0, 1);
        assert!(last.nested().child(0, 1).last_loop);
        assert!(!last.nested().child(0, 2).last_loop);
    }

    #[test]
    fn test_routine_statements_are_not_in_loop() {
        let ctx = StatementContext::routine().child(0, 1);
        assert!(!ctx.in_loop);
        assert!(!ctx.last_loop);
    }
}
