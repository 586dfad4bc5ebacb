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

//! Compiler settings.

/// Default number of loop budget units a single script invocation may spend.
pub const DEFAULT_MAX_LOOP_COUNTER: u32 = 1_000_000;

/// Settings shared by every node of one compilation.
///
/// Settings are immutable once compilation starts; nodes that need them keep
/// a copy taken during configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerSettings {
    max_loop_counter: u32,
}

impl CompilerSettings {
    /// Create settings with the default loop budget.
    pub fn new() -> Self {
        Self {
            max_loop_counter: DEFAULT_MAX_LOOP_COUNTER,
        }
    }

    /// Set the loop budget. Zero disables budget checking.
    pub fn with_max_loop_counter(mut self, max_loop_counter: u32) -> Self {
        self.max_loop_counter = max_loop_counter;
        self
    }

    /// Settings with budget checking turned off.
    pub fn unbudgeted() -> Self {
        Self::new().with_max_loop_counter(0)
    }

    pub fn max_loop_counter(&self) -> u32 {
        self.max_loop_counter
    }

    /// Whether loops are charged against a budget at all.
    pub fn budget_enabled(&self) -> bool {
        self.max_loop_counter > 0
    }
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.max_loop_counter(), DEFAULT_MAX_LOOP_COUNTER);
        assert!(settings.budget_enabled());
    }

    #[test]
    fn test_zero_disables_budget() {
        assert!(!CompilerSettings::unbudgeted().budget_enabled());
        assert!(CompilerSettings::new().with_max_loop_counter(1).budget_enabled());
    }
}
