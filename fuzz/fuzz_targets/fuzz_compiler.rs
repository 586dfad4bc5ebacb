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

//! Fuzz target for the complete pipeline, including the VM.
//!
//! Raw input exercises the compiler; structured input builds loop scripts
//! that compile and then run under a small budget. A run must finish with a
//! value or a runtime error; it must never hang or panic.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_compiler -- -max_total_time=60

#![no_main]

use arbitrary::Arbitrary;
use cinder::{CompilerSettings, RuntimeError, ScriptError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum LoopKind {
    For,
    While,
    DoWhile,
    Endless,
}

#[derive(Debug, Arbitrary)]
struct LoopScript {
    kind: LoopKind,
    limit: u8,
    body_statements: u8,
    continue_at: Option<u8>,
    break_at: Option<u8>,
    budget: u16,
}

impl LoopScript {
    fn source(&self) -> String {
        let mut body = String::new();
        if let Some(at) = self.continue_at {
            body.push_str(&format!("if (n == {}) {{ n++; continue; }} ", at));
        }
        if let Some(at) = self.break_at {
            body.push_str(&format!("if (n == {}) {{ break; }} ", at));
        }
        for _ in 0..self.body_statements % 4 {
            body.push_str("t++; ");
        }
        body.push_str("n++;");

        let head = match self.kind {
            LoopKind::For => format!("for (int i = 0; n < {}; i++) {{ {} }}", self.limit, body),
            LoopKind::While => format!("while (n < {}) {{ {} }}", self.limit, body),
            LoopKind::DoWhile => format!("do {{ {} }} while (n < {});", body, self.limit),
            LoopKind::Endless => format!(
                "for (;;) {{ if (n >= {}) {{ break; }} {} }}",
                self.limit, body
            ),
        };
        format!("int n = 0; int t = 0; {} return n + t;", head)
    }
}

fuzz_target!(|input: (LoopScript, &[u8])| {
    let (script, raw) = input;

    if let Ok(source) = std::str::from_utf8(raw) {
        let _ = cinder::compile(source);
    }

    let settings = CompilerSettings::default().with_max_loop_counter(u32::from(script.budget));
    match cinder::run(&script.source(), &settings) {
        Ok(_) | Err(ScriptError::Compile(_)) => {}
        Err(ScriptError::Runtime(RuntimeError::ResourceBudgetExceeded { .. })) => {}
        Err(ScriptError::Runtime(error)) => panic!("unexpected runtime error: {}", error),
    }
});
