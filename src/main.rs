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

//! Cinder Compiler CLI
//!
//! Compiles and runs a script with a loop budget.

use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::Level;

use cinder::error::report_error;
use cinder::runner::{SourceWatcher, Value, Vm};
use cinder::settings::DEFAULT_MAX_LOOP_COUNTER;
use cinder::CompilerSettings;

/// Cinder - A sandboxed scripting language with budgeted loops
#[derive(Parser, Debug)]
#[command(name = "cinder")]
#[command(version)]
#[command(about = "Compile and run sandboxed scripts whose loops spend a budget")]
#[command(long_about = r#"
Cinder compiles a script to stack machine code and runs it. Every loop
iteration is charged against a budget; a script that spends more than
its budget is aborted with a runtime error.

Example usage:
  cinder sum.cin
  cinder sum.cin --budget 100
  cinder sum.cin --check --disassemble
  cinder sum.cin --watch -v
"#)]
struct Cli {
    /// Script to compile and run
    script: PathBuf,

    /// Loop budget per invocation
    #[arg(short, long, default_value_t = DEFAULT_MAX_LOOP_COUNTER)]
    budget: u32,

    /// Disable loop budget checks
    #[arg(long, conflicts_with = "budget")]
    no_budget: bool,

    /// Only compile, do not run
    #[arg(short, long)]
    check: bool,

    /// Print the generated code
    #[arg(short, long)]
    disassemble: bool,

    /// Re-run the script whenever it changes
    #[arg(short, long)]
    watch: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> CompilerSettings {
        if self.no_budget {
            CompilerSettings::unbudgeted()
        } else {
            CompilerSettings::default().with_max_loop_counter(self.budget)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.watch {
        return run_watch_loop(&cli);
    }
    execute(&cli)
}

/// Compile and run the script once.
fn execute(cli: &Cli) -> ExitCode {
    let source = match std::fs::read_to_string(&cli.script) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", cli.script.display(), e);
            return ExitCode::from(3);
        }
    };
    let filename = display_name(&cli.script);

    let chunk = match cinder::compile_with_settings(&source, &cli.settings()) {
        Ok(chunk) => chunk,
        Err(e) => {
            let color = std::io::stderr().is_terminal();
            eprint!("{}", report_error(&e, &source, &filename, color));
            return ExitCode::from(1);
        }
    };

    if cli.disassemble {
        print!("{}", chunk.disassemble());
    }
    if cli.check {
        println!("{}: ok", filename);
        return ExitCode::SUCCESS;
    }

    let mut vm = Vm::new();
    let result = vm.run(&chunk);
    for line in vm.output() {
        println!("{}", line);
    }

    match result {
        Ok(Value::Void) => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Run the script, then again after every change.
fn run_watch_loop(cli: &Cli) -> ExitCode {
    let watcher = match SourceWatcher::new(std::slice::from_ref(&cli.script)) {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("Error: Failed to create file watcher: {}", e);
            return ExitCode::from(6);
        }
    };

    execute(cli);
    println!("Watching for changes... (Press Ctrl+C to stop)");

    loop {
        if let Err(e) = watcher.wait_for_change() {
            eprintln!("Watch error: {}", e);
            return ExitCode::from(6);
        }

        println!();
        execute(cli);
        println!("Watching for changes...");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<input>".to_string())
}
