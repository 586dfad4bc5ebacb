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

//! Script watching for `--watch` mode.
//!
//! Editors save in different ways (direct write, write-then-rename, backup
//! then write), so the watcher observes the script's parent directory and
//! filters events by file name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

use super::RunnerError;

/// Rapid changes within this window count as one.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Watches script files for changes.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use cinder::runner::SourceWatcher;
///
/// let watcher = SourceWatcher::new(&[PathBuf::from("budget.cin")]).expect("watcher");
/// watcher.wait_for_change().expect("watch error");
/// println!("script changed");
/// ```
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    paths: Vec<PathBuf>,
}

impl SourceWatcher {
    /// Start watching `paths`.
    ///
    /// Returns `RunnerError::WatchError` if a path cannot be resolved or its
    /// directory cannot be watched.
    pub fn new(paths: &[PathBuf]) -> Result<Self, RunnerError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)
            .map_err(|e| RunnerError::WatchError(format!("Failed to create watcher: {}", e)))?;

        let mut canonical_paths = Vec::with_capacity(paths.len());
        let mut directories = HashSet::new();

        for path in paths {
            let canonical = path.canonicalize().map_err(|e| {
                RunnerError::WatchError(format!("Cannot resolve path {}: {}", path.display(), e))
            })?;

            if let Some(parent) = canonical.parent() {
                if directories.insert(parent.to_path_buf()) {
                    watcher
                        .watch(parent, RecursiveMode::NonRecursive)
                        .map_err(|e| {
                            RunnerError::WatchError(format!(
                                "Failed to watch {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    debug!(directory = %parent.display(), "watching directory");
                }
            }
            canonical_paths.push(canonical);
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            paths: canonical_paths,
        })
    }

    /// The canonical paths being watched.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Block until a watched script changes.
    pub fn wait_for_change(&self) -> Result<(), RunnerError> {
        loop {
            let event = self
                .rx
                .recv()
                .map_err(|e| RunnerError::WatchError(format!("Watch channel closed: {}", e)))?
                .map_err(|e| RunnerError::WatchError(format!("Watch error: {}", e)))?;

            if !self.is_relevant(&event) {
                trace!(kind = ?event.kind, "ignoring event");
                continue;
            }

            std::thread::sleep(DEBOUNCE_DURATION);
            while self.rx.try_recv().is_ok() {}

            debug!(paths = ?event.paths, "script changed");
            return Ok(());
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }
        event.paths.iter().any(|path| self.is_watched(path))
    }

    fn is_watched(&self, path: &Path) -> bool {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.paths.iter().any(|watched| {
            // A renamed-in file may not canonicalize yet; compare by name within the directory.
            canonical == *watched
                || (canonical.file_name() == watched.file_name()
                    && canonical.parent() == watched.parent())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_watch_existing_script() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("loop.cin");
        File::create(&script).unwrap();

        let watcher = SourceWatcher::new(&[script.clone()]).unwrap();
        assert_eq!(watcher.paths(), &[script.canonicalize().unwrap()]);
    }

    #[test]
    fn test_watch_missing_script_fails() {
        let result = SourceWatcher::new(&[PathBuf::from("/nonexistent/dir/loop.cin")]);
        assert!(matches!(result, Err(RunnerError::WatchError(_))));
    }

    #[test]
    fn test_is_watched_matches_by_name_in_directory() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("loop.cin");
        File::create(&script).unwrap();
        let watcher = SourceWatcher::new(&[script.clone()]).unwrap();

        assert!(watcher.is_watched(&script));
        assert!(!watcher.is_watched(&dir.path().join("other.cin")));
    }

    #[test]
    fn test_detects_modification() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("watched.cin");
        {
            let mut file = File::create(&script).unwrap();
            writeln!(file, "print(1);").unwrap();
        }

        let watcher = SourceWatcher::new(&[script.clone()]).unwrap();

        let target = script.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .open(&target)
                .unwrap();
            writeln!(file, "print(2);").unwrap();
        });

        let result = watcher.wait_for_change();
        handle.join().unwrap();
        assert!(result.is_ok());
    }
}
