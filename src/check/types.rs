//! Check accounting and report types.

use std::ops::AddAssign;
use std::path::Path;

use serde::Serialize;

/// Running totals of executed checks.
///
/// Counters only ever grow and `failures` never exceeds `tests`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    tests: u32,
    failures: u32,
}

impl Tally {
    /// Record one check.
    pub fn record(&mut self, passed: bool) {
        self.tests += 1;
        if !passed {
            self.failures += 1;
        }
    }

    pub fn tests(&self) -> u32 {
        self.tests
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn passed(&self) -> u32 {
        self.tests - self.failures
    }

    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.tests += other.tests;
        self.failures += other.failures;
    }
}

/// Line-oriented human-readable report.
///
/// Lines are kept so callers (and tests) can inspect what was said;
/// with echo enabled they are also printed to stdout as they arrive.
#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<String>,
    echo: bool,
}

impl Report {
    /// A report that prints every line to stdout.
    pub fn stdout() -> Self {
        Self {
            lines: Vec::new(),
            echo: true,
        }
    }

    /// A silent report, for tests.
    pub fn captured() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }

    /// Emit an `ERROR:` diagnostic.
    pub fn error(&mut self, msg: impl AsRef<str>) {
        self.line(format!("ERROR: {}", msg.as_ref()));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All `ERROR:` diagnostics emitted so far.
    pub fn errors(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| l.starts_with("ERROR:"))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

/// Permission policy for one batch of filesystem entries.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedFileState<'a> {
    /// Permission bits, e.g. `0o644`.
    pub mode: u32,
    pub owner: &'a str,
    pub group: &'a str,
    pub dir: &'a Path,
    pub files: &'a [&'a str],
}

impl<'a> ExpectedFileState<'a> {
    pub fn new(
        mode: u32,
        owner: &'a str,
        group: &'a str,
        dir: &'a Path,
        files: &'a [&'a str],
    ) -> Self {
        Self {
            mode,
            owner,
            group,
            dir,
            files,
        }
    }
}

/// Which snapshot an installed-name check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// OS package from the distribution package manager.
    Os,
    /// Python module from pip.
    Python,
}
