//! Check primitives.
//!
//! A [`Checker`] asks the inspector one question per check, prints a
//! diagnostic when the answer is wrong and always counts the check. Nothing
//! here aborts: a failed or errored check is recorded and the caller moves on.

mod types;

use std::collections::BTreeSet;
use std::path::Path;

use crate::inspect::{normalize_module_name, SystemInspector};

pub use types::{ExpectedFileState, PackageKind, Report, Tally};

/// Runs check primitives against one inspector, accumulating a [`Tally`].
pub struct Checker<'a> {
    inspector: &'a dyn SystemInspector,
    report: &'a mut Report,
    tally: Tally,
}

impl<'a> Checker<'a> {
    pub fn new(inspector: &'a dyn SystemInspector, report: &'a mut Report) -> Self {
        Self {
            inspector,
            report,
            tally: Tally::default(),
        }
    }

    pub fn inspector(&self) -> &'a dyn SystemInspector {
        self.inspector
    }

    pub fn report(&mut self) -> &mut Report {
        &mut *self.report
    }

    /// Consume the checker, returning its totals.
    pub fn finish(self) -> Tally {
        self.tally
    }

    /// Count a check that failed for a reason outside the primitives.
    pub fn fail(&mut self, msg: impl AsRef<str>) {
        self.report.error(msg);
        self.tally.record(false);
    }

    /// Check mode, owner and group of every file in `expected.files`.
    ///
    /// One test per file. A file can print up to three diagnostics but adds
    /// at most one failure.
    pub fn check_permissions(&mut self, expected: &ExpectedFileState<'_>) {
        for file in expected.files {
            let path = expected.dir.join(file);
            let passed = match self.inspector.file_meta(&path) {
                Ok(actual) => {
                    let mut ok = true;
                    if actual.mode != expected.mode {
                        self.report.error(format!(
                            "{} actual mode ({:o}) differs from expected ({:o})",
                            path.display(),
                            actual.mode,
                            expected.mode
                        ));
                        ok = false;
                    }
                    if actual.owner != expected.owner {
                        self.report.error(format!(
                            "{} actual owner ({}) differs from expected ({})",
                            path.display(),
                            actual.owner,
                            expected.owner
                        ));
                        ok = false;
                    }
                    if actual.group != expected.group {
                        self.report.error(format!(
                            "{} actual group ({}) differs from expected ({})",
                            path.display(),
                            actual.group,
                            expected.group
                        ));
                        ok = false;
                    }
                    ok
                }
                Err(e) => {
                    self.report.error(format!("{}: {}", path.display(), e));
                    false
                }
            };
            self.tally.record(passed);
        }
    }

    /// Check that `path` contains `needle` as a whole word (case-insensitive).
    pub fn check_file_contains(&mut self, needle: &str, path: &Path) {
        let passed = match self.inspector.file_contains(needle, path) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "content search failed");
                false
            }
        };
        if !passed {
            self.report
                .error(format!("'{}' not found in {}", needle, path.display()));
        }
        self.tally.record(passed);
    }

    /// Check the service manager's active-state token for `name`.
    pub fn check_service_state(&mut self, name: &str, desired: &str) {
        let actual = self
            .inspector
            .service_active_state(name)
            .unwrap_or_else(|e| e.to_string());
        self.compare_service(name, desired, &actual);
    }

    /// Check the service manager's enablement token for `name`.
    pub fn check_service_enablement(&mut self, name: &str, desired: &str) {
        let actual = self
            .inspector
            .service_enablement(name)
            .unwrap_or_else(|e| e.to_string());
        self.compare_service(name, desired, &actual);
    }

    fn compare_service(&mut self, name: &str, desired: &str, actual: &str) {
        let passed = actual == desired;
        if !passed {
            self.report.error(format!(
                "service {} is not {} (state: {})",
                name, desired, actual
            ));
        }
        self.tally.record(passed);
    }

    /// Check that `name` is in an installed-name snapshot.
    pub fn check_installed(&mut self, name: &str, installed: &BTreeSet<String>, kind: PackageKind) {
        let passed = match kind {
            PackageKind::Os => installed.contains(&name.to_lowercase()),
            PackageKind::Python => installed.contains(&normalize_module_name(name)),
        };
        if !passed {
            match kind {
                PackageKind::Os => self.report.error(format!("{} is not installed", name)),
                PackageKind::Python => self
                    .report
                    .error(format!("python module {} is not installed", name)),
            }
        }
        self.tally.record(passed);
    }

    /// Check that the owner execute bit is set on `path`.
    pub fn check_executable(&mut self, path: &Path) {
        let passed = match self.inspector.file_meta(path) {
            Ok(meta) => meta.owner_executable(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "stat failed");
                false
            }
        };
        if !passed {
            self.report
                .error(format!("{} is not executable", path.display()));
        }
        self.tally.record(passed);
    }
}
