//! Verification run.
//!
//! Fixed sequence: installer exit-code gate, config load, then every section
//! whose gate is open, in [`Section::ORDER`]. Section totals are summed here
//! and reported with the elapsed time.

use serde::Serialize;

use crate::check::{Checker, Report, Tally};
use crate::config::Layout;
use crate::inspect::{Platform, SystemInspector};
use crate::record::{read_record, ConfigError, InstallConfig};
use crate::sections::{Section, SectionContext};
use crate::timing::{format_hms, Timer};

/// Installer exit code meaning "prerequisites not met, nothing installed".
pub const PREREQUISITES_FAILED: i32 = 2;

/// Inputs of one verification run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub layout: Layout,
    pub platform: Platform,
    /// Exit code of the installer run being verified.
    pub install_exit_code: i32,
}

/// Final counts of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub tests: u32,
    pub failures: u32,
    pub elapsed_secs: u64,
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The installer stopped at its prerequisite checks; nothing to verify.
    PrerequisitesFailed,
    /// The installer failed; verification was not attempted.
    InstallFailed(i32),
    /// The installation record is missing, unreadable or incomplete.
    ConfigRejected(ConfigError),
    /// All applicable sections ran.
    Completed(Summary),
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::PrerequisitesFailed => 0,
            Outcome::InstallFailed(_) | Outcome::ConfigRejected(_) => 1,
            Outcome::Completed(summary) if summary.failures > 0 => 1,
            Outcome::Completed(_) => 0,
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        match self {
            Outcome::Completed(summary) => Some(*summary),
            _ => None,
        }
    }
}

/// Run the full verification.
pub fn run(options: &RunOptions, inspector: &dyn SystemInspector, report: &mut Report) -> Outcome {
    match options.install_exit_code {
        0 => {}
        PREREQUISITES_FAILED => {
            report.line("Installation was aborted due to failed prerequisites. Further checks skipped.");
            return Outcome::PrerequisitesFailed;
        }
        code => {
            report.line(format!(
                "Installation failed with exit code {}. Further checks skipped.",
                code
            ));
            return Outcome::InstallFailed(code);
        }
    }

    let timer = Timer::start();
    report.line("Testing installation:");

    let config = match load_config(&options.layout, report) {
        Ok(config) => config,
        Err(e) => {
            match &e {
                ConfigError::Invalid(keys) => {
                    for key in keys {
                        report.error(format!("{} is missing or not set", key));
                    }
                }
                ConfigError::Missing(_) | ConfigError::Read { .. } => report.error(e.to_string()),
            }
            return Outcome::ConfigRejected(e);
        }
    };

    let ctx = SectionContext {
        layout: &options.layout,
        config: &config,
        platform: options.platform,
    };

    let mut total = Tally::default();
    for section in Section::ORDER {
        if !section.applies(&config) {
            tracing::debug!(?section, "gate closed, skipping section");
            continue;
        }
        total += run_section(section, &ctx, inspector, report);
    }

    let elapsed = timer.elapsed();
    report.line("");
    report.line(format!(
        "Test summary: {} tests, {} failed.",
        total.tests(),
        total.failures()
    ));
    report.line(format!("Test duration: {}", format_hms(elapsed)));

    Outcome::Completed(Summary {
        tests: total.tests(),
        failures: total.failures(),
        elapsed_secs: elapsed.as_secs(),
    })
}

/// Run one section with a fresh accumulator and return its totals.
pub fn run_section(
    section: Section,
    ctx: &SectionContext<'_>,
    inspector: &dyn SystemInspector,
    report: &mut Report,
) -> Tally {
    report.line("");
    report.line(format!("TESTING {}...", section.title()));

    let mut checker = Checker::new(inspector, report);
    section.run(ctx, &mut checker);
    let tally = checker.finish();

    tracing::debug!(
        ?section,
        tests = tally.tests(),
        failures = tally.failures(),
        "section finished"
    );
    tally
}

/// Read the record, echo it, then validate it.
fn load_config(layout: &Layout, report: &mut Report) -> Result<InstallConfig, ConfigError> {
    let path = layout.record_path();
    let text = read_record(&path)?;

    report.line(format!("Found installation config at {}:", path.display()));
    for line in text.lines() {
        report.line(line);
    }

    InstallConfig::parse(&text)
}
