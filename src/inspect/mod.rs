//! System inspection.
//!
//! Every question the verification sections ask about the running system
//! goes through [`SystemInspector`]. The host implementation shells out to
//! `stat`, `systemctl`, `apt` and `pip3`; tests substitute an in-memory fake.

mod host;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

pub use host::HostInspector;

/// Failure to observe a piece of system state.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{0}")]
    Command(String),

    #[error("unexpected output from {what}: '{output}'")]
    Parse { what: String, output: String },
}

impl InspectionError {
    /// Wrap a command failure, keeping the whole context chain.
    pub fn command(err: anyhow::Error) -> Self {
        Self::Command(format!("{:#}", err))
    }
}

/// Mode, owner and group of one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Permission bits (e.g. `0o644`).
    pub mode: u32,
    pub owner: String,
    pub group: String,
}

impl FileMeta {
    pub fn new(mode: u32, owner: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            mode,
            owner: owner.into(),
            group: group.into(),
        }
    }

    /// True if the owner execute bit is set.
    pub fn owner_executable(&self) -> bool {
        self.mode & 0o100 != 0
    }
}

/// Hardware the appliance is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// ARM board; pulls in the board-specific package set.
    RaspberryPi,
    /// Anything else (CI containers, x86 test machines).
    Generic,
}

impl Platform {
    /// Classify a `uname -m` machine string.
    pub fn from_machine(machine: &str) -> Self {
        let machine = machine.trim();
        if machine.starts_with("armv") || machine == "aarch64" {
            Platform::RaspberryPi
        } else {
            Platform::Generic
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::RaspberryPi => write!(f, "raspberry-pi"),
            Platform::Generic => write!(f, "generic"),
        }
    }
}

/// Read-only queries against the operating system.
///
/// Package and module listings are snapshots and expensive; callers fetch
/// them once per section and test membership against the returned set.
pub trait SystemInspector {
    /// Mode/owner/group of `path`.
    fn file_meta(&self, path: &Path) -> Result<FileMeta, InspectionError>;

    /// Case-insensitive whole-word search for `needle` in `path`.
    fn file_contains(&self, needle: &str, path: &Path) -> Result<bool, InspectionError>;

    /// Active-state token reported by the service manager ("active", "failed", ...).
    fn service_active_state(&self, name: &str) -> Result<String, InspectionError>;

    /// Enablement token reported by the service manager ("enabled", "masked", ...).
    fn service_enablement(&self, name: &str) -> Result<String, InspectionError>;

    /// Names of all installed OS packages, lowercased.
    fn installed_packages(&self) -> Result<BTreeSet<String>, InspectionError>;

    /// Names of all installed Python modules, normalized.
    fn installed_pip_modules(&self) -> Result<BTreeSet<String>, InspectionError>;

    /// Full text of `path`.
    fn read_file(&self, path: &Path) -> Result<String, InspectionError>;

    /// Entry names directly inside `path`, sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, InspectionError>;
}

/// `grep -iw` semantics: the match must be bounded on both sides by a line
/// edge or a non-word character.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let pattern = format!(r"(?im)(?:^|\W){}(?:\W|$)", regex::escape(needle));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            tracing::debug!(error = %e, needle, "could not build search pattern");
            false
        }
    }
}

/// Normalize a Python distribution name the way pip compares them.
pub fn normalize_module_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['_', '.'], "-")
}
