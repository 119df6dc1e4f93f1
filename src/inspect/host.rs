//! Inspector backed by the real host.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use super::{contains_word, normalize_module_name, FileMeta, InspectionError, Platform, SystemInspector};
use crate::process::{self, Cmd, CommandResult};

/// Queries the local machine through `stat`, `systemctl`, `apt` and `pip3`.
pub struct HostInspector {
    /// Retry permission-denied reads through `sudo -n`.
    elevate: bool,
}

impl HostInspector {
    /// Create an inspector for the current user.
    ///
    /// Escalation is only attempted when we are not root and `sudo` exists.
    pub fn detect() -> Self {
        let is_root = Cmd::new("id")
            .arg("-u")
            .run()
            .map(|r| r.stdout_trimmed() == "0")
            .unwrap_or(false);
        let elevate = !is_root && process::exists("sudo");
        tracing::debug!(is_root, elevate, "host inspector ready");
        Self { elevate }
    }

    /// Create an inspector that never escalates.
    pub fn unprivileged() -> Self {
        Self { elevate: false }
    }

    /// Detect the platform from `uname -m`.
    pub fn detect_platform() -> Platform {
        match process::run("uname", ["-m"]) {
            Ok(r) => Platform::from_machine(r.stdout_trimmed()),
            Err(e) => {
                tracing::debug!(error = %e, "uname failed, assuming generic platform");
                Platform::Generic
            }
        }
    }

    /// Run `program args`, retrying elevated when the plain run is refused.
    fn run_escalating(&self, program: &str, args: &[&str]) -> Result<CommandResult, InspectionError> {
        let plain = Cmd::new(program)
            .args(args)
            .allow_fail()
            .run()
            .map_err(InspectionError::command)?;

        if plain.success() || !self.elevate || !is_permission_denied(&plain.stderr) {
            return Ok(plain);
        }

        Cmd::new(program)
            .args(args)
            .elevated(true)
            .allow_fail()
            .run()
            .map_err(InspectionError::command)
    }
}

fn is_permission_denied(stderr: &str) -> bool {
    stderr.contains("Permission denied")
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("No such file or directory")
}

fn command_failed(program: &str, result: &CommandResult) -> InspectionError {
    let stderr = result.stderr_trimmed();
    if stderr.is_empty() {
        InspectionError::Command(format!("'{}' failed (exit code {})", program, result.code()))
    } else {
        InspectionError::Command(stderr.to_string())
    }
}

/// Parse `stat --format '%a %U %G'` output.
pub(crate) fn parse_stat_line(output: &str) -> Result<FileMeta, InspectionError> {
    let parse_err = || InspectionError::Parse {
        what: "stat".to_string(),
        output: output.trim().to_string(),
    };

    let mut parts = output.split_whitespace();
    let (Some(mode), Some(owner), Some(group), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(parse_err());
    };
    let mode = u32::from_str_radix(mode, 8).map_err(|_| parse_err())?;
    Ok(FileMeta::new(mode, owner, group))
}

/// Package names from `apt -qq list --installed` ("name/suite,now ver arch [installed]").
pub(crate) fn parse_apt_list(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('/'))
        .map(|(name, _)| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Module names from `pip3 list --format=freeze` ("name==version").
pub(crate) fn parse_pip_freeze(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(|line| line.split(['=', '@', ' ']).next().unwrap_or(""))
        .map(normalize_module_name)
        .filter(|name| !name.is_empty())
        .collect()
}

impl SystemInspector for HostInspector {
    fn file_meta(&self, path: &Path) -> Result<FileMeta, InspectionError> {
        let path_str = path.to_string_lossy();
        let result = self.run_escalating("stat", &["--format", "%a %U %G", &*path_str])?;

        if !result.success() {
            if is_not_found(&result.stderr) {
                return Err(InspectionError::NotFound(path.to_path_buf()));
            }
            return Err(command_failed("stat", &result));
        }
        parse_stat_line(result.stdout_trimmed())
    }

    fn file_contains(&self, needle: &str, path: &Path) -> Result<bool, InspectionError> {
        let content = self.read_file(path)?;
        Ok(contains_word(&content, needle))
    }

    fn service_active_state(&self, name: &str) -> Result<String, InspectionError> {
        let result = Cmd::new("systemctl")
            .args(["show", "-p", "ActiveState", "--value", name])
            .error_msg(format!("systemctl show {} failed", name))
            .run()
            .map_err(InspectionError::command)?;
        Ok(result.stdout_trimmed().to_string())
    }

    fn service_enablement(&self, name: &str) -> Result<String, InspectionError> {
        // is-enabled exits non-zero for anything but "enabled"; the token is on stdout
        let result = Cmd::new("systemctl")
            .args(["is-enabled", name])
            .allow_fail()
            .run()
            .map_err(InspectionError::command)?;

        let token = result.stdout_trimmed();
        if token.is_empty() {
            return Err(command_failed("systemctl is-enabled", &result));
        }
        Ok(token.to_string())
    }

    fn installed_packages(&self) -> Result<BTreeSet<String>, InspectionError> {
        let result = Cmd::new("apt")
            .args(["-qq", "list", "--installed"])
            .error_msg("listing installed packages failed")
            .run()
            .map_err(InspectionError::command)?;
        Ok(parse_apt_list(&result.stdout))
    }

    fn installed_pip_modules(&self) -> Result<BTreeSet<String>, InspectionError> {
        // Modules are installed system-wide by root
        let result = Cmd::new("pip3")
            .args(["list", "--format=freeze"])
            .elevated(self.elevate)
            .error_msg("listing python modules failed")
            .run()
            .map_err(InspectionError::command)?;
        Ok(parse_pip_freeze(&result.stdout))
    }

    fn read_file(&self, path: &Path) -> Result<String, InspectionError> {
        // Config files may carry Latin-1 comments
        match fs::read(path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(InspectionError::NotFound(path.to_path_buf()))
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied && self.elevate => {
                tracing::debug!(path = %path.display(), "read denied, escalating");
                let result = Cmd::new("cat")
                    .arg(path.to_string_lossy())
                    .elevated(true)
                    .run()
                    .map_err(InspectionError::command)?;
                Ok(result.stdout)
            }
            Err(e) => Err(InspectionError::Command(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, InspectionError> {
        let mut names = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) {
                    InspectionError::NotFound(path.to_path_buf())
                } else {
                    InspectionError::Command(format!("cannot list {}: {}", path.display(), e))
                }
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}
