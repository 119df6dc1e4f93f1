//! lighttpd + PHP web UI.

use std::path::{Path, PathBuf};

use crate::check::{Checker, ExpectedFileState};
use crate::inspect::SystemInspector;

use super::SectionContext;

pub const PHP_DIR: &str = "/etc/php";
const LIGHTTPD_DIR: &str = "/etc/lighttpd";
const LIGHTTPD_AVAILABLE_DIR: &str = "/etc/lighttpd/conf-available";
const SUDOERS_DIR: &str = "/etc/sudoers.d";

/// The web UI runs privileged helper scripts through sudo.
const SUDOERS_RULE: &str = "www-data ALL=(ALL) NOPASSWD: ALL";

/// Installed PHP version, taken from the first entry of `/etc/php`.
pub fn php_version(inspector: &dyn SystemInspector) -> Option<String> {
    match inspector.list_dir(Path::new(PHP_DIR)) {
        Ok(entries) => entries.into_iter().next(),
        Err(e) => {
            tracing::debug!(error = %e, "cannot list {}", PHP_DIR);
            None
        }
    }
}

pub fn verify(_ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(LIGHTTPD_DIR),
        &["lighttpd.conf"],
    ));
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(LIGHTTPD_AVAILABLE_DIR),
        &["15-fastcgi-php.conf"],
    ));

    match php_version(checker.inspector()) {
        Some(version) => {
            let cgi_dir: PathBuf = Path::new(PHP_DIR).join(&version).join("cgi");
            checker.check_permissions(&ExpectedFileState::new(
                0o644,
                "root",
                "root",
                &cgi_dir,
                &["php.ini"],
            ));
        }
        None => checker.fail(format!("no PHP version found in {}", PHP_DIR)),
    }

    checker.check_permissions(&ExpectedFileState::new(
        0o440,
        "root",
        "root",
        Path::new(SUDOERS_DIR),
        &["www-data"],
    ));
    checker.check_file_contains(SUDOERS_RULE, &Path::new(SUDOERS_DIR).join("www-data"));

    checker.check_service_state("lighttpd.service", "active");
}
