//! Samba share exposing the audio folders.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const SAMBA_DIR: &str = "/etc/samba";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let smb_conf = Path::new(SAMBA_DIR).join("smb.conf");

    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(SAMBA_DIR),
        &["smb.conf"],
    ));
    checker.check_file_contains(
        &format!("path={}", ctx.config.audio_folders.display()),
        &smb_conf,
    );
    checker.check_service_state("smbd.service", "active");
}
