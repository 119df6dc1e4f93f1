//! Shared folders the web UI writes to, and executable scripts.

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

/// Directories below the installation directory the web UI must write.
pub const WEB_WRITABLE_DIRS: [&str; 4] = ["playlists", "shared", "htdocs", "settings"];

/// True for files the installer is expected to have made executable.
///
/// Suffixes are case-sensitive.
pub fn is_script(name: &str) -> bool {
    name.ends_with(".sh") || name.ends_with(".py")
}

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let jukebox_dir = ctx.layout.jukebox_dir();

    checker.check_permissions(&ExpectedFileState::new(
        0o775,
        "www-data",
        "www-data",
        jukebox_dir,
        &WEB_WRITABLE_DIRS,
    ));

    let audio_folders = &ctx.config.audio_folders;
    match (
        audio_folders.parent(),
        audio_folders.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(parent), Some(name)) => checker.check_permissions(&ExpectedFileState::new(
            0o775,
            "www-data",
            "www-data",
            parent,
            &[name],
        )),
        _ => checker.fail(format!(
            "{} is not a usable audio folder path",
            audio_folders.display()
        )),
    }

    match checker.inspector().list_dir(jukebox_dir) {
        Ok(entries) => {
            for name in entries.iter().filter(|n| is_script(n)) {
                checker.check_executable(&jukebox_dir.join(name));
            }
        }
        Err(e) => checker.fail(format!("cannot scan {}: {}", jukebox_dir.display(), e)),
    }
}
