//! Music Player Daemon.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const MPD_DIR: &str = "/etc";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let mpd_conf = Path::new(MPD_DIR).join("mpd.conf");

    checker.check_file_contains(
        &format!("music_directory \"{}\"", ctx.config.audio_folders.display()),
        &mpd_conf,
    );
    checker.check_file_contains(
        &format!("mixer_control \"{}\"", ctx.config.audio_iface),
        &mpd_conf,
    );
    checker.check_permissions(&ExpectedFileState::new(
        0o640,
        "mpd",
        "audio",
        Path::new(MPD_DIR),
        &["mpd.conf"],
    ));

    // Mopidy takes over playback when Spotify is installed
    if ctx.config.mpd_is_backend() {
        checker.check_service_enablement("mpd.service", "enabled");
    }
}
