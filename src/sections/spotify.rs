//! Mopidy with the Spotify extension.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const MOPIDY_DIR: &str = "/etc/mopidy";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let Some(spotify) = ctx.config.spotify.as_ref() else {
        return;
    };

    let system_conf = Path::new(MOPIDY_DIR).join("mopidy.conf");
    let user_dir = ctx.layout.user_mopidy_dir();
    let user_conf = user_dir.join("mopidy.conf");
    let media_dir = format!("media_dir = {}", ctx.config.audio_folders.display());

    // The system config is root:mopidy 640, so this read needs escalation
    checker.check_file_contains(&format!("username = {}", spotify.user), &system_conf);
    checker.check_file_contains(&format!("password = {}", spotify.pass), &system_conf);
    checker.check_file_contains(&format!("client_id = {}", spotify.client_id), &system_conf);
    checker.check_file_contains(
        &format!("client_secret = {}", spotify.client_secret),
        &system_conf,
    );
    checker.check_file_contains(&media_dir, &system_conf);

    checker.check_file_contains(&format!("username = {}", spotify.user), &user_conf);
    checker.check_file_contains(&media_dir, &user_conf);

    checker.check_permissions(&ExpectedFileState::new(
        0o640,
        "root",
        "mopidy",
        Path::new(MOPIDY_DIR),
        &["mopidy.conf"],
    ));
    let user = ctx.layout.user.as_str();
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        user,
        user,
        &user_dir,
        &["mopidy.conf"],
    ));

    checker.check_service_enablement("mopidy.service", "enabled");
}
