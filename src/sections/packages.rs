//! OS packages from the installer's package lists.

use std::collections::BTreeSet;

use crate::check::{Checker, PackageKind};
use crate::inspect::Platform;

use super::{verify_list, SectionContext};

pub const BASE_LIST: &str = "packages.txt";
pub const SPOTIFY_LIST: &str = "packages-spotify.txt";
pub const AUTOHOTSPOT_LIST: &str = "packages-autohotspot.txt";
pub const RASPBERRY_PI_LIST: &str = "packages-raspberrypi.txt";

/// Lists that apply to this installation, relative to the jukebox directory.
pub fn package_lists(ctx: &SectionContext<'_>) -> Vec<&'static str> {
    let mut lists = vec![BASE_LIST];
    if ctx.config.spotify_enabled() {
        lists.push(SPOTIFY_LIST);
    }
    if ctx.config.autohotspot_enabled() {
        lists.push(AUTOHOTSPOT_LIST);
    }
    // Board packages don't exist on the x86 machines the installer is tested on
    if ctx.platform == Platform::RaspberryPi {
        lists.push(RASPBERRY_PI_LIST);
    }
    lists
}

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let installed = match checker.inspector().installed_packages() {
        Ok(installed) => installed,
        Err(e) => {
            checker
                .report()
                .error(format!("cannot list installed packages: {}", e));
            BTreeSet::new()
        }
    };

    for list in package_lists(ctx) {
        verify_list(checker, &ctx.layout.list_file(list), &installed, PackageKind::Os);
    }
}
