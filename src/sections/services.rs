//! Jukebox systemd units.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const UNIT_DIR: &str = "/etc/systemd/system";

pub const JUKEBOX_UNITS: [&str; 3] = [
    "phoniebox-rfid-reader.service",
    "phoniebox-startup-scripts.service",
    "phoniebox-idle-watchdog.service",
];

/// Only installed when GPIO buttons were configured.
pub const GPIO_UNIT: &str = "phoniebox-gpio-control.service";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(UNIT_DIR),
        &JUKEBOX_UNITS,
    ));
    for unit in JUKEBOX_UNITS {
        checker.check_service_enablement(unit, "enabled");
    }

    if ctx.config.gpio_enabled() {
        checker.check_permissions(&ExpectedFileState::new(
            0o644,
            "root",
            "root",
            Path::new(UNIT_DIR),
            &[GPIO_UNIT],
        ));
        checker.check_service_enablement(GPIO_UNIT, "enabled");
    }
}
