//! Python modules from the installer's requirement files.

use std::collections::BTreeSet;

use crate::check::{Checker, PackageKind};
use crate::config::Layout;
use crate::inspect::SystemInspector;

use super::{verify_list, SectionContext};

pub const BASE_REQUIREMENTS: &str = "requirements.txt";
pub const SPOTIFY_REQUIREMENTS: &str = "requirements-spotify.txt";
pub const RC522_REQUIREMENTS: &str = "components/rfid-reader/RC522/requirements.txt";
pub const PN532_REQUIREMENTS: &str = "components/rfid-reader/PN532/requirements.txt";

/// RFID reader whose driver modules the installer added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderDriver {
    Mfrc522,
    Pn532,
}

impl ReaderDriver {
    /// Match the recorded device name. Only the exact names select a driver.
    pub fn from_device_name(name: &str) -> Option<Self> {
        match name {
            "MFRC522" => Some(ReaderDriver::Mfrc522),
            "PN532" => Some(ReaderDriver::Pn532),
            _ => None,
        }
    }

    pub fn requirements(self) -> &'static str {
        match self {
            ReaderDriver::Mfrc522 => RC522_REQUIREMENTS,
            ReaderDriver::Pn532 => PN532_REQUIREMENTS,
        }
    }
}

/// Driver selected by the device name file, if any.
///
/// The file must hold exactly one recognised name; trailing newlines are ignored.
pub fn reader_driver(inspector: &dyn SystemInspector, layout: &Layout) -> Option<ReaderDriver> {
    let path = layout.device_name_file();
    match inspector.read_file(&path) {
        Ok(content) => ReaderDriver::from_device_name(content.trim_end_matches(['\n', '\r'])),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no reader device recorded");
            None
        }
    }
}

/// Requirement files that apply to this installation.
pub fn requirement_lists(ctx: &SectionContext<'_>, reader: Option<ReaderDriver>) -> Vec<&'static str> {
    let mut lists = vec![BASE_REQUIREMENTS];
    if ctx.config.spotify_enabled() {
        lists.push(SPOTIFY_REQUIREMENTS);
    }
    if let Some(driver) = reader {
        lists.push(driver.requirements());
    }
    lists
}

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let installed = match checker.inspector().installed_pip_modules() {
        Ok(installed) => installed,
        Err(e) => {
            checker
                .report()
                .error(format!("cannot list python modules: {}", e));
            BTreeSet::new()
        }
    };

    let reader = reader_driver(checker.inspector(), ctx.layout);
    for list in requirement_lists(ctx, reader) {
        verify_list(checker, &ctx.layout.list_file(list), &installed, PackageKind::Python);
    }
}
