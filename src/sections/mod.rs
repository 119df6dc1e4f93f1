//! Verification sections, one per appliance subsystem.
//!
//! Each section is a fixed sequence of check primitives parameterized by the
//! installation config. Sections return nothing; their only effect is on
//! the [`Checker`] they are handed.

pub mod folders;
pub mod hotspot;
pub mod modules;
pub mod mpd;
pub mod packages;
pub mod samba;
pub mod services;
pub mod spotify;
pub mod webserver;
pub mod wifi;

use std::collections::BTreeSet;
use std::path::Path;

use crate::check::{Checker, PackageKind};
use crate::config::Layout;
use crate::inspect::Platform;
use crate::record::InstallConfig;
use crate::requirements::load_requirements;

/// Read-only inputs shared by every section.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub layout: &'a Layout,
    pub config: &'a InstallConfig,
    pub platform: Platform,
}

/// The sections in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Wifi,
    Packages,
    Modules,
    Samba,
    WebServer,
    Services,
    Spotify,
    Mpd,
    Autohotspot,
    Folders,
}

impl Section {
    /// Fixed run order.
    pub const ORDER: [Section; 10] = [
        Section::Wifi,
        Section::Packages,
        Section::Modules,
        Section::Samba,
        Section::WebServer,
        Section::Services,
        Section::Spotify,
        Section::Mpd,
        Section::Autohotspot,
        Section::Folders,
    ];

    /// Heading printed before the section's diagnostics.
    pub fn title(self) -> &'static str {
        match self {
            Section::Wifi => "WiFi settings",
            Section::Packages => "installed packages",
            Section::Modules => "installed python modules",
            Section::Samba => "samba config",
            Section::WebServer => "webserver config",
            Section::Services => "systemd services",
            Section::Spotify => "spotify config",
            Section::Mpd => "mpd config",
            Section::Autohotspot => "autohotspot settings",
            Section::Folders => "folder access",
        }
    }

    /// Whether the section runs for this installation.
    pub fn applies(self, config: &InstallConfig) -> bool {
        match self {
            Section::Wifi => config.wifi_enabled(),
            Section::Spotify => config.spotify_enabled(),
            Section::Autohotspot => config.autohotspot_enabled(),
            Section::Packages
            | Section::Modules
            | Section::Samba
            | Section::WebServer
            | Section::Services
            | Section::Mpd
            | Section::Folders => true,
        }
    }

    /// Run the section's checks.
    pub fn run(self, ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
        match self {
            Section::Wifi => wifi::verify(ctx, checker),
            Section::Packages => packages::verify(ctx, checker),
            Section::Modules => modules::verify(ctx, checker),
            Section::Samba => samba::verify(ctx, checker),
            Section::WebServer => webserver::verify(ctx, checker),
            Section::Services => services::verify(ctx, checker),
            Section::Spotify => spotify::verify(ctx, checker),
            Section::Mpd => mpd::verify(ctx, checker),
            Section::Autohotspot => hotspot::verify(ctx, checker),
            Section::Folders => folders::verify(ctx, checker),
        }
    }
}

/// Check every name in one list file against an installed-name snapshot.
///
/// An unreadable list counts as a single failed check.
pub(crate) fn verify_list(
    checker: &mut Checker<'_>,
    list: &Path,
    installed: &BTreeSet<String>,
    kind: PackageKind,
) {
    match load_requirements(checker.inspector(), list) {
        Ok(names) => {
            tracing::debug!(list = %list.display(), count = names.len(), "checking list");
            for name in names {
                checker.check_installed(&name, installed, kind);
            }
        }
        Err(e) => checker.fail(format!("cannot read {}: {}", list.display(), e)),
    }
}
