//! The installer's configuration record.
//!
//! The installer writes `KEY="value"` lines to `PhonieboxInstall.conf` in the
//! jukebox user's home. This module parses that record into [`InstallConfig`]
//! and validates that every key the chosen features depend on is present.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Gate value that switches a feature on.
pub const YES: &str = "YES";
/// Gate value that switches a feature off.
pub const NO: &str = "NO";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("installation config not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("cannot read installation config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Keys that are required but absent or empty, in validation order.
    #[error("installation config is invalid: {} missing or not set", .0.join(", "))]
    Invalid(Vec<String>),
}

/// Read the raw record text.
pub fn read_record(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::Missing(path.to_path_buf())
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Parse `KEY=value` lines. One pair of quotes around a value is stripped, blank lines
/// and `#` comments are skipped, and a repeated key keeps its last value.
pub fn parse_record(text: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            values.insert(key.to_string(), unquote(value.trim()).to_string());
        }
    }
    values
}

/// Remove one matching pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .unwrap_or(value)
}

/// True if a gate value switches its feature on.
pub fn is_yes(value: &str) -> bool {
    value == YES
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiSettings {
    pub country_code: String,
    pub ssid: String,
    pub pass: String,
    pub ip: String,
    pub router_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifySettings {
    pub user: String,
    pub pass: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotspotSettings {
    pub ssid: String,
    pub country_code: String,
    pub pass: String,
    pub ip: String,
}

/// Validated installation configuration.
///
/// Feature blocks are `Some` exactly when their gate is `"YES"`.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub existing_use: String,
    pub audio_iface: String,
    pub mpd_config: String,
    pub audio_folders: PathBuf,
    pub gpio_config: String,
    pub wifi_config: String,
    pub spot_install: String,
    /// Unlike the other gates this key may be absent altogether.
    pub autohotspot_config: Option<String>,
    pub wifi: Option<WifiSettings>,
    pub spotify: Option<SpotifySettings>,
    pub autohotspot: Option<HotspotSettings>,
}

/// Collects missing keys while fields are pulled out of the record.
struct Fields<'a> {
    values: &'a BTreeMap<String, String>,
    missing: Vec<String>,
}

impl<'a> Fields<'a> {
    fn required(&mut self, key: &str) -> String {
        match self.values.get(key).filter(|v| !v.is_empty()) {
            Some(value) => value.clone(),
            None => {
                self.missing.push(key.to_string());
                String::new()
            }
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl InstallConfig {
    /// Parse and validate record text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::from_values(&parse_record(text))
    }

    /// Validate parsed values. Every missing key is collected before failing.
    pub fn from_values(values: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut f = Fields {
            values,
            missing: Vec::new(),
        };

        let existing_use = f.required("EXISTINGuse");
        let audio_iface = f.required("AUDIOiFace");
        let mpd_config = f.required("MPDconfig");
        let audio_folders = PathBuf::from(f.required("DIRaudioFolders"));
        let gpio_config = f.required("GPIOconfig");
        let wifi_config = f.required("WIFIconfig");
        let spot_install = f.required("SPOTinstall");
        let autohotspot_config = f.optional("AUTOHOTSPOTconfig");

        let wifi = is_yes(&wifi_config).then(|| WifiSettings {
            country_code: f.required("WIFIcountryCode"),
            ssid: f.required("WIFIssid"),
            pass: f.required("WIFIpass"),
            ip: f.required("WIFIip"),
            router_ip: f.required("WIFIipRouter"),
        });

        let spotify = is_yes(&spot_install).then(|| SpotifySettings {
            user: f.required("SPOTIuser"),
            pass: f.required("SPOTIpass"),
            client_id: f.required("SPOTIclientid"),
            client_secret: f.required("SPOTIclientsecret"),
        });

        let autohotspot = hotspot_gate(autohotspot_config.as_deref()).then(|| HotspotSettings {
            ssid: f.required("AUTOHOTSPOTssid"),
            country_code: f.required("AUTOHOTSPOTcountryCode"),
            pass: f.required("AUTOHOTSPOTpass"),
            ip: f.required("AUTOHOTSPOTip"),
        });

        if !f.missing.is_empty() {
            return Err(ConfigError::Invalid(f.missing));
        }

        Ok(Self {
            existing_use,
            audio_iface,
            mpd_config,
            audio_folders,
            gpio_config,
            wifi_config,
            spot_install,
            autohotspot_config,
            wifi,
            spotify,
            autohotspot,
        })
    }

    /// Wi-Fi was configured by the installer.
    pub fn wifi_enabled(&self) -> bool {
        is_yes(&self.wifi_config)
    }

    /// Spotify (mopidy) replaces MPD as the audio backend.
    pub fn spotify_enabled(&self) -> bool {
        is_yes(&self.spot_install)
    }

    /// MPD is the audio backend and must start at boot.
    pub fn mpd_is_backend(&self) -> bool {
        self.spot_install == NO
    }

    /// The auto-hotspot was configured by the installer.
    pub fn autohotspot_enabled(&self) -> bool {
        hotspot_gate(self.autohotspot_config.as_deref())
    }

    /// GPIO buttons were configured by the installer.
    pub fn gpio_enabled(&self) -> bool {
        is_yes(&self.gpio_config)
    }
}

/// The hotspot gate: key set, non-empty, and "YES".
fn hotspot_gate(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && is_yes(v))
}
