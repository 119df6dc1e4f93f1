//! Configuration management for jukebox-verify.
//!
//! Resolves where the jukebox was installed and which account owns it.
//! Values come from the command line, which clap also fills from the
//! environment (and from a `.env` file loaded in `main`).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Installation directory name below the home directory.
pub const DEFAULT_JUKEBOX_DIR_NAME: &str = "RPi-Jukebox-RFID";

/// File name of the record the installer leaves in the home directory.
pub const RECORD_FILE_NAME: &str = "PhonieboxInstall.conf";

/// Filesystem layout of one jukebox installation.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Home directory of the jukebox account.
    pub home: PathBuf,
    /// Account the jukebox was installed for.
    pub user: String,
    /// Checkout the installer ran from.
    pub jukebox_dir: PathBuf,
}

impl Layout {
    /// Layout with the installation directory in its default place.
    pub fn new(home: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        let home = home.into();
        let jukebox_dir = home.join(DEFAULT_JUKEBOX_DIR_NAME);
        Self {
            home,
            user: user.into(),
            jukebox_dir,
        }
    }

    /// Override the installation directory. Relative paths are taken from home.
    pub fn with_jukebox_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.jukebox_dir = if dir.is_absolute() {
            dir
        } else {
            self.home.join(dir)
        };
        self
    }

    /// Fill unset values from the running account.
    ///
    /// Home defaults to the current home directory; user defaults to `$USER`,
    /// then to the last component of home.
    pub fn resolve(
        home: Option<PathBuf>,
        user: Option<String>,
        jukebox_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let home = home
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("Cannot determine home directory. Pass --home or set JUKEBOX_HOME."))?;

        let user = user
            .filter(|u| !u.is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .or_else(|| {
                home.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .ok_or_else(|| anyhow!("Cannot determine jukebox user. Pass --user or set JUKEBOX_USER."))?;

        let layout = Self::new(home, user);
        Ok(match jukebox_dir {
            Some(dir) => layout.with_jukebox_dir(dir),
            None => layout,
        })
    }

    /// Path of the installer's configuration record.
    pub fn record_path(&self) -> PathBuf {
        self.home.join(RECORD_FILE_NAME)
    }

    /// File holding the configured RFID reader model.
    pub fn device_name_file(&self) -> PathBuf {
        self.jukebox_dir.join("scripts/deviceName.txt")
    }

    /// A package or requirement list shipped in the installation directory.
    pub fn list_file(&self, relative: &str) -> PathBuf {
        self.jukebox_dir.join(relative)
    }

    /// Directory of the per-user mopidy configuration.
    pub fn user_mopidy_dir(&self) -> PathBuf {
        self.home.join(".config/mopidy")
    }

    pub fn jukebox_dir(&self) -> &Path {
        &self.jukebox_dir
    }
}
