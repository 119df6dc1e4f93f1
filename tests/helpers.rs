//! Shared test utilities for jukebox-verify tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use jukebox_verify::config::Layout;
use jukebox_verify::inspect::{contains_word, normalize_module_name, FileMeta, InspectionError, Platform, SystemInspector};
use jukebox_verify::record::InstallConfig;
use jukebox_verify::verify::RunOptions;
use tempfile::TempDir;

pub const AUDIO_FOLDERS: &str = "/home/pi/RPi-Jukebox-RFID/shared/audiofolders";
pub const PHP_VERSION: &str = "7.4";

/// In-memory system state.
#[derive(Default)]
pub struct FakeInspector {
    pub metas: HashMap<PathBuf, FileMeta>,
    pub files: HashMap<PathBuf, String>,
    pub dirs: HashMap<PathBuf, Vec<String>>,
    pub active: HashMap<String, String>,
    pub enablement: HashMap<String, String>,
    pub packages: BTreeSet<String>,
    pub modules: BTreeSet<String>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(&mut self, path: impl AsRef<Path>, mode: u32, owner: &str, group: &str) -> &mut Self {
        self.metas
            .insert(path.as_ref().to_path_buf(), FileMeta::new(mode, owner, group));
        self
    }

    /// Append a line to a file, creating it if needed.
    pub fn file_line(&mut self, path: impl AsRef<Path>, line: &str) -> &mut Self {
        let content = self.files.entry(path.as_ref().to_path_buf()).or_default();
        content.push_str(line);
        content.push('\n');
        self
    }

    pub fn dir(&mut self, path: impl AsRef<Path>, entries: &[&str]) -> &mut Self {
        let mut entries: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
        entries.sort();
        self.dirs.insert(path.as_ref().to_path_buf(), entries);
        self
    }

    pub fn service(&mut self, name: &str, active: &str, enabled: &str) -> &mut Self {
        self.active.insert(name.to_string(), active.to_string());
        self.enablement.insert(name.to_string(), enabled.to_string());
        self
    }

    pub fn package(&mut self, name: &str) -> &mut Self {
        self.packages.insert(name.to_lowercase());
        self
    }

    pub fn module(&mut self, name: &str) -> &mut Self {
        self.modules.insert(normalize_module_name(name));
        self
    }
}

impl SystemInspector for FakeInspector {
    fn file_meta(&self, path: &Path) -> Result<FileMeta, InspectionError> {
        self.metas
            .get(path)
            .cloned()
            .ok_or_else(|| InspectionError::NotFound(path.to_path_buf()))
    }

    fn file_contains(&self, needle: &str, path: &Path) -> Result<bool, InspectionError> {
        Ok(contains_word(&self.read_file(path)?, needle))
    }

    fn service_active_state(&self, name: &str) -> Result<String, InspectionError> {
        Ok(self
            .active
            .get(name)
            .cloned()
            .unwrap_or_else(|| "inactive".to_string()))
    }

    fn service_enablement(&self, name: &str) -> Result<String, InspectionError> {
        self.enablement.get(name).cloned().ok_or_else(|| {
            InspectionError::Command(format!(
                "Failed to get unit file state for {}: No such file or directory",
                name
            ))
        })
    }

    fn installed_packages(&self) -> Result<BTreeSet<String>, InspectionError> {
        Ok(self.packages.clone())
    }

    fn installed_pip_modules(&self) -> Result<BTreeSet<String>, InspectionError> {
        Ok(self.modules.clone())
    }

    fn read_file(&self, path: &Path) -> Result<String, InspectionError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| InspectionError::NotFound(path.to_path_buf()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, InspectionError> {
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| InspectionError::NotFound(path.to_path_buf()))
    }
}

/// Feature switches for a generated installation record.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub wifi: bool,
    pub spotify: bool,
    pub gpio: bool,
    /// Raw `AUTOHOTSPOTconfig` value; `None` leaves the key out.
    pub autohotspot: Option<&'static str>,
}

fn yes_no(on: bool) -> &'static str {
    if on {
        "YES"
    } else {
        "NO"
    }
}

/// Record text as the installer would write it.
pub fn record_text(opts: &RecordOptions) -> String {
    let mut text = format!(
        "EXISTINGuse=\"NO\"\nAUDIOiFace=\"PCM\"\nMPDconfig=\"YES\"\nDIRaudioFolders=\"{}\"\nGPIOconfig=\"{}\"\nWIFIconfig=\"{}\"\nSPOTinstall=\"{}\"\n",
        AUDIO_FOLDERS,
        yes_no(opts.gpio),
        yes_no(opts.wifi),
        yes_no(opts.spotify),
    );
    if opts.wifi {
        text.push_str("WIFIcountryCode=\"DE\"\nWIFIssid=\"HomeNet\"\nWIFIpass=\"wifisecret\"\nWIFIip=\"192.168.1.50\"\nWIFIipRouter=\"192.168.1.1\"\n");
    }
    if opts.spotify {
        text.push_str("SPOTIuser=\"listener\"\nSPOTIpass=\"spotsecret\"\nSPOTIclientid=\"cid123\"\nSPOTIclientsecret=\"csecret456\"\n");
    }
    if let Some(value) = opts.autohotspot {
        text.push_str(&format!("AUTOHOTSPOTconfig=\"{}\"\n", value));
        text.push_str("AUTOHOTSPOTssid=\"Phoniebox_Hotspot\"\nAUTOHOTSPOTcountryCode=\"DE\"\nAUTOHOTSPOTpass=\"PlayItLoud\"\nAUTOHOTSPOTip=\"10.0.0.5\"\n");
    }
    text
}

/// Test environment with a temporary home directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    pub layout: Layout,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().join("home/pi");
        fs::create_dir_all(&home).expect("Failed to create home dir");
        let layout = Layout::new(home, "pi");
        Self {
            _temp_dir: temp_dir,
            layout,
        }
    }

    /// Write the installation record into the fake home.
    pub fn write_record(&self, text: &str) {
        fs::write(self.layout.record_path(), text).expect("Failed to write record");
    }

    pub fn options(&self, platform: Platform, install_exit_code: i32) -> RunOptions {
        RunOptions {
            layout: self.layout.clone(),
            platform,
            install_exit_code,
        }
    }
}

/// A system on which every check for `config` passes.
pub fn healthy_system(layout: &Layout, config: &InstallConfig) -> FakeInspector {
    let mut fake = FakeInspector::new();
    let jukebox = layout.jukebox_dir.clone();
    let folders = config.audio_folders.display().to_string();

    // Package lists
    for (list, names) in [
        ("packages.txt", &["samba", "lighttpd", "mpd"][..]),
        ("packages-spotify.txt", &["mopidy", "mopidy-spotify"][..]),
        ("packages-autohotspot.txt", &["hostapd", "dnsmasq"][..]),
        ("packages-raspberrypi.txt", &["raspberrypi-kernel-headers"][..]),
    ] {
        fake.file_line(jukebox.join(list), "# installed by the jukebox installer");
        for name in names {
            fake.file_line(jukebox.join(list), name).package(name);
        }
    }

    // Requirement lists
    fake.file_line(jukebox.join("requirements.txt"), "evdev>=1.3")
        .file_line(jukebox.join("requirements.txt"), "RPi.GPIO")
        .file_line(jukebox.join("requirements-spotify.txt"), "spotipy==2.19.0")
        .file_line(
            jukebox.join("components/rfid-reader/RC522/requirements.txt"),
            "git+https://github.com/ondryaso/pi-rc522.git#egg=pi-rc522",
        )
        .file_line(jukebox.join("components/rfid-reader/PN532/requirements.txt"), "py532lib")
        .file_line(layout.device_name_file(), "MFRC522");
    for module in ["evdev", "RPi.GPIO", "spotipy", "pi-rc522", "py532lib"] {
        fake.module(module);
    }

    // Samba
    fake.meta("/etc/samba/smb.conf", 0o644, "root", "root")
        .file_line("/etc/samba/smb.conf", &format!("path={}", folders))
        .service("smbd.service", "active", "enabled");

    // Web server
    fake.meta("/etc/lighttpd/lighttpd.conf", 0o644, "root", "root")
        .meta("/etc/lighttpd/conf-available/15-fastcgi-php.conf", 0o644, "root", "root")
        .dir("/etc/php", &[PHP_VERSION])
        .meta(format!("/etc/php/{}/cgi/php.ini", PHP_VERSION), 0o644, "root", "root")
        .meta("/etc/sudoers.d/www-data", 0o440, "root", "root")
        .file_line("/etc/sudoers.d/www-data", "www-data ALL=(ALL) NOPASSWD: ALL")
        .service("lighttpd.service", "active", "enabled");

    // Jukebox units
    for unit in [
        "phoniebox-rfid-reader.service",
        "phoniebox-startup-scripts.service",
        "phoniebox-idle-watchdog.service",
        "phoniebox-gpio-control.service",
    ] {
        fake.meta(Path::new("/etc/systemd/system").join(unit), 0o644, "root", "root")
            .service(unit, "active", "enabled");
    }

    // MPD
    fake.meta("/etc/mpd.conf", 0o640, "mpd", "audio")
        .file_line("/etc/mpd.conf", &format!("music_directory \"{}\"", folders))
        .file_line("/etc/mpd.conf", &format!("mixer_control \"{}\"", config.audio_iface))
        .service("mpd.service", "active", "enabled");

    // Folders
    for dir in ["playlists", "shared", "htdocs", "settings"] {
        fake.meta(jukebox.join(dir), 0o775, "www-data", "www-data");
    }
    fake.meta(&config.audio_folders, 0o775, "www-data", "www-data")
        .dir(
            &jukebox,
            &["htdocs", "install.sh", "playlists", "scripts", "settings", "shared"],
        )
        .meta(jukebox.join("install.sh"), 0o755, "pi", "pi");

    if let Some(wifi) = &config.wifi {
        fake.file_line("/etc/dhcpcd.conf", "interface wlan0")
            .file_line("/etc/dhcpcd.conf", &format!("static ip_address={}/24", wifi.ip))
            .file_line("/etc/dhcpcd.conf", &format!("static routers={}", wifi.router_ip))
            .file_line(
                "/etc/dhcpcd.conf",
                &format!("static domain_name_servers={}", wifi.router_ip),
            )
            .file_line(
                "/etc/wpa_supplicant/wpa_supplicant.conf",
                &format!("country={}", wifi.country_code),
            )
            .file_line("/etc/wpa_supplicant/wpa_supplicant.conf", "network={")
            .file_line(
                "/etc/wpa_supplicant/wpa_supplicant.conf",
                &format!("    ssid=\"{}\"", wifi.ssid),
            )
            .file_line(
                "/etc/wpa_supplicant/wpa_supplicant.conf",
                &format!("    psk=\"{}\"", wifi.pass),
            )
            .file_line("/etc/wpa_supplicant/wpa_supplicant.conf", "}")
            .meta("/etc/dhcpcd.conf", 0o664, "root", "netdev")
            .meta("/etc/wpa_supplicant/wpa_supplicant.conf", 0o664, "root", "netdev");
    }

    if let Some(spotify) = &config.spotify {
        let user_dir = layout.user_mopidy_dir();
        for line in [
            format!("username = {}", spotify.user),
            format!("password = {}", spotify.pass),
            format!("client_id = {}", spotify.client_id),
            format!("client_secret = {}", spotify.client_secret),
            format!("media_dir = {}", folders),
        ] {
            fake.file_line("/etc/mopidy/mopidy.conf", &line)
                .file_line(user_dir.join("mopidy.conf"), &line);
        }
        fake.meta("/etc/mopidy/mopidy.conf", 0o640, "root", "mopidy")
            .meta(user_dir.join("mopidy.conf"), 0o644, &layout.user, &layout.user)
            .service("mopidy.service", "active", "enabled");
    }

    if let Some(hotspot) = &config.autohotspot {
        fake.file_line("/etc/dnsmasq.conf", "interface=wlan0")
            .file_line("/etc/hostapd/hostapd.conf", "interface=wlan0")
            .file_line("/etc/hostapd/hostapd.conf", &format!("ssid={}", hotspot.ssid))
            .file_line(
                "/etc/hostapd/hostapd.conf",
                &format!("wpa_passphrase={}", hotspot.pass),
            )
            .file_line(
                "/etc/hostapd/hostapd.conf",
                &format!("country_code={}", hotspot.country_code),
            )
            .file_line(
                "/etc/default/hostapd",
                "DAEMON_CONF=\"/etc/hostapd/hostapd.conf\"",
            )
            .file_line("/etc/dhcpcd.conf", "nohook wpa_supplicant")
            .file_line(
                "/usr/bin/autohotspot",
                &format!("ip a add {}/24 brd + dev wlan0", hotspot.ip),
            )
            .meta("/usr/bin/autohotspot", 0o755, "root", "root")
            .meta("/etc/systemd/system/autohotspot.service", 0o644, "root", "root")
            .meta("/etc/cron.d/autohotspot", 0o644, "root", "root")
            .service("autohotspot.service", "active", "enabled")
            .service("hostapd.service", "inactive", "disabled")
            .service("dnsmasq.service", "inactive", "disabled");
    }

    fake
}

/// Parse record text that is known to be valid.
pub fn config_for(opts: &RecordOptions) -> InstallConfig {
    InstallConfig::parse(&record_text(opts)).expect("fixture record should be valid")
}
