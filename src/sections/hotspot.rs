//! Auto-hotspot: access point fallback when no known WLAN is in range.
//!
//! hostapd and dnsmasq are started by the autohotspot script, not by
//! systemd, so both must stay disabled while `autohotspot.service` is enabled.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const DNSMASQ_CONF: &str = "/etc/dnsmasq.conf";
const HOSTAPD_CONF: &str = "/etc/hostapd/hostapd.conf";
const HOSTAPD_DEFAULTS: &str = "/etc/default/hostapd";
const DHCPCD_CONF: &str = "/etc/dhcpcd.conf";
const SCRIPT_DIR: &str = "/usr/bin";
const UNIT_DIR: &str = "/etc/systemd/system";
const CRON_DIR: &str = "/etc/cron.d";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let Some(hotspot) = ctx.config.autohotspot.as_ref() else {
        return;
    };

    let hostapd_conf = Path::new(HOSTAPD_CONF);
    let script = Path::new(SCRIPT_DIR).join("autohotspot");

    checker.check_file_contains("interface=wlan0", Path::new(DNSMASQ_CONF));

    checker.check_file_contains("interface=wlan0", hostapd_conf);
    checker.check_file_contains(&format!("ssid={}", hotspot.ssid), hostapd_conf);
    checker.check_file_contains(&format!("wpa_passphrase={}", hotspot.pass), hostapd_conf);
    checker.check_file_contains(&format!("country_code={}", hotspot.country_code), hostapd_conf);

    checker.check_file_contains(
        &format!("DAEMON_CONF=\"{}\"", HOSTAPD_CONF),
        Path::new(HOSTAPD_DEFAULTS),
    );
    checker.check_file_contains("nohook wpa_supplicant", Path::new(DHCPCD_CONF));
    checker.check_file_contains(&hotspot.ip, &script);

    checker.check_permissions(&ExpectedFileState::new(
        0o755,
        "root",
        "root",
        Path::new(SCRIPT_DIR),
        &["autohotspot"],
    ));
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(UNIT_DIR),
        &["autohotspot.service"],
    ));
    checker.check_permissions(&ExpectedFileState::new(
        0o644,
        "root",
        "root",
        Path::new(CRON_DIR),
        &["autohotspot"],
    ));

    checker.check_service_enablement("autohotspot.service", "enabled");
    checker.check_service_enablement("hostapd.service", "disabled");
    checker.check_service_enablement("dnsmasq.service", "disabled");
}
