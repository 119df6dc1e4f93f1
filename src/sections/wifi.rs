//! Static IP and WLAN credentials written by the installer.

use std::path::Path;

use crate::check::{Checker, ExpectedFileState};

use super::SectionContext;

const DHCPCD_DIR: &str = "/etc";
const WPA_SUPPLICANT_DIR: &str = "/etc/wpa_supplicant";

pub fn verify(ctx: &SectionContext<'_>, checker: &mut Checker<'_>) {
    let Some(wifi) = ctx.config.wifi.as_ref() else {
        return;
    };

    let dhcpcd_conf = Path::new(DHCPCD_DIR).join("dhcpcd.conf");
    let wpa_conf = Path::new(WPA_SUPPLICANT_DIR).join("wpa_supplicant.conf");

    checker.check_file_contains(&format!("static ip_address={}/24", wifi.ip), &dhcpcd_conf);
    checker.check_file_contains(&format!("static routers={}", wifi.router_ip), &dhcpcd_conf);
    checker.check_file_contains(
        &format!("static domain_name_servers={}", wifi.router_ip),
        &dhcpcd_conf,
    );

    checker.check_file_contains(&format!("country={}", wifi.country_code), &wpa_conf);
    checker.check_file_contains(&format!("ssid=\"{}\"", wifi.ssid), &wpa_conf);
    checker.check_file_contains(&format!("psk=\"{}\"", wifi.pass), &wpa_conf);

    checker.check_permissions(&ExpectedFileState::new(
        0o664,
        "root",
        "netdev",
        Path::new(DHCPCD_DIR),
        &["dhcpcd.conf"],
    ));
    checker.check_permissions(&ExpectedFileState::new(
        0o664,
        "root",
        "netdev",
        Path::new(WPA_SUPPLICANT_DIR),
        &["wpa_supplicant.conf"],
    ));
}
