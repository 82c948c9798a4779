/// Hardware identity for license binding
use crate::utils::platform::{arch_name, platform_name};

const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Resolve the hardware identifier of this machine
///
/// Format: `<platform>_<arch>_<mac>` where `mac` is the first adapter
/// (by name) that is physical, not loopback and has a non-zero address.
/// Virtual devices (bridges, veth pairs, tunnels) are skipped because
/// their addresses change when they are recreated.
///
/// When no adapter qualifies the MAC segment is left empty and the
/// trailing underscore is kept, e.g. `linux_x64_`. Never fails.
///
/// The id is not collision-proof or tamper-proof; it only needs to be
/// stable for one machine across restarts.
pub fn resolve_hardware_id() -> String {
    let mac = first_mac_address().unwrap_or_default();
    compose_hardware_id(platform_name(), arch_name(), &mac)
}

pub(crate) fn compose_hardware_id(platform: &str, arch: &str, mac: &str) -> String {
    format!("{}_{}_{}", platform, arch, mac)
}

/// A network adapter as seen by the resolver
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Adapter {
    pub name: String,
    pub mac: String,
    /// Loopback
    pub internal: bool,
    /// Backed by hardware with a burned-in address. Bridges, veth pairs
    /// and tunnels get a fresh MAC whenever they are recreated.
    pub physical: bool,
}

/// Pick the first qualifying MAC, in adapter name order
pub(crate) fn select_mac(mut adapters: Vec<Adapter>) -> Option<String> {
    adapters.sort_by(|a, b| a.name.cmp(&b.name));
    adapters
        .into_iter()
        .filter(|a| !a.internal && a.physical)
        .map(|a| a.mac.trim().to_ascii_lowercase())
        .find(|mac| is_usable_mac(mac))
}

fn is_usable_mac(mac: &str) -> bool {
    let octets: Vec<&str> = mac.split(':').collect();
    octets.len() == 6
        && octets.iter().all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
        && mac != ZERO_MAC
}

fn first_mac_address() -> Option<String> {
    select_mac(list_adapters())
}

#[cfg(target_os = "linux")]
fn list_adapters() -> Vec<Adapter> {
    scan_sysfs(std::path::Path::new("/sys/class/net"))
}

/// Read adapters from a `/sys/class/net` style tree
///
/// An adapter counts as physical only if it has a `device` link and its
/// `addr_assign_type` is 0 (permanent address).
#[cfg(any(target_os = "linux", test))]
pub(crate) fn scan_sysfs(root: &std::path::Path) -> Vec<Adapter> {
    use std::fs;

    // ARPHRD_LOOPBACK
    const LOOPBACK_TYPE: &str = "772";
    // NET_ADDR_PERM
    const PERMANENT_ADDR: &str = "0";

    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let base = entry.path();
            let mac = fs::read_to_string(base.join("address")).ok()?;
            let internal = fs::read_to_string(base.join("type"))
                .map(|t| t.trim() == LOOPBACK_TYPE)
                .unwrap_or(name == "lo");
            let permanent = fs::read_to_string(base.join("addr_assign_type"))
                .map(|t| t.trim() == PERMANENT_ADDR)
                .unwrap_or(true);
            let physical = base.join("device").exists() && permanent;
            Some(Adapter {
                name,
                mac,
                internal,
                physical,
            })
        })
        .collect()
}

#[cfg(target_os = "macos")]
fn list_adapters() -> Vec<Adapter> {
    use std::process::Command;

    let Ok(output) = Command::new("ifconfig").output() else {
        return Vec::new();
    };
    parse_ifconfig(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `ifconfig` output: interface headers start at column 0,
/// addresses appear on indented `ether` lines.
#[cfg(any(target_os = "macos", test))]
pub(crate) fn parse_ifconfig(text: &str) -> Vec<Adapter> {
    let mut adapters = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if !line.starts_with(|c: char| c.is_whitespace()) {
            current = line.split(':').next().map(|n| n.trim().to_string());
            continue;
        }
        let trimmed = line.trim();
        if let (Some(name), Some(rest)) = (&current, trimmed.strip_prefix("ether ")) {
            if let Some(mac) = rest.split_whitespace().next() {
                adapters.push(Adapter {
                    name: name.clone(),
                    mac: mac.to_string(),
                    internal: name.starts_with("lo"),
                    physical: !is_virtual_darwin_interface(name),
                });
            }
        }
    }
    adapters
}

#[cfg(windows)]
fn list_adapters() -> Vec<Adapter> {
    use std::process::Command;

    let Ok(output) = Command::new("getmac").args(["/fo", "csv", "/nh"]).output() else {
        return Vec::new();
    };
    parse_getmac(&String::from_utf8_lossy(&output.stdout))
}

/// Interfaces macOS creates on demand with generated addresses
#[cfg(any(target_os = "macos", test))]
fn is_virtual_darwin_interface(name: &str) -> bool {
    const PREFIXES: [&str; 6] = ["bridge", "awdl", "llw", "utun", "vmenet", "anpi"];
    PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Parse `getmac /fo csv /nh` output: `"AA-BB-CC-DD-EE-FF","\Device\Tcpip_{...}"`
#[cfg(any(windows, test))]
pub(crate) fn parse_getmac(text: &str) -> Vec<Adapter> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split(',').map(|f| f.trim().trim_matches('"'));
            let mac = fields.next()?.replace('-', ":");
            let name = fields.next().unwrap_or_default().to_string();
            Some(Adapter {
                name,
                mac,
                internal: false,
                physical: true,
            })
        })
        .collect()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn list_adapters() -> Vec<Adapter> {
    Vec::new()
}
