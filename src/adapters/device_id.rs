//! Device identity: the network address used as the directory key.
//!
//! Every monitor shares one contact file, so each must find its own row.
//! The key is the first IPv4 address on the configured interface
//! (`eth0` by default) unless `device_address` pins it explicitly, e.g.
//! for Wi-Fi-only boards or NAT'd deployments.

use std::net::IpAddr;

use crate::config::MonitorConfig;
use crate::error::{Error, Result};

/// Resolve this monitor's directory key.
pub fn resolve(config: &MonitorConfig) -> Result<String> {
    if let Some(addr) = config.device_address.as_deref() {
        let addr = addr.trim();
        if !addr.is_empty() {
            return Ok(addr.to_string());
        }
    }

    let ifaces = if_addrs::get_if_addrs()
        .map_err(|e| Error::Address(format!("cannot list network interfaces: {e}")))?;
    select_ipv4(
        &config.interface,
        ifaces.iter().map(|iface| (iface.name.as_str(), iface.ip())),
    )
}

/// First IPv4 address bound to `interface`.
pub fn select_ipv4<'a>(
    interface: &str,
    addrs: impl IntoIterator<Item = (&'a str, IpAddr)>,
) -> Result<String> {
    addrs
        .into_iter()
        .find_map(|(name, ip)| match ip {
            IpAddr::V4(v4) if name == interface => Some(v4.to_string()),
            _ => None,
        })
        .ok_or_else(|| Error::Address(format!("no IPv4 address on interface {interface}")))
}
