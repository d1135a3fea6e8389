//! Local address discovery for the startup banner
//!
//! Connecting a UDP socket sends nothing; it only makes the OS pick the
//! route, and with it the local address, that outbound traffic would use.
//! The result is informational: the listener binds wherever the config says.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Public address used to select the outbound interface
pub const PROBE_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

pub const FALLBACK_IP: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Best guess at the LAN address clients should use, `127.0.0.1` if unknown
pub fn get_local_ip() -> String {
    local_ip_via(PROBE_ADDR)
}

/// Same as [`get_local_ip`] with an explicit probe target
pub fn local_ip_via(probe: SocketAddr) -> String {
    probe_local_ipv4(probe).unwrap_or(FALLBACK_IP).to_string()
}

fn probe_local_ipv4(probe: SocketAddr) -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(probe).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_returns_ipv4() {
        let ip = get_local_ip();
        assert!(ip.parse::<Ipv4Addr>().is_ok(), "not an IPv4 address: {ip}");
    }

    #[test]
    fn test_unroutable_probe_falls_back_to_loopback() {
        // an IPv4 socket cannot connect to an IPv6 target
        let probe: SocketAddr = "[2001:db8::1]:80".parse().unwrap();
        assert_eq!(local_ip_via(probe), "127.0.0.1");
    }

    #[test]
    fn test_loopback_probe_reports_loopback() {
        let probe: SocketAddr = "127.0.0.1:9".parse().unwrap();
        assert_eq!(local_ip_via(probe), "127.0.0.1");
    }
}
