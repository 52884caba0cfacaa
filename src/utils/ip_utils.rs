use std::net::{IpAddr, Ipv4Addr};

/// IP utility functions for validation and sequential address assignment

/// Usable host addresses per /24 (.1 through .254)
const HOSTS_PER_SUBNET: usize = 254;

/// Check if a string is a valid IP address (IPv4 or IPv6)
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// The address `offset` hosts after `start_ip`, skipping network and
/// broadcast addresses by rolling over into the next /24.
///
/// `offset_address("192.168.0.1", 254)` is `192.168.1.1`.
pub fn offset_address(start_ip: &str, offset: usize) -> Result<String, String> {
    let start: Ipv4Addr = start_ip
        .parse()
        .map_err(|_| format!("Invalid start IP address '{}'", start_ip))?;
    let octets = start.octets();

    if octets[3] == 0 || octets[3] == 255 {
        return Err(format!("Start address '{}' is not a host address", start_ip));
    }

    let host = (octets[3] as usize - 1) + offset;
    let third = octets[2] as usize + host / HOSTS_PER_SUBNET;
    if third > 255 {
        return Err("IP range would exceed valid range".to_string());
    }

    let fourth = host % HOSTS_PER_SUBNET + 1;
    Ok(Ipv4Addr::new(octets[0], octets[1], third as u8, fourth as u8).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ip() {
        assert!(is_valid_ip("192.168.1.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("256.1.1.1"));
        assert!(!is_valid_ip("invalid.ip"));
    }

    #[test]
    fn test_offset_address() {
        assert_eq!(offset_address("192.168.0.1", 0).unwrap(), "192.168.0.1");
        assert_eq!(offset_address("192.168.0.1", 4).unwrap(), "192.168.0.5");
        assert_eq!(offset_address("192.168.0.1", 253).unwrap(), "192.168.0.254");
        assert_eq!(offset_address("192.168.0.1", 254).unwrap(), "192.168.1.1");
        assert_eq!(offset_address("10.0.3.10", 250).unwrap(), "10.0.4.6");
    }

    #[test]
    fn test_offset_address_errors() {
        assert!(offset_address("invalid.ip", 1).is_err());
        assert!(offset_address("::1", 1).is_err());
        assert!(offset_address("192.168.0.0", 1).is_err());
        assert!(offset_address("192.168.255.1", 300).is_err());
    }
}
