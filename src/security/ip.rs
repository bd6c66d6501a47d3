//! Public/private classification of IP addresses.
//!
//! Used both for IP literals given as query names and for authoritative
//! nameserver addresses before a direct query is sent to them.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Returns `true` if the address is routable on the public internet.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_ipv4(v4),
        IpAddr::V6(v6) => is_public_ipv6(v6),
    }
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    // Loopback 127.0.0.0/8
    if o[0] == 127 {
        return false;
    }
    // Private 10.0.0.0/8
    if o[0] == 10 {
        return false;
    }
    // Private 172.16.0.0/12
    if o[0] == 172 && (16..=31).contains(&o[1]) {
        return false;
    }
    // Private 192.168.0.0/16
    if o[0] == 192 && o[1] == 168 {
        return false;
    }
    // Link-local 169.254.0.0/16
    if o[0] == 169 && o[1] == 254 {
        return false;
    }
    // This-network 0.0.0.0/8
    if o[0] == 0 {
        return false;
    }
    // Multicast 224.0.0.0/4
    if (224..=239).contains(&o[0]) {
        return false;
    }
    // Reserved 240.0.0.0/4
    if o[0] >= 240 {
        return false;
    }
    true
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_public_ipv4(v4);
    }
    let s = ip.segments();
    // ::1 loopback
    if s == [0, 0, 0, 0, 0, 0, 0, 1] {
        return false;
    }
    // fc00::/7 unique-local
    if (s[0] & 0xfe00) == 0xfc00 {
        return false;
    }
    // fe80::/10 link-local
    if (s[0] & 0xffc0) == 0xfe80 {
        return false;
    }
    // ff00::/8 multicast
    if s[0] & 0xff00 == 0xff00 {
        return false;
    }
    // :: unspecified
    if s == [0; 8] {
        return false;
    }
    true
}
