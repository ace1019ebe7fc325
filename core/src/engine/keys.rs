//! Store key builders and the packed-IPv4 wire format used
//! as FilterB's ordered-map member key.

use std::net::{IpAddr, Ipv4Addr};

pub fn a_counter_key(ip: &str) -> String {
    format!("Ac:{ip}")
}

pub fn a_block_key(ip: &str) -> String {
    format!("Ab:{ip}")
}

pub fn b_counter_key(account: &str) -> String {
    format!("Bc:{account}")
}

pub fn b_block_key(account: &str) -> String {
    format!("Bb:{account}")
}

pub fn w_counter_key(ip: &str, account: &str) -> String {
    format!("Wc:{ip}:{account}")
}

pub fn w_block_key(ip: &str, account: &str) -> String {
    format!("Wb:{ip}:{account}")
}

/// A 4-byte big-endian packed IPv4 address, used as the member key in
/// FilterB's distinct-address ordered map. An absent address packs as
/// `\x00\x00\x00\x00`, which is also where an IPv6 caller lands — IPv6
/// callers collapse onto the same unspecified-address bucket rather than
/// being tracked individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedIp(pub [u8; 4]);

impl PackedIp {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Unpack back to dotted-quad form for the FilterB history payload.
    pub fn to_ipv4(self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }
}

impl From<Ipv4Addr> for PackedIp {
    fn from(addr: Ipv4Addr) -> Self {
        PackedIp(addr.octets())
    }
}

/// Pack any caller-supplied address, mapping IPv6 (and the absence of an
/// address) onto `0.0.0.0`.
pub fn pack_address(addr: Option<IpAddr>) -> PackedIp {
    match addr {
        Some(IpAddr::V4(v4)) => PackedIp::from(v4),
        _ => PackedIp::from(Ipv4Addr::UNSPECIFIED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_ipv4_big_endian() {
        let packed = pack_address(Some("1.2.3.4".parse().unwrap()));
        assert_eq!(packed.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(packed.to_ipv4().to_string(), "1.2.3.4");
    }

    #[test]
    fn absent_and_ipv6_map_to_unspecified() {
        assert_eq!(pack_address(None).as_bytes(), &[0, 0, 0, 0]);
        let v6: IpAddr = "::1".parse().unwrap();
        assert_eq!(pack_address(Some(v6)).as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn key_builders_match_documented_patterns() {
        assert_eq!(a_counter_key("1.2.3.4"), "Ac:1.2.3.4");
        assert_eq!(a_block_key("1.2.3.4"), "Ab:1.2.3.4");
        assert_eq!(b_counter_key("alice"), "Bc:alice");
        assert_eq!(b_block_key("alice"), "Bb:alice");
        assert_eq!(w_counter_key("1.2.3.4", "alice"), "Wc:1.2.3.4:alice");
        assert_eq!(w_block_key("1.2.3.4", "alice"), "Wb:1.2.3.4:alice");
    }
}
