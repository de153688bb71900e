//! IP address and CIDR block parsing and subnet arithmetic.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use crate::error::{PastelensError, Result};

/// An IP literal with an optional prefix length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedAddress {
    pub address: IpAddr,
    pub prefix:  Option<u8>,
}

/// Parses `a.b.c.d`, an IPv6 literal, or either with a `/prefix` suffix.
///
/// Returns `None` for anything else, including out-of-range prefixes.
pub fn parse_address(text: &str) -> Option<ParsedAddress> {
    let (address, prefix) = match text.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (text, None),
    };
    let address: IpAddr = address.parse().ok()?;
    let max_prefix = if address.is_ipv4() { 32 } else { 128 };
    let prefix = match prefix {
        Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
            let value: u8 = p.parse().ok()?;
            if value > max_prefix {
                return None;
            }
            Some(value)
        },
        Some(_) => return None,
        None => None,
    };
    Some(ParsedAddress {
        address,
        prefix,
    })
}

/// Facts about a single address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddressInfo {
    pub address:     IpAddr,
    pub version:     u8,
    pub is_private:  bool,
    pub is_loopback: bool,
}

impl AddressInfo {
    pub fn new(address: IpAddr) -> Self {
        let (version, is_private) = match address {
            IpAddr::V4(v4) => (4, v4.is_private() || v4.is_link_local()),
            IpAddr::V6(v6) => {
                let first = v6.segments()[0];
                // fc00::/7 unique local, fe80::/10 link local
                (6, (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80)
            },
        };
        Self {
            address,
            version,
            is_private,
            is_loopback: address.is_loopback(),
        }
    }
}

/// An IPv4 CIDR block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ipv4Subnet {
    pub prefix:       u8,
    pub network:      Ipv4Addr,
    pub broadcast:    Ipv4Addr,
    pub netmask:      Ipv4Addr,
    pub wildcard:     Ipv4Addr,
    pub first_host:   Ipv4Addr,
    pub last_host:    Ipv4Addr,
    /// Usable hosts; /31 point-to-point links count both addresses, /32 one.
    pub usable_hosts: u64,
}

impl Ipv4Subnet {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > 32 {
            return Err(PastelensError::InvalidAddress {
                input: format!("{}/{}", address, prefix),
            });
        }
        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
        let network = u32::from(address) & mask;
        let broadcast = network | !mask;
        let (first_host, last_host, usable_hosts) = match prefix {
            32 => (network, network, 1),
            31 => (network, broadcast, 2),
            _ => (network + 1, broadcast - 1, u64::from(broadcast - network) - 1),
        };
        Ok(Self {
            prefix,
            network: network.into(),
            broadcast: broadcast.into(),
            netmask: mask.into(),
            wildcard: (!mask).into(),
            first_host: first_host.into(),
            last_host: last_host.into(),
            usable_hosts,
        })
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        (u32::from(address) & u32::from(self.netmask)) == u32::from(self.network)
    }
}

/// An IPv6 CIDR block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ipv6Subnet {
    pub prefix:        u8,
    pub network:       Ipv6Addr,
    pub last_address:  Ipv6Addr,
    /// Number of addresses, saturating at `u128::MAX` for `/0`.
    pub address_count: u128,
}

impl Ipv6Subnet {
    pub fn new(address: Ipv6Addr, prefix: u8) -> Result<Self> {
        if prefix > 128 {
            return Err(PastelensError::InvalidAddress {
                input: format!("{}/{}", address, prefix),
            });
        }
        let mask = if prefix == 0 { 0 } else { u128::MAX << (128 - prefix) };
        let network = u128::from(address) & mask;
        let address_count = if prefix == 0 { u128::MAX } else { 1u128 << (128 - prefix) };
        Ok(Self {
            prefix,
            network: network.into(),
            last_address: (network | !mask).into(),
            address_count,
        })
    }

    pub fn contains(&self, address: Ipv6Addr) -> bool {
        let mask = if self.prefix == 0 { 0 } else { u128::MAX << (128 - self.prefix) };
        (u128::from(address) & mask) == u128::from(self.network)
    }
}
