use std::net::IpAddr;

/*-------------------------------------------------------------------------------------------------
  Address Family
-------------------------------------------------------------------------------------------------*/

/// IP address family (IPv4 or IPv6) used to select which AWS IP Prefixes are
/// scanned or rendered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

impl AddressFamily {
    /// Family of an IP address. IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`)
    /// belong to IPv4.
    pub fn of(address: &IpAddr) -> Self {
        match address.to_canonical() {
            IpAddr::V4(_) => AddressFamily::IPv4,
            IpAddr::V6(_) => AddressFamily::IPv6,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        match self {
            AddressFamily::IPv4 => true,
            AddressFamily::IPv6 => false,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            AddressFamily::IPv4 => false,
            AddressFamily::IPv6 => true,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
