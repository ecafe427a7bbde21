/*-------------------------------------------------------------------------------------------------
  Utilities
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Region and Service Labels
--------------------------------------------------------------------------------------*/

/// Service label AWS uses for the superset of addresses owned by Amazon.
pub const AMAZON_SERVICE: &str = "AMAZON";

/// Compare a region or service label against a query value, ignoring case.
///
/// All region and service comparisons in the crate go through this function so
/// the matcher and the filter agree on what "equal" means.
pub fn eq_label(label: &str, query: &str) -> bool {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .eq(query.chars().flat_map(char::to_lowercase))
}

/// Check if a service label is the catch-all `AMAZON` service.
pub fn is_amazon_service(service: &str) -> bool {
    eq_label(service, AMAZON_SERVICE)
}

/*--------------------------------------------------------------------------------------
  IP Address Supplemental Functions
--------------------------------------------------------------------------------------*/

pub mod ipaddr {
    use std::net::IpAddr;

    /*
        A query address may be written as a single-host network (`/32` for IPv4,
        `/128` for IPv6). IPv4-mapped IPv6 addresses also accept the IPv4 `/32`.
        Any other prefix length does not name one address and is rejected.
    */

    pub fn parse_host_address(value: &str) -> Option<IpAddr> {
        let value = value.trim();
        match value.split_once('/') {
            Some((address, mask_bits)) => {
                let address: IpAddr = address.parse().ok()?;
                let is_host = match address {
                    IpAddr::V4(_) => mask_bits == "32",
                    IpAddr::V6(ipv6) => {
                        mask_bits == "128"
                            || (mask_bits == "32" && ipv6.to_ipv4_mapped().is_some())
                    }
                };
                is_host.then_some(address)
            }
            None => value.parse().ok(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
