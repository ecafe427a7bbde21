use crate::core::range_document::{Ipv4Entry, Ipv6Entry, RangeDocument, RangeEntry};
use log::{debug, trace};
use std::net::IpAddr;

/*-------------------------------------------------------------------------------------------------
  Prefix Matcher
-------------------------------------------------------------------------------------------------*/

/// Find the entries whose CIDR block contains `address`.
///
/// Only the entries of the address's family are scanned, so the result never
/// holds entries of the other family. An IPv4-mapped IPv6 address is matched
/// against the IPv4 entries. When `exclude_amazon` is set, entries for the
/// `AMAZON` service are skipped. Matches keep their published order.
pub fn match_address(
    document: &RangeDocument,
    address: IpAddr,
    exclude_amazon: bool,
) -> RangeDocument {
    let matched = match address.to_canonical() {
        IpAddr::V4(ipv4_address) => {
            let prefixes: Vec<Ipv4Entry> = document
                .prefixes()
                .iter()
                .filter(|entry| include(*entry, exclude_amazon))
                .filter(|entry| entry.ip_prefix.contains(ipv4_address))
                .cloned()
                .collect();
            document.derive(prefixes, Vec::new())
        }
        IpAddr::V6(ipv6_address) => {
            let ipv6_prefixes: Vec<Ipv6Entry> = document
                .ipv6_prefixes()
                .iter()
                .filter(|entry| include(*entry, exclude_amazon))
                .filter(|entry| entry.ipv6_prefix.contains(ipv6_address))
                .cloned()
                .collect();
            document.derive(Vec::new(), ipv6_prefixes)
        }
    };

    debug!("{} AWS IP Prefix(es) contain {}", matched.len(), address);
    matched
}

fn include<E: RangeEntry>(entry: &E, exclude_amazon: bool) -> bool {
    if exclude_amazon && entry.is_amazon_service() {
        trace!("Skipping AMAZON prefix {}", entry.cidr());
        false
    } else {
        true
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
