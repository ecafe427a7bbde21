use crate::core::address_family::AddressFamily;
use crate::core::datetime;
use crate::core::errors::Result;
use crate::core::utils;
use chrono::{DateTime, Utc};
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use serde::{Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Range Entry
-------------------------------------------------------------------------------------------------*/

/// Common view of an IPv4 or IPv6 entry in the AWS IP Ranges document.
pub trait RangeEntry {
    /// CIDR block of the entry.
    fn cidr(&self) -> IpNetwork;

    /// AWS region the CIDR block is associated with.
    fn region(&self) -> &str;

    /// AWS service that uses the CIDR block.
    fn service(&self) -> &str;

    /// Check if the entry belongs to the catch-all `AMAZON` service.
    fn is_amazon_service(&self) -> bool {
        utils::is_amazon_service(self.service())
    }
}

/*--------------------------------------------------------------------------------------
  IPv4 Entry
--------------------------------------------------------------------------------------*/

/// IPv4 prefix record from the `prefixes` list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ipv4Entry {
    #[serde(deserialize_with = "cidr_format::deserialize")]
    pub ip_prefix: Ipv4Network,
    pub region: String,
    pub service: String,
}

impl RangeEntry for Ipv4Entry {
    fn cidr(&self) -> IpNetwork {
        IpNetwork::V4(self.ip_prefix)
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn service(&self) -> &str {
        &self.service
    }
}

/*--------------------------------------------------------------------------------------
  IPv6 Entry
--------------------------------------------------------------------------------------*/

/// IPv6 prefix record from the `ipv6_prefixes` list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ipv6Entry {
    #[serde(deserialize_with = "cidr_format::deserialize")]
    pub ipv6_prefix: Ipv6Network,
    pub region: String,
    pub service: String,
}

impl RangeEntry for Ipv6Entry {
    fn cidr(&self) -> IpNetwork {
        IpNetwork::V6(self.ipv6_prefix)
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn service(&self) -> &str {
        &self.service
    }
}

/*--------------------------------------------------------------------------------------
  CIDR Format
--------------------------------------------------------------------------------------*/

/// Entry CIDRs must carry an explicit prefix length; a bare address is not a
/// valid entry.
mod cidr_format {
    use serde::{de, Deserialize, Deserializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn deserialize<'de, D, N>(deserializer: D) -> Result<N, D::Error>
    where
        D: Deserializer<'de>,
        N: FromStr,
        N::Err: Display,
    {
        let value = String::deserialize(deserializer)?;
        if !value.contains('/') {
            return Err(de::Error::custom(format!(
                "invalid CIDR {value:?}: missing prefix length"
            )));
        }
        value.parse().map_err(de::Error::custom)
    }
}

/*-------------------------------------------------------------------------------------------------
  Range Document
-------------------------------------------------------------------------------------------------*/

/// The AWS IP Ranges document: publication metadata plus the IPv4 and IPv6
/// entries in the order they were published.
///
/// A document is never modified after it is loaded. Matching and filtering
/// return a new document carrying the same `syncToken` and `createDate`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RangeDocument {
    #[serde(rename = "syncToken")]
    pub(crate) sync_token: String,

    #[serde(rename = "createDate")]
    pub(crate) create_date: String,

    #[serde(default)]
    pub(crate) prefixes: Vec<Ipv4Entry>,

    #[serde(default)]
    pub(crate) ipv6_prefixes: Vec<Ipv6Entry>,
}

/*--------------------------------------------------------------------------------------
  Range Document Implementation
--------------------------------------------------------------------------------------*/

impl RangeDocument {
    pub fn new(
        sync_token: impl Into<String>,
        create_date: impl Into<String>,
        prefixes: Vec<Ipv4Entry>,
        ipv6_prefixes: Vec<Ipv6Entry>,
    ) -> Self {
        Self {
            sync_token: sync_token.into(),
            create_date: create_date.into(),
            prefixes,
            ipv6_prefixes,
        }
    }

    /// New document with this document's metadata and the provided entries.
    pub(crate) fn derive(&self, prefixes: Vec<Ipv4Entry>, ipv6_prefixes: Vec<Ipv6Entry>) -> Self {
        Self {
            sync_token: self.sync_token.clone(),
            create_date: self.create_date.clone(),
            prefixes,
            ipv6_prefixes,
        }
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Publication time of the AWS IP Ranges in Unix epoch time format.
    pub fn sync_token(&self) -> &str {
        &self.sync_token
    }

    /// Publication date and time of the AWS IP Ranges, as published.
    pub fn create_date(&self) -> &str {
        &self.create_date
    }

    /// Publication date and time parsed as a UTC timestamp.
    pub fn create_date_utc(&self) -> Result<DateTime<Utc>> {
        datetime::parse(&self.create_date)
    }

    /// IPv4 entries in published order.
    pub fn prefixes(&self) -> &[Ipv4Entry] {
        &self.prefixes
    }

    /// IPv6 entries in published order.
    pub fn ipv6_prefixes(&self) -> &[Ipv6Entry] {
        &self.ipv6_prefixes
    }

    /// Total number of IPv4 and IPv6 entries.
    pub fn len(&self) -> usize {
        self.prefixes.len() + self.ipv6_prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.ipv6_prefixes.is_empty()
    }

    /// Copy of the document keeping only the entries of one address family.
    pub fn only(&self, family: AddressFamily) -> Self {
        match family {
            AddressFamily::IPv4 => self.derive(self.prefixes.clone(), Vec::new()),
            AddressFamily::IPv6 => self.derive(Vec::new(), self.ipv6_prefixes.clone()),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
