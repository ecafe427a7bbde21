use crate::core::errors::{Error, Result};
use crate::core::range_document::RangeDocument;

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse an AWS IP Ranges JSON document.
///
/// Every `ip_prefix` and `ipv6_prefix` must be a valid CIDR of its family; one
/// malformed entry fails the whole document. Fields other than the CIDR,
/// `region`, and `service` (e.g. `network_border_group`) are ignored.
pub fn parse(json: &str) -> Result<RangeDocument> {
    serde_json::from_str(json).map_err(Error::data)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
