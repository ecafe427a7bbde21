mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::address_family::AddressFamily;
pub use crate::core::client::{load, Client, ClientBuilder};
pub use crate::core::errors::{Error, Result};
pub use crate::core::filter::{filter_by, Filter, FilterBuilder};
pub use crate::core::matcher::match_address;
pub use crate::core::query::{run, HostResolver, Query, QueryMode, QueryOutcome, SystemResolver};
pub use crate::core::range_document::{Ipv4Entry, Ipv6Entry, RangeDocument, RangeEntry};
pub use crate::core::render::{render, Encoding, Field, RenderOptions};

pub use ipnetwork;
