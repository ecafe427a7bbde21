/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod address_family;
pub mod client;
pub mod datetime;
pub mod errors;
pub mod filter;
pub mod json;
pub mod matcher;
pub mod query;
pub mod range_document;
pub mod render;
pub mod utils;
