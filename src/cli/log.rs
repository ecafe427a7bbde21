use awsips::{QueryMode, QueryOutcome, RangeDocument};
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Loaded Document
--------------------------------------------------------------------------------------*/

pub fn document(document: &RangeDocument) {
    match document.create_date_utc() {
        Ok(create_date) => info!(
            "AWS IP Ranges created {} (syncToken {})",
            create_date,
            document.sync_token()
        ),
        Err(error) => warn!("{error}"),
    }
}

/*--------------------------------------------------------------------------------------
  Query Outcome
--------------------------------------------------------------------------------------*/

pub fn outcome(outcome: &QueryOutcome) {
    let count_ipv4 = outcome.document.prefixes().len();
    let count_ipv6 = outcome.document.ipv6_prefixes().len();

    match outcome.mode {
        QueryMode::Address(address) | QueryMode::Hostname(address) => {
            if outcome.is_empty() {
                warn!("{address} is not in the AWS IP Ranges");
            } else {
                info!("Found {address} in {count_ipv4} IPv4 and {count_ipv6} IPv6 AWS IP Prefix(es)");
            }
        }
        QueryMode::Filter => {
            if outcome.is_empty() {
                warn!("No AWS IP Prefixes match the region and service filter");
            } else {
                info!("{count_ipv4} IPv4 and {count_ipv6} IPv6 AWS IP Prefix(es) match the filter");
            }
        }
        QueryMode::PassThrough => {
            info!("Listing all {count_ipv4} IPv4 and {count_ipv6} IPv6 AWS IP Prefix(es)");
        }
    }
}
