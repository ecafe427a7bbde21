use crate::core::errors::{Error, Result};
use crate::core::filter::filter_by;
use crate::core::matcher::match_address;
use crate::core::range_document::RangeDocument;
use crate::core::render::Field;
use crate::core::utils;
use log::{debug, info, warn};
use std::io;
use std::net::{IpAddr, ToSocketAddrs};

/*-------------------------------------------------------------------------------------------------
  Query
-------------------------------------------------------------------------------------------------*/

/// Query parameters for a single lookup against the AWS IP Ranges.
#[derive(Clone, Debug, Default)]
pub struct Query {
    /// Find the entries containing this IP address (`/32` and `/128` suffixes allowed).
    pub ip: Option<String>,

    /// Find the entries containing the first address this hostname resolves to.
    pub hostname: Option<String>,

    /// Include entries from this AWS region.
    pub region: Option<String>,

    /// Include entries used by this AWS service.
    pub service: Option<String>,

    /// Exclude entries for the catch-all `AMAZON` service.
    pub exclude_amazon: bool,
}

/*-------------------------------------------------------------------------------------------------
  Query Mode and Outcome
-------------------------------------------------------------------------------------------------*/

/// Which lookup a [Query] ran.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryMode {
    /// Entries containing an IP address.
    Address(IpAddr),

    /// Entries containing the address a hostname resolved to.
    Hostname(IpAddr),

    /// Entries matching a region and/or service.
    Filter,

    /// The full, unfiltered document.
    PassThrough,
}

impl QueryMode {
    /// Fields rendered when the user does not select any.
    pub fn default_fields(&self) -> Vec<Field> {
        match self {
            QueryMode::Address(_) | QueryMode::Hostname(_) => vec![Field::All],
            QueryMode::Filter | QueryMode::PassThrough => vec![Field::Cidr],
        }
    }
}

/// Result of running a [Query].
#[derive(Clone, Debug)]
pub struct QueryOutcome {
    pub mode: QueryMode,
    pub document: RangeDocument,
}

impl QueryOutcome {
    /// Check if the query found no entries in either family.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

/*-------------------------------------------------------------------------------------------------
  Host Resolver
-------------------------------------------------------------------------------------------------*/

/// Resolves a hostname to the IP address a hostname query is matched against.
pub trait HostResolver {
    fn resolve(&self, hostname: &str) -> io::Result<IpAddr>;
}

/// [HostResolver] using the operating system's resolver; picks the first
/// address returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, hostname: &str) -> io::Result<IpAddr> {
        (hostname, 0)
            .to_socket_addrs()?
            .next()
            .map(|socket_addr| socket_addr.ip())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses found"))
    }
}

/*-------------------------------------------------------------------------------------------------
  Run Query
-------------------------------------------------------------------------------------------------*/

/// Run a query against the AWS IP Ranges document.
///
/// Exactly one lookup runs, chosen in this order:
///
/// 1. `ip`: entries containing the address. Cannot be combined with `region`
///    or `service`.
/// 2. `hostname`: entries containing the resolved address. Cannot be combined
///    with `region` or `service`.
/// 3. `region` and/or `service`: entries matching the filter. Empty values
///    count as not given.
/// 4. Otherwise the full document, unfiltered.
pub fn run<R: HostResolver>(
    document: &RangeDocument,
    query: &Query,
    resolver: &R,
) -> Result<QueryOutcome> {
    // An empty region or service is treated as not given
    let region = query.region.as_deref().filter(|region| !region.is_empty());
    let service = query.service.as_deref().filter(|service| !service.is_empty());
    let filtered = region.is_some() || service.is_some();

    let outcome = if let Some(ip) = &query.ip {
        if filtered {
            return Err(Error::usage("ip cannot be used with region or service"));
        }
        let address = utils::ipaddr::parse_host_address(ip)
            .ok_or_else(|| Error::usage(format!("ip is invalid: {ip}")))?;
        QueryOutcome {
            mode: QueryMode::Address(address),
            document: match_address(document, address, query.exclude_amazon),
        }
    } else if let Some(hostname) = &query.hostname {
        if filtered {
            return Err(Error::usage(
                "hostname cannot be used with region or service",
            ));
        }
        let address = resolver.resolve(hostname).map_err(|error| {
            Error::usage(format!("unable to resolve hostname {hostname}: {error}"))
        })?;
        info!("Resolved {} to {}", hostname, address);
        QueryOutcome {
            mode: QueryMode::Hostname(address),
            document: match_address(document, address, query.exclude_amazon),
        }
    } else if filtered {
        QueryOutcome {
            mode: QueryMode::Filter,
            document: filter_by(document, region, service, query.exclude_amazon),
        }
    } else {
        if query.exclude_amazon {
            warn!("exclude-amazon has no effect without an ip, hostname, region, or service");
        }
        QueryOutcome {
            mode: QueryMode::PassThrough,
            document: document.clone(),
        }
    };

    debug!(
        "{:?} query returned {} AWS IP Prefix(es)",
        outcome.mode,
        outcome.document.len()
    );

    Ok(outcome)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::log_error;
    use crate::core::range_document::tests::{
        ipv4_entry, ipv6_entry, test_overlapping_range_document, test_range_document,
    };
    use test_log::test;

    /*----------------------------------------------------------------------------------
      Test Helpers
    ----------------------------------------------------------------------------------*/

    /// Resolves every hostname to the same address.
    struct StaticResolver(IpAddr);

    impl HostResolver for StaticResolver {
        fn resolve(&self, _hostname: &str) -> io::Result<IpAddr> {
            Ok(self.0)
        }
    }

    /// Fails every resolution.
    struct FailingResolver;

    impl HostResolver for FailingResolver {
        fn resolve(&self, hostname: &str) -> io::Result<IpAddr> {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{hostname} not found"),
            ))
        }
    }

    fn ip_query(ip: &str) -> Query {
        Query {
            ip: Some(ip.to_string()),
            ..Default::default()
        }
    }

    /*----------------------------------------------------------------------------------
      Address Mode
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_run_ip_query() {
        let document = test_range_document();
        let outcome = run(&document, &ip_query("192.168.0.100"), &FailingResolver)
            .inspect_err(log_error)
            .unwrap();

        assert_eq!(
            outcome.mode,
            QueryMode::Address("192.168.0.100".parse().unwrap())
        );
        assert_eq!(
            outcome.document.prefixes(),
            &[ipv4_entry("192.168.0.0/24", "eu-west-1", "EC2")]
        );
        assert!(!outcome.is_empty());
    }

    #[test]
    fn test_run_ip_query_host_suffix() {
        let document = test_range_document();

        let outcome = run(&document, &ip_query("192.168.1.7/32"), &FailingResolver).unwrap();
        assert_eq!(outcome.document.prefixes().len(), 1);

        let outcome = run(
            &document,
            &ip_query("2600:1fa0:4060:c11:34da:e8e9::/128"),
            &FailingResolver,
        )
        .unwrap();
        assert_eq!(
            outcome.document.ipv6_prefixes(),
            &[ipv6_entry("2600:1fa0:4000::/40", "us-east-1", "CODEBUILD")]
        );
    }

    #[test]
    fn test_run_ip_query_invalid() {
        let document = test_range_document();

        for ip in ["192.168.0.0/24", "192.168.0.300", "example.com", ""] {
            let result = run(&document, &ip_query(ip), &FailingResolver);
            assert!(matches!(result, Err(Error::Usage(_))), "{ip}");
        }
    }

    #[test]
    fn test_run_ip_query_with_filter_rejected() {
        let document = test_range_document();
        let query = Query {
            region: Some("eu-west-1".to_string()),
            ..ip_query("192.168.0.100")
        };

        let result = run(&document, &query, &FailingResolver);
        assert!(matches!(result, Err(Error::Usage(_))));
    }

    #[test]
    fn test_run_ip_query_not_found() {
        let document = test_range_document();
        let outcome = run(&document, &ip_query("10.1.1.1"), &FailingResolver).unwrap();

        assert!(outcome.is_empty());
    }

    #[test]
    fn test_run_ip_query_exclude_amazon() {
        let document = test_overlapping_range_document();
        let query = Query {
            exclude_amazon: true,
            ..ip_query("3.5.140.2")
        };

        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert!(outcome
            .document
            .prefixes()
            .iter()
            .all(|entry| entry.service != "AMAZON"));
        assert_eq!(outcome.document.prefixes().len(), 2);
    }

    /*----------------------------------------------------------------------------------
      Hostname Mode
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_run_hostname_query() {
        let document = test_range_document();
        let resolver = StaticResolver("192.168.1.20".parse().unwrap());
        let query = Query {
            hostname: Some("s3.eu-west-2.example".to_string()),
            ..Default::default()
        };

        let outcome = run(&document, &query, &resolver).unwrap();
        assert_eq!(
            outcome.mode,
            QueryMode::Hostname("192.168.1.20".parse().unwrap())
        );
        assert_eq!(
            outcome.document.prefixes(),
            &[ipv4_entry("192.168.1.0/24", "eu-west-2", "S3")]
        );
    }

    #[test]
    fn test_run_hostname_query_resolution_failure() {
        let document = test_range_document();
        let query = Query {
            hostname: Some("missing.example".to_string()),
            ..Default::default()
        };

        let result = run(&document, &query, &FailingResolver);
        assert!(matches!(result, Err(Error::Usage(_))));
    }

    #[test]
    fn test_run_hostname_query_with_filter_rejected() {
        let document = test_range_document();
        let resolver = StaticResolver("192.168.1.20".parse().unwrap());
        let query = Query {
            hostname: Some("s3.eu-west-2.example".to_string()),
            service: Some("S3".to_string()),
            ..Default::default()
        };

        let result = run(&document, &query, &resolver);
        assert!(matches!(result, Err(Error::Usage(_))));
    }

    #[test]
    fn test_run_ip_takes_precedence_over_hostname() {
        let document = test_range_document();
        let resolver = StaticResolver("192.168.1.20".parse().unwrap());
        let query = Query {
            hostname: Some("s3.eu-west-2.example".to_string()),
            ..ip_query("192.168.0.1")
        };

        let outcome = run(&document, &query, &resolver).unwrap();
        assert_eq!(
            outcome.mode,
            QueryMode::Address("192.168.0.1".parse().unwrap())
        );
    }

    #[test]
    fn test_system_resolver_localhost() {
        let address = SystemResolver.resolve("localhost").unwrap();
        assert!(address.is_loopback());
    }

    /*----------------------------------------------------------------------------------
      Filter and Pass-Through Modes
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_run_filter_query() {
        let document = test_range_document();
        let query = Query {
            service: Some("s3".to_string()),
            exclude_amazon: true,
            ..Default::default()
        };

        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert_eq!(outcome.mode, QueryMode::Filter);
        assert_eq!(
            outcome.document.prefixes(),
            &[ipv4_entry("192.168.1.0/24", "eu-west-2", "S3")]
        );
    }

    #[test]
    fn test_run_pass_through() {
        let document = test_overlapping_range_document();

        let outcome = run(&document, &Query::default(), &FailingResolver).unwrap();
        assert_eq!(outcome.mode, QueryMode::PassThrough);
        assert_eq!(outcome.document, document);

        // exclude-amazon alone does not filter the document
        let query = Query {
            exclude_amazon: true,
            ..Default::default()
        };
        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert_eq!(outcome.document, document);
    }

    #[test]
    fn test_run_empty_criteria_pass_through() {
        let document = test_range_document();
        let query = Query {
            region: Some(String::new()),
            service: Some(String::new()),
            ..Default::default()
        };

        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert_eq!(outcome.mode, QueryMode::PassThrough);
        assert_eq!(outcome.document, document);

        // An empty region does not block an ip lookup either
        let query = Query {
            region: Some(String::new()),
            ..ip_query("192.168.0.100")
        };
        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert_eq!(outcome.document.len(), 1);
    }

    #[test]
    fn test_run_empty_region_with_service() {
        let document = test_range_document();
        let query = Query {
            region: Some(String::new()),
            service: Some("S3".to_string()),
            ..Default::default()
        };

        let outcome = run(&document, &query, &FailingResolver).unwrap();
        assert_eq!(outcome.mode, QueryMode::Filter);
        assert_eq!(
            outcome.document.prefixes(),
            &[ipv4_entry("192.168.1.0/24", "eu-west-2", "S3")]
        );
    }

    #[test]
    fn test_run_ipv4_mapped_host_suffix() {
        let document = test_range_document();
        let outcome = run(
            &document,
            &ip_query("::ffff:192.168.0.100/32"),
            &FailingResolver,
        )
        .inspect_err(log_error)
        .unwrap();

        assert_eq!(
            outcome.document.prefixes(),
            &[ipv4_entry("192.168.0.0/24", "eu-west-1", "EC2")]
        );
    }

    #[test]
    fn test_run_empty_document() {
        let document = RangeDocument::default();
        let outcome = run(&document, &Query::default(), &FailingResolver).unwrap();
        assert!(outcome.is_empty());
    }

    /*----------------------------------------------------------------------------------
      Default Fields
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_query_mode_default_fields() {
        let address: IpAddr = "192.168.0.1".parse().unwrap();

        assert_eq!(QueryMode::Address(address).default_fields(), vec![Field::All]);
        assert_eq!(QueryMode::Hostname(address).default_fields(), vec![Field::All]);
        assert_eq!(QueryMode::Filter.default_fields(), vec![Field::Cidr]);
        assert_eq!(QueryMode::PassThrough.default_fields(), vec![Field::Cidr]);
    }
}
