use crate::core::range_document::{Ipv4Entry, Ipv6Entry, RangeDocument, RangeEntry};
use crate::core::utils;
use log::{debug, trace};

/*-------------------------------------------------------------------------------------------------
  Filter Function
-------------------------------------------------------------------------------------------------*/

/// Filter the document entries by region and service.
///
/// `region` and `service` are case-insensitive exact matches; every criterion
/// provided must match. **At least one criterion must be provided for any entry
/// to be included:** with neither `region` nor `service` the result is empty, not
/// the full document. Passing the full document through is left to the query
/// orchestrator, which never calls the filter without a criterion.
///
/// When `exclude_amazon` is set, entries for the `AMAZON` service are excluded
/// regardless of the other criteria. Included entries keep their published
/// order.
pub fn filter_by(
    document: &RangeDocument,
    region: Option<&str>,
    service: Option<&str>,
    exclude_amazon: bool,
) -> RangeDocument {
    let mut builder = FilterBuilder::new().exclude_amazon(exclude_amazon);
    if let Some(region) = region {
        builder = builder.region(region);
    }
    if let Some(service) = service {
        builder = builder.service(service);
    }
    builder.build().apply(document)
}

/*-------------------------------------------------------------------------------------------------
  FilterBuilder
-------------------------------------------------------------------------------------------------*/

/// Builder used to construct a [Filter] object with the desired filter parameters.
///
/// ```rust
/// let filter = awsips::FilterBuilder::new()
///     .region("us-west-2")
///     .service("s3")
///     .exclude_amazon(true)
///     .build();
///
/// assert_eq!(filter.region(), Some("us-west-2"));
/// ```
#[derive(Debug, Default)]
pub struct FilterBuilder {
    region: Option<String>,
    service: Option<String>,
    exclude_amazon: bool,
}

/*--------------------------------------------------------------------------------------
  Filter Builder Implementation
--------------------------------------------------------------------------------------*/

impl FilterBuilder {
    /// Create a new [FilterBuilder]. By default, no filter parameters are set.
    pub fn new() -> Self {
        Self::default()
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Include entries from this AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Include entries used by this AWS service.
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Exclude entries for the catch-all `AMAZON` service.
    pub fn exclude_amazon(mut self, exclude_amazon: bool) -> Self {
        self.exclude_amazon = exclude_amazon;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [Filter] object with the provided filter parameters.
    pub fn build(self) -> Filter {
        Filter {
            region: self.region,
            service: self.service,
            exclude_amazon: self.exclude_amazon,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Filter
-------------------------------------------------------------------------------------------------*/

/// Region and service filter over the entries of a [RangeDocument]. Use the
/// [FilterBuilder] to construct a [Filter] object.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Include entries from this AWS region.
    region: Option<String>,

    /// Include entries used by this AWS service.
    service: Option<String>,

    /// Exclude entries for the `AMAZON` service.
    exclude_amazon: bool,
}

/*--------------------------------------------------------------------------------------
  Filter Implementation
--------------------------------------------------------------------------------------*/

impl Filter {
    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// AWS region included by the filter.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// AWS service included by the filter.
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Check if the filter excludes `AMAZON` service entries.
    pub fn excludes_amazon(&self) -> bool {
        self.exclude_amazon
    }

    /*-------------------------------------------------------------------------
      Apply
    -------------------------------------------------------------------------*/

    /// Apply the filter to both entry lists of a document.
    pub fn apply(&self, document: &RangeDocument) -> RangeDocument {
        let prefixes: Vec<Ipv4Entry> = document
            .prefixes()
            .iter()
            .filter(|entry| self.include_entry(*entry))
            .cloned()
            .collect();

        let ipv6_prefixes: Vec<Ipv6Entry> = document
            .ipv6_prefixes()
            .iter()
            .filter(|entry| self.include_entry(*entry))
            .cloned()
            .collect();

        debug!(
            "Filter included {} IPv4 and {} IPv6 AWS IP Prefix(es)",
            prefixes.len(),
            ipv6_prefixes.len()
        );

        document.derive(prefixes, ipv6_prefixes)
    }

    /*-------------------------------------------------------------------------
      Filter Functions
    -------------------------------------------------------------------------*/

    pub(crate) fn match_amazon<E: RangeEntry>(&self, entry: &E) -> bool {
        !(self.exclude_amazon && entry.is_amazon_service())
    }

    /// `None` when no region was requested.
    pub(crate) fn match_region<E: RangeEntry>(&self, entry: &E) -> Option<bool> {
        self.region
            .as_deref()
            .map(|region| utils::eq_label(entry.region(), region))
    }

    /// `None` when no service was requested.
    pub(crate) fn match_service<E: RangeEntry>(&self, entry: &E) -> Option<bool> {
        self.service
            .as_deref()
            .map(|service| utils::eq_label(entry.service(), service))
    }

    pub(crate) fn include_entry<E: RangeEntry>(&self, entry: &E) -> bool {
        if !self.match_amazon(entry) {
            trace!("Excluding AMAZON prefix {}", entry.cidr());
            return false;
        }

        let criteria = [self.match_region(entry), self.match_service(entry)];
        let requested = criteria.iter().any(Option::is_some);
        let matched = criteria.iter().all(|criterion| criterion.unwrap_or(true));

        requested && matched
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
