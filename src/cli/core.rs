use crate::cli::{self, Args};
use awsips::{Query, QueryOutcome, RenderOptions, Result, SystemResolver};
use log::error;

/*-------------------------------------------------------------------------------------------------
  Exit Codes
-------------------------------------------------------------------------------------------------*/

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_EMPTY: i32 = 1;

/*-------------------------------------------------------------------------------------------------
  Command Handler
-------------------------------------------------------------------------------------------------*/

/// Load the AWS IP Ranges, run the query described by the CLI arguments, and
/// print the rendered result. Returns the process exit code.
pub fn run(args: &Args) -> i32 {
    match query_and_render(args) {
        Ok((outcome, rendered)) => {
            if !args.verbose.is_silent() {
                print!("{rendered}");
            }
            if is_empty(args, &outcome) {
                EXIT_EMPTY
            } else {
                EXIT_SUCCESS
            }
        }
        Err(error) => {
            error!("{error}");
            error.exit_code()
        }
    }
}

fn query_and_render(args: &Args) -> Result<(QueryOutcome, String)> {
    let document = awsips::load(args.source_file.as_deref())?;
    cli::log::document(&document);

    let outcome = awsips::run(&document, &build_query(args), &SystemResolver)?;
    cli::log::outcome(&outcome);

    let rendered = awsips::render(&outcome.document, &build_render_options(args, &outcome))?;

    Ok((outcome, rendered))
}

/*--------------------------------------------------------------------------------------
  Build the query and render options from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_query(args: &Args) -> Query {
    Query {
        ip: args.ip.clone(),
        hostname: args.hostname.clone(),
        region: args.region.clone(),
        service: args.service.clone(),
        exclude_amazon: args.exclude_amazon,
    }
}

pub fn build_render_options(args: &Args, outcome: &QueryOutcome) -> RenderOptions {
    RenderOptions {
        encoding: args.encoding,
        fields: args
            .fields
            .clone()
            .unwrap_or_else(|| outcome.mode.default_fields()),
        ipv4_only: args.ipv4_only,
        ipv6_only: args.ipv6_only,
        separator: args.separator.clone(),
    }
}

/// Check if no entries remain once the family-only flags are applied.
fn is_empty(args: &Args, outcome: &QueryOutcome) -> bool {
    match (args.ipv4_only, args.ipv6_only) {
        (true, false) => outcome.document.prefixes().is_empty(),
        (false, true) => outcome.document.ipv6_prefixes().is_empty(),
        _ => outcome.is_empty(),
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use awsips::{Encoding, Field, QueryMode, RangeDocument};
    use clap::Parser;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("awsips").chain(args.iter().copied()))
    }

    fn outcome(mode: QueryMode) -> QueryOutcome {
        QueryOutcome {
            mode,
            document: RangeDocument::default(),
        }
    }

    #[test]
    fn test_build_query() {
        let args = parse(&["--region", "eu-west-1", "--service", "S3", "--exclude-amazon"]);
        let query = build_query(&args);

        assert_eq!(query.region.as_deref(), Some("eu-west-1"));
        assert_eq!(query.service.as_deref(), Some("S3"));
        assert!(query.ip.is_none());
        assert!(query.hostname.is_none());
        assert!(query.exclude_amazon);
    }

    #[test]
    fn test_build_render_options_defaults() {
        let args = parse(&[]);

        let options = build_render_options(&args, &outcome(QueryMode::PassThrough));
        assert_eq!(options.encoding, Encoding::Text);
        assert_eq!(options.fields, vec![Field::Cidr]);
        assert_eq!(options.separator, " | ");

        let address = "192.168.0.1".parse().unwrap();
        let options = build_render_options(&args, &outcome(QueryMode::Address(address)));
        assert_eq!(options.fields, vec![Field::All]);
    }

    #[test]
    fn test_build_render_options_selected_fields() {
        let args = parse(&["--fields", "service,prefix", "--encoding", "csv", "-4"]);
        let options = build_render_options(&args, &outcome(QueryMode::Filter));

        assert_eq!(options.encoding, Encoding::Csv);
        assert_eq!(options.fields, vec![Field::Service, Field::Cidr]);
        assert!(options.ipv4_only);
        assert!(!options.ipv6_only);
    }

    #[test]
    fn test_family_flags_conflict() {
        let result = Args::try_parse_from(["awsips", "-4", "-6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_field_rejected() {
        let result = Args::try_parse_from(["awsips", "--fields", "cidr,owner"]);
        assert!(result.is_err());
    }
}
