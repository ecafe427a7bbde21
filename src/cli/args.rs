use awsips::{Encoding, Field};
use clap::Parser;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the AWS IP address ranges.", long_about = None)]
pub struct Args {
    /// Include prefixes from this AWS Region
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Include prefixes used by this AWS Service
    #[arg(short = 's', long)]
    pub service: Option<String>,

    /// Find the prefixes that contain this IP address
    #[arg(short = 'i', long)]
    pub ip: Option<String>,

    /// Find the prefixes that contain the address this hostname resolves to
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,

    /// Output IPv4 prefixes only
    #[arg(short = '4', long, conflicts_with = "ipv6_only")]
    pub ipv4_only: bool,

    /// Output IPv6 prefixes only
    #[arg(short = '6', long)]
    pub ipv6_only: bool,

    /// Exclude prefixes used by the AMAZON service
    #[arg(long)]
    pub exclude_amazon: bool,

    /// Fields to output [default: all for --ip and --hostname, otherwise cidr]
    #[arg(short = 'f', long, value_enum, value_delimiter = ',')]
    pub fields: Option<Vec<Field>>,

    /// Output encoding
    #[arg(short = 'e', long, value_enum, default_value_t = Encoding::Text)]
    pub encoding: Encoding,

    /// Separator between text-encoded fields
    #[arg(long, default_value = " | ")]
    pub separator: String,

    /// Read the AWS IP Ranges from this file instead of downloading them
    #[arg(long)]
    pub source_file: Option<PathBuf>,

    /// Logging verbosity; -q suppresses all output
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}
