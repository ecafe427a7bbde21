use crate::core::errors::{Error, Result};
use crate::core::json;
use crate::core::range_document::RangeDocument;
use log::{info, warn};
use std::env;
use std::fs;
use std::path::Path;
use std::{thread, time};

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ loads the AWS IP Ranges using the default client
/// configuration: from `source` when a file path is provided, otherwise from the
/// AWS IP Ranges URL.
///
/// ```no_run
/// use std::path::Path;
///
/// // Download the current AWS IP Ranges
/// let document = awsips::load(None).unwrap();
///
/// // Read a previously downloaded copy
/// let document = awsips::load(Some(Path::new("ip-ranges.json"))).unwrap();
/// ```
pub fn load(source: Option<&Path>) -> Result<RangeDocument> {
    Client::new().load(source)
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration. The
/// [ClientBuilder] struct provides setters for each configuration value and a
/// [ClientBuilder::build] method to create a [Client] instance.
///
/// ```
/// let client = awsips::ClientBuilder::new()
///     .url("https://ip-ranges.amazonaws.com/ip-ranges.json")
///     .timeout(10_000) // 10 seconds
///     .retry_count(4)
///     .retry_initial_delay(200) // 200 ms
///     .retry_backoff_factor(2)
///     .retry_timeout(30_000) // 30 seconds
///     .build();
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
///
/// If you want to use the default configuration values, ignoring any environment variables, use
/// the [ClientBuilder::default] method to create a new [ClientBuilder] instance.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: u64,
    retry_count: u32,
    retry_initial_delay: u64,
    retry_backoff_factor: u64,
    retry_timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let client = awsips::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.url(), "https://ip-ranges.amazonaws.com/ip-ranges.json");
    /// assert_eq!(client.timeout(), 6000);
    /// assert_eq!(client.retry_count(), 3);
    /// assert_eq!(client.retry_initial_delay(), 200);
    /// assert_eq!(client.retry_backoff_factor(), 2);
    /// assert_eq!(client.retry_timeout(), 20000);
    /// ```
    fn default() -> Self {
        Self {
            url: "https://ip-ranges.amazonaws.com/ip-ranges.json".to_string(),
            timeout: 6000, // 6 seconds
            retry_count: 3,
            retry_initial_delay: 200, // 200 ms
            retry_backoff_factor: 2,
            retry_timeout: 20000, // 20 seconds
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `AWSIPS_URL`
    /// - `AWSIPS_TIMEOUT`
    /// - `AWSIPS_RETRY_COUNT`
    /// - `AWSIPS_RETRY_INITIAL_DELAY`
    /// - `AWSIPS_RETRY_BACKOFF_FACTOR`
    /// - `AWSIPS_RETRY_TIMEOUT`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("AWSIPS_URL", default.url),
            timeout: get_env_var("AWSIPS_TIMEOUT", default.timeout),
            retry_count: get_env_var("AWSIPS_RETRY_COUNT", default.retry_count),
            retry_initial_delay: get_env_var(
                "AWSIPS_RETRY_INITIAL_DELAY",
                default.retry_initial_delay,
            ),
            retry_backoff_factor: get_env_var(
                "AWSIPS_RETRY_BACKOFF_FACTOR",
                default.retry_backoff_factor,
            ),
            retry_timeout: get_env_var("AWSIPS_RETRY_TIMEOUT", default.retry_timeout),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the URL used to retrieve the AWS IP Ranges; defaults to
    /// `https://ip-ranges.amazonaws.com/ip-ranges.json` - see
    /// [AWS IP address ranges](https://docs.aws.amazon.com/vpc/latest/userguide/aws-ip-ranges.html)
    /// in the Amazon Virtual Private Cloud (VPC) User Guide for details.
    pub fn url<'s>(&'s mut self, url: &str) -> &'s mut Self {
        self.url = url.to_string();
        self
    }

    /// Set the timeout (in milliseconds) for a single request to the AWS IP
    /// Ranges URL; defaults to `6000` milliseconds (6 seconds).
    pub fn timeout(&mut self, timeout: u64) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of attempts to retrieve the AWS IP Ranges JSON from the
    /// URL; defaults to `3` attempts.
    pub fn retry_count(&mut self, retry_count: u32) -> &mut Self {
        self.retry_count = retry_count;
        self
    }

    /// Set the initial delay (in milliseconds) between retry attempts to
    /// retrieve the AWS IP Ranges JSON from the URL; defaults to `200`
    /// milliseconds.
    ///
    /// The delay between retry attempts is calculated as:
    /// `retry_initial_delay * (retry_backoff_factor ^ attempt)`.
    pub fn retry_initial_delay(&mut self, retry_initial_delay: u64) -> &mut Self {
        self.retry_initial_delay = retry_initial_delay;
        self
    }

    /// Set the backoff factor used to increase the delay between retry
    /// attempts to retrieve the AWS IP Ranges JSON from the URL; defaults
    /// to `2`.
    pub fn retry_backoff_factor(&mut self, retry_backoff_factor: u64) -> &mut Self {
        self.retry_backoff_factor = retry_backoff_factor;
        self
    }

    /// Set the maximum time (in milliseconds) to spend retrying the AWS IP
    /// Ranges URL; defaults to `20000` milliseconds (20 seconds). No retry is
    /// started when its delay would exceed this budget.
    pub fn retry_timeout(&mut self, retry_timeout: u64) -> &mut Self {
        self.retry_timeout = retry_timeout;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            url: self.url.clone(),
            timeout: self.timeout,
            retry_count: self.retry_count,
            retry_initial_delay: self.retry_initial_delay,
            retry_backoff_factor: self.retry_backoff_factor,
            retry_timeout: self.retry_timeout,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A client for loading the AWS IP Ranges from a local file or from the AWS IP Ranges URL.
/// Requests follow redirects and accept gzip-compressed responses. Client implements a simple
/// exponential-backoff retry mechanism for network failures; a response that is not a valid AWS
/// IP Ranges document is not retried.
///
/// The [Client::new] method attempts to source configuration values from environment variables
/// when set and uses default values when the environment variables are not set.
///
/// ```no_run
/// let client = awsips::Client::new();
/// let document = client.load(None).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    timeout: u64,
    retry_count: u32,
    retry_initial_delay: u64,
    retry_backoff_factor: u64,
    retry_timeout: u64,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    /// Create a new [Client] with default configuration values.
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Get the URL used to retrieve the AWS IP Ranges.
    /// Defaults to `https://ip-ranges.amazonaws.com/ip-ranges.json`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the timeout (in milliseconds) for a single request.
    /// Defaults to 6000 milliseconds (6 seconds).
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Get the number of attempts to retrieve the AWS IP Ranges JSON from the
    /// URL. Defaults to 3 attempts.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Get the initial delay (in milliseconds) between retry attempts.
    /// Defaults to 200 milliseconds.
    pub fn retry_initial_delay(&self) -> u64 {
        self.retry_initial_delay
    }

    /// Get the backoff factor used to increase the delay between retry
    /// attempts. Defaults to 2.
    pub fn retry_backoff_factor(&self) -> u64 {
        self.retry_backoff_factor
    }

    /// Get the maximum time (in milliseconds) to spend retrying the URL.
    /// Defaults to 20000 milliseconds (20 seconds).
    pub fn retry_timeout(&self) -> u64 {
        self.retry_timeout
    }

    /*-------------------------------------------------------------------------
      Load
    -------------------------------------------------------------------------*/

    /// Load and parse the AWS IP Ranges from `source` when a file path is
    /// provided, otherwise from the URL.
    pub fn load(&self, source: Option<&Path>) -> Result<RangeDocument> {
        let json = match source {
            Some(path) => self.get_json_from_file(path)?,
            None => self.get_json_from_url()?,
        };
        let document = json::parse(&json)?;

        info!(
            "Loaded {} IPv4 and {} IPv6 AWS IP Prefixes (syncToken {})",
            document.prefixes().len(),
            document.ipv6_prefixes().len(),
            document.sync_token()
        );

        Ok(document)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Get the AWS IP Ranges JSON from a local file.
    fn get_json_from_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map_err(Error::transport)
            .inspect(|_| info!("Read AWS IP Ranges JSON from: {:?}", path))
            .inspect_err(|error| {
                log::error!("Failed to read AWS IP Ranges JSON from `{:?}`: {}", path, error)
            })
    }

    /// Get the AWS IP Ranges JSON from the URL.
    fn get_json_from_url(&self) -> Result<String> {
        let http = reqwest::blocking::Client::builder()
            .timeout(time::Duration::from_millis(self.timeout))
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true)
            .build()
            .map_err(Error::transport)?;

        let start_time = time::Instant::now();
        let max_elapsed_time = time::Duration::from_millis(self.retry_timeout);

        let mut attempt: u32 = 0;
        loop {
            info!(
                "Get AWS IP Ranges from URL; Attempt {}: GET {}",
                attempt, self.url
            );
            let json: Result<String> = http
                .get(&self.url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(Error::transport);

            match json {
                Ok(json) => {
                    info!("Get AWS IP Ranges from URL; Attempt {}: Ok", attempt);
                    break Ok(json);
                }
                Err(error) => {
                    warn!(
                        "Get AWS IP Ranges from URL; Attempt {}: FAILED: {}",
                        attempt, error
                    );

                    let delay = time::Duration::from_millis(
                        self.retry_initial_delay * (self.retry_backoff_factor.pow(attempt)),
                    );

                    attempt += 1;

                    if (start_time.elapsed() + delay < max_elapsed_time)
                        && (attempt < self.retry_count)
                    {
                        thread::sleep(delay);
                        continue;
                    } else {
                        break Err(error);
                    }
                }
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
