use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Boxed source error carried inside the [Error] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type used throughout the crate. Each variant is a failure kind the
/// command-line layer reports with its own exit code.
#[derive(Debug, Error)]
pub enum Error {
    /// The query itself is invalid: conflicting query options, an unparsable IP
    /// address, or a hostname that does not resolve.
    #[error("{0}")]
    Usage(String),

    /// The AWS IP Ranges document could not be parsed (malformed JSON or CIDR).
    #[error("invalid AWS IP Ranges document: {0}")]
    Data(#[source] BoxError),

    /// The AWS IP Ranges document could not be read or retrieved.
    #[error("unable to load AWS IP Ranges: {0}")]
    Transport(#[source] BoxError),

    /// The query results could not be serialized.
    #[error("unable to render results: {0}")]
    Render(#[source] BoxError),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/*--------------------------------------------------------------------------------------
  Error Implementation
--------------------------------------------------------------------------------------*/

impl Error {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    pub(crate) fn data(error: impl Into<BoxError>) -> Self {
        Error::Data(error.into())
    }

    pub(crate) fn transport(error: impl Into<BoxError>) -> Self {
        Error::Transport(error.into())
    }

    pub(crate) fn render(error: impl Into<BoxError>) -> Self {
        Error::Render(error.into())
    }

    /// Process exit code for this kind of failure. Usage errors share `2` with
    /// the argument parser; load and render failures use `3`. Exit code `1` is
    /// reserved for an empty query result.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            Error::Data(_) | Error::Transport(_) | Error::Render(_) => 3,
        }
    }
}

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
