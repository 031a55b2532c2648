use netlogger_common::FieldError;
use thiserror::Error;

/// Hard failures of a NetLogger call.
///
/// "No data" outcomes (non-200 status, no servers, bad arguments) are not
/// errors; see [`crate::FetchOutcome`].
#[derive(Debug, Error)]
pub enum NetLoggerError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed XML response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, NetLoggerError>;
