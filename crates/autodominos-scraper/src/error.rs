use thiserror::Error;

/// Errors surfaced by the client, the extractors, and the order session.
///
/// Rejected codes and codes that surface nothing new are not errors; see
/// [`crate::CodeOutcome`].
#[derive(Debug, Error)]
pub enum DominosError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// Every attempt in the retry budget failed at the transport level.
    #[error("{method} {url} failed after {attempts} attempts: {source}")]
    TransportExhausted {
        method: String,
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// A page or JSON body did not have the shape the site is known to serve.
    #[error("unexpected response for {context}: {reason}")]
    Parse { context: String, reason: String },

    /// The address is not in the lookup table, or the store search found nothing.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// An operation was called before the session reached the state it needs.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// The server answered but reported failure where success was required.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl DominosError {
    pub(crate) fn parse(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
