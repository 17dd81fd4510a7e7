use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::DominosError;

/// A fully-read HTTP response.
///
/// The body is read inside the retried exchange, so a connection dropped
/// mid-body counts as a transport failure like any other.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Media type without parameters, lower-cased (e.g. `application/json`).
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase());
        let body = response.text().await?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref() == Some("application/json")
    }

    /// Fails with [`DominosError::Protocol`] on a non-2xx status.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::Protocol`] naming `context` and the status.
    pub fn ensure_success(&self, context: &str) -> Result<&Self, DominosError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(DominosError::Protocol(format!(
                "{context} returned HTTP {}",
                self.status.as_u16()
            )))
        }
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::Parse`] if the body does not decode into `T`.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T, DominosError> {
        serde_json::from_str(&self.body).map_err(|e| DominosError::parse(context, e.to_string()))
    }
}
