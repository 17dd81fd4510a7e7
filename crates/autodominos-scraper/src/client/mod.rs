//! HTTP client for the pizza site's public order flow.
//!
//! One [`DominosClient`] holds the cookie jar for a whole run, so the
//! server-assigned session cookies set during store search and session start
//! travel with every later request.

mod response;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, Method, Url};

use autodominos_core::AppConfig;

use crate::error::DominosError;
use crate::retry::retry_transport;

pub use response::RawResponse;

pub const STORE_SEARCH_PATH: &str = "Tienda/BuscarTiendas";
pub const CITY_LIST_PATH: &str = "Tienda/GetLocalidadesJson";
pub const SESSION_START_PATH: &str = "Pedido/IniciarPedidoSession";
pub const PROMOTIONS_PATH: &str = "promociones";
pub const APPLY_PROMO_PATH: &str = "Promocion/AplicarCodPromo";

/// Connection settings for [`DominosClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Per-attempt timeout covering connect, send, and body read.
    pub timeout: Duration,
    /// Total attempts per request.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Cookie-keeping HTTP client with bounded retry on transport failures.
///
/// Every request carries the configured `User-Agent` and a `Referer` pointing
/// at the site root. Non-2xx statuses are returned as ordinary
/// [`RawResponse`]s for the caller to inspect.
pub struct DominosClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DominosClient {
    /// Creates a client with its own cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`DominosError::ClientBuild`] if the `reqwest::Client` cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, DominosError> {
        // Exactly one trailing slash so relative joins append to the root
        // instead of replacing the last path segment.
        let normalised = format!("{}/", settings.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DominosError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        let referer =
            HeaderValue::from_str(base_url.as_str()).map_err(|e| DominosError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                reason: format!("not usable as a Referer header: {e}"),
            })?;
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, referer);

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(DominosError::ClientBuild)?;

        Ok(Self {
            client,
            base_url,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::InvalidBaseUrl`] if the join fails.
    pub fn endpoint(&self, path: &str) -> Result<Url, DominosError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| DominosError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// Performs one request/response exchange with automatic retry.
    ///
    /// `form` is sent url-encoded in the body. `retries` overrides the
    /// client's default budget for this request only.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::TransportExhausted`] if every attempt fails at
    /// the transport level.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, String)]>,
        retries: Option<u32>,
    ) -> Result<RawResponse, DominosError> {
        let url = self.endpoint(path)?;
        let budget = retries.unwrap_or(self.max_retries);
        let method_name = method.as_str().to_owned();
        tracing::debug!(method = %method_name, url = %url, "request");

        retry_transport(
            budget,
            self.backoff_base_ms,
            &method_name,
            url.as_str(),
            || {
                let url = url.clone();
                let method = method.clone();
                async move {
                    let mut request = self.client.request(method, url);
                    if let Some(form) = form {
                        request = request.form(form);
                    }
                    let response = request.send().await?;
                    RawResponse::read(response).await
                }
            },
        )
        .await
    }

    /// `GET` with the default retry budget.
    ///
    /// # Errors
    ///
    /// See [`DominosClient::request`].
    pub async fn get(&self, path: &str) -> Result<RawResponse, DominosError> {
        self.request(Method::GET, path, None, None).await
    }

    /// Url-encoded form `POST` with the default retry budget.
    ///
    /// # Errors
    ///
    /// See [`DominosClient::request`].
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<RawResponse, DominosError> {
        self.request(Method::POST, path, Some(form), None).await
    }
}
