//! Order session state machine.
//!
//! `Uninitialized → ShopSelected → TypeSelected → SessionStarted`. Store and
//! order type can be chosen in either order; `start_order` needs both, and
//! `check_code` needs a started session. Choosing a different store or order
//! type drops the session back out of `SessionStarted`.

use autodominos_core::{Address, AppliedPromotion, LookupTable, OrderType, Store};

use crate::client::{DominosClient, APPLY_PROMO_PATH, PROMOTIONS_PATH, SESSION_START_PATH};
use crate::error::DominosError;
use crate::extract::{extract_promotions, extract_token, TOKEN_FIELD};
use crate::types::ResultEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    ShopSelected,
    TypeSelected,
    SessionStarted,
}

/// Result of probing one code. None of these are errors: most candidate
/// codes are expected to be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutcome {
    /// The server did not accept the code.
    Rejected,
    /// The code was accepted but every listed promotion was already recorded.
    NoNewPromotion,
    /// The first listed promotion not seen before; it is now recorded.
    NewPromotion(AppliedPromotion),
}

/// Per-run state against the site's server-side order session.
///
/// Owns the [`DominosClient`] and with it the cookie jar the server session
/// is bound to.
pub struct OrderSession {
    client: DominosClient,
    store: Option<Store>,
    order_type: Option<OrderType>,
    started: bool,
    /// Fetched on the first `check_code` and reused for the rest of the run.
    token: Option<String>,
    applied: Vec<AppliedPromotion>,
}

impl OrderSession {
    #[must_use]
    pub fn new(client: DominosClient) -> Self {
        Self {
            client,
            store: None,
            order_type: None,
            started: false,
            token: None,
            applied: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.started {
            SessionState::SessionStarted
        } else if self.order_type.is_some() {
            SessionState::TypeSelected
        } else if self.store.is_some() {
            SessionState::ShopSelected
        } else {
            SessionState::Uninitialized
        }
    }

    #[must_use]
    pub fn client(&self) -> &DominosClient {
        &self.client
    }

    #[must_use]
    pub fn store(&self) -> Option<&Store> {
        self.store.as_ref()
    }

    #[must_use]
    pub fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    /// Promotions recorded so far, in discovery order.
    #[must_use]
    pub fn applied_promotions(&self) -> &[AppliedPromotion] {
        &self.applied
    }

    /// Resolves `address` to a store and selects it.
    ///
    /// The address is normalized, resolved to site ids through `table`, then
    /// searched remotely. On failure the previous selection is kept.
    ///
    /// # Errors
    ///
    /// - [`DominosError::Lookup`] if the province/city pair is not in `table`
    ///   or the remote search finds no store.
    /// - Any error from [`DominosClient::search_store`].
    pub async fn select_shop(
        &mut self,
        table: &LookupTable,
        address: &Address,
    ) -> Result<&Store, DominosError> {
        let normalized = address.normalized();
        let location = table.resolve(&normalized).ok_or_else(|| {
            DominosError::Lookup(format!(
                "province/city {}/{} is not in the lookup table",
                normalized.province, normalized.city
            ))
        })?;

        let store = self.client.search_store(location, &normalized).await?;
        if self.store.as_ref().map(|s| s.id) != Some(store.id) {
            self.started = false;
        }
        Ok(&*self.store.insert(store))
    }

    /// Chooses the order type. Valid in any state.
    pub fn select_type(&mut self, order_type: OrderType) {
        if self.order_type != Some(order_type) {
            self.started = false;
        }
        self.order_type = Some(order_type);
    }

    /// Opens the server-side order session for the selected store and type.
    ///
    /// # Errors
    ///
    /// - [`DominosError::InvalidState`] if the store or order type is not set;
    ///   no request is sent.
    /// - [`DominosError::Protocol`] if the server does not report success.
    /// - [`DominosError::Parse`] if the response is not the JSON envelope.
    /// - [`DominosError::TransportExhausted`] if the request keeps failing.
    pub async fn start_order(&mut self) -> Result<(), DominosError> {
        let (Some(store), Some(order_type)) = (self.store.as_ref(), self.order_type) else {
            return Err(DominosError::InvalidState(format!(
                "start_order needs a store and an order type (state: {:?})",
                self.state()
            )));
        };

        let form = [
            ("idTienda", store.id.to_string()),
            ("tipoPedido", order_type.session_token().to_owned()),
        ];
        let response = self.client.post_form(SESSION_START_PATH, &form).await?;
        response.ensure_success("session start")?;
        let envelope: ResultEnvelope = response.json("session start")?;
        if !envelope.result {
            return Err(DominosError::Protocol(format!(
                "session start rejected for store {} ({order_type})",
                store.id
            )));
        }

        tracing::info!(store_id = store.id, order_type = %order_type, "order session started");
        self.started = true;
        Ok(())
    }

    /// Probes one candidate code.
    ///
    /// On acceptance the promotions page is re-read and the first listed
    /// promotion that is not already recorded is recorded and returned. Any
    /// further new promotions on the page are left for later probes.
    ///
    /// # Errors
    ///
    /// - [`DominosError::InvalidState`] if the session has not been started.
    /// - [`DominosError::Parse`] if the token, the JSON envelope, or the
    ///   promotion list cannot be extracted.
    /// - [`DominosError::Protocol`] on a non-2xx status.
    /// - [`DominosError::TransportExhausted`] if a request keeps failing.
    pub async fn check_code(&mut self, code: &str) -> Result<CodeOutcome, DominosError> {
        let order_type = match (self.started, self.order_type) {
            (true, Some(order_type)) => order_type,
            _ => {
                return Err(DominosError::InvalidState(format!(
                    "check_code needs a started session (state: {:?})",
                    self.state()
                )))
            }
        };

        let token = self.anti_forgery_token().await?;
        let form = [
            ("CodPromo", code.to_owned()),
            ("url", "false".to_owned()),
            (TOKEN_FIELD, token),
        ];
        let response = self.client.post_form(APPLY_PROMO_PATH, &form).await?;
        response.ensure_success("promo apply")?;
        let envelope: ResultEnvelope = response.json("promo apply")?;
        if !envelope.result {
            tracing::debug!(code, "code rejected");
            return Ok(CodeOutcome::Rejected);
        }

        let page = self.client.get(PROMOTIONS_PATH).await?;
        page.ensure_success("promotions page")?;
        let listed = extract_promotions(&page.body)?;

        let fresh = listed
            .into_iter()
            .map(|p| AppliedPromotion {
                order_type,
                description: p.description,
                expires: p.expires,
            })
            .find(|p| !self.applied.contains(p));

        match fresh {
            Some(promotion) => {
                tracing::info!(
                    code,
                    order_type = %order_type,
                    description = %promotion.description,
                    expires = %promotion.expires,
                    "code unlocked a new promotion"
                );
                self.applied.push(promotion.clone());
                Ok(CodeOutcome::NewPromotion(promotion))
            }
            None => {
                tracing::debug!(code, "code accepted but no new promotion listed");
                Ok(CodeOutcome::NoNewPromotion)
            }
        }
    }

    async fn anti_forgery_token(&mut self) -> Result<String, DominosError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        let page = self.client.get(PROMOTIONS_PATH).await?;
        page.ensure_success("promotions page")?;
        let token = extract_token(&page.body)?;
        tracing::debug!("fetched anti-forgery token");
        Ok(self.token.insert(token).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::ClientSettings;

    fn offline_session() -> OrderSession {
        // Nothing listens here; any request would fail the tests below.
        let client = DominosClient::new(&ClientSettings {
            base_url: "http://0.0.0.0:1/".to_owned(),
            user_agent: "AutoDominos/2.0".to_owned(),
            timeout: Duration::from_secs(1),
            max_retries: 1,
            backoff_base_ms: 0,
        })
        .unwrap();
        OrderSession::new(client)
    }

    #[test]
    fn new_session_is_uninitialized() {
        let session = offline_session();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.applied_promotions().is_empty());
    }

    #[test]
    fn select_type_is_valid_without_a_store() {
        let mut session = offline_session();
        session.select_type(OrderType::Delivery);
        assert_eq!(session.state(), SessionState::TypeSelected);
        assert_eq!(session.order_type(), Some(OrderType::Delivery));
    }

    #[tokio::test]
    async fn start_order_without_store_is_invalid_state() {
        let mut session = offline_session();
        session.select_type(OrderType::PickUp);
        let result = session.start_order().await;
        assert!(
            matches!(result, Err(DominosError::InvalidState(_))),
            "got: {result:?}"
        );
    }

    #[tokio::test]
    async fn start_order_on_fresh_session_is_invalid_state() {
        let mut session = offline_session();
        assert!(matches!(
            session.start_order().await,
            Err(DominosError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn check_code_before_start_is_invalid_state() {
        let mut session = offline_session();
        session.select_type(OrderType::Delivery);
        let result = session.check_code("SAVE10").await;
        assert!(
            matches!(result, Err(DominosError::InvalidState(_))),
            "got: {result:?}"
        );
    }

    #[tokio::test]
    async fn select_shop_with_unknown_city_is_lookup_error() {
        let mut session = offline_session();
        let table = LookupTable::default();
        let result = session
            .select_shop(&table, &Address::new("Madrid", "Madrid", "Gran Via", 1))
            .await;
        assert!(matches!(result, Err(DominosError::Lookup(_))));
        assert_eq!(session.state(), SessionState::Uninitialized);
    }
}
