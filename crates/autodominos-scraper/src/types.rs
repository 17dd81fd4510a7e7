//! Wire shapes of the site's JSON endpoints.

use serde::Deserialize;

/// `{ "result": bool }` envelope returned by the session-start, promo-apply,
/// and failed store-search endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResultEnvelope {
    pub result: bool,
}

/// One entry of the city list returned by `Tienda/GetLocalidadesJson`.
#[derive(Debug, Clone, Deserialize)]
pub struct CityOption {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Value")]
    pub value: SiteId,
}

/// Numeric id that the site serializes either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SiteId {
    Number(u32),
    Text(String),
}

impl SiteId {
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            SiteId::Number(n) => Some(*n),
            SiteId::Text(s) => s.trim().parse().ok(),
        }
    }
}
