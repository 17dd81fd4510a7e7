use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    PickUp,
    Delivery,
}

impl OrderType {
    pub const ALL: [OrderType; 2] = [OrderType::PickUp, OrderType::Delivery];

    /// The site's internal token, as found in store-listing button names.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            OrderType::PickUp => "recoger",
            OrderType::Delivery => "domicilio",
        }
    }

    /// The token in the title case the session-start endpoint expects.
    #[must_use]
    pub fn session_token(self) -> &'static str {
        match self {
            OrderType::PickUp => "Recoger",
            OrderType::Delivery => "Domicilio",
        }
    }

    /// Maps a site token (`recoger` / `domicilio`) back onto the enum.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "recoger" => Some(OrderType::PickUp),
            "domicilio" => Some(OrderType::Delivery),
            _ => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::PickUp => write!(f, "pick_up"),
            OrderType::Delivery => write!(f, "delivery"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown order type \"{0}\" (expected pick_up or delivery)")]
pub struct UnknownOrderType(pub String);

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pick_up" | "pickup" => Ok(OrderType::PickUp),
            "delivery" => Ok(OrderType::Delivery),
            other => OrderType::from_token(other).ok_or_else(|| UnknownOrderType(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub long: f64,
}

/// A pizza store as resolved from the store-search listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: u32,
    pub name: String,
    pub phone: u64,
    pub schedule: String,
    pub types: Vec<OrderType>,
    pub coords: Coords,
}

impl Store {
    #[must_use]
    pub fn supports(&self, order_type: OrderType) -> bool {
        self.types.contains(&order_type)
    }

    #[must_use]
    pub fn alias(&self) -> String {
        crate::normalize::store_alias(&self.name)
    }
}

/// A promotion listed on the order session after a code was accepted.
///
/// Equality covers all three fields; it is what keeps repeated probes from
/// recording the same promotion twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedPromotion {
    pub order_type: OrderType,
    pub description: String,
    pub expires: NaiveDate,
}

/// A candidate code that unlocked a previously unseen promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingCode {
    pub code: String,
    #[serde(flatten)]
    pub promotion: AppliedPromotion,
}

impl WorkingCode {
    #[must_use]
    pub fn new(code: impl Into<String>, promotion: AppliedPromotion) -> Self {
        Self {
            code: code.into(),
            promotion,
        }
    }
}

/// One accepted code as shown in a store report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub description: String,
    pub expires: NaiveDate,
    pub code: String,
}

impl From<&WorkingCode> for ReportEntry {
    fn from(working: &WorkingCode) -> Self {
        Self {
            description: working.promotion.description.clone(),
            expires: working.promotion.expires,
            code: working.code.clone(),
        }
    }
}

/// Per-store output document: the store, when the report was generated, and
/// the accepted codes grouped by order type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreReport {
    pub store: Store,
    pub updated: DateTime<Utc>,
    pub order_types: BTreeMap<OrderType, Vec<ReportEntry>>,
}

impl StoreReport {
    #[must_use]
    pub fn new(store: Store, updated: DateTime<Utc>) -> Self {
        Self {
            store,
            updated,
            order_types: BTreeMap::new(),
        }
    }

    /// Ensures `order_type` is present in the report even when no code worked.
    pub fn touch(&mut self, order_type: OrderType) {
        self.order_types.entry(order_type).or_default();
    }

    /// Adds an accepted code under its order type. An identical entry
    /// already in the report is not added again.
    pub fn record(&mut self, working: &WorkingCode) {
        let entry = ReportEntry::from(working);
        let entries = self
            .order_types
            .entry(working.promotion.order_type)
            .or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }

    /// `<alias>.json`, or `store-<id>.json` when the store name has no
    /// letters or digits to build an alias from.
    #[must_use]
    pub fn file_name(&self) -> String {
        let alias = self.store.alias();
        if alias.is_empty() {
            format!("store-{}.json", self.store.id)
        } else {
            format!("{alias}.json")
        }
    }
}
