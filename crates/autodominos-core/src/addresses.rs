use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::normalize::{city_key, province_key, street_key};
use crate::types::OrderType;
use crate::ConfigError;

/// A customer address, either as typed by a human or in normalized lookup form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub province: String,
    pub city: String,
    pub street_name: String,
    pub street_number: u32,
}

impl Address {
    #[must_use]
    pub fn new(
        province: impl Into<String>,
        city: impl Into<String>,
        street_name: impl Into<String>,
        street_number: u32,
    ) -> Self {
        Self {
            province: province.into(),
            city: city.into(),
            street_name: street_name.into(),
            street_number,
        }
    }

    /// Returns the address in the form used for lookups and store search:
    /// province lower-cased, city and street upper-cased, accents stripped.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            province: province_key(&self.province),
            city: city_key(&self.city),
            street_name: street_key(&self.street_name),
            street_number: self.street_number,
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {} ({})",
            self.street_name, self.street_number, self.city, self.province
        )
    }
}

/// One entry of the address batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressEntry {
    #[serde(flatten)]
    pub address: Address,
    /// Restricts probing to these order types; `None` probes every type the
    /// store supports.
    #[serde(default)]
    pub order_types: Option<Vec<OrderType>>,
}

impl AddressEntry {
    #[must_use]
    pub fn wants(&self, order_type: OrderType) -> bool {
        self.order_types
            .as_ref()
            .is_none_or(|types| types.contains(&order_type))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressesFile {
    pub addresses: Vec<AddressEntry>,
}

/// Load and validate the address batch from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_addresses(path: &Path) -> Result<AddressesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: AddressesFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_addresses(&file)?;

    Ok(file)
}

fn validate_addresses(file: &AddressesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &file.addresses {
        let a = &entry.address;
        if a.province.trim().is_empty() || a.city.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "address \"{a}\" must have a province and a city"
            )));
        }
        if a.street_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "address \"{a}\" must have a street name"
            )));
        }
        if a.street_number == 0 {
            return Err(ConfigError::Validation(format!(
                "address \"{a}\" has street number 0"
            )));
        }
        if entry.order_types.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::Validation(format!(
                "address \"{a}\" lists no order types; omit the field to probe all"
            )));
        }
        if !seen.insert(a.normalized()) {
            return Err(ConfigError::Validation(format!(
                "duplicate address \"{a}\""
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "addresses_test.rs"]
mod tests;
