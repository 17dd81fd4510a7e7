//! Province/city lookup table.
//!
//! Maps a normalized province name to its numeric id and the ids of its
//! cities. The store-search endpoint only accepts these ids, so every
//! address has to be resolved through this table first.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::addresses::Address;
use crate::normalize::{city_key, province_key};
use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceEntry {
    pub id: u32,
    pub cities: BTreeMap<String, u32>,
}

/// Site identifiers for a resolved province/city pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub province_id: u32,
    pub city_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    provinces: BTreeMap<String, ProvinceEntry>,
}

impl LookupTable {
    /// Loads the table from its JSON file, normalizing every key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileIo`] or [`ConfigError::Json`] if the
    /// file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let raw: BTreeMap<String, ProvinceEntry> =
            serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                path: path.display().to_string(),
                source: e,
            })?;

        let mut table = Self::default();
        for (name, entry) in raw {
            table.insert_province(&name, entry.id, entry.cities);
        }
        tracing::debug!(
            path = %path.display(),
            provinces = table.provinces.len(),
            "loaded lookup table"
        );
        Ok(table)
    }

    /// Writes the table as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileIo`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Adds or replaces a province, normalizing its name and city names.
    pub fn insert_province(&mut self, name: &str, id: u32, cities: BTreeMap<String, u32>) {
        let cities = cities
            .into_iter()
            .map(|(city, city_id)| (city_key(&city), city_id))
            .collect();
        self.provinces
            .insert(province_key(name), ProvinceEntry { id, cities });
    }

    /// Resolves an address to the site's province and city ids.
    ///
    /// Returns `None` when the province or the city within it is unknown.
    #[must_use]
    pub fn resolve(&self, address: &Address) -> Option<ResolvedLocation> {
        let province = self.provinces.get(&province_key(&address.province))?;
        let city_id = *province.cities.get(&city_key(&address.city))?;
        Some(ResolvedLocation {
            province_id: province.id,
            city_id,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }
}
