//! Remote store search and lookup-table refresh.

use std::collections::BTreeMap;

use autodominos_core::{Address, LookupTable, ResolvedLocation, Store};

use crate::client::{DominosClient, CITY_LIST_PATH, STORE_SEARCH_PATH};
use crate::error::DominosError;
use crate::extract::extract_store_listing;
use crate::types::{CityOption, ResultEnvelope};

impl DominosClient {
    /// Finds the store serving `address` in the resolved province/city.
    ///
    /// `address` is expected in normalized form; its street name and number
    /// are sent as-is.
    ///
    /// # Errors
    ///
    /// - [`DominosError::Lookup`] if the search reports no result.
    /// - [`DominosError::Protocol`] on a non-2xx status.
    /// - [`DominosError::Parse`] if the listing page has an unexpected shape.
    /// - [`DominosError::TransportExhausted`] if the request keeps failing.
    pub async fn search_store(
        &self,
        location: ResolvedLocation,
        address: &Address,
    ) -> Result<Store, DominosError> {
        let form = [
            ("idProvincia", location.province_id.to_string()),
            ("idLocalidad", location.city_id.to_string()),
            ("calle", address.street_name.clone()),
            ("numero", address.street_number.to_string()),
            ("guardarDireccion", "false".to_owned()),
        ];
        let response = self.post_form(STORE_SEARCH_PATH, &form).await?;
        response.ensure_success("store search")?;

        if response.is_json() {
            let envelope: ResultEnvelope = response.json("store search")?;
            if !envelope.result {
                return Err(DominosError::Lookup(format!(
                    "store search found no store for {address}"
                )));
            }
            return Err(DominosError::parse(
                "store search",
                "JSON success response instead of a store listing",
            ));
        }

        let store = extract_store_listing(&response.body)?.ok_or_else(|| {
            DominosError::Lookup(format!("store search listed no stores for {address}"))
        })?;
        tracing::info!(
            store_id = store.id,
            store = %store.name,
            address = %address,
            "resolved store"
        );
        Ok(store)
    }

    /// Fetches the city-name → city-id map for one province.
    ///
    /// # Errors
    ///
    /// Returns [`DominosError::Parse`] if the JSON list or any id is malformed,
    /// [`DominosError::Protocol`] on a non-2xx status, or
    /// [`DominosError::TransportExhausted`] if the request keeps failing.
    pub async fn fetch_cities(
        &self,
        province_id: u32,
    ) -> Result<BTreeMap<String, u32>, DominosError> {
        let context = format!("city list for province {province_id}");
        let response = self
            .post_form(CITY_LIST_PATH, &[("provinciaId", province_id.to_string())])
            .await?;
        response.ensure_success(&context)?;

        let options: Vec<CityOption> = response.json(&context)?;
        options
            .into_iter()
            .map(|option| {
                let id = option.value.as_u32().ok_or_else(|| {
                    DominosError::parse(
                        context.as_str(),
                        format!("city {:?} has a non-numeric id", option.text),
                    )
                })?;
                Ok((option.text, id))
            })
            .collect()
    }

    /// Rebuilds the full lookup table from a province-name → province-id map.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`DominosClient::fetch_cities`].
    pub async fn refresh_lookup_table(
        &self,
        provinces: &BTreeMap<String, u32>,
    ) -> Result<LookupTable, DominosError> {
        let mut table = LookupTable::default();
        for (name, &province_id) in provinces {
            let cities = self.fetch_cities(province_id).await?;
            tracing::info!(province = %name, province_id, cities = cities.len(), "fetched cities");
            table.insert_province(name, province_id, cities);
        }
        Ok(table)
    }
}
