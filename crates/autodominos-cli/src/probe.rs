//! `probe` and `check` command handlers.
//!
//! Each address gets its own [`OrderSession`], and with it its own cookie
//! jar and recorded-promotion list. Addresses that cannot be resolved are
//! logged and skipped so one bad entry does not abort the batch; every other
//! error ends the run. Addresses served by the same store share one report.

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::Utc;
use futures::StreamExt;

use autodominos_core::{
    load_addresses, load_candidate_codes, Address, AddressEntry, AppConfig, LookupTable,
    OrderType, StoreReport,
};
use autodominos_scraper::{
    probe_codes, ClientSettings, CodeOutcome, DominosClient, DominosError, OrderSession,
};

use crate::report::write_report;

/// Totals for one `probe` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ProbeSummary {
    pub addresses: usize,
    pub skipped: usize,
    pub found: usize,
}

pub(crate) async fn run_probe(
    config: &AppConfig,
    only_type: Option<OrderType>,
    limit: Option<usize>,
) -> anyhow::Result<ProbeSummary> {
    let addresses = load_addresses(&config.addresses_path)?;
    let table = LookupTable::load(&config.locations_path)?;
    let mut codes = load_candidate_codes(&config.codes_path)?;
    if let Some(limit) = limit {
        codes.truncate(limit);
    }

    if addresses.addresses.is_empty() || codes.is_empty() {
        println!("nothing to probe: no addresses or no candidate codes");
        return Ok(ProbeSummary::default());
    }

    tracing::info!(
        addresses = addresses.addresses.len(),
        codes = codes.len(),
        "starting probe run"
    );

    let settings = ClientSettings::from_config(config);
    let mut reports: BTreeMap<u32, StoreReport> = BTreeMap::new();
    let mut summary = ProbeSummary {
        addresses: addresses.addresses.len(),
        ..ProbeSummary::default()
    };

    let run = AddressRun {
        config,
        settings: &settings,
        table: &table,
        codes: &codes,
        only_type,
    };
    for entry in &addresses.addresses {
        if let Some(count) = run.probe(entry, &mut reports).await? {
            summary.found += count;
        } else {
            summary.skipped += 1;
        }
    }

    if summary.skipped > 0 {
        tracing::warn!(
            skipped = summary.skipped,
            total = summary.addresses,
            "some addresses could not be resolved"
        );
    }
    println!(
        "found {} working codes across {} addresses ({} skipped, {} store reports)",
        summary.found,
        summary.addresses,
        summary.skipped,
        reports.len()
    );
    Ok(summary)
}

/// Inputs shared by every address of a `probe` run.
struct AddressRun<'a> {
    config: &'a AppConfig,
    settings: &'a ClientSettings,
    table: &'a LookupTable,
    codes: &'a [String],
    only_type: Option<OrderType>,
}

impl AddressRun<'_> {
    /// Probes every wanted order type at the store serving `entry`, merges
    /// the hits into that store's report and rewrites it. Returns `Ok(None)`
    /// when the address could not be resolved.
    async fn probe(
        &self,
        entry: &AddressEntry,
        reports: &mut BTreeMap<u32, StoreReport>,
    ) -> anyhow::Result<Option<usize>> {
        let mut session = OrderSession::new(DominosClient::new(self.settings)?);

        let store = match session.select_shop(self.table, &entry.address).await {
            Ok(store) => store.clone(),
            Err(DominosError::Lookup(reason)) => {
                tracing::warn!(address = %entry.address, reason, "skipping address");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("resolving store for {}", entry.address));
            }
        };

        let order_types: Vec<OrderType> = OrderType::ALL
            .into_iter()
            .filter(|t| store.supports(*t) && entry.wants(*t))
            .filter(|t| self.only_type.is_none_or(|only| only == *t))
            .collect();
        if order_types.is_empty() {
            tracing::warn!(store = %store.name, "store offers none of the requested order types");
        }

        let report = reports
            .entry(store.id)
            .or_insert_with(|| StoreReport::new(store.clone(), Utc::now()));
        let mut found = 0;

        for order_type in order_types {
            report.touch(order_type);
            session.select_type(order_type);
            session
                .start_order()
                .await
                .with_context(|| format!("starting {order_type} order at {}", store.name))?;

            let mut working_codes =
                std::pin::pin!(probe_codes(&mut session, self.codes.iter().cloned()));
            while let Some(result) = working_codes.next().await {
                let working = result
                    .with_context(|| format!("probing {order_type} codes at {}", store.name))?;
                println!(
                    "{} [{}] {}: {} (expires {})",
                    store.name,
                    order_type,
                    working.code,
                    working.promotion.description,
                    working.promotion.expires
                );
                report.record(&working);
                found += 1;
            }
        }

        report.updated = Utc::now();
        let path = write_report(&self.config.reports_dir, report)?;
        tracing::info!(store = %store.name, found, path = %path.display(), "wrote store report");
        Ok(Some(found))
    }
}

pub(crate) async fn run_check(
    config: &AppConfig,
    address: &Address,
    order_type: OrderType,
    code: &str,
) -> anyhow::Result<()> {
    let table = LookupTable::load(&config.locations_path)?;
    let client = DominosClient::new(&ClientSettings::from_config(config))?;
    let mut session = OrderSession::new(client);

    let store = session
        .select_shop(&table, address)
        .await
        .with_context(|| format!("resolving store for {address}"))?
        .clone();
    if !store.supports(order_type) {
        anyhow::bail!("store {} does not offer {order_type}", store.name);
    }

    session.select_type(order_type);
    session.start_order().await?;

    match session.check_code(code).await? {
        CodeOutcome::Rejected => println!("{code}: rejected at {}", store.name),
        CodeOutcome::NoNewPromotion => {
            println!("{code}: accepted at {}, no new promotion listed", store.name);
        }
        CodeOutcome::NewPromotion(promotion) => println!(
            "{code}: {} (expires {}) at {}",
            promotion.description, promotion.expires, store.name
        ),
    }
    Ok(())
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;
