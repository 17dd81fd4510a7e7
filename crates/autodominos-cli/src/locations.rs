use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use autodominos_core::AppConfig;
use autodominos_scraper::{ClientSettings, DominosClient};

/// Rebuilds the lookup table from the province list at `provinces_path` and
/// saves it to the configured locations path.
pub(crate) async fn run_refresh(config: &AppConfig, provinces_path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(provinces_path)
        .with_context(|| format!("reading {}", provinces_path.display()))?;
    let provinces: BTreeMap<String, u32> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing province map in {}", provinces_path.display()))?;

    let client = DominosClient::new(&ClientSettings::from_config(config))?;
    let table = client.refresh_lookup_table(&provinces).await?;
    table.save(&config.locations_path)?;

    println!(
        "wrote {} provinces to {}",
        table.len(),
        config.locations_path.display()
    );
    Ok(())
}
