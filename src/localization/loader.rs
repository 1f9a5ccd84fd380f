//! Loads localization tables from JSON files on disk
//!
//! A table directory holds `countries.json`, `regions.json` and `cities.json`,
//! each a flat object of raw label to localized label. Any file that cannot be
//! read or parsed is replaced by an empty table so startup never fails here.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::LocalizationTables;

pub const COUNTRIES_FILE: &str = "countries.json";
pub const REGIONS_FILE: &str = "regions.json";
pub const CITIES_FILE: &str = "cities.json";

/// Directory the tables are read from, optionally narrowed to a locale
pub fn table_dir(dir: &Path, locale: Option<&str>) -> PathBuf {
    match locale {
        Some(locale) if !locale.is_empty() => dir.join(locale),
        _ => dir.to_path_buf(),
    }
}

pub fn load_tables(dir: &Path, locale: Option<&str>) -> LocalizationTables {
    let dir = table_dir(dir, locale);

    let tables = LocalizationTables {
        countries: load_map_or_empty(&dir.join(COUNTRIES_FILE)),
        regions: load_map_or_empty(&dir.join(REGIONS_FILE)),
        cities: load_map_or_empty(&dir.join(CITIES_FILE)),
    };

    info!(
        dir = %dir.display(),
        countries = tables.countries.len(),
        regions = tables.regions.len(),
        cities = tables.cities.len(),
        "Loaded localization tables"
    );

    tables
}

fn load_map_or_empty(path: &Path) -> HashMap<String, String> {
    match load_map(path) {
        Ok(map) => map,
        Err(err) => {
            warn!("{:#}. Using an empty table", err);
            HashMap::new()
        }
    }
}

fn load_map(path: &Path) -> Result<HashMap<String, String>> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read localization table {}", path.display()))?;
    let map = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse localization table {}", path.display()))?;
    Ok(map)
}
