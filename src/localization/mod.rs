//! Localization overlay for geolocation labels
//!
//! Raw labels reported by the geo database are remapped through three fixed
//! tables (country, region, city). A miss always falls back to the raw label.

pub mod loader;

use std::collections::HashMap;

pub use loader::load_tables;

/// Result fields that can be localized.
///
/// `country_code` is deliberately absent: it is always returned raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    CountryName,
    RegionName,
    CityName,
}

impl Category {
    /// Map a field name to its category, `None` for anything outside the set
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "country_name" => Some(Self::CountryName),
            "region_name" => Some(Self::RegionName),
            "city_name" => Some(Self::CityName),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CountryName => "country_name",
            Self::RegionName => "region_name",
            Self::CityName => "city_name",
        }
    }
}

/// Raw label -> localized label mappings, one per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationTables {
    pub countries: HashMap<String, String>,
    pub regions: HashMap<String, String>,
    pub cities: HashMap<String, String>,
}

impl LocalizationTables {
    pub fn table(&self, category: Category) -> &HashMap<String, String> {
        match category {
            Category::CountryName => &self.countries,
            Category::RegionName => &self.regions,
            Category::CityName => &self.cities,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.regions.is_empty() && self.cities.is_empty()
    }
}

/// Immutable label resolver built once at startup
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    tables: LocalizationTables,
}

impl Localizer {
    pub fn new(tables: LocalizationTables) -> Self {
        Self { tables }
    }

    /// Localizer with empty tables, i.e. the identity function
    pub fn passthrough() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &LocalizationTables {
        &self.tables
    }

    pub fn resolve<'a>(&'a self, category: Category, raw: &'a str) -> &'a str {
        self.tables
            .table(category)
            .get(raw)
            .map(String::as_str)
            .unwrap_or(raw)
    }

    /// Resolve by field name; unknown field names never remap
    pub fn resolve_field<'a>(&'a self, field: &str, raw: &'a str) -> &'a str {
        match Category::from_field(field) {
            Some(category) => self.resolve(category, raw),
            None => raw,
        }
    }
}
