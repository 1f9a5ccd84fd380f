//! Batch resolution with per-address error isolation

use std::sync::Arc;
use tracing::debug;

use super::models::{ItemError, QueryResult, CODE_OK};
use crate::geoip::{GeoField, GeoLookup};
use crate::localization::{Category, Localizer};

/// Split a comma-separated address list into trimmed segments.
///
/// Empty segments are kept so the batch length always matches the input.
pub fn split_addresses(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).collect()
}

#[derive(Clone)]
pub struct BatchResolver {
    provider: Arc<dyn GeoLookup>,
    localizer: Arc<Localizer>,
}

impl BatchResolver {
    pub fn new(provider: Arc<dyn GeoLookup>, localizer: Arc<Localizer>) -> Self {
        Self {
            provider,
            localizer,
        }
    }

    /// Resolve every address in order; output index `i` answers input index `i`
    pub fn resolve_all<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<QueryResult> {
        addresses
            .iter()
            .map(|address| self.resolve_one(address.as_ref()))
            .collect()
    }

    /// Resolve one address. Failures are recorded on the result, never raised.
    pub fn resolve_one(&self, address: &str) -> QueryResult {
        let ip = address.trim();
        if ip.is_empty() {
            return QueryResult::failed(ip, ItemError::InvalidAddress);
        }

        let record = match self.provider.lookup(ip) {
            Ok(record) => record,
            Err(err) => {
                debug!(ip = %ip, error = %err, "Address lookup failed");
                return QueryResult::failed(ip, ItemError::LookupFailed(err));
            }
        };

        let country_code = record.get_string_or_empty(GeoField::CountryCode);
        let region = record.get_string_or_empty(GeoField::Region);
        let city = record.get_string_or_empty(GeoField::City);

        QueryResult {
            ip: ip.to_string(),
            // Country tables are keyed by ISO code
            country: self
                .localizer
                .resolve(Category::CountryName, country_code)
                .to_string(),
            country_code: country_code.to_string(),
            region: self.localizer.resolve(Category::RegionName, region).to_string(),
            city: self.localizer.resolve(Category::CityName, city).to_string(),
            code: CODE_OK.to_string(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geoip::{GeoRecord, LookupError};
    use crate::localization::LocalizationTables;
    use crate::query::models::ErrorKind;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StaticProvider {
        records: HashMap<String, GeoRecord>,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn with(mut self, ip: &str, country_code: &str, region: &str, city: &str) -> Self {
            self.records.insert(
                ip.to_string(),
                GeoRecord {
                    country_code: Some(country_code.to_string()),
                    region: Some(region.to_string()),
                    city: Some(city.to_string()),
                },
            );
            self
        }
    }

    impl GeoLookup for StaticProvider {
        fn lookup(&self, address: &str) -> Result<GeoRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let ip = crate::geoip::parse_address(address)?;
            self.records
                .get(address)
                .cloned()
                .ok_or(LookupError::NotFound(ip))
        }
    }

    fn provider() -> Arc<StaticProvider> {
        Arc::new(
            StaticProvider::default()
                .with("1.1.1.1", "AU", "Queensland", "Brisbane")
                .with("8.8.8.8", "US", "California", "Mountain View")
                .with("114.114.114.114", "CN", "Jiangsu", "Nanjing"),
        )
    }

    fn localizer() -> Arc<Localizer> {
        let mut tables = LocalizationTables::default();
        tables.countries.insert("CN".to_string(), "中国".to_string());
        tables.regions.insert("Jiangsu".to_string(), "江苏省".to_string());
        tables.cities.insert("Nanjing".to_string(), "南京".to_string());
        Arc::new(Localizer::new(tables))
    }

    fn resolver_with(provider: Arc<StaticProvider>) -> BatchResolver {
        BatchResolver::new(provider, localizer())
    }

    #[test]
    fn test_split_preserves_empty_segments() {
        assert_eq!(
            split_addresses(" 1.1.1.1 ,, 8.8.8.8"),
            vec!["1.1.1.1", "", "8.8.8.8"]
        );
        assert_eq!(split_addresses("1.1.1.1"), vec!["1.1.1.1"]);
        assert_eq!(split_addresses(","), vec!["", ""]);
    }

    #[test]
    fn test_localized_fields_and_raw_country_code() {
        let resolver = resolver_with(provider());
        let result = resolver.resolve_one("114.114.114.114");

        assert_eq!(result.error, None);
        assert_eq!(result.country_code, "CN");
        assert_eq!(result.country, "中国");
        assert_eq!(result.region, "江苏省");
        assert_eq!(result.city, "南京");
        assert_eq!(result.code, "0");
    }

    #[test]
    fn test_unmapped_labels_pass_through() {
        let resolver = resolver_with(provider());
        let result = resolver.resolve_one("8.8.8.8");

        assert_eq!(result.country, "US");
        assert_eq!(result.country_code, "US");
        assert_eq!(result.region, "California");
        assert_eq!(result.city, "Mountain View");
    }

    #[test]
    fn test_empty_segment_is_invalid_without_lookup() {
        let provider = provider();
        let resolver = resolver_with(Arc::clone(&provider));

        let results = resolver.resolve_all(&split_addresses("1.1.1.1,,8.8.8.8"));

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].error, None);
        assert_eq!(results[1].ip, "");
        assert_eq!(
            results[1].error.as_ref().map(ItemError::kind),
            Some(ErrorKind::InvalidAddress)
        );
        assert_eq!(results[2].error, None);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_do_not_abort_batch() {
        let resolver = resolver_with(provider());
        let input = ["garbage", "1.1.1.1", "10.0.0.1", "8.8.8.8"];

        let results = resolver.resolve_all(&input);

        assert_eq!(results.len(), input.len());
        for (result, ip) in results.iter().zip(input) {
            assert_eq!(result.ip, ip);
        }
        assert_eq!(
            results[0].error,
            Some(ItemError::LookupFailed(LookupError::InvalidAddress(
                "garbage".to_string()
            )))
        );
        assert!(results[1].error.is_none());
        assert_eq!(
            results[2].error.as_ref().map(ItemError::kind),
            Some(ErrorKind::LookupFailed)
        );
        assert_eq!(results[2].country, "");
        assert!(results[3].error.is_none());
    }

    #[test]
    fn test_missing_record_fields_read_as_empty() {
        let mut provider = StaticProvider::default();
        provider.records.insert(
            "9.9.9.9".to_string(),
            GeoRecord {
                country_code: Some("CH".to_string()),
                ..Default::default()
            },
        );
        let resolver = resolver_with(Arc::new(provider));

        let result = resolver.resolve_one("9.9.9.9");
        assert_eq!(result.country_code, "CH");
        assert_eq!(result.region, "");
        assert_eq!(result.city, "");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_addresses_are_trimmed() {
        let resolver = resolver_with(provider());
        let result = resolver.resolve_one("  1.1.1.1\t");
        assert_eq!(result.ip, "1.1.1.1");
        assert!(result.error.is_none());
    }
}
