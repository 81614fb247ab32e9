/// Object key conventions shared by ingestion and transform
///
/// - raw: `exchange_rates_{base}_{start}_to_{end}.json` at bucket root
/// - processed: `exchange_rates/{name}.{csv|parquet}`
use std::collections::HashMap;

use super::OutputFormat;

/// Suffix of raw objects picked up by the transform job
pub const RAW_OBJECT_SUFFIX: &str = ".json";

/// Folder for processed artifacts (query table location)
pub const PROCESSED_PREFIX: &str = "exchange_rates";

/// Source tag attached to every raw object
pub const SOURCE_TAG: &str = "frankfurter";

const META_START_DATE: &str = "start_date";
const META_END_DATE: &str = "end_date";
const META_BASE_CURRENCY: &str = "base_currency";
const META_SOURCE: &str = "source";

/// Descriptive metadata stored alongside a raw object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateMetadata {
    pub base_currency: String,
    pub start_date: String,
    pub end_date: String,
}

impl RateMetadata {
    pub fn new(
        base_currency: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            base_currency: base_currency.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Read metadata back from an object
    ///
    /// Returns `None` unless base currency and both dates are present and non-empty.
    pub fn from_map(metadata: &HashMap<String, String>) -> Option<Self> {
        let get = |key: &str| {
            metadata
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            base_currency: get(META_BASE_CURRENCY)?,
            start_date: get(META_START_DATE)?,
            end_date: get(META_END_DATE)?,
        })
    }

    /// Object metadata map, including the source tag
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (META_START_DATE.to_string(), self.start_date.clone()),
            (META_END_DATE.to_string(), self.end_date.clone()),
            (META_BASE_CURRENCY.to_string(), self.base_currency.clone()),
            (META_SOURCE.to_string(), SOURCE_TAG.to_string()),
        ])
    }

    /// `exchange_rates_{base}_{start}_to_{end}`
    pub fn dataset_name(&self) -> String {
        format!(
            "exchange_rates_{}_{}_to_{}",
            self.base_currency, self.start_date, self.end_date
        )
    }

    /// Key of the raw JSON object
    pub fn raw_object_key(&self) -> String {
        format!("{}{}", self.dataset_name(), RAW_OBJECT_SUFFIX)
    }
}

/// Whether a listed key is a raw JSON object
pub fn is_raw_object_key(key: &str) -> bool {
    key.ends_with(RAW_OBJECT_SUFFIX)
}

/// Name of the processed artifact for a raw object
///
/// Metadata wins so reruns over the same range overwrite the same key.
/// Without metadata, the last path segment of the source key is used.
pub fn output_name(source_key: &str, metadata: Option<&RateMetadata>) -> String {
    if let Some(metadata) = metadata {
        return metadata.dataset_name();
    }

    let file_name = source_key.rsplit('/').next().unwrap_or(source_key);
    file_name
        .strip_suffix(RAW_OBJECT_SUFFIX)
        .unwrap_or(file_name)
        .to_string()
}

/// `exchange_rates/{name}.{ext}`
pub fn processed_object_key(name: &str, format: OutputFormat) -> String {
    format!("{}/{}.{}", PROCESSED_PREFIX, name, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_january() -> RateMetadata {
        RateMetadata::new("USD", "2024-01-01", "2024-01-31")
    }

    #[test]
    fn test_raw_object_key() {
        assert_eq!(
            usd_january().raw_object_key(),
            "exchange_rates_USD_2024-01-01_to_2024-01-31.json"
        );
    }

    #[test]
    fn test_to_map_contains_source_tag() {
        let map = usd_january().to_map();

        assert_eq!(map.get("start_date").unwrap(), "2024-01-01");
        assert_eq!(map.get("end_date").unwrap(), "2024-01-31");
        assert_eq!(map.get("base_currency").unwrap(), "USD");
        assert_eq!(map.get("source").unwrap(), "frankfurter");
    }

    #[test]
    fn test_from_map_roundtrip() {
        let map = usd_january().to_map();

        assert_eq!(RateMetadata::from_map(&map), Some(usd_january()));
    }

    #[test]
    fn test_from_map_missing_field() {
        let mut map = usd_january().to_map();
        map.remove("end_date");

        assert_eq!(RateMetadata::from_map(&map), None);
    }

    #[test]
    fn test_from_map_blank_field() {
        let mut map = usd_january().to_map();
        map.insert("base_currency".to_string(), "  ".to_string());

        assert_eq!(RateMetadata::from_map(&map), None);
    }

    #[test]
    fn test_output_name_prefers_metadata() {
        let metadata = usd_january();

        let name = output_name("uploads/renamed-by-hand.json", Some(&metadata));

        assert_eq!(name, "exchange_rates_USD_2024-01-01_to_2024-01-31");
    }

    #[test]
    fn test_output_name_is_stable_across_reruns() {
        let metadata = usd_january();
        let key = metadata.raw_object_key();

        let first = processed_object_key(&output_name(&key, Some(&metadata)), OutputFormat::Csv);
        let second = processed_object_key(&output_name(&key, Some(&metadata)), OutputFormat::Csv);

        assert_eq!(first, second);
        assert_eq!(first, "exchange_rates/exchange_rates_USD_2024-01-01_to_2024-01-31.csv");
    }

    #[test]
    fn test_output_name_falls_back_to_file_name() {
        assert_eq!(output_name("a/b/rates_2024.json", None), "rates_2024");
        assert_eq!(output_name("rates.json", None), "rates");
    }

    #[test]
    fn test_processed_object_key_parquet() {
        assert_eq!(
            processed_object_key("rates", OutputFormat::Parquet),
            "exchange_rates/rates.parquet"
        );
    }

    #[test]
    fn test_is_raw_object_key() {
        assert!(is_raw_object_key("exchange_rates_USD_2024-01-01_to_2024-01-31.json"));
        assert!(!is_raw_object_key("exchange_rates/foo.csv"));
        assert!(!is_raw_object_key("notes.json.bak"));
    }
}
