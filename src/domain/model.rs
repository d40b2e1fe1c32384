use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One country as returned by `/v3.1/all`. Kept opaque so the stored snapshot
/// is exactly what the API sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryRecord(pub Value);

impl CountryRecord {
    pub fn common_name(&self) -> Option<&str> {
        self.0.pointer("/name/common").and_then(Value::as_str)
    }

    /// The `official` name of the first entry in `translations`, in payload
    /// order. `None` when the mapping is missing, empty, or malformed.
    pub fn first_translation_official(&self) -> Option<&str> {
        self.0
            .get("translations")?
            .as_object()?
            .values()
            .next()?
            .get("official")?
            .as_str()
    }
}

impl From<Value> for CountryRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Whatever `/v3.1/translation/{name}` answered; not re-validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationRecord(pub Value);

impl TranslationRecord {
    /// `null`, `[]` and `{}` carry no translation.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for TranslationRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Both datasets of one run, ready to be loaded.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub countries: Vec<CountryRecord>,
    pub translations: Vec<TranslationRecord>,
}

pub const COUNTRIES_FILE: &str = "countries.json";
pub const TRANSLATIONS_FILE: &str = "translations.json";

/// `<prefix>/<YYYY-MM-DD>/<file>.json` for both datasets of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationKeys {
    pub countries: String,
    pub translations: String,
}

impl DestinationKeys {
    pub fn for_date(prefix: &str, date: NaiveDate) -> Self {
        let partition = format!("{}/{}", prefix, date.format("%Y-%m-%d"));
        Self {
            countries: format!("{}/{}", partition, COUNTRIES_FILE),
            translations: format!("{}/{}", partition, TRANSLATIONS_FILE),
        }
    }

    pub fn today(prefix: &str) -> Self {
        Self::for_date(prefix, Local::now().date_naive())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub written: Vec<String>,
    pub failed: Vec<String>,
}

impl LoadReport {
    pub fn record(&mut self, key: &str, ok: bool) {
        if ok {
            self.written.push(key.to_string());
        } else {
            self.failed.push(key.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_translation_follows_payload_order() {
        // "spa" sorts before "fra"; payload order must win
        let record: CountryRecord = serde_json::from_str(
            r#"{
                "name": {"common": "Germany", "official": "Federal Republic of Germany"},
                "translations": {
                    "fra": {"official": "République fédérale d'Allemagne", "common": "Allemagne"},
                    "spa": {"official": "República Federal de Alemania", "common": "Alemania"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(record.common_name(), Some("Germany"));
        assert_eq!(
            record.first_translation_official(),
            Some("République fédérale d'Allemagne")
        );
    }

    #[test]
    fn test_first_translation_missing_cases() {
        let empty = CountryRecord(json!({"name": {"common": "Nowhere"}, "translations": {}}));
        let absent = CountryRecord(json!({"name": {"common": "Nowhere"}}));
        let malformed = CountryRecord(json!({"translations": {"fra": {"common": "X"}}}));

        assert_eq!(empty.first_translation_official(), None);
        assert_eq!(absent.first_translation_official(), None);
        assert_eq!(malformed.first_translation_official(), None);
        assert_eq!(malformed.common_name(), None);
    }

    #[test]
    fn test_destination_keys_for_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let keys = DestinationKeys::for_date("countries", date);
        assert_eq!(keys.countries, "countries/2024-03-07/countries.json");
        assert_eq!(keys.translations, "countries/2024-03-07/translations.json");
    }

    #[test]
    fn test_destination_keys_today() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let keys = DestinationKeys::today("countries");
        assert_eq!(keys.countries, format!("countries/{}/countries.json", today));
        assert_eq!(keys.translations, format!("countries/{}/translations.json", today));
    }

    #[test]
    fn test_translation_record_is_empty() {
        assert!(TranslationRecord(Value::Null).is_empty());
        assert!(TranslationRecord(json!([])).is_empty());
        assert!(TranslationRecord(json!({})).is_empty());
        assert!(!TranslationRecord(json!([{"name": {"common": "Peru"}}])).is_empty());
    }

    #[test]
    fn test_records_serialize_transparently() {
        let value = json!([{"name": {"common": "France"}}]);
        let translations = vec![TranslationRecord(value.clone())];
        let encoded = serde_json::to_value(&translations).unwrap();
        assert_eq!(encoded, json!([value]));
    }
}
