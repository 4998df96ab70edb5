//! Game record shape returned by the catalogue API.

use serde::{Deserialize, Deserializer, Serialize};

/// Genre id that stands in for a missing `primary_genre`.
pub const UNKNOWN_GENRE_ID: &str = "0";

const SUPPORTED: &str = "Yes";

/// One entry of the catalogue. Records are never mutated after the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub appid: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downloads: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new: bool,
    /// Interpreted as "requires Denuvo".
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_membership: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online_supported: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bypass_supported: String,
    #[serde(default)]
    pub primary_genre: Option<String>,
    #[serde(default)]
    pub size_gb: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_descriptors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub added_on: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub st_file: String,
}

impl GameRecord {
    /// Genre id with null and blank values folded into [`UNKNOWN_GENRE_ID`].
    pub fn genre_id(&self) -> &str {
        match self.primary_genre.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => UNKNOWN_GENRE_ID,
        }
    }

    pub fn is_online_supported(&self) -> bool {
        self.online_supported == SUPPORTED
    }

    pub fn is_bypass_supported(&self) -> bool {
        self.bypass_supported == SUPPORTED
    }

    /// Size label when the API provided a non-blank one.
    pub fn size_label(&self) -> Option<&str> {
        self.size_gb
            .as_deref()
            .map(str::trim)
            .filter(|size| !size.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn sample(appid: &str, name: &str) -> Self {
        Self {
            appid: appid.to_string(),
            name: name.to_string(),
            downloads: 0,
            new: false,
            requires_membership: false,
            online_supported: "No".to_string(),
            bypass_supported: "No".to_string(),
            primary_genre: None,
            size_gb: None,
            content_descriptors: Vec::new(),
            added_on: String::new(),
            st_file: String::new(),
        }
    }
}

/// The API sends `null` for some fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_use_defaults() {
        let record: GameRecord =
            serde_json::from_str(r#"{"appid": "570", "name": "Dota 2"}"#).unwrap();
        assert_eq!(record.downloads, 0);
        assert!(!record.requires_membership);
        assert_eq!(record.genre_id(), UNKNOWN_GENRE_ID);
        assert!(record.content_descriptors.is_empty());
    }

    #[test]
    fn null_scalar_fields_decode_as_defaults() {
        let record: GameRecord = serde_json::from_str(
            r#"{"appid": "10", "name": "Counter-Strike", "downloads": null, "online_supported": null}"#,
        )
        .unwrap();
        assert_eq!(record.downloads, 0);
        assert!(!record.is_online_supported());
    }

    #[test]
    fn null_and_zero_genre_normalize_identically() {
        let mut with_null = GameRecord::sample("1", "A");
        with_null.primary_genre = None;
        let mut with_zero = GameRecord::sample("2", "B");
        with_zero.primary_genre = Some("0".to_string());
        assert_eq!(with_null.genre_id(), with_zero.genre_id());
    }

    #[test]
    fn support_flags_require_exact_yes() {
        let mut record = GameRecord::sample("1", "A");
        record.online_supported = "yes".to_string();
        record.bypass_supported = "Yes".to_string();
        assert!(!record.is_online_supported());
        assert!(record.is_bypass_supported());
    }

    #[test]
    fn full_payload_round_trips_known_fields() {
        let json = r#"{
            "added_on": "2024-05-01",
            "appid": "1091500",
            "downloads": 42,
            "name": "Cyberpunk 2077",
            "new": true,
            "requires_membership": true,
            "st_file": "1091500.st",
            "online_supported": "No",
            "bypass_supported": "Yes",
            "primary_genre": "1",
            "content_descriptors": ["1", "5"],
            "size_gb": "70.2 GB"
        }"#;
        let record: GameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.genre_id(), "1");
        assert_eq!(record.size_label(), Some("70.2 GB"));
        assert!(record.new);
        assert_eq!(record.content_descriptors.len(), 2);
    }
}
