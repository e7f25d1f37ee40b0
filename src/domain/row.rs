//! Flat spend records as delivered by the table source.

use std::cmp::Ordering;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the spend table.
///
/// Wire names follow the upstream export (`BCAP1`..`BCAP3`, `spend`);
/// the plain `level1`..`level3` and `value` names are accepted as well.
/// Text fields that are not strings are read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendRow {
    #[serde(
        rename = "BCAP1",
        alias = "level1",
        default,
        deserialize_with = "lenient_text"
    )]
    pub level1: Option<String>,
    #[serde(
        rename = "BCAP2",
        alias = "level2",
        default,
        deserialize_with = "lenient_text"
    )]
    pub level2: Option<String>,
    #[serde(
        rename = "BCAP3",
        alias = "level3",
        default,
        deserialize_with = "lenient_text"
    )]
    pub level3: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Anything that is not a number is read as absent.
    #[serde(
        rename = "spend",
        alias = "value",
        default,
        deserialize_with = "lenient_number"
    )]
    pub value: Option<f64>,
}

impl SpendRow {
    /// Row with a full three-level path.
    pub fn new(level1: &str, level2: &str, level3: &str, id: &str, value: f64) -> Self {
        Self {
            level1: Some(level1.to_string()),
            level2: Some(level2.to_string()),
            level3: Some(level3.to_string()),
            id: Some(id.to_string()),
            name: None,
            value: Some(value),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Composite sort key; a missing field sorts as the empty string.
    fn sort_key(&self) -> [&str; 4] {
        [&self.level1, &self.level2, &self.level3, &self.id]
            .map(|field| field.as_deref().unwrap_or_default())
    }
}

/// Orders rows by `(level1, level2, level3, id)`.
pub fn compare_rows(a: &SpendRow, b: &SpendRow) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Non-empty value of an optional text field.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientText {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(LenientNumber::Number(value)) => Some(value),
        Some(LenientNumber::Other(_)) | None => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientText>::deserialize(deserializer)? {
        Some(LenientText::Text(text)) => Some(text),
        Some(LenientText::Other(_)) | None => None,
    })
}
