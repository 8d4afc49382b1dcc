//! Serde helpers for loosely-typed form fields sent by the admin UI.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// `null`, `""` and whitespace-only strings become `None`
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Accepts a UUID string, `""` or `null`; the latter two become `None`
pub fn optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match blank_as_none(deserializer)? {
        Some(raw) => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Tri-state field for partial updates, used with `#[serde(default)]`:
/// absent key → `None`, `""`/`null` → `Some(None)`, UUID → `Some(Some(id))`
pub fn patch_uuid<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_uuid(deserializer).map(Some)
}
