//! Field validators applied during deserialization

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer};

/// Validate a hex color and uppercase its alpha characters.
///
/// Accepts `#RGB` and `#RRGGBB` forms only.
pub fn normalize_hex_color(color: &str) -> Result<String> {
    let color = color.to_uppercase();

    let hex = color.strip_prefix('#').ok_or(CoreError::InvalidHexColor)?;

    let valid = (hex.len() == 3 || hex.len() == 6)
        && hex.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));

    if !valid {
        return Err(CoreError::InvalidHexColor);
    }

    Ok(color)
}

/// Deserialize a string field through [`normalize_hex_color`].
pub fn deserialize_hex_color<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    normalize_hex_color(&value).map_err(serde::de::Error::custom)
}
