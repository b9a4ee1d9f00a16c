//! Asset type and campaign purpose enums.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{AselError, Result};

/// Asset type partition: each type has its own metric/benchmark tables and
/// its own recognized metric list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Image,
    Video,
}

impl AssetType {
    /// Backend value used in table names and query parameters.
    #[must_use]
    pub const fn backend_value(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Parse a backend or display value, case-insensitively.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(AselError::UnknownAssetType {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_value())
    }
}

/// Campaign purpose, consumed only by the NIS ranking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    BrandBuilding,
    Conversion,
}

impl Purpose {
    /// Backend value stored in the NIS master table.
    #[must_use]
    pub const fn backend_value(self) -> &'static str {
        match self {
            Self::BrandBuilding => "brand_building",
            Self::Conversion => "conversion",
        }
    }

    /// Parse a backend value or its display form.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "brand_building" => Ok(Self::BrandBuilding),
            "conversion" => Ok(Self::Conversion),
            _ => Err(AselError::UnknownPurpose {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_value())
    }
}
