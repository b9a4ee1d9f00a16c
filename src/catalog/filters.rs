//! Typed segment filter: one field per recognized dimension with an explicit
//! wildcard sentinel, replacing the loosely-typed filter dictionaries of the
//! upstream data pipelines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::asset::AssetType;
use crate::catalog::vocab::{self, Dimension, WILDCARD};
use crate::core::errors::{AselError, Result};

/// One dimension's filter: either the wildcard or a concrete backend value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Match-all sentinel.
    ///
    /// Metric queries expand this to "any value"; benchmark queries match the
    /// literal `all` segment row. The asymmetry is deliberate — see DESIGN.md.
    #[default]
    Any,
    /// A concrete backend value.
    Value(String),
}

impl FilterValue {
    /// Parse a backend value; the literal wildcard collapses to [`Self::Any`].
    #[must_use]
    pub fn parse_backend(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() || normalized == WILDCARD {
            Self::Any
        } else {
            Self::Value(normalized)
        }
    }

    /// Value bound into SQL: the wildcard binds as the literal `all`.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        match self {
            Self::Any => WILDCARD,
            Self::Value(v) => v.as_str(),
        }
    }

    /// Whether this is the wildcard.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A concrete combination of categorical filter values identifying a
/// market/context slice. Defaults to the wildcard in every dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentFilter {
    pub industry_category: FilterValue,
    pub industry_subcategory: FilterValue,
    pub usecase_category: FilterValue,
    pub usecase_subcategory: FilterValue,
    pub platform: FilterValue,
    pub device: FilterValue,
    pub context: FilterValue,
}

impl SegmentFilter {
    /// Filter matching everything.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter value for one dimension.
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> &FilterValue {
        match dimension {
            Dimension::IndustryCategory => &self.industry_category,
            Dimension::IndustrySubcategory => &self.industry_subcategory,
            Dimension::UsecaseCategory => &self.usecase_category,
            Dimension::UsecaseSubcategory => &self.usecase_subcategory,
            Dimension::Platform => &self.platform,
            Dimension::Device => &self.device,
            Dimension::Context => &self.context,
        }
    }

    /// Replace one dimension's filter value.
    pub fn set(&mut self, dimension: Dimension, value: FilterValue) {
        match dimension {
            Dimension::IndustryCategory => self.industry_category = value,
            Dimension::IndustrySubcategory => self.industry_subcategory = value,
            Dimension::UsecaseCategory => self.usecase_category = value,
            Dimension::UsecaseSubcategory => self.usecase_subcategory = value,
            Dimension::Platform => self.platform = value,
            Dimension::Device => self.device = value,
            Dimension::Context => self.context = value,
        }
    }

    /// `(dimension, value)` pairs in canonical column order.
    #[must_use]
    pub fn entries(&self) -> [(Dimension, &FilterValue); 7] {
        [
            (Dimension::IndustryCategory, &self.industry_category),
            (Dimension::IndustrySubcategory, &self.industry_subcategory),
            (Dimension::UsecaseCategory, &self.usecase_category),
            (Dimension::UsecaseSubcategory, &self.usecase_subcategory),
            (Dimension::Platform, &self.platform),
            (Dimension::Device, &self.device),
            (Dimension::Context, &self.context),
        ]
    }

    /// Reject values outside the closed vocabulary for the asset type.
    ///
    /// Malformed segment values are programmer errors and must surface to the
    /// caller instead of silently matching nothing.
    pub fn validate(&self, asset_type: AssetType) -> Result<()> {
        for (dimension, value) in self.entries() {
            if let FilterValue::Value(v) = value
                && !vocab::allowed_values(asset_type, dimension).contains(&v.as_str())
            {
                return Err(AselError::UnknownFilterValue {
                    dimension: dimension.column(),
                    value: v.clone(),
                });
            }
        }
        Ok(())
    }
}
