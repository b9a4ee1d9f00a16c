//! Closed per-asset-type value sets for each segment dimension, plus the
//! lossless backend/display name mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::asset::AssetType;

/// Literal wildcard value recognized in every dimension.
pub const WILDCARD: &str = "all";

/// Segment dimensions, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    IndustryCategory,
    IndustrySubcategory,
    UsecaseCategory,
    UsecaseSubcategory,
    Platform,
    Device,
    Context,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub const ALL: [Self; 7] = [
        Self::IndustryCategory,
        Self::IndustrySubcategory,
        Self::UsecaseCategory,
        Self::UsecaseSubcategory,
        Self::Platform,
        Self::Device,
        Self::Context,
    ];

    /// Backing column name in the metric and benchmark tables.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::IndustryCategory => "industry_category",
            Self::IndustrySubcategory => "industry_subcategory",
            Self::UsecaseCategory => "usecase_category",
            Self::UsecaseSubcategory => "usecase_subcategory",
            Self::Platform => "platform",
            Self::Device => "device",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

const INDUSTRY_CATEGORIES: &[&str] = &[
    "all",
    "durable_goods",
    "entertainment_media",
    "fast_moving_consumer_goods",
    "health",
    "services",
];

const INDUSTRY_SUBCATEGORIES: &[&str] = &[
    "all",
    "automotive",
    "consumer_electronics",
    "entertainment",
    "fashion_accessories",
    "financial_insurance_services",
    "food_beverage",
    "household_products",
    "internet_telecommunication_services",
    "personal_care_beauty",
    "pharmaceuticals",
    "sports_gaming",
    "travel_hospitality_services",
];

const IMAGE_USECASE_CATEGORIES: &[&str] =
    &["all", "digital_ads", "products", "traditional_ads", "websites"];

const IMAGE_USECASE_SUBCATEGORIES: &[&str] = &[
    "all",
    "brand_sites",
    "display_ads",
    "e_commerce",
    "out_of_home_ads",
    "packaging",
    "print_ads",
    "social_media_ads",
];

const IMAGE_PLATFORMS: &[&str] = &[
    "all",
    "facebook_ads",
    "instagram_ads",
    "not_applicable",
    "twitter_ads",
];

const IMAGE_DEVICES: &[&str] = &["all", "desktop", "mobile", "not_applicable"];

const IMAGE_CONTEXTS: &[&str] = &["all", "no", "yes"];

const VIDEO_USECASE_CATEGORIES: &[&str] = &["all", "digital_ads", "traditional_ads"];

const VIDEO_USECASE_SUBCATEGORIES: &[&str] =
    &["all", "display_ads", "social_media_ads", "tv_ads"];

const VIDEO_PLATFORMS: &[&str] = &[
    "all",
    "dailymotion_ads",
    "facebook_ads",
    "instagram_ads",
    "not_applicable",
    "tiktok_ads",
    "youtube_ads",
];

const VIDEO_DEVICES: &[&str] = &["all", "not_applicable"];

const VIDEO_CONTEXTS: &[&str] = &["all", "no"];

/// Enumerated backend values for one dimension of one asset type.
///
/// Every list includes the literal wildcard value `all` first.
#[must_use]
pub fn allowed_values(asset_type: AssetType, dimension: Dimension) -> &'static [&'static str] {
    match (asset_type, dimension) {
        (_, Dimension::IndustryCategory) => INDUSTRY_CATEGORIES,
        (_, Dimension::IndustrySubcategory) => INDUSTRY_SUBCATEGORIES,
        (AssetType::Image, Dimension::UsecaseCategory) => IMAGE_USECASE_CATEGORIES,
        (AssetType::Image, Dimension::UsecaseSubcategory) => IMAGE_USECASE_SUBCATEGORIES,
        (AssetType::Image, Dimension::Platform) => IMAGE_PLATFORMS,
        (AssetType::Image, Dimension::Device) => IMAGE_DEVICES,
        (AssetType::Image, Dimension::Context) => IMAGE_CONTEXTS,
        (AssetType::Video, Dimension::UsecaseCategory) => VIDEO_USECASE_CATEGORIES,
        (AssetType::Video, Dimension::UsecaseSubcategory) => VIDEO_USECASE_SUBCATEGORIES,
        (AssetType::Video, Dimension::Platform) => VIDEO_PLATFORMS,
        (AssetType::Video, Dimension::Device) => VIDEO_DEVICES,
        (AssetType::Video, Dimension::Context) => VIDEO_CONTEXTS,
    }
}

/// Transform a backend value (e.g. `digital_ads`) into its display name
/// (`Digital Ads`).
#[must_use]
pub fn format_display_name(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a display name back to its backend value.
///
/// Inverse of [`format_display_name`] for every enumerated backend value
/// (all of which are lowercase with underscores).
#[must_use]
pub fn unformat_display_name(display: &str) -> String {
    display.to_lowercase().replace(' ', "_")
}
