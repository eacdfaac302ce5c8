//! Typed view over the `"Label: value"` strings stored in `products.specs`.
//!
//! Admin tooling edits the spec list as free text, so storage keeps the raw
//! strings; every read path goes through [`ProductSpecs::derive`] instead of
//! poking at prefixes itself.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_UNIT: &str = "kg";
pub const DEFAULT_AVAILABILITY: &str = "available";
pub const DEFAULT_MINERAL_IMAGE: &str = "/images/minerals/default.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Generator,
    Mineral,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Generator => "generator",
            ProductCategory::Mineral => "mineral",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generator" => Ok(ProductCategory::Generator),
            "mineral" => Ok(ProductCategory::Mineral),
            other => Err(format!("Unknown product category '{other}'")),
        }
    }
}

/// Where a mineral is listed on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayPlacement {
    Showcase,
    ForSale,
    Both,
    Hidden,
}

impl DisplayPlacement {
    /// Unrecognised placements are hidden from both listings.
    pub fn parse(raw: &str) -> DisplayPlacement {
        match raw.trim().to_ascii_lowercase().as_str() {
            "showcase" => DisplayPlacement::Showcase,
            "for-sale" | "for_sale" | "buy" => DisplayPlacement::ForSale,
            "both" => DisplayPlacement::Both,
            _ => DisplayPlacement::Hidden,
        }
    }

    pub fn in_showcase(&self) -> bool {
        matches!(self, DisplayPlacement::Showcase | DisplayPlacement::Both)
    }

    pub fn for_sale(&self) -> bool {
        matches!(self, DisplayPlacement::ForSale | DisplayPlacement::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GeneratorSpecs {
    pub power: String,
    pub fuel: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MineralSpecs {
    #[serde(rename = "type")]
    pub kind: String,
    pub grade: String,
    pub purity: String,
    pub unit: String,
    pub availability: String,
    pub display_placement: DisplayPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProductSpecs {
    Generator(GeneratorSpecs),
    Mineral(MineralSpecs),
}

impl ProductSpecs {
    pub fn derive<S: AsRef<str>>(category: ProductCategory, specs: &[S]) -> ProductSpecs {
        match category {
            ProductCategory::Generator => ProductSpecs::Generator(GeneratorSpecs {
                power: spec_value(specs, "Power").unwrap_or_default().to_string(),
                fuel: spec_value(specs, "Fuel").unwrap_or_default().to_string(),
                features: spec_value(specs, "Features")
                    .map(split_features)
                    .unwrap_or_default(),
            }),
            ProductCategory::Mineral => ProductSpecs::Mineral(MineralSpecs::derive(specs)),
        }
    }

    pub fn as_mineral(&self) -> Option<&MineralSpecs> {
        match self {
            ProductSpecs::Mineral(specs) => Some(specs),
            ProductSpecs::Generator(_) => None,
        }
    }
}

impl MineralSpecs {
    pub fn derive<S: AsRef<str>>(specs: &[S]) -> MineralSpecs {
        MineralSpecs {
            kind: spec_value(specs, "Type").unwrap_or_default().to_string(),
            grade: spec_value(specs, "Grade").unwrap_or_default().to_string(),
            purity: spec_value(specs, "Purity").unwrap_or_default().to_string(),
            unit: spec_value(specs, "Unit").unwrap_or(DEFAULT_UNIT).to_string(),
            availability: spec_value(specs, "Availability")
                .unwrap_or(DEFAULT_AVAILABILITY)
                .to_string(),
            display_placement: spec_value(specs, "DisplayType")
                .map(DisplayPlacement::parse)
                .unwrap_or(DisplayPlacement::Both),
        }
    }
}

/// Value of the first `"<label>:"` entry, with the prefix and one leading
/// space removed.
pub fn spec_value<'a, S: AsRef<str>>(specs: &'a [S], label: &str) -> Option<&'a str> {
    specs.iter().find_map(|entry| {
        let rest = entry.as_ref().strip_prefix(label)?.strip_prefix(':')?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    })
}

fn split_features(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|feature| !feature.is_empty())
        .map(str::to_string)
        .collect()
}

/// Public URL for a product's first image.
pub fn primary_image_url<S: AsRef<str>>(images: &[S]) -> String {
    match images.first().map(AsRef::as_ref) {
        Some(path) if path.starts_with('/') || path.contains("://") => path.to_string(),
        Some(path) if !path.is_empty() => format!("/uploads/{path}"),
        _ => DEFAULT_MINERAL_IMAGE.to_string(),
    }
}
