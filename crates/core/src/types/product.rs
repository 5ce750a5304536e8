//! Catalog products.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product category.
///
/// Stored remotely with the store's Spanish names (`ropa`, `calzado`,
/// `regalos`); those are also the names accepted by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "ropa")]
    Clothing,
    #[serde(rename = "calzado")]
    Footwear,
    #[serde(rename = "regalos")]
    Gifts,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 3] = [Self::Clothing, Self::Footwear, Self::Gifts];

    /// The wire name used by the remote data source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clothing => "ropa",
            Self::Footwear => "calzado",
            Self::Gifts => "regalos",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0} (expected ropa, calzado or regalos)")]
pub struct CategoryParseError(String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ropa" | "clothing" => Ok(Self::Clothing),
            "calzado" | "footwear" => Ok(Self::Footwear),
            "regalos" | "gifts" => Ok(Self::Gifts),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

/// A product as published by the remote data source.
///
/// Immutable from the client's point of view: carts and favorites hold a
/// snapshot copied at the time of the action and never write it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image URI.
    #[serde(default)]
    pub image: String,
    pub category: Category,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
