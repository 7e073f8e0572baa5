//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Menu category (fixed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuCategory {
    #[serde(rename = "Appetizers")]
    Appetizers,
    #[serde(rename = "Main Course")]
    MainCourse,
    #[serde(rename = "Desserts")]
    Desserts,
    #[serde(rename = "Drinks")]
    Drinks,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 4] = [
        MenuCategory::Appetizers,
        MenuCategory::MainCourse,
        MenuCategory::Desserts,
        MenuCategory::Drinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizers => "Appetizers",
            Self::MainCourse => "Main Course",
            Self::Desserts => "Desserts",
            Self::Drinks => "Drinks",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a category string outside the fixed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown menu category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for MenuCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Menu item entity
///
/// `price` is fixed-point with two decimal places. The database stores
/// integer cents (`price_cents`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: MenuCategory,
    pub price: Decimal,
    pub is_available: bool,
}

/// Convert integer cents to a 2-dp decimal
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
