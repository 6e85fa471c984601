// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! The product record produced for every successfully rendered page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored for any field that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// A named product field. Declaration order is the output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProductName,
    Category,
    Price,
    ShopName,
    Rating,
    RatingCount,
}

impl Field {
    /// All fields in output order.
    pub const ALL: [Field; 6] = [
        Field::ProductName,
        Field::Category,
        Field::Price,
        Field::ShopName,
        Field::Rating,
        Field::RatingCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::ProductName => "product_name",
            Field::Category => "category",
            Field::Price => "price",
            Field::ShopName => "shop_name",
            Field::Rating => "rating",
            Field::RatingCount => "rating_count",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted product data. Every field always holds a value or [`NOT_AVAILABLE`].
///
/// Field order here defines the JSON key order and the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub category: String,
    pub price: String,
    pub shop_name: String,
    pub rating: String,
    pub rating_count: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            product_name: NOT_AVAILABLE.to_string(),
            category: NOT_AVAILABLE.to_string(),
            price: NOT_AVAILABLE.to_string(),
            shop_name: NOT_AVAILABLE.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            rating_count: NOT_AVAILABLE.to_string(),
        }
    }
}

impl ProductRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ProductName => &self.product_name,
            Field::Category => &self.category,
            Field::Price => &self.price,
            Field::ShopName => &self.shop_name,
            Field::Rating => &self.rating,
            Field::RatingCount => &self.rating_count,
        }
    }

    /// Set a field. Empty values are stored as the sentinel.
    pub(crate) fn set(&mut self, field: Field, value: String) {
        let value = if value.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            value
        };
        let slot = match field {
            Field::ProductName => &mut self.product_name,
            Field::Category => &mut self.category,
            Field::Price => &mut self.price,
            Field::ShopName => &mut self.shop_name,
            Field::Rating => &mut self.rating,
            Field::RatingCount => &mut self.rating_count,
        };
        *slot = value;
    }

    /// Iterate `(field, value)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Fields that hold the sentinel.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, v)| *v == NOT_AVAILABLE)
            .map(|(f, _)| f)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
