// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-field extraction strategies, loaded from a JSON profile.
//!
//! A profile maps every [`Field`] to a source (a structural CSS query against
//! the rendered page, or a regex scanned over the raw HTML) and a transform
//! applied to whatever text the source yields. The default profile targets
//! Tokopedia product pages and is embedded at compile time, so swapping a
//! brittle selector is an edit to a JSON file rather than to the extractor.

use crate::error::{CrawlError, CrawlResult};
use crate::record::Field;
use regex::Regex;
use scraper::Selector;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Embedded default profile.
const TOKOPEDIA_PROFILE: &str = include_str!("../../profiles/tokopedia.json");

/// A named set of field rules.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionProfile {
    pub name: String,
    pub fields: BTreeMap<Field, FieldRule>,
}

/// How one field is located and normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    #[serde(flatten)]
    pub source: FieldSource,
    #[serde(default)]
    pub transform: Transform,
}

/// Where a field's raw text comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FieldSource {
    /// Text content of the first element matching a CSS selector.
    Selector { query: String },
    /// First capture group of the first regex match over the raw HTML.
    RawPattern { pattern: String },
}

/// Normalization applied to raw field text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Trim surrounding whitespace.
    #[default]
    Text,
    /// Keep ASCII digits only.
    Digits,
    /// Decode JSON string escapes, then trim.
    JsonString,
}

impl Transform {
    /// Apply the transform. An empty result means the field is not available.
    pub fn apply(self, raw: &str) -> String {
        match self {
            Transform::Text => raw.trim().to_string(),
            Transform::Digits => raw.chars().filter(char::is_ascii_digit).collect(),
            Transform::JsonString => {
                // Regex captures sit between quotes in the source JSON, so
                // re-quoting gives back a valid JSON string literal.
                serde_json::from_str::<String>(&format!("\"{raw}\""))
                    .unwrap_or_else(|_| raw.to_string())
                    .trim()
                    .to_string()
            }
        }
    }
}

/// A rule whose source has been validated and compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub field: Field,
    pub source: CompiledSource,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub enum CompiledSource {
    Selector(String),
    RawPattern(Regex),
}

impl ExtractionProfile {
    /// The embedded Tokopedia profile.
    pub fn builtin() -> CrawlResult<Self> {
        Self::from_json_str(TOKOPEDIA_PROFILE)
    }

    pub fn from_json_str(json: &str) -> CrawlResult<Self> {
        serde_json::from_str(json).map_err(|e| CrawlError::Profile(e.to_string()))
    }

    pub fn from_path(path: &Path) -> CrawlResult<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| CrawlError::Profile(format!("{}: {e}", path.display())))
    }

    /// Load from `path` when given, otherwise the embedded profile.
    pub fn load(path: Option<&Path>) -> CrawlResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    /// Validate every rule and compile it, in output field order.
    pub fn compile(&self) -> CrawlResult<Vec<CompiledRule>> {
        Field::ALL
            .iter()
            .map(|&field| {
                let rule = self.fields.get(&field).ok_or_else(|| {
                    CrawlError::Profile(format!("profile '{}' has no rule for {field}", self.name))
                })?;
                let source = match &rule.source {
                    FieldSource::Selector { query } => {
                        Selector::parse(query).map_err(|e| {
                            CrawlError::Profile(format!("{field}: bad selector {query:?}: {e}"))
                        })?;
                        CompiledSource::Selector(query.clone())
                    }
                    FieldSource::RawPattern { pattern } => {
                        let re = Regex::new(pattern).map_err(|e| {
                            CrawlError::Profile(format!("{field}: bad pattern: {e}"))
                        })?;
                        if re.captures_len() < 2 {
                            return Err(CrawlError::Profile(format!(
                                "{field}: pattern needs a capture group"
                            )));
                        }
                        CompiledSource::RawPattern(re)
                    }
                };
                Ok(CompiledRule {
                    field,
                    source,
                    transform: rule.transform,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profile_compiles() {
        let profile = ExtractionProfile::builtin().unwrap();
        assert_eq!(profile.name, "tokopedia");
        let rules = profile.compile().unwrap();
        let fields: Vec<Field> = rules.iter().map(|r| r.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_builtin_shop_name_is_raw_pattern() {
        let rules = ExtractionProfile::builtin().unwrap().compile().unwrap();
        let shop = rules.iter().find(|r| r.field == Field::ShopName).unwrap();
        match &shop.source {
            CompiledSource::RawPattern(re) => {
                let caps = re.captures(r#"{"shopName" : "Acme Store"}"#).unwrap();
                assert_eq!(&caps[1], "Acme Store");
            }
            CompiledSource::Selector(_) => panic!("shop_name should scan raw HTML"),
        }
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"name": "partial", "fields": {
            "product_name": {"strategy": "selector", "query": "h1"}
        }}"#;
        let profile = ExtractionProfile::from_json_str(json).unwrap();
        let err = profile.compile().unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"name": "x", "fields": {
            "sku": {"strategy": "selector", "query": "h1"}
        }}"#;
        assert!(matches!(
            ExtractionProfile::from_json_str(json),
            Err(CrawlError::Profile(_))
        ));
    }

    #[test]
    fn test_bad_selector_and_pattern_rejected() {
        let mut profile = ExtractionProfile::builtin().unwrap();
        profile.fields.insert(
            Field::Category,
            FieldRule {
                source: FieldSource::Selector {
                    query: "a[href*=".into(),
                },
                transform: Transform::Text,
            },
        );
        assert!(profile.compile().is_err());

        let mut profile = ExtractionProfile::builtin().unwrap();
        profile.fields.insert(
            Field::ShopName,
            FieldRule {
                source: FieldSource::RawPattern {
                    pattern: "shopName".into(),
                },
                transform: Transform::Text,
            },
        );
        let err = profile.compile().unwrap_err();
        assert!(err.to_string().contains("capture group"));
    }

    #[test]
    fn test_transforms() {
        assert_eq!(Transform::Text.apply("  Widget \n"), "Widget");
        assert_eq!(Transform::Digits.apply("Rp 15.000"), "15000");
        assert_eq!(Transform::Digits.apply("N/A"), "");
        assert_eq!(Transform::JsonString.apply(r"Acme \u0026 Co"), "Acme & Co");
        assert_eq!(Transform::JsonString.apply(r#"Toko \"Jaya\""#), "Toko \"Jaya\"");
    }

    #[test]
    fn test_transform_defaults_to_text() {
        let json = r#"{"strategy": "selector", "query": "h1"}"#;
        let rule: FieldRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.transform, Transform::Text);
    }
}
