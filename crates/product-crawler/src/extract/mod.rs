// Copyright 2026 Product Crawler Contributors
// SPDX-License-Identifier: Apache-2.0

//! Field extraction from a rendered product page.
//!
//! Each field is resolved independently through its [`CompiledRule`]: either a
//! structural query against the page handle or a regex over the raw HTML. A
//! lookup produces a [`Lookup`] outcome, and [`Lookup::or_sentinel`] is the only
//! place an outcome becomes `"N/A"`. A broken lookup (invalid selector, JS
//! evaluation failure) is logged at `warn` so it stays distinguishable from a
//! field that is simply absent, which is logged at `debug`.

pub mod profile;

use crate::error::{CrawlError, CrawlResult};
use crate::record::{Field, ProductRecord, NOT_AVAILABLE};
use anyhow::Result;
use async_trait::async_trait;
use profile::{CompiledRule, CompiledSource, ExtractionProfile};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// A page that can answer structural queries.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Text content of the first element matching `selector`, or `None` when
    /// nothing matches.
    async fn first_text(&self, selector: &str) -> Result<Option<String>>;
}

/// A page backed by an HTML string, queried with `scraper`.
///
/// Used for saved pages and anywhere a live browser is not needed. The
/// document is parsed per query since `scraper::Html` is `!Send`.
#[derive(Debug, Clone)]
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

#[async_trait]
impl PageHandle for StaticPage {
    async fn first_text(&self, selector: &str) -> Result<Option<String>> {
        select_first_text(&self.html, selector)
    }
}

fn select_first_text(html: &str, selector: &str) -> Result<Option<String>> {
    let selector =
        Selector::parse(selector).map_err(|e| anyhow::anyhow!("bad selector {selector:?}: {e}"))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>()))
}

/// Outcome of a single field lookup.
#[derive(Debug)]
pub enum Lookup {
    Found(String),
    NotFound,
    Failed(CrawlError),
}

impl Lookup {
    /// Collapse the outcome into a stored value, logging why a field is missing.
    pub fn or_sentinel(self, field: Field) -> String {
        match self {
            Lookup::Found(value) => value,
            Lookup::NotFound => {
                debug!(%field, "field not found on page");
                NOT_AVAILABLE.to_string()
            }
            Lookup::Failed(e) => {
                warn!(%field, error = %e, "field lookup failed");
                NOT_AVAILABLE.to_string()
            }
        }
    }
}

/// Builds a [`ProductRecord`] from a page handle and its raw HTML.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    profile_name: String,
    rules: Vec<CompiledRule>,
}

impl FieldExtractor {
    pub fn new(profile: &ExtractionProfile) -> CrawlResult<Self> {
        Ok(Self {
            profile_name: profile.name.clone(),
            rules: profile.compile()?,
        })
    }

    /// Extractor for the embedded default profile.
    pub fn builtin() -> CrawlResult<Self> {
        Self::new(&ExtractionProfile::builtin()?)
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Extract every field. Never fails: each field falls back to `"N/A"`.
    pub async fn extract<P>(&self, page: &P, raw_html: &str) -> ProductRecord
    where
        P: PageHandle + ?Sized,
    {
        let mut record = ProductRecord::default();
        for rule in &self.rules {
            let value = lookup(rule, page, raw_html).await.or_sentinel(rule.field);
            info!(field = %rule.field, %value, "extracted");
            record.set(rule.field, value);
        }
        record
    }

    /// Extract from an HTML string alone.
    pub async fn extract_html(&self, html: &str) -> ProductRecord {
        let page = StaticPage::new(html);
        self.extract(&page, html).await
    }
}

async fn lookup<P>(rule: &CompiledRule, page: &P, raw_html: &str) -> Lookup
where
    P: PageHandle + ?Sized,
{
    let raw = match &rule.source {
        CompiledSource::Selector(query) => match page.first_text(query).await {
            Ok(Some(text)) => text,
            Ok(None) => return Lookup::NotFound,
            Err(e) => {
                return Lookup::Failed(CrawlError::FieldLookup {
                    field: rule.field,
                    reason: format!("{e:#}"),
                })
            }
        },
        CompiledSource::RawPattern(re) => {
            match re.captures(raw_html).and_then(|caps| caps.get(1)) {
                Some(m) => m.as_str().to_string(),
                None => return Lookup::NotFound,
            }
        }
    };

    let value = rule.transform.apply(&raw);
    if value.is_empty() {
        Lookup::NotFound
    } else {
        Lookup::Found(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::profile::{FieldRule, FieldSource, Transform};
    use crate::test_log::capture;

    const PRODUCT_PAGE: &str = r#"
    <html><body>
        <nav><a href="/p/makanan-minuman">Makanan &amp; Minuman</a></nav>
        <h1>  Widget  </h1>
        <div data-testid="lblPDPDetailProductPrice">Rp 15.000</div>
        <span data-testid="lblPDPDetailProductRatingNumber"> 4.9 </span>
        <span data-testid="lblPDPDetailProductRatingCounter">(1.234 rating)</span>
        <script>window.__cache = {"shopName":"Acme Store","shopId":"42"};</script>
    </body></html>
    "#;

    /// Page handle whose every query fails.
    struct BrokenPage;

    #[async_trait]
    impl PageHandle for BrokenPage {
        async fn first_text(&self, _selector: &str) -> Result<Option<String>> {
            anyhow::bail!("execution context destroyed")
        }
    }

    fn assert_well_formed(record: &ProductRecord) {
        for (_, value) in record.iter() {
            assert!(!value.is_empty());
        }
        for field in [Field::Price, Field::RatingCount] {
            let v = record.get(field);
            assert!(v == NOT_AVAILABLE || v.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_extract_full_page() {
        let extractor = FieldExtractor::builtin().unwrap();
        let record = extractor.extract_html(PRODUCT_PAGE).await;

        assert_eq!(record.product_name, "Widget");
        assert_eq!(record.category, "Makanan & Minuman");
        assert_eq!(record.price, "15000");
        assert_eq!(record.shop_name, "Acme Store");
        assert_eq!(record.rating, "4.9");
        assert_eq!(record.rating_count, "1234");
        assert!(record.is_complete());
        assert_well_formed(&record);
    }

    #[tokio::test]
    async fn test_heading_and_price_only() {
        let html = r#"<h1>Widget</h1><div data-testid="lblPDPDetailProductPrice">Rp 15.000</div>"#;
        let record = FieldExtractor::builtin().unwrap().extract_html(html).await;
        assert_eq!(record.product_name, "Widget");
        assert_eq!(record.price, "15000");
        assert_eq!(record.rating, NOT_AVAILABLE);
        assert_eq!(record.rating_count, NOT_AVAILABLE);
        assert_eq!(record.category, NOT_AVAILABLE);
        assert_well_formed(&record);
    }

    #[tokio::test]
    async fn test_shop_name_without_pattern() {
        let record = FieldExtractor::builtin()
            .unwrap()
            .extract_html("<h1>Widget</h1><p>shopName: Acme</p>")
            .await;
        assert_eq!(record.shop_name, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_shop_name_first_match_with_escapes() {
        let html = r#"<script>{"shopName" : "Toko \u0026 Co"}</script>
                      <script>{"shopName":"Second"}</script>"#;
        let record = FieldExtractor::builtin().unwrap().extract_html(html).await;
        assert_eq!(record.shop_name, "Toko & Co");
    }

    #[tokio::test]
    async fn test_price_without_digits_is_sentinel() {
        let html = r#"<div data-testid="lblPDPDetailProductPrice">Harga tidak tersedia</div>"#;
        let record = FieldExtractor::builtin().unwrap().extract_html(html).await;
        assert_eq!(record.price, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_empty_heading_is_sentinel() {
        let record = FieldExtractor::builtin()
            .unwrap()
            .extract_html("<h1>   </h1>")
            .await;
        assert_eq!(record.product_name, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_failing_page_still_scans_raw_html() {
        let extractor = FieldExtractor::builtin().unwrap();
        let record = extractor.extract(&BrokenPage, PRODUCT_PAGE).await;
        assert_eq!(record.product_name, NOT_AVAILABLE);
        assert_eq!(record.price, NOT_AVAILABLE);
        assert_eq!(record.shop_name, "Acme Store");
        assert_well_formed(&record);
    }

    #[tokio::test]
    async fn test_shop_name_strategy_swappable() {
        let mut profile = ExtractionProfile::builtin().unwrap();
        profile.fields.insert(
            Field::ShopName,
            FieldRule {
                source: FieldSource::Selector {
                    query: "[data-testid='llbPDPFooterShopName']".into(),
                },
                transform: Transform::Text,
            },
        );
        let extractor = FieldExtractor::new(&profile).unwrap();
        let html = r#"<a data-testid="llbPDPFooterShopName"><h2>Acme Official</h2></a>
                      <script>{"shopName":"Ignored"}</script>"#;
        let record = extractor.extract_html(html).await;
        assert_eq!(record.shop_name, "Acme Official");
    }

    #[test]
    fn test_lookup_or_sentinel() {
        assert_eq!(Lookup::Found("x".into()).or_sentinel(Field::Rating), "x");
        assert_eq!(Lookup::NotFound.or_sentinel(Field::Rating), NOT_AVAILABLE);
        let failed = Lookup::Failed(CrawlError::FieldLookup {
            field: Field::Rating,
            reason: "boom".into(),
        });
        assert_eq!(failed.or_sentinel(Field::Rating), NOT_AVAILABLE);
    }

    #[test]
    fn test_absent_field_logs_debug_failed_lookup_logs_warn() {
        let (value, lines) = capture(|| Lookup::NotFound.or_sentinel(Field::Rating));
        assert_eq!(value, NOT_AVAILABLE);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("field not found on page"));
        assert!(lines[0].contains("field=rating"));

        let failed = Lookup::Failed(CrawlError::FieldLookup {
            field: Field::Price,
            reason: "execution context destroyed".into(),
        });
        let (value, lines) = capture(|| failed.or_sentinel(Field::Price));
        assert_eq!(value, NOT_AVAILABLE);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("field lookup failed"));
        assert!(lines[0].contains("execution context destroyed"));

        let found = Lookup::Found("4.9".into());
        let (_, lines) = capture(|| found.or_sentinel(Field::Rating));
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_static_page_invalid_selector_errors() {
        let page = StaticPage::new("<h1>x</h1>");
        assert!(page.first_text("h1[").await.is_err());
        assert_eq!(page.first_text("h2").await.unwrap(), None);
    }
}
