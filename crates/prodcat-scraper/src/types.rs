//! Record shapes produced by the catalog pipeline.
//!
//! ## Observed shape of the catalog API
//!
//! ### Product list
//! The list endpoint has returned the array both at the top level
//! (`{"products": [...]}`) and under a wrapper (`{"data": {"products": [...]}}`).
//! An empty or absent array is the only end-of-catalog signal.
//!
//! ### Prices, rating, review count
//! Numeric JSON values (`1000`, `4.5`, `10`). They are kept as
//! [`serde_json::Value`] so integers and decimals round-trip unchanged,
//! and so a missing value can carry its text sentinel instead.
//!
//! ### Product card
//! `data.productDescription` is an ordered list of loosely-typed blocks:
//! index 0 is the description, index 1 the usage instructions, and index 3
//! carries the country of origin as its `subtitle`. Index 2 varies and is
//! ignored.

use serde::Serialize;
use serde_json::Value;

/// Sentinels substituted for absent fields.
pub mod fallback {
    pub const NAME: &str = "Нет названия";
    pub const BRAND: &str = "Нет бренда";
    pub const PRICE: &str = "Нет цены";
    pub const RATING: &str = "Нет рейтинга";
    pub const REVIEW_COUNT: &str = "Нет отзывов";
    /// A product-card block exists but carries no text.
    pub const NO_INFORMATION: &str = "Нет информации";
    pub const COUNTRY: &str = "Не указана";
    /// The product card could not be fetched at all.
    pub const DESCRIPTION: &str = "Нет описания";
    /// The product card could not be fetched at all.
    pub const USAGE_INSTRUCTIONS: &str = "Нет инструкции";
}

/// Fields lifted from one entry of a catalog page.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub item_id: String,
    pub link: String,
    pub name: String,
    pub brand: String,
    pub regular_price: Value,
    pub actual_price: Value,
    pub rating: Value,
    pub review_count: Value,
    pub image_url: Option<String>,
}

/// Cleaned text pulled from a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub description: String,
    pub usage_instructions: String,
    pub country: String,
}

impl ProductDetail {
    /// Detail used when the product card is unavailable or not requested.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            description: fallback::DESCRIPTION.to_owned(),
            usage_instructions: fallback::USAGE_INSTRUCTIONS.to_owned(),
            country: fallback::COUNTRY.to_owned(),
        }
    }
}

/// One output row. Field order here is the column order of every sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub link: String,
    pub name: String,
    pub brand: String,
    pub regular_price: Value,
    pub actual_price: Value,
    pub rating: Value,
    pub review_count: Value,
    pub image_url: Option<String>,
    pub description: String,
    pub usage_instructions: String,
    pub country: String,
}

impl Product {
    /// Column names in serialization order.
    pub const FIELDS: [&'static str; 11] = [
        "link",
        "name",
        "brand",
        "regular_price",
        "actual_price",
        "rating",
        "review_count",
        "image_url",
        "description",
        "usage_instructions",
        "country",
    ];

    #[must_use]
    pub fn assemble(item: CatalogItem, detail: ProductDetail) -> Self {
        Self {
            link: item.link,
            name: item.name,
            brand: item.brand,
            regular_price: item.regular_price,
            actual_price: item.actual_price,
            rating: item.rating,
            review_count: item.review_count,
            image_url: item.image_url,
            description: detail.description,
            usage_instructions: detail.usage_instructions,
            country: detail.country,
        }
    }
}
