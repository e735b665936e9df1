//! Tolerant field extraction from catalog and product-card payloads.
//!
//! Every optional field is read through [`get_path`] with an explicit
//! fallback. Only a missing `url` or `itemId` rejects an item.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{fallback, CatalogItem, ProductDetail};

/// Any `<...>` span, shortest match first, allowed to cross line breaks.
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid regex"));

/// Template placeholders in image URLs and the values substituted for them.
const IMAGE_PLACEHOLDERS: [(&str, &str); 2] = [("${screen}", "fullhd"), ("${format}", "jpg")];

/// Removes markup and collapses every whitespace run into a single space.
///
/// Idempotent: once tags are gone no `<...>` span remains, and a
/// single-spaced trimmed string is unchanged by another collapse.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let without_markup = MARKUP_RE.replace_all(raw, " ");
    without_markup.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Looks up `pointer` (RFC 6901, e.g. `/price/regular/amount`) and returns
/// the scalar found there, or `fallback` when the path is absent, `null`, or
/// lands on an object/array.
#[must_use]
pub fn get_path(value: &Value, pointer: &str, fallback: Value) -> Value {
    match value.pointer(pointer) {
        Some(found @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => found.clone(),
        _ => fallback,
    }
}

/// [`get_path`] rendered as text: strings verbatim, numbers and booleans
/// via their JSON form.
#[must_use]
pub fn text_at(value: &Value, pointer: &str, fallback: &str) -> String {
    match get_path(value, pointer, Value::Null) {
        Value::String(s) => s,
        Value::Null => fallback.to_owned(),
        other => other.to_string(),
    }
}

/// `content` of the block at `index`, or the no-information sentinel.
#[must_use]
pub fn extract_text(blocks: &[Value], index: usize) -> String {
    blocks
        .get(index)
        .and_then(|block| block.get("content"))
        .and_then(Value::as_str)
        .map_or_else(|| fallback::NO_INFORMATION.to_owned(), str::to_owned)
}

/// `subtitle` of the fourth product-card block, or the unspecified-country
/// sentinel when the list is shorter.
#[must_use]
pub fn extract_country(product_data: &Value) -> String {
    description_blocks(product_data)
        .get(3)
        .and_then(|block| block.get("subtitle"))
        .and_then(Value::as_str)
        .map_or_else(|| fallback::COUNTRY.to_owned(), str::to_owned)
}

fn description_blocks(product_data: &Value) -> &[Value] {
    product_data
        .get("productDescription")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Builds a [`ProductDetail`] from a full product-card response.
///
/// The card lives under `data`; a response without it yields sentinels for
/// every field.
#[must_use]
pub fn parse_detail(payload: &Value) -> ProductDetail {
    let data = payload.get("data").unwrap_or(&Value::Null);
    let blocks = description_blocks(data);
    ProductDetail {
        description: clean_text(&extract_text(blocks, 0)),
        usage_instructions: clean_text(&extract_text(blocks, 1)),
        country: clean_text(&extract_country(data)),
    }
}

/// The non-empty product array of a catalog page, looked up at `products`
/// and then at `data.products`.
#[must_use]
pub fn product_list(page: &Value) -> Option<&[Value]> {
    ["/products", "/data/products"]
        .iter()
        .filter_map(|pointer| page.pointer(pointer).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
}

/// Extracts the catalog fields of one page entry.
///
/// `link` is `base_url` joined with the item's relative `url`; absolute URLs
/// are kept as-is. An empty `url` links to the storefront root.
///
/// # Errors
///
/// Returns [`ScraperError::MissingField`] if `url` is absent or not a string,
/// or `itemId` is absent or not a scalar.
pub fn parse_item(item: &Value, base_url: &str) -> Result<CatalogItem, ScraperError> {
    let url = item
        .get("url")
        .and_then(Value::as_str)
        .ok_or(ScraperError::MissingField { field: "url" })?;

    let item_id = match item.get("itemId") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(ScraperError::MissingField { field: "itemId" }),
    };

    let link = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("{}{url}", base_url.trim_end_matches('/'))
    };

    Ok(CatalogItem {
        item_id,
        link,
        name: text_at(item, "/name", fallback::NAME),
        brand: text_at(item, "/brand", fallback::BRAND),
        regular_price: get_path(item, "/price/regular/amount", fallback::PRICE.into()),
        actual_price: get_path(item, "/price/actual/amount", fallback::PRICE.into()),
        rating: get_path(item, "/reviews/rating", fallback::RATING.into()),
        review_count: get_path(item, "/reviews/reviewsCount", fallback::REVIEW_COUNT.into()),
        image_url: image_url(item),
    })
}

fn image_url(item: &Value) -> Option<String> {
    let raw = item.pointer("/imageUrls/0/url").and_then(Value::as_str)?;
    let url = IMAGE_PLACEHOLDERS
        .iter()
        .fold(raw.to_owned(), |acc, &(placeholder, value)| {
            acc.replace(placeholder, value)
        });
    Some(url)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
