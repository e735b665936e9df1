//! Catalog walk for `CatalogClient`: pages, per-item product cards, records.

use serde_json::Value;

use crate::extract::{parse_detail, parse_item, product_list};
use crate::pagination::{page_url, Limits, StopReason, FIRST_PAGE};
use crate::retry::with_retry;
use crate::types::{Product, ProductDetail};

use super::CatalogClient;

/// Outcome of [`CatalogClient::scrape`].
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    pub products: Vec<Product>,
    /// Catalog pages that returned a product list.
    pub pages_fetched: usize,
    /// Items dropped because `url` or `itemId` was missing.
    pub items_skipped: usize,
    /// Records whose product card could not be fetched.
    pub details_defaulted: usize,
    pub stop_reason: StopReason,
}

impl CatalogClient {
    /// Walks the catalog and returns every assembled product.
    ///
    /// Equivalent to [`Self::scrape`] without the bookkeeping.
    pub async fn fetch_all_products(&self) -> Vec<Product> {
        self.scrape().await.products
    }

    /// Walks the catalog from page 1 until a page has no products, a page
    /// request fails, or a configured cap is hit.
    ///
    /// Never fails: per-item problems are skipped or defaulted, and a failed
    /// page ends the walk with whatever was collected so far.
    pub async fn scrape(&self) -> ScrapeSummary {
        let limits = Limits {
            max_items: self.config.max_items,
            max_pages: self.config.max_pages,
        };
        let mut products: Vec<Product> = Vec::new();
        let mut pages_fetched = 0usize;
        let mut items_skipped = 0usize;
        let mut details_defaulted = 0usize;
        let mut page_number = FIRST_PAGE;

        let stop_reason = 'pages: loop {
            if limits.items_reached(products.len()) {
                break StopReason::ItemCap;
            }
            if limits.pages_reached(page_number) {
                break StopReason::PageCap;
            }

            let Some(page) = self.fetch_page(page_number).await else {
                break StopReason::FetchFailed;
            };
            let Some(items) = product_list(&page) else {
                tracing::info!(page_number, "page has no products, catalog exhausted");
                break StopReason::Exhausted;
            };
            pages_fetched += 1;
            tracing::info!(page_number, items = items.len(), "fetched catalog page");

            for raw in items {
                if limits.items_reached(products.len()) {
                    break 'pages StopReason::ItemCap;
                }

                let item = match parse_item(raw, &self.config.base_url) {
                    Ok(item) => item,
                    Err(err) => {
                        items_skipped += 1;
                        tracing::warn!(page_number, error = %err, "skipping catalog item");
                        continue;
                    }
                };

                let detail = if self.config.fetch_details {
                    self.fetch_detail(&item.item_id).await.unwrap_or_else(|| {
                        details_defaulted += 1;
                        ProductDetail::unavailable()
                    })
                } else {
                    ProductDetail::unavailable()
                };

                tracing::debug!(item_id = %item.item_id, link = %item.link, "assembled product");
                products.push(Product::assemble(item, detail));
            }

            page_number += 1;
        };

        tracing::info!(
            products = products.len(),
            pages_fetched,
            items_skipped,
            details_defaulted,
            stop_reason = %stop_reason,
            "catalog scrape finished"
        );

        ScrapeSummary {
            products,
            pages_fetched,
            items_skipped,
            details_defaulted,
            stop_reason,
        }
    }

    /// Fetches one catalog page with retries. `None` means the walk must stop.
    async fn fetch_page(&self, page_number: usize) -> Option<Value> {
        let url = page_url(&self.config.api_url, page_number);
        match with_retry(&self.retry, self.random.as_ref(), || self.fetch_json(&url)).await {
            Ok(Some(page)) => Some(page),
            Ok(None) => {
                tracing::warn!(page_number, url, "catalog page unavailable after retries");
                None
            }
            Err(err) => {
                tracing::warn!(page_number, url, error = %err, "catalog page request failed");
                None
            }
        }
    }

    /// Fetches and parses one product card. `None` means the caller should
    /// fall back to sentinel detail fields.
    async fn fetch_detail(&self, item_id: &str) -> Option<ProductDetail> {
        let url = match self.detail_url(item_id) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(item_id, error = %err, "cannot build product card URL");
                return None;
            }
        };
        match with_retry(&self.retry, self.random.as_ref(), || self.fetch_json(&url)).await {
            Ok(Some(payload)) => Some(parse_detail(&payload)),
            Ok(None) => {
                tracing::warn!(item_id, "product card unavailable after retries");
                None
            }
            Err(err) => {
                tracing::warn!(item_id, error = %err, "product card request failed");
                None
            }
        }
    }
}
