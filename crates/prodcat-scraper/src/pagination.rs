//! Page-number pagination for the catalog list endpoint.
//!
//! The API has no cursor or total-count field. Pages are requested as
//! `{api_url}&pageNumber={N}` starting at 1, and the walk ends at the first
//! page whose product list is missing or empty.

/// First page number accepted by the catalog endpoint.
pub const FIRST_PAGE: usize = 1;

/// Appends the `pageNumber` query parameter to the configured list URL.
///
/// The configured URL normally already carries a query string
/// (`categoryId`, `cityId`, ...); a bare URL gets one started.
#[must_use]
pub fn page_url(api_url: &str, page_number: usize) -> String {
    let separator = if api_url.contains('?') { '&' } else { '?' };
    format!("{api_url}{separator}pageNumber={page_number}")
}

/// Why a catalog walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page came back without products.
    Exhausted,
    /// The page request failed after every retry, or failed permanently.
    FetchFailed,
    /// The configured item cap was reached.
    ItemCap,
    /// The configured page cap was reached.
    PageCap,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "exhausted"),
            StopReason::FetchFailed => write!(f, "fetch_failed"),
            StopReason::ItemCap => write!(f, "item_cap"),
            StopReason::PageCap => write!(f, "page_cap"),
        }
    }
}

/// Remaining budget for a walk, checked before every page and detail request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub max_items: Option<usize>,
    pub max_pages: Option<usize>,
}

impl Limits {
    pub fn items_reached(&self, collected: usize) -> bool {
        self.max_items.is_some_and(|max| collected >= max)
    }

    pub fn pages_reached(&self, page_number: usize) -> bool {
        self.max_pages.is_some_and(|max| page_number > max)
    }
}
