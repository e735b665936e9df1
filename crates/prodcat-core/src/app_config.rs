use std::path::PathBuf;

use serde::Serialize;

/// Default storefront origin used as `Referer` and as the detail endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://goldapple.ru";

/// Default catalog list endpoint. The pipeline appends `&pageNumber={N}`.
pub const DEFAULT_API_URL: &str = "https://goldapple.ru/front/api/catalog/products?categoryId=1000003783&cityId=0c5b2444-70a0-4932-980c-b4dc0d3f02b5&z=14-46";

/// Default `cityId` sent with every product-card request.
pub const DEFAULT_CITY_ID: &str = "0c5b2444-70a0-4932-980c-b4dc0d3f02b5";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

/// Settings consumed by the fetch-retry-paginate pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScraperConfig {
    pub base_url: String,
    pub api_url: String,
    pub city_id: String,
    pub request_timeout_secs: u64,
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    /// Lower bound of the per-attempt jitter window, in seconds.
    pub backoff_min_secs: f64,
    /// Upper bound (exclusive) of the per-attempt jitter window, in seconds.
    pub backoff_max_secs: f64,
    /// Stop collecting once this many products are assembled.
    pub max_items: Option<usize>,
    /// Stop after this many catalog pages have been requested.
    pub max_pages: Option<usize>,
    /// When `false`, the product-card endpoint is never called.
    pub fetch_details: bool,
    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_url: DEFAULT_API_URL.to_owned(),
            city_id: DEFAULT_CITY_ID.to_owned(),
            request_timeout_secs: 15,
            max_attempts: 3,
            backoff_min_secs: 10.0,
            backoff_max_secs: 20.0,
            max_items: None,
            max_pages: None,
            fetch_details: true,
            user_agents: vec![DEFAULT_USER_AGENT.to_owned()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub output_path: PathBuf,
    pub log_level: String,
}
