//! HTTP client for the catalog list and product-card endpoints.

mod fetch_all;

use std::sync::Arc;
use std::time::Duration;

use prodcat_core::ScraperConfig;
use reqwest::header::{ACCEPT_ENCODING, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ScraperError;
use crate::random::{RandomSource, ThreadRandom};
use crate::retry::RetryPolicy;

pub use fetch_all::ScrapeSummary;

pub(super) const ACCEPT_LANGUAGE_VALUE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";
pub(super) const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate, br";

/// Path of the product-card endpoint, relative to the storefront origin.
const PRODUCT_CARD_PATH: &str = "/front/api/catalog/product-card/base";

/// HTTP client for the storefront's catalog API.
///
/// Each request carries a User-Agent drawn from the configured pool, fixed
/// `Accept-Language`/`Accept-Encoding` headers, and the storefront origin as
/// `Referer`. [`CatalogClient::fetch_json`] is a single attempt; retries are
/// layered on top by [`crate::retry::with_retry`].
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) config: ScraperConfig,
    pub(super) retry: RetryPolicy,
    pub(super) random: Arc<dyn RandomSource>,
}

impl CatalogClient {
    /// Creates a client whose random draws come from the thread-local generator.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `base_url` or `api_url` does not parse.
    /// - [`ScraperError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        Self::with_random(config, Arc::new(ThreadRandom))
    }

    /// Creates a client with an explicit randomness source, used for
    /// User-Agent selection and backoff jitter.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `base_url` or `api_url` does not parse.
    /// - [`ScraperError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn with_random(
        config: ScraperConfig,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, ScraperError> {
        parse_url(&config.base_url)?;
        parse_url(&config.api_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let retry = RetryPolicy::from_config(&config);

        Ok(Self {
            client,
            config,
            retry,
            random,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Issues one GET and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::HttpStatus`] for any non-2xx response.
    /// - [`ScraperError::Timeout`] when the request exceeds the configured timeout.
    /// - [`ScraperError::Transport`] for other connection-level failures.
    /// - [`ScraperError::Deserialize`] when the body is not JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE)
            .header(REFERER, &self.config.base_url)
            .send()
            .await
            .map_err(|e| self.classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e, url))?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }

    /// Builds the product-card URL for `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured base URL cannot
    /// host the product-card path.
    pub fn detail_url(&self, item_id: &str) -> Result<String, ScraperError> {
        let base = format!(
            "{}{PRODUCT_CARD_PATH}",
            self.config.base_url.trim_end_matches('/')
        );
        let mut url = parse_url(&base)?;
        url.query_pairs_mut()
            .append_pair("itemId", item_id)
            .append_pair("cityId", &self.config.city_id)
            .append_pair("customerGroupId", "0")
            .append_pair("z", "14-46");
        Ok(url.to_string())
    }

    fn pick_user_agent(&self) -> &str {
        let pool = &self.config.user_agents;
        if pool.is_empty() {
            return prodcat_core::DEFAULT_USER_AGENT;
        }
        let idx = self.random.index(pool.len()).min(pool.len() - 1);
        &pool[idx]
    }

    fn classify(&self, err: reqwest::Error, url: &str) -> ScraperError {
        if err.is_timeout() {
            ScraperError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.request_timeout_secs,
            }
        } else {
            ScraperError::Transport(err)
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, ScraperError> {
    Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
