pub mod client;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod random;
pub mod retry;
pub mod types;

pub use client::{CatalogClient, ScrapeSummary};
pub use error::ScraperError;
pub use extract::{clean_text, extract_country, extract_text, get_path};
pub use pagination::StopReason;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use retry::{with_retry, RetryPolicy};
pub use types::{CatalogItem, Product, ProductDetail};
