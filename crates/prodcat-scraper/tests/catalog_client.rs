//! Integration tests for `CatalogClient::scrape`.
//!
//! Uses `wiremock` to stand up a local storefront for each test so no real
//! network traffic is made. Backoff is configured to zero so retries do not
//! sleep.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prodcat_core::ScraperConfig;
use prodcat_scraper::{CatalogClient, StopReason};

const LIST_PATH: &str = "/front/api/catalog/products";
const CARD_PATH: &str = "/front/api/catalog/product-card/base";
const TEST_UA: &str = "prodcat-test/0.1";

/// Config pointing at `server` with three attempts and no backoff.
fn test_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        base_url: server.uri(),
        api_url: format!("{}{LIST_PATH}?categoryId=1000000007", server.uri()),
        city_id: "city-1".to_owned(),
        request_timeout_secs: 5,
        max_attempts: 3,
        backoff_min_secs: 0.0,
        backoff_max_secs: 0.0,
        user_agents: vec![TEST_UA.to_owned()],
        ..ScraperConfig::default()
    }
}

fn test_client(config: ScraperConfig) -> CatalogClient {
    CatalogClient::new(config).expect("failed to build test CatalogClient")
}

fn item_json(item_id: &str) -> Value {
    json!({
        "url": format!("/product/{item_id}"),
        "name": "Товар 1",
        "brand": "Бренд 1",
        "price": {"regular": {"amount": 1000}, "actual": {"amount": 800}},
        "reviews": {"rating": 4.5, "reviewsCount": 10},
        "imageUrls": [{"url": "https://cdn.example.com/${screen}/1.${format}"}],
        "itemId": item_id
    })
}

fn page_json(items: &[Value]) -> Value {
    json!({"data": {"products": items}})
}

fn card_json() -> Value {
    json!({
        "data": {
            "productDescription": [
                {"content": "<p>Описание продукта</p>"},
                {"content": "Инструкция по применению"},
                {},
                {"subtitle": "Россия"}
            ]
        }
    })
}

async fn mount_page(server: &MockServer, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_card(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(CARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_page_then_empty_yields_one_record() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("12345")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    Mock::given(method("GET"))
        .and(path(CARD_PATH))
        .and(query_param("itemId", "12345"))
        .and(query_param("cityId", "city-1"))
        .and(query_param("customerGroupId", "0"))
        .and(query_param("z", "14-46"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json()))
        .expect(1)
        .mount(&server)
        .await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.stop_reason, StopReason::Exhausted);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.products.len(), 1);
    let product = &summary.products[0];
    assert_eq!(product.link, format!("{}/product/12345", server.uri()));
    assert_eq!(product.name, "Товар 1");
    assert_eq!(product.brand, "Бренд 1");
    assert_eq!(product.regular_price, json!(1000));
    assert_eq!(product.actual_price, json!(800));
    assert_eq!(product.rating, json!(4.5));
    assert_eq!(product.review_count, json!(10));
    assert_eq!(
        product.image_url.as_deref(),
        Some("https://cdn.example.com/fullhd/1.jpg")
    );
    assert_eq!(product.description, "Описание продукта");
    assert_eq!(product.usage_instructions, "Инструкция по применению");
    assert_eq!(product.country, "Россия");
}

#[tokio::test]
async fn multi_page_preserves_order() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1"), item_json("2")])).await;
    mount_page(&server, "2", page_json(&[item_json("3")])).await;
    mount_page(&server, "3", page_json(&[])).await;
    mount_card(&server, card_json()).await;

    let products = test_client(test_config(&server)).fetch_all_products().await;

    let links: Vec<String> = products.into_iter().map(|p| p.link).collect();
    let base = server.uri();
    assert_eq!(
        links,
        vec![
            format!("{base}/product/1"),
            format!("{base}/product/2"),
            format!("{base}/product/3"),
        ]
    );
}

#[tokio::test]
async fn top_level_product_list_is_accepted() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"products": [item_json("1")]})).await;
    mount_page(&server, "2", json!({"products": []})).await;
    mount_card(&server, card_json()).await;

    let products = test_client(test_config(&server)).fetch_all_products().await;

    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn empty_first_page_yields_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"data": {}})).await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert!(summary.products.is_empty());
    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.stop_reason, StopReason::Exhausted);
}

#[tokio::test]
async fn requests_carry_user_agent_and_referer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(header("user-agent", TEST_UA))
        .and(header("referer", server.uri().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.stop_reason, StopReason::Exhausted);
}

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_without_id_is_skipped() {
    let server = MockServer::start().await;
    let mut broken = item_json("0");
    broken.as_object_mut().unwrap().remove("itemId");
    mount_page(&server, "1", page_json(&[broken, item_json("2")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    mount_card(&server, card_json()).await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.items_skipped, 1);
    assert_eq!(summary.products.len(), 1);
    assert!(summary.products[0].link.ends_with("/product/2"));
}

#[tokio::test]
async fn failing_product_card_yields_sentinels() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    Mock::given(method("GET"))
        .and(path(CARD_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.details_defaulted, 1);
    let product = &summary.products[0];
    assert_eq!(product.name, "Товар 1");
    assert_eq!(product.description, "Нет описания");
    assert_eq!(product.usage_instructions, "Нет инструкции");
    assert_eq!(product.country, "Не указана");
}

#[tokio::test]
async fn malformed_product_card_yields_sentinels() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    Mock::given(method("GET"))
        .and(path(CARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.products.len(), 1);
    assert_eq!(summary.products[0].description, "Нет описания");
}

#[tokio::test]
async fn failing_first_page_yields_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert!(summary.products.is_empty());
    assert_eq!(summary.stop_reason, StopReason::FetchFailed);
}

#[tokio::test]
async fn failing_later_page_keeps_earlier_records() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_card(&server, card_json()).await;

    let summary = test_client(test_config(&server)).scrape().await;

    assert_eq!(summary.products.len(), 1);
    assert_eq!(summary.stop_reason, StopReason::FetchFailed);
}

#[tokio::test]
async fn transient_page_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    mount_card(&server, card_json()).await;

    let products = test_client(test_config(&server)).fetch_all_products().await;

    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn slow_page_times_out_and_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(&[item_json("1")]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    mount_card(&server, card_json()).await;

    let mut config = test_config(&server);
    config.request_timeout_secs = 1;
    let products = test_client(config).fetch_all_products().await;

    assert_eq!(products.len(), 1);
}

// ---------------------------------------------------------------------------
// Caps and toggles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn max_items_stops_before_next_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1"), item_json("2")])).await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[item_json("3")])))
        .expect(0)
        .mount(&server)
        .await;
    mount_card(&server, card_json()).await;

    let mut config = test_config(&server);
    config.max_items = Some(1);
    let summary = test_client(config).scrape().await;

    assert_eq!(summary.products.len(), 1);
    assert_eq!(summary.stop_reason, StopReason::ItemCap);
}

#[tokio::test]
async fn max_pages_limits_page_requests() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[item_json("2")])))
        .expect(0)
        .mount(&server)
        .await;
    mount_card(&server, card_json()).await;

    let mut config = test_config(&server);
    config.max_pages = Some(1);
    let summary = test_client(config).scrape().await;

    assert_eq!(summary.products.len(), 1);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.stop_reason, StopReason::PageCap);
}

#[tokio::test]
async fn disabled_details_skip_product_cards() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_json(&[item_json("1")])).await;
    mount_page(&server, "2", page_json(&[])).await;
    Mock::given(method("GET"))
        .and(path(CARD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json()))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.fetch_details = false;
    let summary = test_client(config).scrape().await;

    assert_eq!(summary.products.len(), 1);
    assert_eq!(summary.details_defaulted, 0);
    assert_eq!(summary.products[0].description, "Нет описания");
}
