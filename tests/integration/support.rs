//! Shared fixtures for the integration tests

use catalog_relay::config::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing at the mock servers, with no back-off delay
pub fn test_config(catalog: &MockServer, api: &MockServer) -> Config {
    let mut config = Config::default();
    config.catalog.start_url = format!("{}/catalog/", catalog.uri());
    config.catalog.user_agent = "TestRelay/1.0".to_string();
    config.api.base_url = api.uri();
    config.api.post = "-45599639_85065".to_string();
    config.network.connections = 4;
    config.network.retries = 3;
    config.network.backoff_ms = 0;
    config.network.timeout_secs = 5;
    config
}

/// Listing page with the given item links and an optional last page number
pub fn listing_html(items: &[&str], last_page: Option<u32>) -> String {
    let links: String = items
        .iter()
        .map(|href| format!(r#"<a class="product-list__name" href="{}">Item</a>"#, href))
        .collect();

    let pagination = match last_page {
        Some(last) => format!(
            r#"<nav class="navigation"><ul class="pagination">
                <li><a href="?page=1">1</a></li>
                <li><a href="?page=2">2</a></li>
                <li><a href="?page={last}">{last}</a></li>
                <li><a href="?page=2">next</a></li>
            </ul></nav>"#
        ),
        None => String::new(),
    };

    format!(
        r#"<html><head><title>Sale</title></head><body>
            <div id="main-catalog">{}</div>
            {}
        </body></html>"#,
        links, pagination
    )
}

/// Item page with the given article, or without an article element
pub fn item_html(article: Option<&str>) -> String {
    match article {
        Some(article) => format!(
            r#"<html><body><h1>Product</h1>
                <div class="catalog-detail__article">Article: <span> {} </span></div>
            </body></html>"#,
            article
        ),
        None => "<html><body><h1>Product</h1><p>Sold out</p></body></html>".to_string(),
    }
}

/// Mounts an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts an HTML page at `route?page=<page>`
pub async fn mount_listing_page(server: &MockServer, route: &str, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a three-page catalog under `/catalog/`
///
/// Page 1 lists items 1-2, page 2 lists items 3-4, page 3 lists item 5.
/// Item 4 has no article element.
pub async fn mount_three_page_catalog(server: &MockServer) {
    // Pagination pages first so they win over the bare /catalog/ route
    mount_listing_page(
        server,
        "/catalog/",
        2,
        listing_html(&["/item/3/", "/item/4/"], Some(3)),
    )
    .await;
    mount_listing_page(server, "/catalog/", 3, listing_html(&["/item/5/"], Some(3))).await;
    mount_page(
        server,
        "/catalog/",
        listing_html(&["/item/1/", "/item/2/"], Some(3)),
    )
    .await;

    mount_page(server, "/item/1/", item_html(Some("SM-0001"))).await;
    mount_page(server, "/item/2/", item_html(Some("SM-0002"))).await;
    mount_page(server, "/item/3/", item_html(Some("SM-0003"))).await;
    mount_page(server, "/item/4/", item_html(None)).await;
    mount_page(server, "/item/5/", item_html(Some("SM-0005"))).await;
}

/// Sorts a harvest for order-independent comparison
pub fn sorted(mut articles: Vec<String>) -> Vec<String> {
    articles.sort();
    articles
}
