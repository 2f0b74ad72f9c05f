//! Harvest-phase tests: traversal, pagination and the cookie challenge

use crate::support::{
    item_html, listing_html, mount_page, mount_three_page_catalog, sorted, test_config,
};
use catalog_relay::crawler::{traverse, CatalogSelectors};
use catalog_relay::diagnostics::{CaptureSink, Diagnostic};
use catalog_relay::pipeline::{catalog_client, harvest};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_three_page_catalog_harvests_union() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;
    mount_three_page_catalog(&catalog).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();
    let sink = CaptureSink::new();

    let articles = harvest(&config, &selectors, Arc::new(sink.clone()))
        .await
        .expect("harvest should not fail");

    assert_eq!(
        sorted(articles),
        vec!["SM-0001", "SM-0002", "SM-0003", "SM-0005"]
    );

    let item_4 = format!("{}/item/4/", catalog.uri());
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::ArticleMissing { url: item_4 }]
    );
}

#[tokio::test]
async fn test_traversal_is_idempotent() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;
    mount_three_page_catalog(&catalog).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();

    let first = harvest(&config, &selectors, Arc::new(CaptureSink::new()))
        .await
        .unwrap();
    let second = harvest(&config, &selectors, Arc::new(CaptureSink::new()))
        .await
        .unwrap();

    assert_eq!(sorted(first), sorted(second));
}

#[tokio::test]
async fn test_page_without_items_reports_once() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;
    mount_page(&catalog, "/catalog/", listing_html(&[], None)).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();
    let sink = CaptureSink::new();

    let articles = harvest(&config, &selectors, Arc::new(sink.clone()))
        .await
        .unwrap();

    assert!(articles.is_empty());
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::NoItemLinks {
            page: "Sale".to_string()
        }]
    );
}

#[tokio::test]
async fn test_non_numeric_last_page_degrades_to_single_page() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    let html = listing_html(&["/item/1/"], None).replace(
        "</body>",
        r#"<nav class="navigation"><ul class="pagination">
            <li><a href="?page=1">1</a></li>
            <li><a href="?page=many">...</a></li>
            <li><a href="?page=2">next</a></li>
        </ul></nav></body>"#,
    );
    mount_page(&catalog, "/catalog/", html).await;
    mount_page(&catalog, "/item/1/", item_html(Some("SM-0001"))).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();
    let sink = CaptureSink::new();

    let articles = harvest(&config, &selectors, Arc::new(sink.clone()))
        .await
        .unwrap();

    assert_eq!(articles, vec!["SM-0001".to_string()]);
    let captured = sink.diagnostics();
    assert_eq!(captured.len(), 1);
    assert!(matches!(captured[0], Diagnostic::PaginationSkipped { .. }));
}

#[tokio::test]
async fn test_challenge_cookie_is_replayed() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    // With the cookie: the real item page
    Mock::given(method("GET"))
        .and(path("/item/1/"))
        .and(header("cookie", "iwaf_js_cookie_ABC123=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_html(Some("SM-0001"))))
        .expect(1)
        .mount(&catalog)
        .await;
    // Without it: bounce to the challenge page
    Mock::given(method("GET"))
        .and(path("/item/1/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/iwaf-challenge?back=/item/1/"),
        )
        .expect(1)
        .mount(&catalog)
        .await;
    Mock::given(method("GET"))
        .and(path("/iwaf-challenge"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><script>document.cookie='iwaf_js_cookie_ABC123=xyz'; location.reload();</script></html>",
        ))
        .expect(1)
        .mount(&catalog)
        .await;
    mount_page(&catalog, "/catalog/", listing_html(&["/item/1/"], None)).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();
    let sink = CaptureSink::new();
    let client = catalog_client(&config, Arc::new(sink.clone())).unwrap();

    let articles = traverse(
        &client,
        &selectors,
        &config.catalog.start_url,
        Arc::new(sink.clone()),
    )
    .await;

    assert_eq!(articles, vec!["SM-0001".to_string()]);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_unsolvable_challenge_exhausts_retries() {
    let catalog = MockServer::start().await;
    let api = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item/1/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/iwaf-challenge"))
        .expect(3)
        .mount(&catalog)
        .await;
    Mock::given(method("GET"))
        .and(path("/iwaf-challenge"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>please wait</html>"))
        .expect(3)
        .mount(&catalog)
        .await;
    mount_page(&catalog, "/catalog/", listing_html(&["/item/1/"], None)).await;

    let config = test_config(&catalog, &api);
    let selectors = CatalogSelectors::from_config(&config.selectors).unwrap();
    let sink = CaptureSink::new();

    let articles = harvest(&config, &selectors, Arc::new(sink.clone()))
        .await
        .unwrap();

    // The last challenge page is surfaced as the item page and has no article
    assert!(articles.is_empty());
    let captured = sink.diagnostics();
    let challenge_warnings = captured
        .iter()
        .filter(|d| matches!(d, Diagnostic::ChallengeTokenMissing { .. }))
        .count();
    assert_eq!(challenge_warnings, 3);
    assert!(captured
        .iter()
        .any(|d| matches!(d, Diagnostic::ArticleMissing { .. })));
}
