use std::time::Duration;

use reqwest::Client;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newscast_core::{FeedSource, HttpFeedSource};

fn sample_rss() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>http://example.com/</link>
    <description>Test description</description>
    <item>
      <title>Item 1</title>
      <link>http://example.com/1</link>
      <description>First</description>
    </item>
    <item>
      <title>Item 2</title>
      <link>http://example.com/2</link>
      <description>Second</description>
    </item>
  </channel>
</rss>"#
        .to_string()
}

fn source_for(server: &MockServer) -> HttpFeedSource {
    HttpFeedSource::new(
        Client::new(),
        format!("{}/feed", server.uri()),
        Duration::from_secs(2),
    )
}

#[tokio::test]
async fn fetch_parses_items_in_feed_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(sample_rss()),
        )
        .mount(&server)
        .await;

    let items = source_for(&server).fetch().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Item 1");
    assert_eq!(items[0].link, "http://example.com/1");
    assert_eq!(items[1].link, "http://example.com/2");
}

#[tokio::test]
async fn non_success_status_yields_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(source_for(&server).fetch().await.is_empty());
}

#[tokio::test]
async fn unparseable_body_yields_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not an rss document"))
        .mount(&server)
        .await;

    assert!(source_for(&server).fetch().await.is_empty());
}

#[tokio::test]
async fn unreachable_server_yields_empty() {
    // Nothing is listening on this port.
    let source = HttpFeedSource::new(
        Client::new(),
        "http://127.0.0.1:9/feed",
        Duration::from_millis(500),
    );
    assert!(source.fetch().await.is_empty());
}
