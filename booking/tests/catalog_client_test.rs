//! Catalog client against a mocked catalog service.

#![allow(clippy::unwrap_used)]

use boxoffice::{BookingError, CatalogClient, HttpCatalogClient, Price, ShowId, ShowQuery};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn show_json(show_id: u64, title: &str) -> serde_json::Value {
    json!({
        "show_id": show_id,
        "event_id": show_id + 100,
        "category": "concert",
        "title": title,
        "start_time": "2026-03-15T19:30:00",
        "end_time": "2026-03-15T22:00:00",
        "venue_name": "Blue Note",
        "city": "Mumbai",
        "min_price": 65
    })
}

fn detail_json(show_id: u64) -> serde_json::Value {
    json!({
        "show_id": show_id,
        "start_time": "2026-03-15T19:30:00",
        "end_time": "2026-03-15T22:00:00",
        "status": "scheduled",
        "event_id": show_id + 100,
        "category": "concert",
        "title": "Jazz Night",
        "duration_min": 150,
        "language": "English",
        "genre": "Jazz",
        "venue_id": 11,
        "venue_name": "Blue Note",
        "location": "Colaba",
        "city": "Mumbai",
        "country": "India",
        "pincode": "400001",
        "address": "1 Harbour Road"
    })
}

fn mumbai_concerts() -> ShowQuery {
    ShowQuery::parse("concert", "Mumbai").unwrap()
}

#[tokio::test]
async fn listing_sends_filters_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .and(query_param("category", "concert"))
        .and(query_param("city", "Mumbai"))
        .and(header("authorization", "Bearer demo-user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([show_json(7, "Jazz Night"), show_json(8, "Rock Night")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let shows = client
        .list_shows(&mumbai_concerts(), "demo-user")
        .await
        .unwrap();

    assert_eq!(shows.len(), 2);
    assert_eq!(shows[0].id, ShowId::new(7));
    assert_eq!(shows[1].title, "Rock Night");
}

#[tokio::test]
async fn missing_currency_defaults_to_inr() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([show_json(7, "Jazz Night")])))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let shows = client.list_shows(&mumbai_concerts(), "t").await.unwrap();

    assert_eq!(shows[0].price, Price::new(65, "INR"));
    assert_eq!(shows[0].image, "/107.jpg");
}

#[tokio::test]
async fn error_body_becomes_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .respond_with(ResponseTemplate::new(500).set_body_string("catalog database offline"))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let error = client
        .list_shows(&mumbai_concerts(), "t")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        BookingError::Network {
            status: Some(500),
            message: "catalog database offline".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_error_body_names_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let error = client
        .list_shows(&mumbai_concerts(), "t")
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Request failed with status 503");
}

#[tokio::test]
async fn listing_not_found_keeps_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .respond_with(ResponseTemplate::new(404).set_body_string("city not served"))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let error = client
        .list_shows(&mumbai_concerts(), "t")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        BookingError::Network {
            status: Some(404),
            message: "city not served".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_listing_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let error = client
        .list_shows(&mumbai_concerts(), "t")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        BookingError::Network {
            status: Some(200),
            ..
        }
    ));
}

#[tokio::test]
async fn detail_is_fetched_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show/7"))
        .and(header("authorization", "Bearer jo@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(format!("{}/", server.uri()));
    let detail = client.show_detail(ShowId::new(7), "jo@x.com").await.unwrap();

    assert_eq!(detail.id, ShowId::new(7));
    assert_eq!(detail.venue.city, "Mumbai");
    assert_eq!(detail.duration_minutes, 150);
}

#[tokio::test]
async fn unknown_show_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/show/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let error = client.show_detail(ShowId::new(42), "t").await.unwrap_err();

    assert_eq!(error, BookingError::NotFound(ShowId::new(42)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let client = HttpCatalogClient::new("http://127.0.0.1:1");
    let error = client
        .list_shows(&mumbai_concerts(), "t")
        .await
        .unwrap_err();

    assert!(matches!(error, BookingError::Network { status: None, .. }));
}
