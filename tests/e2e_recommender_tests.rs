//! End-to-end tests for the match → recommendation flow.

mod common;

use common::{clusterized_beatles, song, Fixture, TestClient, TestServer};
use discoteca_server::server::COOKIE_FLOW_TOKEN_KEY;
use reqwest::StatusCode;

async fn beatles_server() -> TestServer {
    TestServer::spawn_with(Fixture {
        raw: Some(clusterized_beatles().into_iter().map(|mut s| {
            s.cluster = None;
            s
        }).collect()),
        clusterized: Some(clusterized_beatles()),
    })
    .await
}

#[tokio::test]
async fn test_flow_starts_awaiting_a_query() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.flow().await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("first touch mints a session cookie");
    assert!(set_cookie.to_str().unwrap().contains(COOKIE_FLOW_TOKEN_KEY));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_search_then_recommend_the_only_cluster_sibling() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search("yesterday").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "matches_shown");
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["_id"], "1");

    // "Let It Be" is the only other member of cluster 0.
    let response = client.recommendation("1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["state"], "recommendation_shown");
    assert_eq!(body["selected"]["_id"], "1");
    assert_eq!(body["recommendation"]["_id"], "2");
    assert_eq!(body["recommendation"]["cluster"], 0);
}

#[tokio::test]
async fn test_back_walks_the_flow_in_reverse() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    client.search("yesterday").await;
    client.recommendation("1").await;

    let body: serde_json::Value = client.back().await.json().await.unwrap();
    assert_eq!(body["state"], "matches_shown");

    let body: serde_json::Value = client.back().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");

    // Back from the initial state stays there.
    let body: serde_json::Value = client.back().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_no_match_keeps_the_flow_at_the_query_state() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search("bohemian rhapsody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("No matching song"));

    let body: serde_json::Value = client.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_failed_search_discards_previously_shown_matches() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let body: serde_json::Value = client.search("yesterday").await.json().await.unwrap();
    assert_eq!(body["state"], "matches_shown");

    let response = client.search("bohemian rhapsody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = client.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_failed_search_also_discards_a_shown_recommendation() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    client.search("yesterday").await;
    let body: serde_json::Value = client.recommendation("1").await.json().await.unwrap();
    assert_eq!(body["state"], "recommendation_shown");

    let response = client.search("bohemian rhapsody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = client.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_singleton_cluster_yields_no_recommendation() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    client.search("help").await;
    let response = client.recommendation("3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("No recommendation"));

    // The flow stays at match selection.
    let body: serde_json::Value = client.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "matches_shown");
}

#[tokio::test]
async fn test_recommendation_without_matches_is_out_of_order() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.recommendation("1").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_picking_outside_the_match_set_is_rejected() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    client.search("yesterday").await;
    let response = client.recommendation("3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_artists_filter_narrows_matches() {
    let mut clusterized = clusterized_beatles();
    clusterized.push(song("4", "Yesterday Once More", "Carpenters", Some(0)));

    let server = TestServer::spawn_with(Fixture {
        raw: None,
        clusterized: Some(clusterized),
    })
    .await;
    let client = TestClient::new(server.base_url.clone());

    let body: serde_json::Value = client
        .search_with_artists("yesterday", "beatles")
        .await
        .json()
        .await
        .unwrap();
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["_id"], "1");
}

#[tokio::test]
async fn test_repeated_search_returns_identical_matches() {
    let server = beatles_server().await;
    let client = TestClient::new(server.base_url.clone());

    let first: serde_json::Value = client.search("e").await.json().await.unwrap();
    let second: serde_json::Value = client.search("e").await.json().await.unwrap();
    assert_eq!(first["matches"], second["matches"]);
}

#[tokio::test]
async fn test_sessions_are_isolated_by_cookie() {
    let server = beatles_server().await;
    let first = TestClient::new(server.base_url.clone());
    let second = TestClient::new(server.base_url.clone());

    first.search("yesterday").await;

    let body: serde_json::Value = first.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "matches_shown");

    let body: serde_json::Value = second.flow().await.json().await.unwrap();
    assert_eq!(body["state"], "awaiting_query");
}

#[tokio::test]
async fn test_search_requires_clusterized_data() {
    let server = TestServer::spawn_empty().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search("yesterday").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("clusteriz"));
}
