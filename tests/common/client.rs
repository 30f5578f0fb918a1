//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with a cookie store so the flow session token behaves the
//! way a browser would. When routes or body formats change, update only this
//! file.

use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Keeps the flow session cookie between calls
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn songs(&self, page: usize, page_size: usize) -> Response {
        self.client
            .get(format!(
                "{}/v1/songs?page={}&page_size={}",
                self.base_url, page, page_size
            ))
            .send()
            .await
            .unwrap()
    }

    pub async fn song(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/v1/songs/{}", self.base_url, id))
            .send()
            .await
            .unwrap()
    }

    pub async fn song_stats(&self) -> Response {
        self.client
            .get(format!("{}/v1/songs/stats", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn song_correlation(&self) -> Response {
        self.client
            .get(format!("{}/v1/songs/correlation", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn clusterize(&self) -> Response {
        self.client
            .post(format!("{}/v1/clusterize", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn flow(&self) -> Response {
        self.client
            .get(format!("{}/v1/recommender", self.base_url))
            .send()
            .await
            .unwrap()
    }

    pub async fn search(&self, title: &str) -> Response {
        self.client
            .post(format!("{}/v1/recommender/search", self.base_url))
            .json(&json!({ "title": title }))
            .send()
            .await
            .unwrap()
    }

    pub async fn search_with_artists(&self, title: &str, artists: &str) -> Response {
        self.client
            .post(format!("{}/v1/recommender/search", self.base_url))
            .json(&json!({ "title": title, "artists": artists }))
            .send()
            .await
            .unwrap()
    }

    pub async fn recommendation(&self, song_id: &str) -> Response {
        self.client
            .post(format!("{}/v1/recommender/recommendation", self.base_url))
            .json(&json!({ "song_id": song_id }))
            .send()
            .await
            .unwrap()
    }

    pub async fn back(&self) -> Response {
        self.client
            .post(format!("{}/v1/recommender/back", self.base_url))
            .send()
            .await
            .unwrap()
    }
}
