//! Test server spawning

use super::fixtures::Fixture;
use discoteca_server::config::AppConfig;
use discoteca_server::server::{make_app, RequestsLoggingLevel};
use std::path::PathBuf;
use tempfile::TempDir;

/// A real server on an ephemeral port over a temporary data directory.
pub struct TestServer {
    pub base_url: String,
    pub data_dir: PathBuf,
    // Keeps the data directory alive for the duration of the test.
    _tempdir: TempDir,
}

impl TestServer {
    /// Spawns a server with the given fixture, 3 clusters and a fixed
    /// sampling seed so recommendations are reproducible.
    pub async fn spawn_with(fixture: Fixture) -> TestServer {
        let tempdir = tempfile::tempdir().expect("Failed to create temp data dir");
        fixture.write(tempdir.path());

        let config = AppConfig {
            data_dir: tempdir.path().to_owned(),
            port: 0,
            clusters: 3,
            sample_seed: Some(7),
            logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
        };
        let app = make_app(&config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            base_url: format!("http://{}", addr),
            data_dir: tempdir.path().to_owned(),
            _tempdir: tempdir,
        }
    }

    /// Spawns a server over an empty data directory.
    pub async fn spawn_empty() -> TestServer {
        Self::spawn_with(Fixture::default()).await
    }
}
