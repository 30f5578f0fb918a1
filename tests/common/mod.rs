//! Shared end-to-end test infrastructure.
#![allow(dead_code)]

mod client;
mod fixtures;
mod server;

pub use client::TestClient;
pub use fixtures::{clusterized_beatles, raw_library, song, Fixture};
pub use server::TestServer;
