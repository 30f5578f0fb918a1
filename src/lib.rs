//! Discoteca server library
//!
//! Exposes the internal modules for the binary and the end-to-end tests.

pub mod clustering;
pub mod config;
pub mod dataset;
pub mod flow;
pub mod recommend;
pub mod server;

pub use config::{AppConfig, CliConfig, FileConfig};
pub use server::{make_app, run_server, RequestsLoggingLevel};
