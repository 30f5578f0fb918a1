use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use discoteca_server::clustering::ModelBundle;
use discoteca_server::config::{AppConfig, CliConfig, FileConfig};
use discoteca_server::dataset::DataStore;
use discoteca_server::server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the data directory holding songs.csv and the clusterization
    /// artifacts.
    #[clap(value_parser = parse_path)]
    pub data_dir: PathBuf,

    /// Path to an optional TOML config file; file values override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// Number of clusters for the clusterization step.
    #[clap(long, default_value_t = 9)]
    pub clusters: usize,

    /// Seed for recommendation sampling and k-means initialization; omit for
    /// OS entropy.
    #[clap(long)]
    pub sample_seed: Option<u64>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        data_dir: cli_args.data_dir,
        port: cli_args.port,
        clusters: cli_args.clusters,
        sample_seed: cli_args.sample_seed,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
    };
    let config = AppConfig::resolve(&cli_config, file_config);

    info!("Using data directory {}", config.data_dir.display());
    let mut store = DataStore::new(&config.data_dir);
    match store.raw_table() {
        Ok(table) => info!("Song dataset has {} rows", table.len()),
        Err(err) => info!("Song dataset not loadable yet: {:#}", err),
    }
    match store.clusterized_table() {
        Ok(Some(table)) => info!("Clusterized dataset has {} rows", table.len()),
        Ok(None) => info!("No clusterized dataset yet, POST /v1/clusterize to build one"),
        Err(err) => info!("Clusterized dataset not loadable: {:#}", err),
    }
    let model_path = store.model_path();
    if model_path.exists() {
        match ModelBundle::load(&model_path) {
            Ok(bundle) => info!(
                "Model bundle fitted for {} clusters",
                bundle.model.n_clusters()
            ),
            Err(err) => info!("Model bundle not loadable: {:#}", err),
        }
    }

    run_server(config).await
}
