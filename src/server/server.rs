use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

use crate::clustering::{clusterize, ClusteringError};
use crate::config::AppConfig;
use crate::dataset::{correlation, describe, DataStore, Song, SongTable};
use crate::flow::{FlowError, FlowSessions, FlowState};
use crate::recommend::RecommendError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::requests_logging::log_requests;
use super::session::FlowSession;
use super::state::*;
use super::ServerConfig;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub songs: Option<usize>,
    pub clusterized_songs: Option<usize>,
    pub flow_sessions: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn raw_table_or_unavailable(store: &GuardedDataStore) -> Result<Arc<SongTable>, Response> {
    store.lock().unwrap().raw_table().map_err(|err| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Song dataset not available: {:#}", err),
        )
    })
}

fn clusterized_table_or_unavailable(store: &GuardedDataStore) -> Result<Arc<SongTable>, Response> {
    match store.lock().unwrap().clusterized_table() {
        Ok(Some(table)) => Ok(table),
        Ok(None) => Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "No clusterized data yet. Run the clusterization step first.",
        )),
        Err(err) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{:#}", err),
        )),
    }
}

fn flow_error_response(error: FlowError) -> Response {
    let status = match &error {
        FlowError::NoMatch => StatusCode::NOT_FOUND,
        FlowError::NoMatchesShown => StatusCode::CONFLICT,
        FlowError::NotInMatches(_) => StatusCode::NOT_FOUND,
        FlowError::Recommend(RecommendError::NoRecommendation) => StatusCode::NOT_FOUND,
        FlowError::Recommend(RecommendError::UnknownSong(_)) => StatusCode::NOT_FOUND,
        FlowError::Recommend(RecommendError::NotClusterized(_)) => StatusCode::CONFLICT,
    };
    error_response(status, error.to_string())
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let (songs, clusterized_songs) = {
        let mut store = state.store.lock().unwrap();
        let songs = store.raw_table().ok().map(|table| table.len());
        let clusterized_songs = store
            .clusterized_table()
            .ok()
            .flatten()
            .map(|table| table.len());
        (songs, clusterized_songs)
    };

    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        songs,
        clusterized_songs,
        flow_sessions: state.flows.lock().unwrap().len(),
    };
    Json(stats)
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

#[derive(Deserialize, Debug)]
struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Serialize)]
struct SongPage {
    page: usize,
    page_size: usize,
    total: usize,
    songs: Vec<Song>,
}

async fn get_songs(
    State(store): State<GuardedDataStore>,
    Query(query): Query<PageQuery>,
) -> Response {
    let table = match raw_table_or_unavailable(&store) {
        Ok(table) => table,
        Err(response) => return response,
    };

    Json(SongPage {
        page: query.page,
        page_size: query.page_size,
        total: table.len(),
        songs: table.page(query.page, query.page_size).to_vec(),
    })
    .into_response()
}

async fn get_song(State(store): State<GuardedDataStore>, Path(id): Path<String>) -> Response {
    let table = match raw_table_or_unavailable(&store) {
        Ok(table) => table,
        Err(response) => return response,
    };

    match table.get(&id) {
        Some(song) => Json(song.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_song_stats(State(store): State<GuardedDataStore>) -> Response {
    match raw_table_or_unavailable(&store) {
        Ok(table) => Json(describe(&table)).into_response(),
        Err(response) => response,
    }
}

async fn get_song_correlation(State(store): State<GuardedDataStore>) -> Response {
    match raw_table_or_unavailable(&store) {
        Ok(table) => Json(correlation(&table)).into_response(),
        Err(response) => response,
    }
}

async fn post_clusterize(State(state): State<ServerState>) -> Response {
    let table = match raw_table_or_unavailable(&state.store) {
        Ok(table) => table,
        Err(response) => return response,
    };

    let outcome = {
        let mut sampler = state.sampler.lock().unwrap();
        clusterize(&table, state.config.clusters, &mut *sampler)
    };
    let (clusterized, bundle, report) = match outcome {
        Ok(result) => result,
        Err(err @ (ClusteringError::EmptyInput | ClusteringError::TooFewSamples { .. })) => {
            return error_response(StatusCode::BAD_REQUEST, err.to_string());
        }
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    let store = state.store.lock().unwrap();
    if let Err(err) = clusterized.save_csv(&store.clusterized_path()) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err));
    }
    if let Err(err) = bundle.save(&store.model_path()) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err));
    }

    Json(report).into_response()
}

#[derive(Deserialize, Debug)]
struct SearchBody {
    pub title: String,

    #[serde(default)]
    pub artists: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RecommendationBody {
    pub song_id: String,
}

async fn get_flow(session: FlowSession, State(state): State<ServerState>) -> Response {
    let current = state.flows.lock().unwrap().get(&session.token);
    (session.cookie_jar(), Json(current)).into_response()
}

async fn post_flow_search(
    session: FlowSession,
    State(state): State<ServerState>,
    Json(body): Json<SearchBody>,
) -> Response {
    let table = match clusterized_table_or_unavailable(&state.store) {
        Ok(table) => table,
        Err(response) => return response,
    };

    let current = state.flows.lock().unwrap().get(&session.token);
    let artists = body.artists.unwrap_or_default();
    match current.search(&table, &body.title, &artists) {
        Ok(next) => {
            state.flows.lock().unwrap().put(&session.token, next.clone());
            (session.cookie_jar(), Json(next)).into_response()
        }
        Err(error) => {
            // A query without matches discards any previously shown matches.
            if matches!(error, FlowError::NoMatch) {
                state
                    .flows
                    .lock()
                    .unwrap()
                    .put(&session.token, FlowState::AwaitingQuery);
            }
            flow_error_response(error)
        }
    }
}

async fn post_flow_recommendation(
    session: FlowSession,
    State(state): State<ServerState>,
    Json(body): Json<RecommendationBody>,
) -> Response {
    let table = match clusterized_table_or_unavailable(&state.store) {
        Ok(table) => table,
        Err(response) => return response,
    };

    let current = state.flows.lock().unwrap().get(&session.token);
    let outcome = {
        let mut sampler = state.sampler.lock().unwrap();
        current.pick(&table, &body.song_id, &mut *sampler)
    };
    match outcome {
        Ok(next) => {
            state.flows.lock().unwrap().put(&session.token, next.clone());
            (session.cookie_jar(), Json(next)).into_response()
        }
        Err(error) => flow_error_response(error),
    }
}

async fn post_flow_back(session: FlowSession, State(state): State<ServerState>) -> Response {
    let next = {
        let mut flows = state.flows.lock().unwrap();
        let next = flows.get(&session.token).back();
        flows.put(&session.token, next.clone());
        next
    };
    (session.cookie_jar(), Json(next)).into_response()
}

pub fn make_app(config: &AppConfig) -> Router {
    let sampler = match config.sample_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let state = ServerState {
        config: ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            clusters: config.clusters,
        },
        start_time: Instant::now(),
        store: Arc::new(Mutex::new(DataStore::new(&config.data_dir))),
        flows: Arc::new(Mutex::new(FlowSessions::new())),
        sampler: Arc::new(Mutex::new(sampler)),
    };

    let songs_routes: Router = Router::new()
        .route("/", get(get_songs))
        .route("/stats", get(get_song_stats))
        .route("/correlation", get(get_song_correlation))
        .route("/{id}", get(get_song))
        .with_state(state.clone());

    let recommender_routes: Router = Router::new()
        .route("/", get(get_flow))
        .route("/search", post(post_flow_search))
        .route("/recommendation", post(post_flow_recommendation))
        .route("/back", post(post_flow_back))
        .with_state(state.clone());

    let mut app: Router = Router::new()
        .route("/", get(home))
        .route("/v1/clusterize", post(post_clusterize))
        .with_state(state.clone())
        .nest("/v1/songs", songs_routes)
        .nest("/v1/recommender", recommender_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    if let Some(frontend_dir) = &config.frontend_dir_path {
        app = app.fallback_service(ServeDir::new(frontend_dir));
    }

    app
}

pub async fn run_server(config: AppConfig) -> Result<()> {
    let app = make_app(&config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    info!("Ready to serve at port {}!", config.port);

    Ok(axum::serve(listener, app).await?)
}
