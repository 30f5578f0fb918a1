use axum::extract::FromRef;

use crate::dataset::DataStore;
use crate::flow::FlowSessions;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedDataStore = Arc<Mutex<DataStore>>;
pub type GuardedFlowSessions = Arc<Mutex<FlowSessions>>;
/// The server-owned randomness source for recommendation sampling and
/// k-means initialization; seeded when `--sample-seed` is given.
pub type GuardedSampler = Arc<Mutex<StdRng>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedDataStore,
    pub flows: GuardedFlowSessions,
    pub sampler: GuardedSampler,
}

impl FromRef<ServerState> for GuardedDataStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedFlowSessions {
    fn from_ref(input: &ServerState) -> Self {
        input.flows.clone()
    }
}

impl FromRef<ServerState> for GuardedSampler {
    fn from_ref(input: &ServerState) -> Self {
        input.sampler.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
