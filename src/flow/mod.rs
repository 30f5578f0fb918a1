use crate::dataset::{SongSummary, SongTable};
use crate::recommend::{find_matches, recommend, RecommendError};
use rand::RngCore;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Sessions untouched for this long are dropped on the next write.
const SESSION_IDLE_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// The recommendation flow, one instance per session.
///
/// `AwaitingQuery → MatchesShown → RecommendationShown`, where `back` takes
/// one step in reverse and a new search restarts the flow from any state.
/// A search without matches sends the flow back to `AwaitingQuery`; other
/// failed transitions leave the state untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    AwaitingQuery,
    MatchesShown {
        title: String,
        artists: String,
        matches: Vec<SongSummary>,
    },
    RecommendationShown {
        title: String,
        artists: String,
        matches: Vec<SongSummary>,
        selected: SongSummary,
        recommendation: SongSummary,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    #[error("No matching song found. Try another one.")]
    NoMatch,

    #[error("No matches to pick from, search first")]
    NoMatchesShown,

    #[error("Song \"{0}\" is not among the current matches")]
    NotInMatches(String),

    #[error(transparent)]
    Recommend(#[from] RecommendError),
}

impl FlowState {
    pub fn new() -> FlowState {
        FlowState::AwaitingQuery
    }

    fn matches(&self) -> Option<(&str, &str, &[SongSummary])> {
        match self {
            FlowState::AwaitingQuery => None,
            FlowState::MatchesShown {
                title,
                artists,
                matches,
            }
            | FlowState::RecommendationShown {
                title,
                artists,
                matches,
                ..
            } => Some((title, artists, matches)),
        }
    }

    /// Runs the matcher; a non-empty match set moves to `MatchesShown`,
    /// clearing any downstream recommendation.
    pub fn search(
        &self,
        table: &SongTable,
        title: &str,
        artists: &str,
    ) -> Result<FlowState, FlowError> {
        let matches = find_matches(table, title, artists);
        if matches.is_empty() {
            return Err(FlowError::NoMatch);
        }
        Ok(FlowState::MatchesShown {
            title: title.to_owned(),
            artists: artists.to_owned(),
            matches: matches.into_iter().map(SongSummary::from).collect(),
        })
    }

    /// Picks one of the shown matches and samples a same-cluster
    /// recommendation for it.
    pub fn pick(
        &self,
        table: &SongTable,
        song_id: &str,
        rng: &mut dyn RngCore,
    ) -> Result<FlowState, FlowError> {
        let (title, artists, matches) = self.matches().ok_or(FlowError::NoMatchesShown)?;
        let selected = matches
            .iter()
            .find(|summary| summary.id == song_id)
            .ok_or_else(|| FlowError::NotInMatches(song_id.to_owned()))?;

        let recommendation = recommend(table, song_id, rng)?;

        Ok(FlowState::RecommendationShown {
            title: title.to_owned(),
            artists: artists.to_owned(),
            matches: matches.to_vec(),
            selected: selected.clone(),
            recommendation: SongSummary::from(recommendation),
        })
    }

    /// One reverse transition; `AwaitingQuery` is a fixed point.
    pub fn back(&self) -> FlowState {
        match self {
            FlowState::AwaitingQuery => FlowState::AwaitingQuery,
            FlowState::MatchesShown { .. } => FlowState::AwaitingQuery,
            FlowState::RecommendationShown {
                title,
                artists,
                matches,
                ..
            } => FlowState::MatchesShown {
                title: title.clone(),
                artists: artists.clone(),
                matches: matches.clone(),
            },
        }
    }
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::new()
    }
}

#[derive(Debug)]
struct SessionEntry {
    state: FlowState,
    touched: Instant,
}

/// Flow state per session token. Sessions are anonymous; a token is minted
/// by the HTTP layer the first time a client touches the recommender.
///
/// Every write sweeps sessions idle for longer than the expiry, so the map
/// does not grow with each cookie-less visitor.
#[derive(Debug)]
pub struct FlowSessions {
    idle_expiry: Duration,
    sessions: HashMap<String, SessionEntry>,
}

impl Default for FlowSessions {
    fn default() -> Self {
        FlowSessions::new()
    }
}

impl FlowSessions {
    pub fn new() -> FlowSessions {
        FlowSessions::with_idle_expiry(SESSION_IDLE_EXPIRY)
    }

    pub fn with_idle_expiry(idle_expiry: Duration) -> FlowSessions {
        FlowSessions {
            idle_expiry,
            sessions: HashMap::new(),
        }
    }

    pub fn get(&mut self, token: &str) -> FlowState {
        match self.sessions.get_mut(token) {
            Some(entry) => {
                entry.touched = Instant::now();
                entry.state.clone()
            }
            None => FlowState::default(),
        }
    }

    pub fn put(&mut self, token: &str, state: FlowState) {
        let idle_expiry = self.idle_expiry;
        self.sessions
            .retain(|_, entry| entry.touched.elapsed() < idle_expiry);
        self.sessions.insert(
            token.to_owned(),
            SessionEntry {
                state,
                touched: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
