use super::state::ServerState;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

pub const COOKIE_FLOW_TOKEN_KEY: &str = "flow_token";

/// An anonymous flow session, identified by a cookie token.
///
/// A request without the cookie gets a freshly minted token; the handler is
/// responsible for returning [`FlowSession::cookie_jar`] so the client keeps
/// it.
#[derive(Debug)]
pub struct FlowSession {
    pub token: String,
    minted: bool,
}

impl FlowSession {
    /// A jar whose delta sets the session cookie when the token is new.
    pub fn cookie_jar(&self) -> CookieJar {
        let jar = CookieJar::new();
        if !self.minted {
            return jar;
        }
        let mut cookie = Cookie::new(COOKIE_FLOW_TOKEN_KEY, self.token.clone());
        cookie.set_path("/");
        cookie.set_same_site(SameSite::Lax);
        jar.add(cookie)
    }
}

impl FromRequestParts<ServerState> for FlowSession {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, ctx)
            .await
            .expect("Could not read cookies into CookieJar.");

        match jar.get(COOKIE_FLOW_TOKEN_KEY) {
            Some(cookie) => Ok(FlowSession {
                token: cookie.value().to_string(),
                minted: false,
            }),
            None => {
                let token = Uuid::new_v4().to_string();
                debug!("Minting flow session token {}", token);
                Ok(FlowSession {
                    token,
                    minted: true,
                })
            }
        }
    }
}
