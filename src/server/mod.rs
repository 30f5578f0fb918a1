mod config;
mod requests_logging;
mod server;
mod session;
mod state;

pub use config::ServerConfig;
pub use requests_logging::RequestsLoggingLevel;
pub use server::{make_app, run_server};
pub use session::COOKIE_FLOW_TOKEN_KEY;
