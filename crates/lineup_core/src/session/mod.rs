pub mod config;
#[allow(clippy::module_inception)]
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use session::LineupSession;
