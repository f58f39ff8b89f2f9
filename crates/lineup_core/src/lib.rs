//! # lineup_core - Line-up Selection Engine
//!
//! Deals players from a fixed squad into starter and bench slots.
//!
//! ## Features
//! - No player is picked by two slots at once (dealing groups)
//! - Bench lines fill left to right and close gaps on removal
//! - Every list view stays in step with what its slot may choose
//! - Serializable events and line-up sheets

pub mod dealing;
pub mod error;
pub mod models;
pub mod session;

pub use dealing::{
    Board, DealerId, EventLog, GroupId, LineupEvent, ListView, RightmostFillable, SequenceId,
};
pub use error::{DealError, Result};
pub use models::{Formation, LineupError, LineupSheet, Role, StartingLineup};
pub use session::{ConfigError, LineupSession, SessionConfig};
