pub mod formation;
pub mod lineup;

pub use formation::{Formation, Role, RoleCounts};
pub use lineup::{BenchLine, LineupError, LineupSheet, StarterSlot, StartingLineup};
