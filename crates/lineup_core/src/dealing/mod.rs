//! Dealing engine
//!
//! Assigns options from a fixed pool to selection slots ("dealers").
//!
//! ## Structure
//! - `OptionPool`: fixed, ordered options shared by one group
//! - `Mask`: absolute/relative index bijection of what a dealer can see
//! - `Dealer`: one slot with a masked view and at most one selection
//! - `DealingGroup`: no option is claimed by two dealers at once
//! - `FillSequence`: ordered bench slots, filled left to right and compacted
//! - `Board`: arena + mediator routing selection changes to both drivers
//!
//! A dealer's selection change reaches its group first, then its sequence.
//! Driver-induced mutations never re-notify the driver that caused them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod board;
pub mod dealer;
pub mod events;
pub mod group;
pub mod mask;
pub mod pool;
pub mod sequence;

#[cfg(test)]
mod proptests;

pub use board::Board;
pub use dealer::Dealer;
pub use events::{
    DealerListener, DealerView, EventLog, LineupEvent, ListView, ListViewState, SequenceListener,
};
pub use group::DealingGroup;
pub use mask::Mask;
pub use pool::OptionPool;
pub use sequence::{FillSequence, RightmostFillable};

/// Index of a dealer inside its `Board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DealerId(pub usize);

/// Index of a dealing group inside its `Board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// Index of a fill sequence inside its `Board`. Never reused after disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub usize);

impl fmt::Display for DealerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dealer#{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence#{}", self.0)
    }
}
