use thiserror::Error;

use crate::dealing::{DealerId, GroupId, SequenceId};
use crate::models::{LineupError, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DealError {
    #[error("Invalid option: {option} is not part of the pool")]
    InvalidOption { option: String },

    #[error("Option unavailable: {option} is claimed by another dealer")]
    OptionUnavailable { option: String },

    #[error("Duplicate option in pool: {option}")]
    DuplicateOption { option: String },

    #[error("Relative position {position} out of range for {dealer} ({visible} visible)")]
    PositionOutOfRange { dealer: DealerId, position: usize, visible: usize },

    #[error("Invalid members: {0}")]
    InvalidMembers(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("{dealer} has no options attached")]
    NotAttached { dealer: DealerId },

    #[error("{dealer} is already attached to {group}")]
    AlreadyAttached { dealer: DealerId, group: GroupId },

    #[error("Unknown dealer: {0}")]
    UnknownDealer(DealerId),

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("Unknown sequence: {0}")]
    UnknownSequence(SequenceId),

    #[error("Illegal sequence state: {0}")]
    IllegalSequenceState(String),

    #[error("Illegal swap request: {0}")]
    IllegalSwapRequest(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Bench for {role} is full")]
    BenchFull { role: Role },

    #[error("No bench line for {role}")]
    NoBench { role: Role },

    #[error("Slot {slot} out of range ({count} slots)")]
    SlotOutOfRange { slot: usize, count: usize },

    #[error("Invalid line-up: {0}")]
    Lineup(#[from] LineupError),
}

impl DealError {
    /// Illegal-state errors are caller bugs, not bad user input.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            DealError::IllegalSequenceState(_) => true,
            DealError::IllegalSwapRequest(_) => true,
            DealError::InvariantViolation(_) => true,
            DealError::NotAttached { .. } => true,
            DealError::AlreadyAttached { .. } => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DealError>;
