//! Assembled line-ups.
//!
//! `StartingLineup` is the only way to turn picks into an eleven: one
//! role-sized collection per role, checked for size, empty slots and
//! duplicates before anything is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

use super::formation::{Formation, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineupError {
    #[error("{formation} needs {expected} {role} starters, found {found}")]
    WrongSize { formation: Formation, role: Role, expected: usize, found: usize },

    #[error("{role} slot {slot} is empty")]
    MissingPlayer { role: Role, slot: usize },

    #[error("{player} is picked more than once")]
    DuplicatePlayer { player: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingLineup<O> {
    formation: Formation,
    goalkeeper: O,
    defenders: Vec<O>,
    midfielders: Vec<O>,
    forwards: Vec<O>,
}

impl<O> StartingLineup<O>
where
    O: Clone + Eq + Hash + Debug,
{
    pub fn new(
        formation: Formation,
        goalkeeper: Option<O>,
        defenders: Vec<Option<O>>,
        midfielders: Vec<Option<O>>,
        forwards: Vec<Option<O>>,
    ) -> Result<Self, LineupError> {
        let counts = formation.role_counts();
        let goalkeepers = vec![goalkeeper];
        let lines = [
            (Role::Goalkeeper, &goalkeepers),
            (Role::Defender, &defenders),
            (Role::Midfielder, &midfielders),
            (Role::Forward, &forwards),
        ];

        for (role, line) in lines.iter() {
            if line.len() != counts.get(*role) {
                return Err(LineupError::WrongSize {
                    formation,
                    role: *role,
                    expected: counts.get(*role),
                    found: line.len(),
                });
            }
        }

        let mut seen = HashSet::new();
        for (role, line) in lines.iter() {
            for (slot, player) in line.iter().enumerate() {
                let player =
                    player.as_ref().ok_or(LineupError::MissingPlayer { role: *role, slot })?;
                if !seen.insert(player) {
                    return Err(LineupError::DuplicatePlayer { player: format!("{:?}", player) });
                }
            }
        }

        let unwrap_line = |line: Vec<Option<O>>| line.into_iter().flatten().collect::<Vec<O>>();
        let goalkeeper = unwrap_line(goalkeepers).remove(0);
        Ok(Self {
            formation,
            goalkeeper,
            defenders: unwrap_line(defenders),
            midfielders: unwrap_line(midfielders),
            forwards: unwrap_line(forwards),
        })
    }

    /// Group `(role, pick)` slots by role, keeping slot order inside a role.
    pub fn from_slots(
        formation: Formation,
        slots: &[(Role, Option<O>)],
    ) -> Result<Self, LineupError> {
        let line = |wanted: Role| -> Vec<Option<O>> {
            slots.iter().filter(|(role, _)| *role == wanted).map(|(_, pick)| pick.clone()).collect()
        };
        let mut goalkeepers = line(Role::Goalkeeper);
        if goalkeepers.len() != 1 {
            return Err(LineupError::WrongSize {
                formation,
                role: Role::Goalkeeper,
                expected: 1,
                found: goalkeepers.len(),
            });
        }
        Self::new(
            formation,
            goalkeepers.remove(0),
            line(Role::Defender),
            line(Role::Midfielder),
            line(Role::Forward),
        )
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn goalkeeper(&self) -> &O {
        &self.goalkeeper
    }

    pub fn by_role(&self, role: Role) -> &[O] {
        match role {
            Role::Goalkeeper => std::slice::from_ref(&self.goalkeeper),
            Role::Defender => &self.defenders,
            Role::Midfielder => &self.midfielders,
            Role::Forward => &self.forwards,
        }
    }

    /// Goalkeeper first, then back to front.
    pub fn players(&self) -> impl Iterator<Item = &O> {
        Role::ALL.into_iter().flat_map(move |role| self.by_role(role).iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterSlot<O> {
    pub slot: usize,
    pub role: Role,
    pub player: Option<O>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchLine<O> {
    pub role: Role,
    pub players: Vec<Option<O>>,
    /// Position that takes the next substitute, `None` when full.
    pub next_fillable: Option<usize>,
}

/// Snapshot of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupSheet<O> {
    pub formation: Formation,
    pub starters: Vec<StarterSlot<O>>,
    pub bench: Vec<BenchLine<O>>,
    pub taken_at: DateTime<Utc>,
}

impl<O> LineupSheet<O> {
    pub fn starters_filled(&self) -> usize {
        self.starters.iter().filter(|s| s.player.is_some()).count()
    }

    pub fn bench_filled(&self) -> usize {
        self.bench.iter().flat_map(|line| line.players.iter()).filter(|p| p.is_some()).count()
    }

    pub fn is_eleven_complete(&self) -> bool {
        self.starters.iter().all(|s| s.player.is_some())
    }
}
