use serde::{Deserialize, Serialize};
use std::fmt;

/// Zone a line-up slot plays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Goalkeeper, Role::Defender, Role::Midfielder, Role::Forward];

    pub fn code(&self) -> &'static str {
        match self {
            Role::Goalkeeper => "GK",
            Role::Defender => "DF",
            Role::Midfielder => "MF",
            Role::Forward => "FW",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Starter slots per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub goalkeepers: usize,
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl RoleCounts {
    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Goalkeeper => self.goalkeepers,
            Role::Defender => self.defenders,
            Role::Midfielder => self.midfielders,
            Role::Forward => self.forwards,
        }
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "4-4-1-1")]
    F4411,
    #[serde(rename = "4-3-2-1")]
    F4321,
    #[serde(rename = "4-2-2-2")]
    F4222,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-4-2-1")]
    F3421,
    #[serde(rename = "3-4-1-2")]
    F3412,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "4-2-3-1")]
    F4231,
    #[serde(rename = "4-1-4-1")]
    F4141,
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "5-4-1")]
    F541,
}

impl Formation {
    pub const ALL: [Formation; 14] = [
        Formation::F442,
        Formation::F433,
        Formation::F4411,
        Formation::F4321,
        Formation::F4222,
        Formation::F451,
        Formation::F352,
        Formation::F3421,
        Formation::F3412,
        Formation::F532,
        Formation::F4231,
        Formation::F4141,
        Formation::F343,
        Formation::F541,
    ];

    /// Starters per role; always one goalkeeper and ten outfield players.
    pub fn role_counts(&self) -> RoleCounts {
        let (defenders, midfielders, forwards) = match self {
            Formation::F442 => (4, 4, 2),
            Formation::F433 => (4, 3, 3),
            Formation::F4411 => (4, 4, 2),
            Formation::F4321 => (4, 3, 3), // 2 behind striker counted as forwards
            Formation::F4222 => (4, 4, 2),
            Formation::F451 => (4, 5, 1),
            Formation::F352 => (3, 5, 2),
            Formation::F3421 => (3, 4, 3),
            Formation::F3412 => (3, 5, 2), // CAM+2 ST
            Formation::F532 => (5, 3, 2),
            Formation::F4231 => (4, 5, 1), // 2 DM + 3 AM
            Formation::F4141 => (4, 5, 1), // 1 DM + 4 M
            Formation::F343 => (3, 4, 3),
            Formation::F541 => (5, 4, 1),
        };
        RoleCounts { goalkeepers: 1, defenders, midfielders, forwards }
    }

    /// Role of each starter slot, goalkeeper first, then back to front.
    pub fn starter_roles(&self) -> Vec<Role> {
        let counts = self.role_counts();
        Role::ALL
            .iter()
            .flat_map(|role| std::iter::repeat(*role).take(counts.get(*role)))
            .collect()
    }

    /// Canonical formation code string (e.g., "4-3-3").
    pub fn code(&self) -> &'static str {
        match self {
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F4411 => "4-4-1-1",
            Formation::F4321 => "4-3-2-1",
            Formation::F4222 => "4-2-2-2",
            Formation::F451 => "4-5-1",
            Formation::F352 => "3-5-2",
            Formation::F3421 => "3-4-2-1",
            Formation::F3412 => "3-4-1-2",
            Formation::F532 => "5-3-2",
            Formation::F4231 => "4-2-3-1",
            Formation::F4141 => "4-1-4-1",
            Formation::F343 => "3-4-3",
            Formation::F541 => "5-4-1",
        }
    }

    /// Accepts "4-4-2", "442" or "T442".
    pub fn from_code(code: &str) -> Option<Formation> {
        let wanted = code.trim().to_uppercase().replace('-', "");
        let wanted = wanted.strip_prefix('T').unwrap_or(&wanted);
        Formation::ALL.iter().copied().find(|f| f.code().replace('-', "") == wanted)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
