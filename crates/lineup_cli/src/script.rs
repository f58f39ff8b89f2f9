//! Scripted editing sessions
//!
//! A script names the squad and lists the edits to replay:
//!
//! ```yaml
//! squad: [Keeper, Back, Winger]
//! steps:
//!   - { op: pick_starter, slot: 0, player: Keeper }
//!   - { op: pick_substitute, role: forward, player: Winger }
//! ```

use anyhow::{bail, Context, Result};
use lineup_core::{DealError, Formation, LineupSession, Role};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    PickStarter { slot: usize, player: String },
    ClearStarter { slot: usize },
    PickSubstitute { role: Role, player: String },
    ReplaceSubstitute { role: Role, position: usize, player: String },
    RemoveSubstitute { role: Role, position: usize },
    SwapSubstitutes { role: Role, position: usize },
    ChangeFormation { formation: Formation },
    Restart { squad: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub squad: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Report rejected steps and carry on instead of stopping.
    #[serde(default)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
        let script = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => bail!("script {} must be .json, .yaml or .yml", path.display()),
        };
        Ok(script)
    }

    /// Replay every step against `session`.
    pub fn run(&self, session: &mut LineupSession<String>) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            match apply(session, step) {
                Ok(()) => outcomes.push(StepOutcome { step: index, error: None }),
                Err(err) if self.keep_going && !err.is_contract_violation() => {
                    log::warn!("step {} rejected: {}", index, err);
                    outcomes.push(StepOutcome { step: index, error: Some(err.to_string()) });
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("step {} ({:?}) failed", index, step));
                }
            }
        }
        Ok(outcomes)
    }
}

fn apply(session: &mut LineupSession<String>, step: &Step) -> Result<(), DealError> {
    log::debug!("applying {:?}", step);
    match step {
        Step::PickStarter { slot, player } => session.pick_starter(*slot, player),
        Step::ClearStarter { slot } => session.clear_starter(*slot),
        Step::PickSubstitute { role, player } => session.pick_substitute(*role, player).map(|_| ()),
        Step::ReplaceSubstitute { role, position, player } => {
            session.replace_substitute(*role, *position, player)
        }
        Step::RemoveSubstitute { role, position } => session.remove_substitute(*role, *position),
        Step::SwapSubstitutes { role, position } => session.swap_substitutes(*role, *position),
        Step::ChangeFormation { formation } => session.change_formation(*formation),
        Step::Restart { squad } => session.restart(squad.clone()),
    }
}
