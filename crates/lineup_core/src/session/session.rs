//! Line-up editing session
//!
//! One board per session: eleven starter dealers plus a bench line per
//! configured role, all in a single dealing group so nobody is picked twice.
//! Every bench line is a fill sequence of `bench_size` dealers.

use chrono::Utc;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::info;

use super::config::{ConfigError, SessionConfig};
use crate::dealing::{
    Board, DealerId, DealerListener, EventLog, GroupId, OptionPool, RightmostFillable, SequenceId,
    SequenceListener,
};
use crate::error::{DealError, Result};
use crate::models::{BenchLine, Formation, LineupSheet, Role, StarterSlot, StartingLineup};

#[derive(Debug, Clone)]
struct BenchSlots {
    role: Role,
    dealers: Vec<DealerId>,
    sequence: SequenceId,
}

#[derive(Debug)]
struct Layout {
    group: GroupId,
    starters: Vec<DealerId>,
    bench: Vec<BenchSlots>,
}

pub struct LineupSession<O> {
    config: SessionConfig,
    board: Board<O>,
    layout: Layout,
    journals: Vec<EventLog<O>>,
}

impl<O> LineupSession<O>
where
    O: Clone + Eq + Hash + Debug + 'static,
{
    pub fn new(config: SessionConfig, options: Vec<O>) -> Result<Self> {
        config.validate().map_err(|e| match e {
            ConfigError::Invalid(reason) => DealError::InvalidConfig(reason),
            other => DealError::InvalidConfig(other.to_string()),
        })?;
        let mut board = Board::new();
        let layout = Self::build(&mut board, &config, options)?;
        info!(
            "session: {} with {} bench lines of {}",
            config.formation,
            layout.bench.len(),
            config.bench_size
        );
        Ok(Self { config, board, layout, journals: Vec::new() })
    }

    fn build(board: &mut Board<O>, config: &SessionConfig, options: Vec<O>) -> Result<Layout> {
        let starters = board.add_dealers(config.formation.role_counts().total());
        let bench_dealers: Vec<(Role, Vec<DealerId>)> = config
            .bench_roles
            .iter()
            .map(|role| (*role, board.add_dealers(config.bench_size)))
            .collect();

        let everyone: Vec<DealerId> = starters
            .iter()
            .chain(bench_dealers.iter().flat_map(|(_, dealers)| dealers.iter()))
            .copied()
            .collect();
        let group = board.initialize_group(&everyone, options)?;

        let mut bench = Vec::with_capacity(bench_dealers.len());
        for (role, dealers) in bench_dealers {
            let sequence = board.create_sequence(&dealers)?;
            bench.push(BenchSlots { role, dealers, sequence });
        }
        Ok(Layout { group, starters, bench })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn formation(&self) -> Formation {
        self.config.formation
    }

    pub fn board(&self) -> &Board<O> {
        &self.board
    }

    pub fn group(&self) -> GroupId {
        self.layout.group
    }

    pub fn bench_roles(&self) -> Vec<Role> {
        self.layout.bench.iter().map(|line| line.role).collect()
    }

    /// Record every selection and bench event from now on, including
    /// after `change_formation` and `restart`.
    pub fn journal(&mut self, log: &EventLog<O>) -> Result<()> {
        Self::attach_journal(&mut self.board, &self.layout, log)?;
        self.journals.push(log.clone());
        Ok(())
    }

    fn attach_journal(board: &mut Board<O>, layout: &Layout, log: &EventLog<O>) -> Result<()> {
        let dealers = layout
            .starters
            .iter()
            .chain(layout.bench.iter().flat_map(|line| line.dealers.iter()));
        for dealer in dealers {
            board.attach_listener(*dealer, Box::new(log.clone()) as Box<dyn DealerListener<O>>)?;
        }
        for line in &layout.bench {
            let listener = Box::new(log.clone()) as Box<dyn SequenceListener>;
            board.attach_sequence_listener(line.sequence, listener)?;
        }
        Ok(())
    }

    fn starter(&self, slot: usize) -> Result<DealerId> {
        self.layout
            .starters
            .get(slot)
            .copied()
            .ok_or(DealError::SlotOutOfRange { slot, count: self.layout.starters.len() })
    }

    fn bench_line(&self, role: Role) -> Result<&BenchSlots> {
        self.layout.bench.iter().find(|line| line.role == role).ok_or(DealError::NoBench { role })
    }

    fn substitute(&self, role: Role, position: usize) -> Result<DealerId> {
        let line = self.bench_line(role)?;
        line.dealers
            .get(position)
            .copied()
            .ok_or(DealError::SlotOutOfRange { slot: position, count: line.dealers.len() })
    }

    /// Role of every starter slot under the current formation.
    pub fn starter_roles(&self) -> Vec<Role> {
        self.config.formation.starter_roles()
    }

    pub fn starter_pick(&self, slot: usize) -> Result<Option<&O>> {
        self.board.selection(self.starter(slot)?)
    }

    pub fn pick_starter(&mut self, slot: usize, option: &O) -> Result<()> {
        let dealer = self.starter(slot)?;
        self.board.set_selection(dealer, Some(option))
    }

    pub fn clear_starter(&mut self, slot: usize) -> Result<()> {
        let dealer = self.starter(slot)?;
        self.board.clear(dealer)
    }

    /// What the slot's dealer can still choose from, in pool order.
    pub fn available_for_starter(&self, slot: usize) -> Result<Vec<&O>> {
        Ok(self.board.dealer(self.starter(slot)?)?.visible_options())
    }

    /// Options the role's next fillable bench slot shows; empty when full.
    pub fn available_for_bench(&self, role: Role) -> Result<Vec<&O>> {
        match self.board.next_fillable(self.bench_line(role)?.sequence)? {
            Some(dealer) => Ok(self.board.dealer(dealer)?.visible_options()),
            None => Ok(Vec::new()),
        }
    }

    pub fn substitutes(&self, role: Role) -> Result<Vec<Option<&O>>> {
        self.bench_line(role)?.dealers.iter().map(|dealer| self.board.selection(*dealer)).collect()
    }

    /// Put `option` in the role's next fillable bench slot and return its
    /// position.
    pub fn pick_substitute(&mut self, role: Role, option: &O) -> Result<usize> {
        let line = self.bench_line(role)?;
        let sequence = self.board.sequence(line.sequence)?;
        let position = match sequence.rightmost_fillable() {
            RightmostFillable::At(position) => position,
            RightmostFillable::Overflow => return Err(DealError::BenchFull { role }),
        };
        let dealer = line.dealers[position];
        self.board.set_selection(dealer, Some(option))?;
        Ok(position)
    }

    /// Swap the pick of a filled bench slot for another option in place.
    pub fn replace_substitute(&mut self, role: Role, position: usize, option: &O) -> Result<()> {
        let dealer = self.substitute(role, position)?;
        if !self.board.dealer(dealer)?.has_selection() {
            return Err(DealError::IllegalSequenceState(format!(
                "{} bench slot {} is empty",
                role, position
            )));
        }
        self.board.set_selection(dealer, Some(option))
    }

    /// Empty a bench slot; later substitutes move up one place.
    pub fn remove_substitute(&mut self, role: Role, position: usize) -> Result<()> {
        let dealer = self.substitute(role, position)?;
        self.board.clear(dealer)
    }

    /// Exchange bench slots `position` and `position + 1`.
    pub fn swap_substitutes(&mut self, role: Role, position: usize) -> Result<()> {
        let dealer = self.substitute(role, position)?;
        let sequence = self.bench_line(role)?.sequence;
        self.board.swap_right(sequence, dealer)
    }

    /// Relabel the starter slots and rebuild the bench lines. Picks and
    /// exclusions are kept.
    pub fn change_formation(&mut self, formation: Formation) -> Result<()> {
        if formation == self.config.formation {
            return Ok(());
        }
        for line in &mut self.layout.bench {
            self.board.dispose_sequence(line.sequence)?;
            line.sequence = self.board.create_sequence(&line.dealers)?;
        }
        for log in &self.journals {
            for line in &self.layout.bench {
                self.board.attach_sequence_listener(line.sequence, Box::new(log.clone()))?;
            }
        }
        info!("session: formation {} -> {}", self.config.formation, formation);
        self.config.formation = formation;
        Ok(())
    }

    /// Throw away every pick and start over with a new pool.
    pub fn restart(&mut self, options: Vec<O>) -> Result<()> {
        let pool = OptionPool::new(options)?;
        self.board.reset();
        self.layout = Self::build(&mut self.board, &self.config, pool.options().to_vec())?;
        for log in &self.journals {
            Self::attach_journal(&mut self.board, &self.layout, log)?;
        }
        info!("session: restarted over {} options", pool.len());
        Ok(())
    }

    /// The eleven, checked against the formation.
    pub fn starting_lineup(&self) -> Result<StartingLineup<O>> {
        let slots = self
            .starter_roles()
            .into_iter()
            .zip(&self.layout.starters)
            .map(|(role, dealer)| Ok((role, self.board.selection(*dealer)?.cloned())))
            .collect::<Result<Vec<_>>>()?;
        Ok(StartingLineup::from_slots(self.config.formation, &slots)?)
    }

    pub fn sheet(&self) -> Result<LineupSheet<O>> {
        let starters = self
            .starter_roles()
            .into_iter()
            .zip(&self.layout.starters)
            .enumerate()
            .map(|(slot, (role, dealer))| {
                Ok(StarterSlot { slot, role, player: self.board.selection(*dealer)?.cloned() })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut bench = Vec::with_capacity(self.layout.bench.len());
        for line in &self.layout.bench {
            let players = line
                .dealers
                .iter()
                .map(|dealer| Ok(self.board.selection(*dealer)?.cloned()))
                .collect::<Result<Vec<_>>>()?;
            let next_fillable = match self.board.sequence(line.sequence)?.rightmost_fillable() {
                RightmostFillable::At(position) => Some(position),
                RightmostFillable::Overflow => None,
            };
            bench.push(BenchLine { role: line.role, players, next_fillable });
        }

        Ok(LineupSheet { formation: self.config.formation, starters, bench, taken_at: Utc::now() })
    }
}
