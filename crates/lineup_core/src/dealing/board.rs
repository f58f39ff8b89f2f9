//! Board - arena and mediator for dealers, groups and sequences.
//!
//! ## Routing
//! - user change on a dealer: validate, apply, then dealing group, then
//!   fill sequence
//! - sequence-driven relocation (acquire/discard/swap): dealing group
//!   `hand_over` only, never back into the sequence
//! - group-driven retire/restore: never reaches the sequence, the selection
//!   does not change
//!
//! A replacement (select on a dealer that already holds a pick) reaches the
//! group as cleared(old) then made(new), and the sequence as one
//! `content_added` on an already filled slot.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use super::dealer::Dealer;
use super::events::{DealerListener, DealerView, SequenceListener};
use super::group::DealingGroup;
use super::pool::OptionPool;
use super::sequence::{FillSequence, RightmostFillable, SlotHost};
use super::{DealerId, GroupId, SequenceId};
use crate::error::{DealError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Made(usize),
    Replaced { old: usize, new: usize },
    Cleared(usize),
}

pub struct Board<O> {
    dealers: Vec<Dealer<O>>,
    groups: Vec<DealingGroup<O>>,
    /// `None` once disposed; ids are never reused.
    sequences: Vec<Option<FillSequence>>,
}

impl<O> Default for Board<O> {
    fn default() -> Self {
        Self { dealers: Vec::new(), groups: Vec::new(), sequences: Vec::new() }
    }
}

impl<O> Board<O>
where
    O: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every dealer, group and sequence.
    pub fn reset(&mut self) {
        log::debug!(
            "board reset: {} dealers, {} groups, {} sequences",
            self.dealers.len(),
            self.groups.len(),
            self.sequences.len()
        );
        self.dealers.clear();
        self.groups.clear();
        self.sequences.clear();
    }

    pub fn add_dealer(&mut self) -> DealerId {
        let id = DealerId(self.dealers.len());
        self.dealers.push(Dealer::new(id));
        id
    }

    pub fn add_dealers(&mut self, count: usize) -> Vec<DealerId> {
        (0..count).map(|_| self.add_dealer()).collect()
    }

    pub fn dealer(&self, id: DealerId) -> Result<&Dealer<O>> {
        self.dealers.get(id.0).ok_or(DealError::UnknownDealer(id))
    }

    pub fn dealers(&self) -> &[Dealer<O>] {
        &self.dealers
    }

    pub fn group(&self, id: GroupId) -> Result<&DealingGroup<O>> {
        self.groups.get(id.0).ok_or(DealError::UnknownGroup(id))
    }

    pub fn sequence(&self, id: SequenceId) -> Result<&FillSequence> {
        self.sequences.get(id.0).and_then(Option::as_ref).ok_or(DealError::UnknownSequence(id))
    }

    fn sequence_mut(&mut self, id: SequenceId) -> Result<&mut FillSequence> {
        self.sequences.get_mut(id.0).and_then(Option::as_mut).ok_or(DealError::UnknownSequence(id))
    }

    pub fn attach_view(&mut self, dealer: DealerId, view: Box<dyn DealerView<O>>) -> Result<()> {
        self.dealer(dealer)?;
        self.dealers[dealer.0].attach_view(view);
        Ok(())
    }

    pub fn attach_listener(
        &mut self,
        dealer: DealerId,
        listener: Box<dyn DealerListener<O>>,
    ) -> Result<()> {
        self.dealer(dealer)?;
        self.dealers[dealer.0].attach_listener(listener);
        Ok(())
    }

    pub fn attach_sequence_listener(
        &mut self,
        sequence: SequenceId,
        listener: Box<dyn SequenceListener>,
    ) -> Result<()> {
        self.sequence_mut(sequence)?.attach_listener(listener);
        Ok(())
    }

    /// Attach one shared pool to every dealer and make them siblings.
    pub fn initialize_group(&mut self, dealers: &[DealerId], options: Vec<O>) -> Result<GroupId> {
        if dealers.is_empty() {
            return Err(DealError::InvalidMembers("a dealing group needs dealers".to_string()));
        }
        for (i, id) in dealers.iter().enumerate() {
            let dealer = self.dealer(*id)?;
            if let Some(group) = dealer.group() {
                return Err(DealError::AlreadyAttached { dealer: *id, group });
            }
            if dealers[..i].contains(id) {
                return Err(DealError::InvalidMembers(format!("{} listed twice", id)));
            }
        }

        let pool = Rc::new(OptionPool::new(options)?);
        let group_id = GroupId(self.groups.len());
        for id in dealers {
            let dealer = &mut self.dealers[id.0];
            dealer.attach_options(Rc::clone(&pool));
            dealer.set_group(Some(group_id));
        }
        log::debug!("{}: {} dealers over {} options", group_id, dealers.len(), pool.len());
        self.groups.push(DealingGroup::new(group_id, pool, dealers.to_vec()));
        Ok(group_id)
    }

    /// Order already-attached dealers of one group into a fill sequence.
    pub fn create_sequence(&mut self, members: &[DealerId]) -> Result<SequenceId> {
        let mut group = None;
        for id in members {
            let dealer = self.dealer(*id)?;
            let dealer_group = dealer.group().ok_or(DealError::NotAttached { dealer: *id })?;
            match group {
                None => group = Some(dealer_group),
                Some(g) if g != dealer_group => {
                    return Err(DealError::InvalidMembers(format!(
                        "{} belongs to {}, expected {}",
                        id, dealer_group, g
                    )));
                }
                Some(_) => {}
            }
            if let Some(existing) = dealer.sequence() {
                return Err(DealError::InvalidMembers(format!(
                    "{} already belongs to {}",
                    id, existing
                )));
            }
        }

        let id = SequenceId(self.sequences.len());
        let mut host = SequenceSide { dealers: &mut self.dealers, groups: &self.groups };
        let sequence = FillSequence::create(id, members.to_vec(), &mut host)?;
        for member in members {
            self.dealers[member.0].set_sequence(Some(id));
        }
        self.sequences.push(Some(sequence));
        Ok(id)
    }

    /// Detach a sequence; selections and group bookkeeping stay as they are.
    pub fn dispose_sequence(&mut self, id: SequenceId) -> Result<()> {
        let sequence = self
            .sequences
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(DealError::UnknownSequence(id))?;
        let mut host = SequenceSide { dealers: &mut self.dealers, groups: &self.groups };
        let members = sequence.release(&mut host)?;
        for member in members {
            self.dealers[member.0].set_sequence(None);
        }
        Ok(())
    }

    pub fn selection(&self, dealer: DealerId) -> Result<Option<&O>> {
        Ok(self.dealer(dealer)?.selection())
    }

    /// Select by visible row.
    pub fn select(&mut self, dealer: DealerId, position: usize) -> Result<()> {
        let abs = self.dealer(dealer)?.absolute_at(position)?;
        self.select_absolute(dealer, abs)
    }

    /// Select by option; `None` clears.
    pub fn set_selection(&mut self, dealer: DealerId, option: Option<&O>) -> Result<()> {
        let Some(option) = option else {
            return self.clear(dealer);
        };
        let current = self.dealer(dealer)?;
        let abs = current
            .pool_or_err()?
            .index_of(option)
            .ok_or_else(|| DealError::InvalidOption { option: format!("{:?}", option) })?;
        if !current.mask().contains(abs) {
            return Err(DealError::OptionUnavailable { option: format!("{:?}", option) });
        }
        self.select_absolute(dealer, abs)
    }

    fn select_absolute(&mut self, id: DealerId, abs: usize) -> Result<()> {
        let dealer = self.dealer(id)?;
        let previous = dealer.selection_index();
        if previous == Some(abs) {
            return Ok(());
        }
        if let Some(sequence) = dealer.sequence() {
            self.sequence(sequence)?.check_add(id)?;
        }

        self.dealers[id.0].place(Some(abs))?;
        let change = match previous {
            Some(old) => Change::Replaced { old, new: abs },
            None => Change::Made(abs),
        };
        self.dispatch(id, change)
    }

    /// Drop the dealer's selection; nothing happens when it has none.
    pub fn clear(&mut self, id: DealerId) -> Result<()> {
        let dealer = self.dealer(id)?;
        dealer.pool_or_err()?;
        let Some(abs) = dealer.selection_index() else {
            return Ok(());
        };
        if let Some(sequence) = dealer.sequence() {
            self.sequence(sequence)?.check_remove(id)?;
        }

        self.dealers[id.0].place(None)?;
        self.dispatch(id, Change::Cleared(abs))
    }

    /// Exchange the content of `member` and its right neighbour.
    pub fn swap_right(&mut self, sequence: SequenceId, member: DealerId) -> Result<()> {
        let seq = self
            .sequences
            .get_mut(sequence.0)
            .and_then(Option::as_mut)
            .ok_or(DealError::UnknownSequence(sequence))?;
        let mut host = SequenceSide { dealers: &mut self.dealers, groups: &self.groups };
        seq.swap_right(&mut host, member)?;
        self.strict_audit();
        Ok(())
    }

    pub fn next_fillable(&self, sequence: SequenceId) -> Result<Option<DealerId>> {
        Ok(self.sequence(sequence)?.next_fillable())
    }

    fn dispatch(&mut self, id: DealerId, change: Change) -> Result<()> {
        let dealer = &self.dealers[id.0];
        let group_id = dealer.group().ok_or(DealError::NotAttached { dealer: id })?;
        let sequence_id = dealer.sequence();

        // exclusion upkeep across the whole group
        let group = self.groups.get(group_id.0).ok_or(DealError::UnknownGroup(group_id))?;
        match change {
            Change::Made(abs) => group.selection_made_on(&mut self.dealers, id, abs)?,
            Change::Replaced { old, new } => {
                group.selection_cleared_on(&mut self.dealers, id, old)?;
                group.selection_made_on(&mut self.dealers, id, new)?;
            }
            Change::Cleared(abs) => group.selection_cleared_on(&mut self.dealers, id, abs)?,
        }

        // contiguity upkeep inside the bench
        if let Some(sequence_id) = sequence_id {
            let sequence = self
                .sequences
                .get_mut(sequence_id.0)
                .and_then(Option::as_mut)
                .ok_or(DealError::UnknownSequence(sequence_id))?;
            let mut host = SequenceSide { dealers: &mut self.dealers, groups: &self.groups };
            match change {
                Change::Made(_) | Change::Replaced { .. } => sequence.content_added(&mut host, id)?,
                Change::Cleared(_) => sequence.content_removed(&mut host, id)?,
            }
        }

        self.strict_audit();
        Ok(())
    }

    #[cfg(feature = "strict_contracts")]
    fn strict_audit(&self) {
        if let Err(err) = self.audit() {
            panic!("board contract violated: {}", err);
        }
    }

    #[cfg(not(feature = "strict_contracts"))]
    fn strict_audit(&self) {}

    /// Check exclusion, masks and contiguity across the whole board.
    pub fn audit(&self) -> Result<()> {
        for group in &self.groups {
            let mut owners: HashMap<usize, DealerId> = HashMap::new();
            for id in group.members() {
                if let Some(abs) = self.dealer(*id)?.selection_index() {
                    if let Some(other) = owners.insert(abs, *id) {
                        return Err(DealError::InvariantViolation(format!(
                            "index {} held by {} and {}",
                            abs, other, id
                        )));
                    }
                }
            }
            for id in group.members() {
                let expected: Vec<usize> = (0..group.pool().len())
                    .filter(|abs| owners.get(abs).map_or(true, |owner| owner == id))
                    .collect();
                if self.dealer(*id)?.mask().indices() != expected.as_slice() {
                    return Err(DealError::InvariantViolation(format!(
                        "{} shows {:?}, expected {:?}",
                        id,
                        self.dealer(*id)?.mask().indices(),
                        expected
                    )));
                }
            }
        }

        for sequence in self.sequences.iter().flatten() {
            let rf = sequence.rightmost_fillable();
            for (pos, id) in sequence.members().iter().enumerate() {
                let dealer = self.dealer(*id)?;
                let filled = pos < sequence.filled();
                if dealer.has_selection() != filled {
                    return Err(DealError::InvariantViolation(format!(
                        "{} position {} content={} with rf={:?}",
                        sequence.id(),
                        pos,
                        dealer.has_selection(),
                        rf
                    )));
                }
                if dealer.is_filling_enabled() != (rf == RightmostFillable::At(pos)) {
                    return Err(DealError::InvariantViolation(format!(
                        "{} position {} filling={} with rf={:?}",
                        sequence.id(),
                        pos,
                        dealer.is_filling_enabled(),
                        rf
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Dealer mutations requested by a fill sequence. Identity changes are
/// reported to the dealing group and never back to the sequence.
struct SequenceSide<'a, O> {
    dealers: &'a mut Vec<Dealer<O>>,
    groups: &'a [DealingGroup<O>],
}

impl<'a, O: Clone> SequenceSide<'a, O> {
    fn dealer(&self, id: DealerId) -> Result<&Dealer<O>> {
        self.dealers.get(id.0).ok_or(DealError::UnknownDealer(id))
    }

    fn group_of(&self, id: DealerId) -> Result<&'a DealingGroup<O>> {
        let groups: &'a [DealingGroup<O>] = self.groups;
        let group = self.dealer(id)?.group().ok_or(DealError::NotAttached { dealer: id })?;
        groups.get(group.0).ok_or(DealError::UnknownGroup(group))
    }

    fn content_of(&self, id: DealerId) -> Result<usize> {
        self.dealer(id)?.selection_index().ok_or_else(|| {
            DealError::IllegalSequenceState(format!("{} holds no content to move", id))
        })
    }
}

impl<O: Clone> SlotHost for SequenceSide<'_, O> {
    fn has_content(&self, dealer: DealerId) -> Result<bool> {
        Ok(self.dealer(dealer)?.has_selection())
    }

    fn set_filling(&mut self, dealer: DealerId, enabled: bool) -> Result<()> {
        self.dealer(dealer)?;
        self.dealers[dealer.0].set_filling_enabled(enabled);
        Ok(())
    }

    fn acquire_content(&mut self, to: DealerId, from: DealerId) -> Result<()> {
        let abs = self.content_of(from)?;
        if self.dealer(to)?.has_selection() {
            return Err(DealError::IllegalSequenceState(format!(
                "{} cannot take content from {} while holding its own",
                to, from
            )));
        }
        let group = self.group_of(from)?;
        self.dealers[from.0].place(None)?;
        group.hand_over(self.dealers.as_mut_slice(), from, to, abs)?;
        self.dealers[to.0].place(Some(abs))?;
        Ok(())
    }

    fn discard_content(&mut self, dealer: DealerId) -> Result<()> {
        let Some(abs) = self.dealer(dealer)?.selection_index() else {
            return Ok(());
        };
        let group = self.group_of(dealer)?;
        self.dealers[dealer.0].place(None)?;
        group.selection_cleared_on(self.dealers.as_mut_slice(), dealer, abs)
    }

    fn swap_content(&mut self, a: DealerId, b: DealerId) -> Result<()> {
        let x = self.content_of(a)?;
        let y = self.content_of(b)?;
        let group = self.group_of(a)?;
        if !group.contains(b) {
            return Err(DealError::IllegalSwapRequest(format!("{} and {} share no group", a, b)));
        }

        self.dealers[a.0].place(None)?;
        self.dealers[b.0].place(None)?;
        group.hand_over(self.dealers.as_mut_slice(), a, b, x)?;
        group.hand_over(self.dealers.as_mut_slice(), b, a, y)?;
        self.dealers[a.0].place(Some(y))?;
        self.dealers[b.0].place(Some(x))?;
        Ok(())
    }
}
