//! FillSequence - left-aligned slot ordering.
//!
//! Holds the RF ("rightmost fillable") cursor. Positions left of RF hold
//! content, RF itself is empty and the only slot with filling enabled,
//! positions right of RF are empty and disabled. When every position is
//! filled the cursor is `Overflow` and no slot accepts new content.
//!
//! The sequence never touches dealers directly; it works through a
//! `SlotHost` so the cursor arithmetic stays independent of masks and pools.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::SequenceListener;
use super::{DealerId, SequenceId};
use crate::error::{DealError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RightmostFillable {
    At(usize),
    Overflow,
}

/// What a sequence needs from the slots it orders.
///
/// `acquire_content` moves content: `from` is empty afterwards.
pub(crate) trait SlotHost {
    fn has_content(&self, dealer: DealerId) -> Result<bool>;
    fn set_filling(&mut self, dealer: DealerId, enabled: bool) -> Result<()>;
    fn acquire_content(&mut self, to: DealerId, from: DealerId) -> Result<()>;
    fn discard_content(&mut self, dealer: DealerId) -> Result<()>;
    fn swap_content(&mut self, a: DealerId, b: DealerId) -> Result<()>;
}

pub struct FillSequence {
    id: SequenceId,
    members: Vec<DealerId>,
    rf: RightmostFillable,
    listeners: Vec<Box<dyn SequenceListener>>,
}

impl FillSequence {
    /// Order `members` as given and derive RF from what they already hold.
    ///
    /// Fresh members give RF = 0. Pre-filled members are adopted only when
    /// their content is a left-aligned prefix.
    pub(crate) fn create<H: SlotHost>(
        id: SequenceId,
        members: Vec<DealerId>,
        host: &mut H,
    ) -> Result<Self> {
        if members.is_empty() {
            return Err(DealError::InvalidMembers(format!("{} has no members", id)));
        }
        for (i, member) in members.iter().enumerate() {
            if members[..i].contains(member) {
                return Err(DealError::InvalidMembers(format!(
                    "{} listed twice in {}",
                    member, id
                )));
            }
        }

        let mut filled = 0;
        for (pos, member) in members.iter().enumerate() {
            if host.has_content(*member)? {
                if pos != filled {
                    return Err(DealError::IllegalSequenceState(format!(
                        "{}: {} holds content after an empty slot",
                        id, member
                    )));
                }
                filled += 1;
            }
        }
        let rf = if filled == members.len() {
            RightmostFillable::Overflow
        } else {
            RightmostFillable::At(filled)
        };

        for (pos, member) in members.iter().enumerate() {
            host.set_filling(*member, rf == RightmostFillable::At(pos))?;
        }
        log::debug!("{}: created over {} members, rf={:?}", id, members.len(), rf);
        Ok(Self { id, members, rf, listeners: Vec::new() })
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn members(&self) -> &[DealerId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn rightmost_fillable(&self) -> RightmostFillable {
        self.rf
    }

    pub fn is_full(&self) -> bool {
        self.rf == RightmostFillable::Overflow
    }

    pub fn position_of(&self, dealer: DealerId) -> Option<usize> {
        self.members.iter().position(|m| *m == dealer)
    }

    /// The only member currently allowed to receive new content.
    pub fn next_fillable(&self) -> Option<DealerId> {
        match self.rf {
            RightmostFillable::At(pos) => self.members.get(pos).copied(),
            RightmostFillable::Overflow => None,
        }
    }

    /// Number of members holding content.
    pub fn filled(&self) -> usize {
        match self.rf {
            RightmostFillable::At(pos) => pos,
            RightmostFillable::Overflow => self.members.len(),
        }
    }

    /// A position may take a selection: it is RF, or already filled.
    pub fn is_fillable(&self, pos: usize) -> bool {
        match self.rf {
            RightmostFillable::At(rf) => pos <= rf,
            RightmostFillable::Overflow => pos < self.members.len(),
        }
    }

    pub(crate) fn attach_listener(&mut self, listener: Box<dyn SequenceListener>) {
        self.listeners.push(listener);
    }

    fn require_position(&self, dealer: DealerId) -> Result<usize> {
        self.position_of(dealer).ok_or_else(|| {
            DealError::IllegalSequenceState(format!("{} is not a member of {}", dealer, self.id))
        })
    }

    /// Position of `dealer` if it may receive a selection now.
    pub(crate) fn check_add(&self, dealer: DealerId) -> Result<usize> {
        let pos = self.require_position(dealer)?;
        if !self.is_fillable(pos) {
            log::warn!("{}: {} at {} is past rf={:?}", self.id, dealer, pos, self.rf);
            return Err(DealError::IllegalSequenceState(format!(
                "{} at position {} is not fillable (rf={:?})",
                dealer, pos, self.rf
            )));
        }
        Ok(pos)
    }

    /// Position of `dealer` if it may lose its content now.
    pub(crate) fn check_remove(&self, dealer: DealerId) -> Result<usize> {
        let pos = self.require_position(dealer)?;
        if !self.is_fillable(pos) || self.rf == RightmostFillable::At(pos) {
            log::warn!("{}: removal reported for empty {} at {}", self.id, dealer, pos);
            return Err(DealError::IllegalSequenceState(format!(
                "{} at position {} holds no content (rf={:?})",
                dealer, pos, self.rf
            )));
        }
        Ok(pos)
    }

    /// A member's selection was set. Advances RF when the member was RF.
    pub(crate) fn content_added<H: SlotHost>(
        &mut self,
        host: &mut H,
        dealer: DealerId,
    ) -> Result<()> {
        let pos = self.check_add(dealer)?;
        if self.rf != RightmostFillable::At(pos) {
            // update of an already filled slot
            return Ok(());
        }

        let next = if pos + 1 == self.members.len() {
            RightmostFillable::Overflow
        } else {
            RightmostFillable::At(pos + 1)
        };
        host.set_filling(dealer, false)?;
        if let RightmostFillable::At(n) = next {
            host.set_filling(self.members[n], true)?;
        }
        self.rf = next;
        log::debug!("{}: {} filled, rf={:?}", self.id, dealer, self.rf);

        for listener in self.listeners.iter_mut() {
            listener.became_filled(self.id, dealer);
        }
        Ok(())
    }

    /// A member's selection was cleared. Shifts everything right of it one
    /// slot left and retreats RF by one.
    pub(crate) fn content_removed<H: SlotHost>(
        &mut self,
        host: &mut H,
        dealer: DealerId,
    ) -> Result<()> {
        let pos = self.check_remove(dealer)?;
        let next_rf = match self.rf {
            RightmostFillable::Overflow => self.members.len() - 1,
            RightmostFillable::At(rf) => rf - 1,
        };

        for p in pos..next_rf {
            host.acquire_content(self.members[p], self.members[p + 1])?;
        }
        let emptied = self.members[next_rf];
        // removal of the last filled slot leaves nothing to shift or report
        let shifted = pos != next_rf;
        if shifted {
            host.discard_content(emptied)?;
        }

        if let RightmostFillable::At(old) = self.rf {
            host.set_filling(self.members[old], false)?;
        }
        host.set_filling(emptied, true)?;
        self.rf = RightmostFillable::At(next_rf);
        log::debug!("{}: compacted from {}, rf={:?}", self.id, pos, self.rf);

        if shifted {
            for listener in self.listeners.iter_mut() {
                listener.became_empty(self.id, emptied);
            }
        }
        Ok(())
    }

    /// Exchange the content of `dealer` and its right neighbour.
    ///
    /// Fill bookkeeping is untouched: no RF change, no events.
    pub(crate) fn swap_right<H: SlotHost>(&mut self, host: &mut H, dealer: DealerId) -> Result<()> {
        let pos = self.position_of(dealer).ok_or_else(|| {
            DealError::IllegalSwapRequest(format!("{} is not a member of {}", dealer, self.id))
        })?;
        if pos + 1 >= self.members.len() {
            return Err(DealError::IllegalSwapRequest(format!(
                "{} is the last position of {}",
                dealer, self.id
            )));
        }
        if self.filled() <= pos + 1 {
            return Err(DealError::IllegalSwapRequest(format!(
                "positions {} and {} of {} are not both filled",
                pos,
                pos + 1,
                self.id
            )));
        }
        let neighbour = self.members[pos + 1];
        host.swap_content(dealer, neighbour)?;
        log::debug!("{}: swapped {} and {}", self.id, dealer, neighbour);
        Ok(())
    }

    /// Hand every member back with filling enabled.
    pub(crate) fn release<H: SlotHost>(self, host: &mut H) -> Result<Vec<DealerId>> {
        for member in &self.members {
            host.set_filling(*member, true)?;
        }
        log::debug!("{}: disposed", self.id);
        Ok(self.members)
    }
}

impl fmt::Debug for FillSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillSequence")
            .field("id", &self.id)
            .field("members", &self.members)
            .field("rf", &self.rf)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dealing::events::{EventLog, LineupEvent};

    /// Plain slots addressed by `DealerId(i)`.
    struct Slots {
        content: Vec<Option<char>>,
        filling: Vec<bool>,
    }

    impl Slots {
        fn new(content: Vec<Option<char>>) -> Self {
            let filling = vec![true; content.len()];
            Self { content, filling }
        }
    }

    impl SlotHost for Slots {
        fn has_content(&self, dealer: DealerId) -> Result<bool> {
            Ok(self.content[dealer.0].is_some())
        }

        fn set_filling(&mut self, dealer: DealerId, enabled: bool) -> Result<()> {
            self.filling[dealer.0] = enabled;
            Ok(())
        }

        fn acquire_content(&mut self, to: DealerId, from: DealerId) -> Result<()> {
            self.content[to.0] = self.content[from.0].take();
            Ok(())
        }

        fn discard_content(&mut self, dealer: DealerId) -> Result<()> {
            self.content[dealer.0] = None;
            Ok(())
        }

        fn swap_content(&mut self, a: DealerId, b: DealerId) -> Result<()> {
            self.content.swap(a.0, b.0);
            Ok(())
        }
    }

    fn ids(n: usize) -> Vec<DealerId> {
        (0..n).map(DealerId).collect()
    }

    fn fill(seq: &mut FillSequence, slots: &mut Slots, values: &[char]) {
        for v in values {
            let target = seq.next_fillable().unwrap();
            slots.content[target.0] = Some(*v);
            seq.content_added(slots, target).unwrap();
        }
    }

    #[test]
    fn test_create_enables_first_only() {
        let mut slots = Slots::new(vec![None; 3]);
        let seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(0));
        assert_eq!(slots.filling, vec![true, false, false]);
        assert_eq!(seq.next_fillable(), Some(DealerId(0)));
    }

    #[test]
    fn test_create_adopts_left_aligned_content() {
        let mut slots = Slots::new(vec![Some('A'), Some('B'), None]);
        let seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(2));
        assert_eq!(slots.filling, vec![false, false, true]);

        let mut full = Slots::new(vec![Some('A'), Some('B')]);
        let seq = FillSequence::create(SequenceId(1), ids(2), &mut full).unwrap();
        assert!(seq.is_full());
        assert_eq!(full.filling, vec![false, false]);
    }

    #[test]
    fn test_create_rejects_gaps_and_duplicates() {
        let mut gap = Slots::new(vec![Some('A'), None, Some('C')]);
        assert!(matches!(
            FillSequence::create(SequenceId(0), ids(3), &mut gap),
            Err(DealError::IllegalSequenceState(_))
        ));

        let mut slots = Slots::new(vec![None; 2]);
        assert!(matches!(
            FillSequence::create(SequenceId(0), vec![DealerId(0), DealerId(0)], &mut slots),
            Err(DealError::InvalidMembers(_))
        ));
        assert!(FillSequence::create(SequenceId(0), Vec::new(), &mut slots).is_err());
    }

    #[test]
    fn test_filling_advances_to_overflow() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        let log: EventLog<char> = EventLog::new();
        seq.attach_listener(Box::new(log.clone()));

        fill(&mut seq, &mut slots, &['A', 'B']);
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(2));
        assert_eq!(slots.filling, vec![false, false, true]);

        fill(&mut seq, &mut slots, &['C']);
        assert!(seq.is_full());
        assert_eq!(seq.next_fillable(), None);
        assert_eq!(slots.filling, vec![false, false, false]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_update_of_filled_slot_is_silent() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B']);
        let log: EventLog<char> = EventLog::new();
        seq.attach_listener(Box::new(log.clone()));

        slots.content[0] = Some('Z');
        seq.content_added(&mut slots, DealerId(0)).unwrap();
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(2));
        assert!(log.is_empty());
    }

    #[test]
    fn test_adding_past_rf_is_illegal() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        assert!(matches!(
            seq.content_added(&mut slots, DealerId(2)),
            Err(DealError::IllegalSequenceState(_))
        ));
        assert!(seq.content_added(&mut slots, DealerId(9)).is_err());
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(0));
    }

    #[test]
    fn test_compaction_from_front_of_full_sequence() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B', 'C']);
        let log: EventLog<char> = EventLog::new();
        seq.attach_listener(Box::new(log.clone()));

        slots.content[0] = None;
        seq.content_removed(&mut slots, DealerId(0)).unwrap();

        assert_eq!(slots.content, vec![Some('B'), Some('C'), None]);
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(2));
        assert_eq!(slots.filling, vec![false, false, true]);
        assert_eq!(
            log.take(),
            vec![LineupEvent::BecameEmpty { sequence: SequenceId(0), dealer: DealerId(2) }]
        );
    }

    #[test]
    fn test_removal_of_last_filled_needs_no_shift() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B']);
        let log: EventLog<char> = EventLog::new();
        seq.attach_listener(Box::new(log.clone()));

        slots.content[1] = None;
        seq.content_removed(&mut slots, DealerId(1)).unwrap();

        assert_eq!(slots.content, vec![Some('A'), None, None]);
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(1));
        assert_eq!(slots.filling, vec![false, true, false]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_compaction_from_middle() {
        let mut slots = Slots::new(vec![None; 4]);
        let mut seq = FillSequence::create(SequenceId(0), ids(4), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B', 'C']);

        slots.content[1] = None;
        seq.content_removed(&mut slots, DealerId(1)).unwrap();

        assert_eq!(slots.content, vec![Some('A'), Some('C'), None, None]);
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(2));
        assert_eq!(slots.filling, vec![false, false, true, false]);
    }

    #[test]
    fn test_removal_at_rf_is_illegal() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A']);
        assert!(matches!(
            seq.content_removed(&mut slots, DealerId(1)),
            Err(DealError::IllegalSequenceState(_))
        ));
        assert!(seq.content_removed(&mut slots, DealerId(2)).is_err());
        assert_eq!(seq.rightmost_fillable(), RightmostFillable::At(1));
    }

    #[test]
    fn test_swap_right_keeps_rf_and_is_silent() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B', 'C']);
        let log: EventLog<char> = EventLog::new();
        seq.attach_listener(Box::new(log.clone()));

        seq.swap_right(&mut slots, DealerId(0)).unwrap();
        assert_eq!(slots.content, vec![Some('B'), Some('A'), Some('C')]);
        assert!(seq.is_full());
        assert!(log.is_empty());
    }

    #[test]
    fn test_illegal_swaps() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A', 'B']);

        // neighbour empty
        assert!(matches!(
            seq.swap_right(&mut slots, DealerId(1)),
            Err(DealError::IllegalSwapRequest(_))
        ));
        // last position
        assert!(matches!(
            seq.swap_right(&mut slots, DealerId(2)),
            Err(DealError::IllegalSwapRequest(_))
        ));
        // not a member
        assert!(seq.swap_right(&mut slots, DealerId(7)).is_err());
        assert_eq!(slots.content, vec![Some('A'), Some('B'), None]);
    }

    #[test]
    fn test_release_enables_everyone() {
        let mut slots = Slots::new(vec![None; 3]);
        let mut seq = FillSequence::create(SequenceId(0), ids(3), &mut slots).unwrap();
        fill(&mut seq, &mut slots, &['A']);
        let members = seq.release(&mut slots).unwrap();
        assert_eq!(members, ids(3));
        assert_eq!(slots.filling, vec![true, true, true]);
    }
}
