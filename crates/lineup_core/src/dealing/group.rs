//! DealingGroup - at most one claimant per option.
//!
//! Every member sees the pool minus whatever the other members hold.

use std::rc::Rc;

use super::dealer::Dealer;
use super::pool::OptionPool;
use super::{DealerId, GroupId};
use crate::error::{DealError, Result};

#[derive(Debug)]
pub struct DealingGroup<O> {
    id: GroupId,
    pool: Rc<OptionPool<O>>,
    members: Vec<DealerId>,
}

impl<O> DealingGroup<O> {
    pub(crate) fn new(id: GroupId, pool: Rc<OptionPool<O>>, members: Vec<DealerId>) -> Self {
        Self { id, pool, members }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn pool(&self) -> &Rc<OptionPool<O>> {
        &self.pool
    }

    pub fn members(&self) -> &[DealerId] {
        &self.members
    }

    pub fn contains(&self, dealer: DealerId) -> bool {
        self.members.contains(&dealer)
    }

    fn others(&self, origin: DealerId) -> impl Iterator<Item = DealerId> + '_ {
        self.members.iter().copied().filter(move |id| *id != origin)
    }
}

impl<O: Clone> DealingGroup<O> {
    /// Retire `abs` everywhere except on the dealer that picked it.
    pub(crate) fn selection_made_on(
        &self,
        dealers: &mut [Dealer<O>],
        origin: DealerId,
        abs: usize,
    ) -> Result<()> {
        log::debug!("{}: {} took {}", self.id, origin, abs);
        for id in self.others(origin) {
            member(dealers, id)?.retire_option(abs)?;
        }
        Ok(())
    }

    /// Give `abs` back to everyone except the dealer that released it.
    pub(crate) fn selection_cleared_on(
        &self,
        dealers: &mut [Dealer<O>],
        origin: DealerId,
        abs: usize,
    ) -> Result<()> {
        log::debug!("{}: {} released {}", self.id, origin, abs);
        for id in self.others(origin) {
            member(dealers, id)?.restore_option(abs)?;
        }
        Ok(())
    }

    /// Move the mask entry of a claimed option from one member to another.
    ///
    /// The claimed set is unchanged, so no third member is touched. `from`
    /// must already have let go of `abs`.
    pub(crate) fn hand_over(
        &self,
        dealers: &mut [Dealer<O>],
        from: DealerId,
        to: DealerId,
        abs: usize,
    ) -> Result<()> {
        if !self.contains(from) || !self.contains(to) {
            return Err(DealError::InvalidMembers(format!(
                "hand-over between {} and {} outside {}",
                from, to, self.id
            )));
        }
        log::trace!("{}: {} hands {} to {}", self.id, from, abs, to);
        member(dealers, from)?.retire_option(abs)?;
        member(dealers, to)?.restore_option(abs)?;
        Ok(())
    }
}

fn member<O>(dealers: &mut [Dealer<O>], id: DealerId) -> Result<&mut Dealer<O>> {
    dealers.get_mut(id.0).ok_or(DealError::UnknownDealer(id))
}
