//! Dealer - one selection slot over a masked view of the pool.
//!
//! The mutators here are raw: they keep the dealer's own view in sync and
//! tell its listeners when the selected option changes, but never reach a
//! driver. Routing to the dealing group and the fill sequence is the
//! board's job.

use std::fmt;
use std::rc::Rc;

use super::events::{DealerListener, DealerView};
use super::mask::Mask;
use super::pool::OptionPool;
use super::{DealerId, GroupId, SequenceId};
use crate::error::{DealError, Result};

pub struct Dealer<O> {
    id: DealerId,
    pool: Option<Rc<OptionPool<O>>>,
    mask: Mask,
    /// Absolute index; always inside `mask` when set.
    selection: Option<usize>,
    filling_enabled: bool,
    group: Option<GroupId>,
    sequence: Option<SequenceId>,
    view: Option<Box<dyn DealerView<O>>>,
    listeners: Vec<Box<dyn DealerListener<O>>>,
}

impl<O> Dealer<O> {
    pub(crate) fn new(id: DealerId) -> Self {
        Self {
            id,
            pool: None,
            mask: Mask::default(),
            selection: None,
            filling_enabled: true,
            group: None,
            sequence: None,
            view: None,
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> DealerId {
        self.id
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn sequence(&self) -> Option<SequenceId> {
        self.sequence
    }

    pub fn is_attached(&self) -> bool {
        self.pool.is_some()
    }

    pub fn is_filling_enabled(&self) -> bool {
        self.filling_enabled
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selection_index(&self) -> Option<usize> {
        self.selection
    }

    pub fn selection(&self) -> Option<&O> {
        let pool = self.pool.as_ref()?;
        self.selection.and_then(|abs| pool.get(abs))
    }

    /// Relative position of the current selection in the visible list.
    pub fn selected_position(&self) -> Option<usize> {
        self.selection.and_then(|abs| self.mask.relative_of(abs))
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn pool(&self) -> Option<&Rc<OptionPool<O>>> {
        self.pool.as_ref()
    }

    /// Options in the order the dealer currently shows them.
    pub fn visible_options(&self) -> Vec<&O> {
        match self.pool.as_ref() {
            Some(pool) => self.mask.indices().iter().filter_map(|abs| pool.get(*abs)).collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }

    pub(crate) fn set_sequence(&mut self, sequence: Option<SequenceId>) {
        self.sequence = sequence;
    }

    pub(crate) fn set_filling_enabled(&mut self, enabled: bool) {
        self.filling_enabled = enabled;
    }

    pub(crate) fn attach_listener(&mut self, listener: Box<dyn DealerListener<O>>) {
        self.listeners.push(listener);
    }

    pub(crate) fn pool_or_err(&self) -> Result<&Rc<OptionPool<O>>> {
        self.pool.as_ref().ok_or(DealError::NotAttached { dealer: self.id })
    }

    /// Map a visible row to its absolute pool index.
    pub fn absolute_at(&self, position: usize) -> Result<usize> {
        self.pool_or_err()?;
        self.mask.absolute_at(position).ok_or(DealError::PositionOutOfRange {
            dealer: self.id,
            position,
            visible: self.mask.len(),
        })
    }

    /// Remove `abs` from the visible list.
    pub(crate) fn retire_option(&mut self, abs: usize) -> Result<()> {
        if self.selection == Some(abs) {
            return Err(DealError::InvariantViolation(format!(
                "{} cannot retire its own selection {}",
                self.id, abs
            )));
        }
        let rel = self.mask.retire(abs)?;
        log::trace!("{}: retired {} at row {}", self.id, abs, rel);
        if let Some(view) = self.view.as_mut() {
            view.remove_option_at(rel);
        }
        Ok(())
    }

    /// Put `abs` back at its sorted row.
    pub(crate) fn restore_option(&mut self, abs: usize) -> Result<()> {
        let pool = self.pool_or_err()?;
        if pool.get(abs).is_none() {
            return Err(DealError::InvariantViolation(format!(
                "{} asked to restore index {} outside its pool",
                self.id, abs
            )));
        }
        let rel = self.mask.restore(abs)?;
        log::trace!("{}: restored {} at row {}", self.id, abs, rel);
        if let (Some(view), Some(pool)) = (self.view.as_mut(), self.pool.as_ref()) {
            if let Some(option) = pool.get(abs) {
                view.insert_option_at(option, rel);
            }
        }
        Ok(())
    }

    fn notify(&mut self, abs: usize, made: bool) {
        let Some(pool) = self.pool.as_ref() else {
            return;
        };
        let Some(option) = pool.get(abs) else {
            return;
        };
        for listener in self.listeners.iter_mut() {
            if made {
                listener.selection_made(self.id, option);
            } else {
                listener.selection_cleared(self.id, option);
            }
        }
    }

    fn sync_view_selection(&mut self) {
        let row = self.selected_position();
        if let Some(view) = self.view.as_mut() {
            view.select_option_at(row);
        }
    }
}

impl<O: Clone> Dealer<O> {
    /// Show the whole pool, drop any selection.
    pub(crate) fn attach_options(&mut self, pool: Rc<OptionPool<O>>) {
        self.mask = Mask::full(pool.len());
        self.selection = None;
        if let Some(view) = self.view.as_mut() {
            view.init_options(pool.options());
        }
        self.pool = Some(pool);
    }

    /// Swap the dealer's view, replaying its current state into the new one.
    pub(crate) fn attach_view(&mut self, mut view: Box<dyn DealerView<O>>) {
        if let Some(pool) = self.pool.as_ref() {
            let visible: Vec<O> =
                self.mask.indices().iter().filter_map(|abs| pool.get(*abs).cloned()).collect();
            view.init_options(&visible);
            view.select_option_at(self.selected_position());
        }
        self.view = Some(view);
    }

    /// Set or clear the selection, clear-before-set for listeners.
    ///
    /// The new index must already be visible to this dealer.
    pub(crate) fn place(&mut self, selection: Option<usize>) -> Result<Option<usize>> {
        if let Some(abs) = selection {
            if !self.mask.contains(abs) {
                return Err(DealError::InvariantViolation(format!(
                    "{} cannot hold index {} outside its mask",
                    self.id, abs
                )));
            }
        }
        let previous = self.selection;
        if previous == selection {
            return Ok(previous);
        }
        self.selection = selection;
        self.sync_view_selection();
        if let Some(old) = previous {
            self.notify(old, false);
        }
        if let Some(new) = selection {
            self.notify(new, true);
        }
        Ok(previous)
    }
}

impl<O: fmt::Debug> fmt::Debug for Dealer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dealer")
            .field("id", &self.id)
            .field("mask", &self.mask.indices())
            .field("selection", &self.selection)
            .field("filling_enabled", &self.filling_enabled)
            .field("group", &self.group)
            .field("sequence", &self.sequence)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
