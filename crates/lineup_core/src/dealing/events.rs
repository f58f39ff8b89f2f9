//! Listener and view channels.
//!
//! Listeners observe; they are handed ids and options, never the board, so a
//! callback cannot feed a mutation back into the engine. Views are command
//! sinks driven by the engine only.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::{DealerId, SequenceId};

/// Per-dealer selection events.
pub trait DealerListener<O> {
    fn selection_made(&mut self, dealer: DealerId, option: &O);
    fn selection_cleared(&mut self, dealer: DealerId, option: &O);
}

/// Per-sequence fill events.
pub trait SequenceListener {
    fn became_filled(&mut self, sequence: SequenceId, dealer: DealerId);
    fn became_empty(&mut self, sequence: SequenceId, dealer: DealerId);
}

/// Command channel into whatever renders one dealer.
///
/// Positions are relative (rows of the currently visible list).
pub trait DealerView<O> {
    fn init_options(&mut self, options: &[O]);
    fn insert_option_at(&mut self, option: &O, position: usize);
    fn remove_option_at(&mut self, position: usize);
    fn select_option_at(&mut self, position: Option<usize>);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LineupEvent<O> {
    SelectionMade { dealer: DealerId, option: O },
    SelectionCleared { dealer: DealerId, option: O },
    BecameFilled { sequence: SequenceId, dealer: DealerId },
    BecameEmpty { sequence: SequenceId, dealer: DealerId },
}

/// Shared journal of every event it is attached to, in emission order.
pub struct EventLog<O> {
    events: Rc<RefCell<Vec<LineupEvent<O>>>>,
}

impl<O> EventLog<O> {
    pub fn new() -> Self {
        Self { events: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<LineupEvent<O>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn events(&self) -> Ref<'_, Vec<LineupEvent<O>>> {
        self.events.borrow()
    }

    fn push(&self, event: LineupEvent<O>) {
        self.events.borrow_mut().push(event);
    }
}

impl<O> Clone for EventLog<O> {
    fn clone(&self) -> Self {
        Self { events: Rc::clone(&self.events) }
    }
}

impl<O> Default for EventLog<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Clone> DealerListener<O> for EventLog<O> {
    fn selection_made(&mut self, dealer: DealerId, option: &O) {
        self.push(LineupEvent::SelectionMade { dealer, option: option.clone() });
    }

    fn selection_cleared(&mut self, dealer: DealerId, option: &O) {
        self.push(LineupEvent::SelectionCleared { dealer, option: option.clone() });
    }
}

impl<O> SequenceListener for EventLog<O> {
    fn became_filled(&mut self, sequence: SequenceId, dealer: DealerId) {
        self.push(LineupEvent::BecameFilled { sequence, dealer });
    }

    fn became_empty(&mut self, sequence: SequenceId, dealer: DealerId) {
        self.push(LineupEvent::BecameEmpty { sequence, dealer });
    }
}

/// What a list widget would currently display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState<O> {
    pub options: Vec<O>,
    pub selected: Option<usize>,
}

impl<O> ListViewState<O> {
    pub fn selected_option(&self) -> Option<&O> {
        self.selected.and_then(|row| self.options.get(row))
    }
}

/// In-memory list widget. Clones share the same state, so one clone can be
/// handed to a dealer while another is kept for reading.
pub struct ListView<O> {
    state: Rc<RefCell<ListViewState<O>>>,
}

impl<O> ListView<O> {
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(ListViewState { options: Vec::new(), selected: None })) }
    }

    pub fn state(&self) -> Ref<'_, ListViewState<O>> {
        self.state.borrow()
    }
}

impl<O> Clone for ListView<O> {
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl<O> Default for ListView<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Clone> DealerView<O> for ListView<O> {
    fn init_options(&mut self, options: &[O]) {
        let mut state = self.state.borrow_mut();
        state.options = options.to_vec();
        state.selected = None;
    }

    fn insert_option_at(&mut self, option: &O, position: usize) {
        let mut state = self.state.borrow_mut();
        let position = position.min(state.options.len());
        state.options.insert(position, option.clone());
        if let Some(row) = state.selected {
            if row >= position {
                state.selected = Some(row + 1);
            }
        }
    }

    fn remove_option_at(&mut self, position: usize) {
        let mut state = self.state.borrow_mut();
        if position >= state.options.len() {
            return;
        }
        state.options.remove(position);
        state.selected = match state.selected {
            Some(row) if row == position => None,
            Some(row) if row > position => Some(row - 1),
            other => other,
        };
    }

    fn select_option_at(&mut self, position: Option<usize>) {
        let mut state = self.state.borrow_mut();
        state.selected = position.filter(|row| *row < state.options.len());
    }
}
