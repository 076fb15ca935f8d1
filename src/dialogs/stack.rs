//! Dialog stack store
//!
//! Ordered collection of entries, oldest first. The last entry is the
//! topmost one and the only one that accepts input.

use super::handle::Settler;
use super::types::{DialogId, DialogView, EntryOptions, EntryPhase, SettlementState};

/// One pending or transitioning dialog
pub(crate) struct DialogEntry<C> {
    pub id: DialogId,
    pub options: EntryOptions<C>,
    pub phase: EntryPhase,
    pub error: Option<String>,
    pub settlement: SettlementState,
    pub settler: Settler,
}

impl<C> DialogEntry<C> {
    pub fn new(id: DialogId, options: EntryOptions<C>, settler: Settler) -> Self {
        Self {
            id,
            options,
            phase: EntryPhase::Entering,
            error: None,
            settlement: SettlementState::Pending,
            settler,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settlement.is_settled()
    }
}

pub(crate) struct DialogStack<C> {
    entries: Vec<DialogEntry<C>>,
}

impl<C> DialogStack<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: DialogEntry<C>) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&DialogEntry<C>> {
        self.entries.last()
    }

    pub fn get(&self, id: DialogId) -> Option<&DialogEntry<C>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn get_mut(&mut self, id: DialogId) -> Option<&mut DialogEntry<C>> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove(&mut self, id: DialogId) -> Option<DialogEntry<C>> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Entry targeted by a settle operation: the given id, or the topmost
    /// unsettled entry when no id is passed.
    pub fn settle_target(&mut self, target: Option<DialogId>) -> Option<&mut DialogEntry<C>> {
        match target {
            Some(id) => self.get_mut(id),
            None => self.entries.iter_mut().rev().find(|entry| !entry.is_settled()),
        }
    }

    /// Entry targeted by a submission: the given id, or the last entry
    pub fn submit_target(&mut self, target: Option<DialogId>) -> Option<&mut DialogEntry<C>> {
        match target {
            Some(id) => self.get_mut(id),
            None => self.entries.last_mut(),
        }
    }

    pub fn ids(&self) -> Vec<DialogId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }
}

impl<C: Clone> DialogStack<C> {
    /// Views in stack order
    pub fn views(&self) -> Vec<DialogView<C>> {
        let top = self.entries.len().checked_sub(1);
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| view_of(entry, Some(index) == top))
            .collect()
    }

    pub fn view(&self, id: DialogId) -> Option<DialogView<C>> {
        let top_id = self.top().map(|entry| entry.id);
        self.get(id).map(|entry| view_of(entry, Some(id) == top_id))
    }
}

fn view_of<C: Clone>(entry: &DialogEntry<C>, interactive: bool) -> DialogView<C> {
    DialogView {
        id: entry.id,
        title: entry.options.title.clone(),
        content: entry.options.content.clone(),
        submit_label: entry.options.submit_label.clone(),
        width: entry.options.width,
        icon: entry.options.icon.clone(),
        phase: entry.phase,
        error: entry.error.clone(),
        settlement: entry.settlement,
        interactive,
    }
}
