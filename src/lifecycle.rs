//! Foreground/background hooks that move the list to and from the store.
//!
//! The host owns both the [`Store`] and the [`ListModel`]. Becoming active
//! replaces the model with whatever is on disk; leaving the active phase
//! rewrites the disk with whatever is in the model. Nothing touches the store
//! in between.

use crate::model::ListModel;
use crate::storage::{Store, StoreError};

/// Application phase as reported by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// In the foreground and receiving input.
    Active,
    /// Visible but not receiving input, or about to leave the foreground.
    Inactive,
    /// Not visible.
    Background,
}

/// Outcome of a background transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store now holds this many rows.
    Written(usize),
    /// The last load failed, so the store was left alone.
    Skipped,
}

/// What a phase change did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing crossed the active boundary.
    Unchanged,
    /// The list was replaced by this many persisted items.
    Loaded(usize),
    /// The list was flushed.
    Saved(SaveOutcome),
}

/// Lifecycle host binding one store to one in-memory list.
#[derive(Debug)]
pub struct ListHost {
    store: Store,
    model: ListModel,
    phase: Phase,
    load_failed: bool,
}

impl ListHost {
    /// Create a host with an empty list. Nothing is loaded until the first
    /// activation.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            model: ListModel::new(),
            phase: Phase::Inactive,
            load_failed: false,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn model(&self) -> &ListModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ListModel {
        &mut self.model
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replace the list with the persisted items.
    ///
    /// On failure the list is left empty and the next background save is
    /// skipped, so an unreadable store is never overwritten with nothing.
    pub fn on_foreground(&mut self) -> Result<usize, StoreError> {
        self.model.clear();
        match self.store.load() {
            Ok(items) => {
                let count = items.len();
                self.model.replace_all(items);
                self.load_failed = false;
                tracing::info!(count, "List loaded");
                Ok(count)
            }
            Err(e) => {
                self.load_failed = true;
                tracing::error!(error = %e, "Failed to load list");
                Err(e)
            }
        }
    }

    /// Rewrite the store with the current list.
    pub fn on_background(&mut self) -> Result<SaveOutcome, StoreError> {
        if self.load_failed {
            tracing::warn!(
                pending = self.model.len(),
                "Skipping save because the last load failed"
            );
            return Ok(SaveOutcome::Skipped);
        }

        match self.store.save(self.model.items()) {
            Ok(written) => {
                tracing::info!(written, "List saved");
                Ok(SaveOutcome::Written(written))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save list");
                Err(e)
            }
        }
    }

    /// Apply a phase change reported by the host runtime.
    ///
    /// Entering [`Phase::Active`] loads; leaving it saves. Any other change,
    /// including a repeat of the current phase, does nothing.
    pub fn phase_changed(&mut self, phase: Phase) -> Result<Transition, StoreError> {
        let previous = std::mem::replace(&mut self.phase, phase);
        tracing::debug!(?previous, current = ?phase, "Phase changed");

        match (previous, phase) {
            (Phase::Active, Phase::Active) => Ok(Transition::Unchanged),
            (_, Phase::Active) => self.on_foreground().map(Transition::Loaded),
            (Phase::Active, _) => self.on_background().map(Transition::Saved),
            _ => Ok(Transition::Unchanged),
        }
    }
}
