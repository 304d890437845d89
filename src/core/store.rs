//! # Store
//!
//! Holds the current `AppState` and threads it through `reduce()` one
//! event at a time. `dispatch` applies the event completely before it
//! returns, so an action creator that dispatches and then reads state
//! always sees its own earlier events.

use log::debug;

use crate::core::event::Event;
use crate::core::reducer::reduce;
use crate::core::state::{AppState, Defaults};

/// What an action creator needs: read the current state, emit events.
pub trait Dispatch {
    fn state(&self) -> &AppState;
    fn dispatch(&mut self, event: Event);
}

/// Events are kept in `history` for replay reports. Each one can carry
/// full per-node vectors, so long-lived stores should use `unrecorded`.
pub struct Store {
    state: AppState,
    history: Vec<Event>,
    record: bool,
}

impl Store {
    pub fn new(defaults: &Defaults) -> Self {
        Self {
            state: AppState::new(defaults),
            history: Vec::new(),
            record: true,
        }
    }

    /// A store that applies events without keeping them.
    pub fn unrecorded(defaults: &Defaults) -> Self {
        Self {
            record: false,
            ..Self::new(defaults)
        }
    }

    /// Every event dispatched so far, oldest first. Empty for `unrecorded` stores.
    pub fn history(&self) -> &[Event] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Consume the store, returning the final state and the event history.
    pub fn into_parts(self) -> (AppState, Vec<Event>) {
        (self.state, self.history)
    }
}

impl Dispatch for Store {
    fn state(&self) -> &AppState {
        &self.state
    }

    fn dispatch(&mut self, event: Event) {
        debug!("dispatch {}", event.kind());
        self.state = reduce(&self.state, &event);
        if self.record {
            self.history.push(event);
        }
    }
}
