//! # Core View-State Logic
//!
//! Everything that decides what the tree view shows. It knows nothing
//! about rendering; a renderer watches the version counters and redraws
//! what went stale.
//!
//! ```text
//!   user intent                 ┌─────────────────────────┐
//!  (slider, legend,  ──Action──▶│   action creators       │
//!   filter, zoom)               │   read state, emit      │
//!                               └───────────┬─────────────┘
//!                                           │ Event, Event, ...
//!                                           ▼
//!                               ┌─────────────────────────┐
//!                               │   Store::dispatch       │
//!                               │   reduce(state, event)  │
//!                               └───────────┬─────────────┘
//!            ┌──────────────┬───────────────┼───────────────┐
//!            ▼              ▼               ▼               ▼
//!       ┌─────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐
//!       │  tree   │   │ controls │   │  metadata  │   │ sequences │
//!       └─────────┘   └──────────┘   └────────────┘   └───────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `AppState` and its slices
//! - [`event`]: the `Event` enum, everything reducers react to
//! - [`action`]: the `Action` enum and the creators that turn intents into events
//! - [`reducer`]: tree and controls reducers plus the root `reduce()`
//! - [`metadata`]: the metadata reducer
//! - [`store`]: the `Dispatch` trait and `Store`
//! - [`dataset`]: loading a dataset into the store
//! - [`script`]: replaying recorded actions
//! - [`config`]: startup defaults

pub mod action;
pub mod config;
pub mod dataset;
pub mod event;
pub mod metadata;
pub mod reducer;
pub mod script;
pub mod state;
pub mod store;
