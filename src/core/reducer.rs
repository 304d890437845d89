//! # Reducers
//!
//! `reduce(state, event)` routes one event to every slice reducer and
//! assembles the next `AppState`. Slice reducers are pure and return the
//! incoming `Arc` untouched for events they ignore.
//!
//! ```text
//! AppState + Event  →  reduce()  →  AppState
//! ```

use std::sync::Arc;

use crate::core::event::Event;
use crate::core::metadata;
use crate::core::state::{AppState, ControlsState, TreeState};
use crate::tree::Sequences;

pub fn reduce(state: &AppState, event: &Event) -> AppState {
    AppState {
        tree: reduce_tree(&state.tree, event),
        controls: reduce_controls(&state.controls, event),
        metadata: metadata::reduce(&state.metadata, event),
        sequences: reduce_sequences(&state.sequences, event),
    }
}

pub fn reduce_tree(state: &Arc<TreeState>, event: &Event) -> Arc<TreeState> {
    match event {
        Event::UpdateVisibilityAndBranchThickness {
            visibility,
            visibility_version,
            branch_thickness,
            branch_thickness_version,
            tip_counts,
        } => Arc::new(TreeState {
            visibility: visibility.clone(),
            visibility_version: *visibility_version,
            branch_thickness: branch_thickness.clone(),
            branch_thickness_version: *branch_thickness_version,
            tip_counts: tip_counts.clone(),
            ..TreeState::clone(state)
        }),
        Event::UpdateTipRadii { data, version } => Arc::new(TreeState {
            tip_radii: data.clone(),
            tip_radii_version: *version,
            ..TreeState::clone(state)
        }),
        Event::CleanStart { tree_state, .. } => Arc::new(tree_state.clone()),
        Event::DataInvalid => Arc::new(TreeState {
            loaded: false,
            ..TreeState::clone(state)
        }),
        _ => Arc::clone(state),
    }
}

pub fn reduce_controls(state: &Arc<ControlsState>, event: &Event) -> Arc<ControlsState> {
    let prev = || ControlsState::clone(state);
    let next = match event {
        Event::ChangeDateMin { data } => ControlsState {
            date_min: Some(*data),
            ..prev()
        },
        Event::ChangeDateMax { data } => ControlsState {
            date_max: Some(*data),
            ..prev()
        },
        Event::ChangeAnalysisValue { value } => ControlsState {
            analysis_value: Some(*value),
            ..prev()
        },
        Event::LegendItemMouseEnter { data } => ControlsState {
            selected_legend_item: Some(data.clone()),
            ..prev()
        },
        Event::LegendItemMouseLeave => ControlsState {
            selected_legend_item: None,
            ..prev()
        },
        Event::ApplyFilterQuery { fields, values } => {
            let mut next = prev();
            next.filters.insert(fields.clone(), values.clone());
            next
        }
        Event::ToggleMutType { data } => ControlsState {
            mut_type: *data,
            ..prev()
        },
        Event::ToggleTemporalConfidence => ControlsState {
            temporal_confidence: !state.temporal_confidence,
            ..prev()
        },
        Event::ChangeColorBy { data, color_scale } => ControlsState {
            color_by: data.clone(),
            color_scale: color_scale.clone(),
            selected_legend_item: None,
            ..prev()
        },
        _ => return Arc::clone(state),
    };
    Arc::new(next)
}

fn reduce_sequences(state: &Arc<Sequences>, event: &Event) -> Arc<Sequences> {
    match event {
        Event::CleanStart { sequences, .. } => Arc::new(sequences.clone()),
        _ => Arc::clone(state),
    }
}
