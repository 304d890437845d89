//! # Actions
//!
//! Everything the user can do to the tree view becomes an `Action`.
//! Dragging the date slider? That's `Action::ChangeDateFilter`.
//! Hovering a legend entry? That's `Action::LegendMouseEnterExit`.
//!
//! Each action creator reads what it needs from the store and dispatches
//! zero or more `Event`s in order. Reducers turn those into the next state.
//!
//! ```text
//! Action  →  creator(store)  →  Event, Event, ...  →  reduce()  →  New State
//! ```
//!
//! Creators that depend on a loaded tree treat a missing tree as "nothing
//! to do", not as an error. Index arguments are checked up front.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event::Event;
use crate::core::state::MutType;
use crate::core::store::Dispatch;
use crate::tree::NodeId;
use crate::tree::color::{ColorScale, determine_color_by_genotype_type};
use crate::tree::helpers::{
    calc_branch_thickness, calc_tip_counts, calc_tip_radii, calc_visibility, identify_path_to_tip,
};

/// A user intent, as recorded in replay scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Recompute visibility and branch thickness.
    UpdateVisibility {
        #[serde(default)]
        idx_of_in_view_root_node: NodeId,
        /// Non-zero highlights the path to this tip.
        #[serde(default)]
        tip_selected_idx: NodeId,
    },
    ChangeDateFilter {
        #[serde(default)]
        min: Option<NaiveDate>,
        #[serde(default)]
        max: Option<NaiveDate>,
    },
    ChangeAnalysisSliderValue {
        value: f64,
    },
    ZoomToClade {
        idx_of_in_view_root_node: NodeId,
    },
    /// Hover (with a label) or leave (without one) a legend entry.
    LegendMouseEnterExit {
        #[serde(default)]
        label: Option<String>,
    },
    ApplyFilterQuery {
        filter_type: String,
        fields: String,
        values: Vec<String>,
    },
    ChangeMutType {
        data: MutType,
    },
    ToggleTemporalConfidence,
    ChangeColorBy {
        color_by: String,
    },
    AddColorBys {
        new_color_bys: Vec<String>,
    },
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    NodeOutOfRange { index: NodeId, len: usize },
    UnknownColorBy(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NodeOutOfRange { index, len } => {
                write!(f, "node index {index} out of range for tree of {len} nodes")
            }
            ActionError::UnknownColorBy(key) => write!(f, "unknown color-by: {key}"),
        }
    }
}

impl std::error::Error for ActionError {}

fn check_index(index: NodeId, len: usize) -> Result<(), ActionError> {
    if index < len {
        Ok(())
    } else {
        Err(ActionError::NodeOutOfRange { index, len })
    }
}

// ============================================================================
// Action Creators
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityOptions {
    /// Clade whose visible tips set the full branch width. Root is 0.
    pub idx_of_in_view_root_node: NodeId,
    /// When non-zero, only the path to this tip is visible.
    pub tip_selected_idx: NodeId,
}

/// Recompute which nodes are visible and how thick their branches are,
/// as a single `UPDATE_VISIBILITY_AND_BRANCH_THICKNESS` event.
pub fn update_visible_tips_and_branch_thicknesses(
    store: &mut impl Dispatch,
    options: VisibilityOptions,
) -> Result<(), ActionError> {
    let tree = Arc::clone(&store.state().tree);
    if tree.nodes.is_empty() {
        debug!("No tree nodes, skipping visibility update");
        return Ok(());
    }
    check_index(options.idx_of_in_view_root_node, tree.nodes.len())?;
    check_index(options.tip_selected_idx, tree.nodes.len())?;

    let visibility = if options.tip_selected_idx != 0 {
        identify_path_to_tip(&tree.nodes, options.tip_selected_idx)
    } else {
        calc_visibility(&tree.nodes, &store.state().controls)
    };
    let tip_counts = calc_tip_counts(&tree.nodes, &visibility);
    let branch_thickness = calc_branch_thickness(
        &tree.nodes,
        &visibility,
        &tip_counts,
        options.idx_of_in_view_root_node,
    );

    store.dispatch(Event::UpdateVisibilityAndBranchThickness {
        visibility,
        visibility_version: tree.visibility_version + 1,
        branch_thickness,
        branch_thickness_version: tree.branch_thickness_version + 1,
        tip_counts,
    });
    Ok(())
}

/// Record new date bounds, then refresh visibility if a tree is loaded.
/// `None` leaves a bound unchanged.
pub fn change_date_filter(
    store: &mut impl Dispatch,
    new_min: Option<NaiveDate>,
    new_max: Option<NaiveDate>,
) -> Result<(), ActionError> {
    if let Some(data) = new_min {
        store.dispatch(Event::ChangeDateMin { data });
    }
    if let Some(data) = new_max {
        store.dispatch(Event::ChangeDateMax { data });
    }
    if !store.state().tree.loaded {
        debug!("Tree not loaded, date filter recorded without recomputing");
        return Ok(());
    }
    update_visible_tips_and_branch_thicknesses(store, VisibilityOptions::default())
}

/// The value is not range checked.
pub fn change_analysis_slider_value(
    store: &mut impl Dispatch,
    value: f64,
) -> Result<(), ActionError> {
    store.dispatch(Event::ChangeAnalysisValue { value });
    if !store.state().tree.loaded {
        return Ok(());
    }
    update_visible_tips_and_branch_thicknesses(store, VisibilityOptions::default())
}

pub fn zoom_to_clade(
    store: &mut impl Dispatch,
    idx_of_in_view_root_node: NodeId,
) -> Result<(), ActionError> {
    update_visible_tips_and_branch_thicknesses(
        store,
        VisibilityOptions {
            idx_of_in_view_root_node,
            ..Default::default()
        },
    )
}

/// Recompute tip radii from the current legend selection.
pub(crate) fn update_tip_radii(store: &mut impl Dispatch) {
    let state = store.state();
    let data = calc_tip_radii(
        state.controls.selected_legend_item.as_deref(),
        &state.controls.color_scale,
        &state.sequences,
        &state.tree.nodes,
        state.controls.tip_radius,
    );
    let version = state.tree.tip_radii_version + 1;
    store.dispatch(Event::UpdateTipRadii { data, version });
}

/// Hover (`Some(label)`) or leave (`None`) a legend entry, then resize tips.
/// An empty label counts as leaving.
pub fn legend_mouse_enter_exit(store: &mut impl Dispatch, label: Option<&str>) {
    match label.filter(|l| !l.is_empty()) {
        Some(label) => store.dispatch(Event::LegendItemMouseEnter {
            data: label.to_string(),
        }),
        None => store.dispatch(Event::LegendItemMouseLeave),
    }
    update_tip_radii(store);
}

/// `filter_type` only labels the query (e.g. "geographic location"); the
/// event carries the field and its selected values.
pub fn apply_filter_query(
    store: &mut impl Dispatch,
    filter_type: &str,
    fields: &str,
    values: Vec<String>,
) -> Result<(), ActionError> {
    debug!("Applying {filter_type} filter on {fields}: {values:?}");
    store.dispatch(Event::ApplyFilterQuery {
        fields: fields.to_string(),
        values,
    });
    // no tree-loaded guard here; the recomputation no-ops without nodes
    update_visible_tips_and_branch_thicknesses(store, VisibilityOptions::default())
}

/// Switch the color-by, rebuilding its scale from the current tree.
pub fn change_color_by(store: &mut impl Dispatch, color_by: &str) -> Result<(), ActionError> {
    let state = store.state();
    let known = determine_color_by_genotype_type(color_by).is_some()
        || state
            .metadata
            .color_options
            .values()
            .any(|opt| opt.key == color_by);
    if !known {
        return Err(ActionError::UnknownColorBy(color_by.to_string()));
    }
    apply_color_by(store, color_by);
    Ok(())
}

fn apply_color_by(store: &mut impl Dispatch, color_by: &str) {
    let state = store.state();
    let color_scale = ColorScale::build(color_by, &state.metadata.color_options, &state.tree.nodes);
    info!("Color-by changed to {color_by}");
    store.dispatch(Event::ChangeColorBy {
        data: color_by.to_string(),
        color_scale,
    });
    if store.state().tree.loaded {
        update_tip_radii(store);
    }
}

/// Toggle between amino-acid and nucleotide mutations. A genotype color-by
/// of the other kind is first reset to the default color-by, which is
/// taken as configured even when no color option names it.
pub fn change_mut_type(store: &mut impl Dispatch, data: MutType) {
    let controls = Arc::clone(&store.state().controls);
    if let Some(current) = determine_color_by_genotype_type(&controls.color_by)
        && current != data
    {
        apply_color_by(store, &controls.default_color_by);
    }
    store.dispatch(Event::ToggleMutType { data });
}

pub fn toggle_temporal_confidence() -> Event {
    Event::ToggleTemporalConfidence
}

pub fn add_color_bys(new_color_bys: Vec<String>) -> Event {
    Event::AddColorBys { new_color_bys }
}

/// Run one recorded action against the store.
pub fn run(store: &mut impl Dispatch, action: Action) -> Result<(), ActionError> {
    match action {
        Action::UpdateVisibility {
            idx_of_in_view_root_node,
            tip_selected_idx,
        } => update_visible_tips_and_branch_thicknesses(
            store,
            VisibilityOptions {
                idx_of_in_view_root_node,
                tip_selected_idx,
            },
        ),
        Action::ChangeDateFilter { min, max } => change_date_filter(store, min, max),
        Action::ChangeAnalysisSliderValue { value } => change_analysis_slider_value(store, value),
        Action::ZoomToClade {
            idx_of_in_view_root_node,
        } => zoom_to_clade(store, idx_of_in_view_root_node),
        Action::LegendMouseEnterExit { label } => {
            legend_mouse_enter_exit(store, label.as_deref());
            Ok(())
        }
        Action::ApplyFilterQuery {
            filter_type,
            fields,
            values,
        } => apply_filter_query(store, &filter_type, &fields, values),
        Action::ChangeMutType { data } => {
            change_mut_type(store, data);
            Ok(())
        }
        Action::ToggleTemporalConfidence => {
            store.dispatch(toggle_temporal_confidence());
            Ok(())
        }
        Action::ChangeColorBy { color_by } => change_color_by(store, &color_by),
        Action::AddColorBys { new_color_bys } => {
            store.dispatch(add_color_bys(new_color_bys));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Defaults, Visibility};
    use crate::test_support::{loaded_store, loaded_store_with, test_store};

    fn kinds(history: &[Event]) -> Vec<&'static str> {
        history.iter().map(Event::kind).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_update_without_nodes_emits_nothing() {
        let mut store = test_store();
        update_visible_tips_and_branch_thicknesses(&mut store, VisibilityOptions::default())
            .unwrap();
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_update_emits_single_event() {
        let mut store = loaded_store();
        update_visible_tips_and_branch_thicknesses(&mut store, VisibilityOptions::default())
            .unwrap();
        assert_eq!(kinds(store.history()), vec!["UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"]);
        let tree = &store.state().tree;
        assert!(tree.visibility.iter().all(|v| v.is_visible()));
        assert_eq!(tree.tip_counts[0], 4);
        assert_eq!(tree.branch_thickness[0], 6.0);
    }

    #[test]
    fn test_versions_increment_once_per_recompute() {
        let mut store = loaded_store();
        for _ in 0..5 {
            update_visible_tips_and_branch_thicknesses(&mut store, VisibilityOptions::default())
                .unwrap();
        }
        let tree = &store.state().tree;
        assert_eq!(tree.visibility_version, 5);
        assert_eq!(tree.branch_thickness_version, 5);
        assert_eq!(tree.tip_radii_version, 0);
    }

    #[test]
    fn test_selected_tip_ignores_filters() {
        let mut store = loaded_store();
        store.dispatch(Event::ApplyFilterQuery {
            fields: "region".into(),
            values: vec!["europe".into()],
        });
        update_visible_tips_and_branch_thicknesses(
            &mut store,
            VisibilityOptions {
                tip_selected_idx: 5,
                ..Default::default()
            },
        )
        .unwrap();
        let visibility = &store.state().tree.visibility;
        assert_eq!(
            visibility,
            &identify_path_to_tip(&store.state().tree.nodes, 5)
        );
        assert_eq!(visibility[3], Visibility::Hidden);
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        let mut store = loaded_store();
        let err = zoom_to_clade(&mut store, 42).unwrap_err();
        assert_eq!(err, ActionError::NodeOutOfRange { index: 42, len: 7 });
        let err = update_visible_tips_and_branch_thicknesses(
            &mut store,
            VisibilityOptions {
                tip_selected_idx: 7,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ActionError::NodeOutOfRange { index: 7, .. }));
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_date_filter_only_emits_supplied_bounds() {
        let mut store = loaded_store();
        change_date_filter(&mut store, None, Some(date(2017, 1, 1))).unwrap();
        assert_eq!(
            kinds(store.history()),
            vec!["CHANGE_DATE_MAX", "UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"]
        );
        assert_eq!(store.state().controls.date_min, None);
        // tipB2 (2017.4) falls outside
        assert_eq!(store.state().tree.visibility[6], Visibility::Hidden);
    }

    #[test]
    fn test_date_filter_recomputes_with_new_bounds() {
        let mut store = loaded_store();
        change_date_filter(&mut store, Some(date(2015, 1, 1)), Some(date(2017, 1, 1))).unwrap();
        assert_eq!(
            kinds(store.history()),
            vec![
                "CHANGE_DATE_MIN",
                "CHANGE_DATE_MAX",
                "UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"
            ]
        );
        let tree = &store.state().tree;
        assert_eq!(tree.tip_counts[0], 2);
        assert_eq!(tree.visibility[2], Visibility::Hidden);
    }

    #[test]
    fn test_date_filter_without_tree_does_not_recompute() {
        let mut store = test_store();
        change_date_filter(&mut store, Some(date(2015, 1, 1)), None).unwrap();
        assert_eq!(kinds(store.history()), vec!["CHANGE_DATE_MIN"]);
        assert_eq!(store.state().controls.date_min, Some(date(2015, 1, 1)));

        store.clear_history();
        change_date_filter(&mut store, None, None).unwrap();
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_analysis_slider() {
        let mut store = test_store();
        change_analysis_slider_value(&mut store, 0.5).unwrap();
        assert_eq!(kinds(store.history()), vec!["CHANGE_ANALYSIS_VALUE"]);

        let mut store = loaded_store();
        change_analysis_slider_value(&mut store, -3.0).unwrap();
        assert_eq!(
            kinds(store.history()),
            vec!["CHANGE_ANALYSIS_VALUE", "UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"]
        );
        assert_eq!(store.state().controls.analysis_value, Some(-3.0));
    }

    #[test]
    fn test_zoom_to_clade_uses_clade_as_full_width() {
        let mut store = loaded_store();
        zoom_to_clade(&mut store, 4).unwrap();
        assert_eq!(kinds(store.history()), vec!["UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"]);
        let tree = &store.state().tree;
        assert_eq!(tree.branch_thickness[4], 6.0);
        assert!(tree.branch_thickness[0] > 6.0);
    }

    #[test]
    fn test_legend_enter_then_exit() {
        let mut store = loaded_store();
        legend_mouse_enter_exit(&mut store, Some("asia"));
        assert_eq!(
            kinds(store.history()),
            vec!["LEGEND_ITEM_MOUSEENTER", "UPDATE_TIP_RADII"]
        );
        let radii = store.state().tree.tip_radii.clone();
        assert_eq!(radii[2], 7.0);
        assert_eq!(radii[3], 4.0);

        store.clear_history();
        legend_mouse_enter_exit(&mut store, None);
        assert_eq!(
            kinds(store.history()),
            vec!["LEGEND_ITEM_MOUSELEAVE", "UPDATE_TIP_RADII"]
        );
        assert!(store.state().tree.tip_radii.iter().all(|&r| r == 4.0));
        assert_eq!(store.state().tree.tip_radii_version, 2);
    }

    #[test]
    fn test_empty_legend_label_counts_as_leave() {
        let mut store = loaded_store();
        legend_mouse_enter_exit(&mut store, Some(""));
        assert_eq!(
            kinds(store.history()),
            vec!["LEGEND_ITEM_MOUSELEAVE", "UPDATE_TIP_RADII"]
        );
    }

    #[test]
    fn test_filter_query_drops_filter_type() {
        let mut store = loaded_store();
        apply_filter_query(&mut store, "geographic location", "region", vec!["asia".into()])
            .unwrap();
        assert_eq!(
            store.history()[0],
            Event::ApplyFilterQuery {
                fields: "region".into(),
                values: vec!["asia".into()]
            }
        );
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.state().tree.tip_counts[0], 2);
    }

    #[test]
    fn test_filter_query_without_tree_only_records_filter() {
        let mut store = test_store();
        apply_filter_query(&mut store, "authors", "authors", vec!["smith".into()]).unwrap();
        assert_eq!(kinds(store.history()), vec!["APPLY_FILTER_QUERY"]);
    }

    #[test]
    fn test_change_mut_type_resets_conflicting_genotype_color_by() {
        let mut store = loaded_store();
        change_color_by(&mut store, "gt-HA1_144").unwrap();
        store.clear_history();

        change_mut_type(&mut store, MutType::Nuc);
        assert_eq!(
            kinds(store.history()),
            vec!["CHANGE_COLOR_BY", "UPDATE_TIP_RADII", "TOGGLE_MUT_TYPE"]
        );
        assert_eq!(store.state().controls.color_by, "region");
        assert_eq!(store.state().controls.mut_type, MutType::Nuc);
    }

    #[test]
    fn test_change_mut_type_keeps_matching_color_by() {
        let mut store = loaded_store();
        change_color_by(&mut store, "gt-nuc_100").unwrap();
        store.clear_history();

        change_mut_type(&mut store, MutType::Nuc);
        assert_eq!(kinds(store.history()), vec!["TOGGLE_MUT_TYPE"]);
        assert_eq!(store.state().controls.color_by, "gt-nuc_100");

        let mut store = loaded_store();
        change_mut_type(&mut store, MutType::Aa);
        assert_eq!(kinds(store.history()), vec!["TOGGLE_MUT_TYPE"]);
    }

    #[test]
    fn test_change_mut_type_resets_to_unlisted_default() {
        let mut store = loaded_store_with(Defaults {
            color_by: "host".to_string(),
            ..Default::default()
        });
        change_color_by(&mut store, "gt-HA1_144").unwrap();
        store.clear_history();

        change_mut_type(&mut store, MutType::Nuc);
        assert_eq!(
            kinds(store.history()),
            vec!["CHANGE_COLOR_BY", "UPDATE_TIP_RADII", "TOGGLE_MUT_TYPE"]
        );
        assert_eq!(store.state().controls.color_by, "host");
        assert_eq!(store.state().controls.mut_type, MutType::Nuc);
    }

    #[test]
    fn test_unknown_color_by() {
        let mut store = loaded_store();
        let err = change_color_by(&mut store, "host").unwrap_err();
        assert_eq!(err, ActionError::UnknownColorBy("host".into()));
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_toggle_temporal_confidence_is_a_plain_event() {
        assert_eq!(toggle_temporal_confidence(), Event::ToggleTemporalConfidence);
    }

    #[test]
    fn test_run_parses_script_actions() {
        let action: Action = serde_json::from_str(
            r#"{"action": "change_date_filter", "max": "2016-06-01"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::ChangeDateFilter {
                min: None,
                max: Some(date(2016, 6, 1))
            }
        );
        let mut store = loaded_store();
        run(&mut store, action).unwrap();
        run(&mut store, Action::ToggleTemporalConfidence).unwrap();
        run(
            &mut store,
            Action::AddColorBys {
                new_color_bys: vec!["host".into()],
            },
        )
        .unwrap();
        run(&mut store, Action::ChangeColorBy { color_by: "host".into() }).unwrap();
        assert_eq!(
            kinds(store.history()),
            vec![
                "CHANGE_DATE_MAX",
                "UPDATE_VISIBILITY_AND_BRANCH_THICKNESS",
                "TOGGLE_TEMPORAL_CONF",
                "ADD_COLOR_BYS",
                "CHANGE_COLOR_BY",
                "UPDATE_TIP_RADII"
            ]
        );
    }
}
