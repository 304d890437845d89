//! # Tree Traversals
//!
//! Derived per-node vectors. Each function returns a fresh vector indexed
//! like the node list and never touches the nodes themselves. Node lists
//! are preorder, so walking indices backwards visits children before
//! their parents.

use chrono::{Datelike, NaiveDate};

use crate::core::state::{ControlsState, TipRadius, Visibility};
use crate::tree::color::ColorScale;
use crate::tree::{NodeId, Sequences, TreeNode};

const HIDDEN_BRANCH_THICKNESS: f64 = 1.0;

/// Decimal year of `date`, e.g. 2016-07-02 → 2016.5.
pub fn numeric_date(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / days_in_year
}

/// Visibility from the active filters and display controls.
///
/// A tip is visible when it passes every non-empty filter, falls inside
/// the date range, and clears the analysis threshold. Internal nodes are
/// visible when any child is.
pub fn calc_visibility(nodes: &[TreeNode], controls: &ControlsState) -> Vec<Visibility> {
    let lower = controls.date_min.map(numeric_date);
    let upper = controls.date_max.map(numeric_date);
    let active_filters: Vec<(&String, &Vec<String>)> = controls
        .filters
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .collect();
    let analysis = controls
        .analysis_slider_key
        .as_deref()
        .zip(controls.analysis_value);

    let tip_visible = |node: &TreeNode| -> bool {
        let passes_filters = active_filters.iter().all(|(field, values)| {
            node.attr_str(field)
                .is_some_and(|v| values.iter().any(|selected| *selected == v))
        });
        let in_range = match node.num_date() {
            Some(date) => lower.is_none_or(|l| date >= l) && upper.is_none_or(|u| date <= u),
            None => true,
        };
        let above_threshold = match analysis {
            Some((key, threshold)) => node.attr_f64(key).is_some_and(|v| v >= threshold),
            None => true,
        };
        passes_filters && in_range && above_threshold
    };

    let mut visible = vec![false; nodes.len()];
    for idx in (0..nodes.len()).rev() {
        let node = &nodes[idx];
        visible[idx] = if node.is_leaf() {
            tip_visible(node)
        } else {
            node.children.iter().any(|&c| visible[c])
        };
    }
    visible.into_iter().map(Visibility::from).collect()
}

/// Only `tip` and its ancestors are visible.
pub fn identify_path_to_tip(nodes: &[TreeNode], tip: NodeId) -> Vec<Visibility> {
    let mut visibility = vec![Visibility::Hidden; nodes.len()];
    let mut current = Some(tip);
    while let Some(idx) = current {
        let Some(node) = nodes.get(idx) else { break };
        visibility[idx] = Visibility::Visible;
        current = node.parent;
    }
    visibility
}

/// Number of visible tips in each node's subtree.
pub fn calc_tip_counts(nodes: &[TreeNode], visibility: &[Visibility]) -> Vec<usize> {
    let mut counts = vec![0; nodes.len()];
    for idx in (0..nodes.len()).rev() {
        let node = &nodes[idx];
        counts[idx] = if node.is_leaf() {
            usize::from(visibility.get(idx).is_some_and(|v| v.is_visible()))
        } else {
            node.children.iter().map(|&c| counts[c]).sum()
        };
    }
    counts
}

fn freq_scale(frac: f64) -> f64 {
    frac.sqrt() * 4.0 + 2.0
}

/// Branch thickness relative to the visible tips under `root`.
pub fn calc_branch_thickness(
    nodes: &[TreeNode],
    visibility: &[Visibility],
    tip_counts: &[usize],
    root: NodeId,
) -> Vec<f64> {
    let max_tip_count = match tip_counts.get(root).copied() {
        Some(0) | None => 1,
        Some(n) => n,
    };
    (0..nodes.len())
        .map(|idx| {
            if visibility.get(idx).is_some_and(|v| v.is_visible()) {
                freq_scale(tip_counts[idx] as f64 / max_tip_count as f64)
            } else {
                HIDDEN_BRANCH_THICKNESS
            }
        })
        .collect()
}

fn legend_match(
    selected: &str,
    node: &TreeNode,
    scale: &ColorScale,
    sequences: &Sequences,
) -> bool {
    if let Some(genotype) = &scale.genotype {
        return sequences
            .get(&node.strain)
            .and_then(|genes| genes.get(&genotype.gene))
            .and_then(|positions| positions.get(&genotype.position))
            .is_some_and(|state| state == selected);
    }
    if scale.continuous {
        return node
            .attr_f64(&scale.color_by)
            .is_some_and(|v| scale.bin_contains(selected, v));
    }
    node.attr_str(&scale.color_by).is_some_and(|v| v == selected)
}

/// Per-node marker radius, enlarged for nodes matching the hovered legend item.
pub fn calc_tip_radii(
    selected_legend_item: Option<&str>,
    scale: &ColorScale,
    sequences: &Sequences,
    nodes: &[TreeNode],
    radius: TipRadius,
) -> Vec<f64> {
    match selected_legend_item {
        Some(selected) => nodes
            .iter()
            .map(|node| {
                if legend_match(selected, node, scale, sequences) {
                    radius.legend_match
                } else {
                    radius.base
                }
            })
            .collect(),
        None => vec![radius.base; nodes.len()],
    }
}
