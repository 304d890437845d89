//! # Application State
//!
//! All view state for one tree visualization, split into slices the way
//! the reducers are split:
//!
//! ```text
//! AppState
//! ├── tree: Arc<TreeState>          // nodes + derived per-node vectors
//! ├── controls: Arc<ControlsState>  // filters, sliders, legend, color-by
//! ├── metadata: Arc<MetadataState>  // dataset metadata + color options
//! └── sequences: Arc<Sequences>     // per-strain genotype states
//! ```
//!
//! Slices are shared behind `Arc` so a reducer that ignores an event can
//! hand back the very same slice. Consumers compare version counters,
//! not contents, to decide whether derived data is stale.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tree::color::ColorScale;
use crate::tree::{Sequences, TreeNode};

pub const DEFAULT_TIP_RADIUS: f64 = 4.0;
pub const DEFAULT_TIP_RADIUS_ON_LEGEND_MATCH: f64 = 7.0;
pub const DEFAULT_COLOR_BY: &str = "region";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible { Visibility::Visible } else { Visibility::Hidden }
    }
}

/// Which alphabet genotype colorings and mutation displays use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MutType {
    #[default]
    Aa,
    Nuc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    Discrete,
    Continuous,
}

/// One entry in the color-by menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    pub menu_item: String,
    pub legend_title: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ColorKind,
}

impl ColorOption {
    /// Entry synthesized for a color-by discovered in the data.
    pub fn discrete(key: &str) -> Self {
        Self {
            menu_item: key.to_string(),
            legend_title: key.to_string(),
            key: key.to_string(),
            kind: ColorKind::Discrete,
        }
    }
}

pub type ColorOptions = BTreeMap<String, ColorOption>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TipRadius {
    pub base: f64,
    pub legend_match: f64,
}

impl Default for TipRadius {
    fn default() -> Self {
        Self {
            base: DEFAULT_TIP_RADIUS,
            legend_match: DEFAULT_TIP_RADIUS_ON_LEGEND_MATCH,
        }
    }
}

/// Values supplied at process start that seed the initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub color_by: String,
    pub color_options: ColorOptions,
    pub tip_radius: TipRadius,
    pub analysis_slider_key: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            color_by: DEFAULT_COLOR_BY.to_string(),
            color_options: crate::core::metadata::default_color_options(),
            tip_radius: TipRadius::default(),
            analysis_slider_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    pub loaded: bool,
    pub nodes: Vec<TreeNode>,
    pub visibility: Vec<Visibility>,
    pub visibility_version: u64,
    pub branch_thickness: Vec<f64>,
    pub branch_thickness_version: u64,
    /// Visible tips below each node. Only the tree reducer writes this.
    pub tip_counts: Vec<usize>,
    pub tip_radii: Vec<f64>,
    pub tip_radii_version: u64,
}

impl TreeState {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self {
            loaded: true,
            nodes,
            ..Default::default()
        }
    }

    pub fn versions(&self) -> Versions {
        Versions {
            visibility: self.visibility_version,
            branch_thickness: self.branch_thickness_version,
            tip_radii: self.tip_radii_version,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versions {
    pub visibility: u64,
    pub branch_thickness: u64,
    pub tip_radii: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsState {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub analysis_slider_key: Option<String>,
    pub analysis_value: Option<f64>,
    pub selected_legend_item: Option<String>,
    /// Filter dimension → selected values. Empty selections do not filter.
    pub filters: BTreeMap<String, Vec<String>>,
    pub mut_type: MutType,
    pub temporal_confidence: bool,
    pub color_by: String,
    pub default_color_by: String,
    pub color_scale: ColorScale,
    pub tip_radius: TipRadius,
}

impl ControlsState {
    pub fn new(defaults: &Defaults) -> Self {
        Self {
            date_min: None,
            date_max: None,
            analysis_slider_key: defaults.analysis_slider_key.clone(),
            analysis_value: None,
            selected_legend_item: None,
            filters: BTreeMap::new(),
            mut_type: MutType::default(),
            temporal_confidence: false,
            color_by: defaults.color_by.clone(),
            default_color_by: defaults.color_by.clone(),
            color_scale: ColorScale::discrete(&defaults.color_by),
            tip_radius: defaults.tip_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataState {
    pub loaded: bool,
    pub metadata: Option<Value>,
    pub color_options: ColorOptions,
}

impl MetadataState {
    pub fn new(color_options: ColorOptions) -> Self {
        Self {
            loaded: false,
            metadata: None,
            color_options,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tree: Arc<TreeState>,
    pub controls: Arc<ControlsState>,
    pub metadata: Arc<MetadataState>,
    pub sequences: Arc<Sequences>,
}

impl AppState {
    pub fn new(defaults: &Defaults) -> Self {
        Self {
            tree: Arc::new(TreeState::default()),
            controls: Arc::new(ControlsState::new(defaults)),
            metadata: Arc::new(MetadataState::new(defaults.color_options.clone())),
            sequences: Arc::new(Sequences::new()),
        }
    }
}
