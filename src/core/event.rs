//! # Events
//!
//! Plain descriptions of state changes. Action creators emit them, every
//! reducer sees every one of them, and each reducer decides whether it
//! cares. Serialized form matches the event catalog the front end
//! consumes:
//!
//! ```text
//! {"type":"CHANGE_DATE_MIN","data":"2016-01-01"}
//! {"type":"UPDATE_TIP_RADII","data":[4.0,7.0],"version":3}
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::state::{MetadataState, MutType, TreeState, Visibility};
use crate::tree::Sequences;
use crate::tree::color::ColorScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    UpdateVisibilityAndBranchThickness {
        visibility: Vec<Visibility>,
        visibility_version: u64,
        branch_thickness: Vec<f64>,
        branch_thickness_version: u64,
        /// Visible tips per node, stored next to the nodes rather than on them.
        tip_counts: Vec<usize>,
    },
    ChangeDateMin {
        data: NaiveDate,
    },
    ChangeDateMax {
        data: NaiveDate,
    },
    ChangeAnalysisValue {
        value: f64,
    },
    UpdateTipRadii {
        data: Vec<f64>,
        version: u64,
    },
    #[serde(rename = "LEGEND_ITEM_MOUSEENTER")]
    LegendItemMouseEnter {
        data: String,
    },
    #[serde(rename = "LEGEND_ITEM_MOUSELEAVE")]
    LegendItemMouseLeave,
    ApplyFilterQuery {
        fields: String,
        values: Vec<String>,
    },
    ToggleMutType {
        data: MutType,
    },
    #[serde(rename = "TOGGLE_TEMPORAL_CONF")]
    ToggleTemporalConfidence,
    ChangeColorBy {
        data: String,
        color_scale: ColorScale,
    },
    DataInvalid,
    CleanStart {
        meta_state: MetadataState,
        tree_state: TreeState,
        sequences: Sequences,
    },
    AddColorBys {
        new_color_bys: Vec<String>,
    },
}

impl Event {
    /// Catalog name of the event, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UpdateVisibilityAndBranchThickness { .. } => {
                "UPDATE_VISIBILITY_AND_BRANCH_THICKNESS"
            }
            Event::ChangeDateMin { .. } => "CHANGE_DATE_MIN",
            Event::ChangeDateMax { .. } => "CHANGE_DATE_MAX",
            Event::ChangeAnalysisValue { .. } => "CHANGE_ANALYSIS_VALUE",
            Event::UpdateTipRadii { .. } => "UPDATE_TIP_RADII",
            Event::LegendItemMouseEnter { .. } => "LEGEND_ITEM_MOUSEENTER",
            Event::LegendItemMouseLeave => "LEGEND_ITEM_MOUSELEAVE",
            Event::ApplyFilterQuery { .. } => "APPLY_FILTER_QUERY",
            Event::ToggleMutType { .. } => "TOGGLE_MUT_TYPE",
            Event::ToggleTemporalConfidence => "TOGGLE_TEMPORAL_CONF",
            Event::ChangeColorBy { .. } => "CHANGE_COLOR_BY",
            Event::DataInvalid => "DATA_INVALID",
            Event::CleanStart { .. } => "CLEAN_START",
            Event::AddColorBys { .. } => "ADD_COLOR_BYS",
        }
    }
}
