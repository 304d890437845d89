//! # Datasets
//!
//! A dataset bundles the nested tree, its metadata, and optional per-strain
//! sequences in one JSON document:
//!
//! ```json
//! {
//!   "meta": {"title": "...", "color_options": {...}},
//!   "tree": {"strain": "root", "attr": {...}, "children": [...]},
//!   "sequences": {"strain": {"HA1": {"144": "K"}}}
//! }
//! ```
//!
//! Installing a dataset replaces the tree, metadata and sequence slices in
//! one `CLEAN_START`. If the current color-by needs a different scale for
//! the new tree, a `CHANGE_COLOR_BY` follows. A dataset that fails validation emits `DATA_INVALID`
//! instead and leaves the previous slices in place.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::core::action::{
    VisibilityOptions, update_tip_radii, update_visible_tips_and_branch_thicknesses,
};
use crate::core::event::Event;
use crate::core::state::{ColorOptions, MetadataState, TreeState};
use crate::core::store::Dispatch;
use crate::tree::color::ColorScale;
use crate::tree::{NestedNode, Sequences, check_strains, flatten};

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub meta: Value,
    pub tree: NestedNode,
    #[serde(default)]
    pub sequences: Sequences,
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "dataset I/O error: {e}"),
            DatasetError::Parse(e) => write!(f, "dataset parse error: {e}"),
            DatasetError::Invalid(msg) => write!(f, "invalid dataset: {msg}"),
        }
    }
}

impl std::error::Error for DatasetError {}

pub fn parse_dataset(json: &str) -> Result<Dataset, DatasetError> {
    serde_json::from_str(json).map_err(DatasetError::Parse)
}

pub fn read_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let json = fs::read_to_string(path).map_err(DatasetError::Io)?;
    let dataset = parse_dataset(&json)?;
    info!("Read dataset from {}", path.display());
    Ok(dataset)
}

/// Color options declared by the dataset under `meta.color_options`,
/// layered over the ones already known.
fn merged_color_options(meta: &Value, known: &ColorOptions) -> Result<ColorOptions, DatasetError> {
    let mut color_options = known.clone();
    if let Some(declared) = meta.get("color_options") {
        let declared: ColorOptions = serde_json::from_value(declared.clone())
            .map_err(|e| DatasetError::Invalid(format!("color_options: {e}")))?;
        color_options.extend(declared);
    }
    Ok(color_options)
}

/// Install `dataset` into the store and compute the initial derived vectors.
pub fn load_dataset(store: &mut impl Dispatch, dataset: Dataset) -> Result<(), DatasetError> {
    let nodes = flatten(&dataset.tree);
    let checked = check_strains(&nodes).map_err(DatasetError::Invalid).and_then(|()| {
        merged_color_options(&dataset.meta, &store.state().metadata.color_options)
    });
    let color_options = match checked {
        Ok(color_options) => color_options,
        Err(e) => {
            warn!("Rejecting dataset: {e}");
            store.dispatch(Event::DataInvalid);
            return Err(e);
        }
    };

    info!(
        "Installing dataset with {} nodes, {} sequences",
        nodes.len(),
        dataset.sequences.len()
    );
    store.dispatch(Event::CleanStart {
        meta_state: MetadataState {
            loaded: true,
            metadata: Some(dataset.meta),
            color_options,
        },
        tree_state: TreeState::new(nodes),
        sequences: dataset.sequences,
    });

    // continuous legend bins depend on the tree just installed
    let state = store.state();
    let color_by = state.controls.color_by.clone();
    let color_scale = ColorScale::build(&color_by, &state.metadata.color_options, &state.tree.nodes);
    if color_scale != state.controls.color_scale {
        debug!("Rebuilt {color_by} color scale for the new tree");
        store.dispatch(Event::ChangeColorBy {
            data: color_by,
            color_scale,
        });
    }

    update_visible_tips_and_branch_thicknesses(store, VisibilityOptions::default())
        .map_err(|e| DatasetError::Invalid(e.to_string()))?;
    update_tip_radii(store);
    Ok(())
}
