//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use serde_json::json;

use crate::core::state::{Defaults, MetadataState, TreeState};
use crate::core::event::Event;
use crate::core::store::{Dispatch, Store};
use crate::tree::{NestedNode, Sequences, TreeNode, flatten};

/// Four tips in two clades:
///
/// ```text
/// 0 root
/// ├── 1 cladeA
/// │   ├── 2 tipA1  asia           2014.2  cTiter 1.0
/// │   └── 3 tipA2  europe         2015.6  cTiter 3.0
/// └── 4 cladeB
///     ├── 5 tipB1  asia           2016.1  cTiter 2.0
///     └── 6 tipB2  north_america  2017.4  cTiter 5.0
/// ```
pub fn test_nested_tree() -> NestedNode {
    serde_json::from_value(json!({
        "strain": "root",
        "attr": {"num_date": 2010.0},
        "children": [
            {
                "strain": "cladeA",
                "attr": {"num_date": 2012.0},
                "children": [
                    {"strain": "tipA1", "attr": {"num_date": 2014.2, "region": "asia", "country": "china", "cTiter": 1.0}},
                    {"strain": "tipA2", "attr": {"num_date": 2015.6, "region": "europe", "country": "france", "cTiter": 3.0}}
                ]
            },
            {
                "strain": "cladeB",
                "attr": {"num_date": 2013.0},
                "children": [
                    {"strain": "tipB1", "attr": {"num_date": 2016.1, "region": "asia", "country": "japan", "cTiter": 2.0}},
                    {"strain": "tipB2", "attr": {"num_date": 2017.4, "region": "north_america", "country": "usa", "cTiter": 5.0}}
                ]
            }
        ]
    }))
    .expect("fixture tree parses")
}

pub fn test_nodes() -> Vec<TreeNode> {
    flatten(&test_nested_tree())
}

/// HA1 position 144 is K for tipA1 and tipB1; nuc position 100 is G only for tipB2.
pub fn test_sequences() -> Sequences {
    serde_json::from_value(json!({
        "tipA1": {"HA1": {"144": "K"}, "nuc": {"100": "A"}},
        "tipA2": {"HA1": {"144": "N"}, "nuc": {"100": "A"}},
        "tipB1": {"HA1": {"144": "K"}, "nuc": {"100": "A"}},
        "tipB2": {"HA1": {"144": "S"}, "nuc": {"100": "G"}}
    }))
    .expect("fixture sequences parse")
}

/// A store with default settings and no dataset.
pub fn test_store() -> Store {
    Store::new(&Defaults::default())
}

/// A store with the fixture tree installed, without any recomputation.
pub fn loaded_store() -> Store {
    loaded_store_with(Defaults::default())
}

pub fn loaded_store_with(defaults: Defaults) -> Store {
    let mut store = Store::new(&defaults);
    store.dispatch(Event::CleanStart {
        meta_state: MetadataState {
            loaded: true,
            metadata: Some(json!({"title": "fixture"})),
            color_options: defaults.color_options.clone(),
        },
        tree_state: TreeState::new(test_nodes()),
        sequences: test_sequences(),
    });
    store.clear_history();
    store
}
