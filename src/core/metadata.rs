//! # Metadata Reducer
//!
//! Dataset metadata and the color-by menu.
//!
//! | Event           | Result                                         |
//! |-----------------|------------------------------------------------|
//! | `DATA_INVALID`  | `loaded = false`, everything else kept         |
//! | `CLEAN_START`   | replaced wholesale by the carried state        |
//! | `ADD_COLOR_BYS` | color options copied, one discrete entry added per key |
//! | anything else   | the same `Arc`, untouched                      |

use std::sync::Arc;

use log::debug;

use crate::core::event::Event;
use crate::core::state::{ColorKind, ColorOption, ColorOptions, MetadataState};

/// Color-by menu available before any dataset contributes its own.
pub fn default_color_options() -> ColorOptions {
    let entries = [
        ("country", "country", "Country", ColorKind::Discrete),
        ("region", "region", "Region", ColorKind::Discrete),
        ("num_date", "date", "Sampling date", ColorKind::Continuous),
        ("gt", "genotype", "Genotype", ColorKind::Discrete),
    ];
    entries
        .into_iter()
        .map(|(key, menu_item, legend_title, kind)| {
            (
                key.to_string(),
                ColorOption {
                    menu_item: menu_item.to_string(),
                    legend_title: legend_title.to_string(),
                    key: key.to_string(),
                    kind,
                },
            )
        })
        .collect()
}

pub fn reduce(state: &Arc<MetadataState>, event: &Event) -> Arc<MetadataState> {
    match event {
        Event::DataInvalid => Arc::new(MetadataState {
            loaded: false,
            ..MetadataState::clone(state)
        }),
        Event::CleanStart { meta_state, .. } => Arc::new(meta_state.clone()),
        Event::AddColorBys { new_color_bys } => {
            let mut color_options = state.color_options.clone();
            for key in new_color_bys {
                debug!("Adding color-by {key}");
                color_options.insert(key.clone(), ColorOption::discrete(key));
            }
            Arc::new(MetadataState {
                color_options,
                ..MetadataState::clone(state)
            })
        }
        _ => Arc::clone(state),
    }
}
