//! # Color Scales
//!
//! What the current color-by means for legend matching. Genotype
//! colorings are encoded in the color-by key itself (`gt-<gene>_<pos>`,
//! with `nuc` as the gene for nucleotide positions).

use serde::{Deserialize, Serialize};

use crate::core::state::{ColorKind, ColorOptions, MutType};
use crate::tree::TreeNode;

const GENOTYPE_PREFIX: &str = "gt-";
const NUC_GENE: &str = "nuc";
const CONTINUOUS_LEGEND_BINS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype {
    pub gene: String,
    pub position: String,
}

/// One legend entry of a continuous scale, matching values in `(lower, upper]`.
/// The first bin also includes its lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendBin {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    pub color_by: String,
    pub continuous: bool,
    pub genotype: Option<Genotype>,
    pub legend_bins: Vec<LegendBin>,
}

/// `Some(Nuc)` when the genotype gene is exactly `nuc`, `Some(Aa)` for any
/// other genotype coloring, `None` when the color-by is not a genotype.
pub fn determine_color_by_genotype_type(color_by: &str) -> Option<MutType> {
    let rest = color_by.strip_prefix(GENOTYPE_PREFIX)?;
    let gene = rest.rsplit_once('_').map_or(rest, |(gene, _)| gene);
    if gene == NUC_GENE {
        Some(MutType::Nuc)
    } else {
        Some(MutType::Aa)
    }
}

fn parse_genotype(color_by: &str) -> Option<Genotype> {
    let rest = color_by.strip_prefix(GENOTYPE_PREFIX)?;
    let (gene, position) = rest.rsplit_once('_')?;
    if gene.is_empty() || position.is_empty() {
        return None;
    }
    Some(Genotype {
        gene: gene.to_string(),
        position: position.to_string(),
    })
}

impl ColorScale {
    pub fn discrete(color_by: &str) -> Self {
        Self {
            color_by: color_by.to_string(),
            continuous: false,
            genotype: parse_genotype(color_by),
            legend_bins: Vec::new(),
        }
    }

    /// Build the scale for `color_by`. Continuous options get equal-width
    /// legend bins spanning the tip values present in the tree.
    pub fn build(color_by: &str, color_options: &ColorOptions, nodes: &[TreeNode]) -> Self {
        let continuous = color_options
            .values()
            .any(|opt| opt.key == color_by && opt.kind == ColorKind::Continuous);
        if !continuous || parse_genotype(color_by).is_some() {
            return Self::discrete(color_by);
        }

        let values: Vec<f64> = nodes
            .iter()
            .filter(|n| n.is_leaf())
            .filter_map(|n| n.attr_f64(color_by))
            .collect();

        Self {
            color_by: color_by.to_string(),
            continuous: true,
            genotype: None,
            legend_bins: legend_bins(&values),
        }
    }

    /// Whether `bin_label`'s range contains `value`.
    pub fn bin_contains(&self, bin_label: &str, value: f64) -> bool {
        match self.legend_bins.iter().position(|b| b.label == bin_label) {
            Some(idx) => {
                let bin = &self.legend_bins[idx];
                let above = if idx == 0 { value >= bin.lower } else { value > bin.lower };
                above && value <= bin.upper
            }
            None => false,
        }
    }
}

fn legend_bins(values: &[f64]) -> Vec<LegendBin> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);

    if max <= min {
        return vec![LegendBin {
            label: format!("{min:.4}"),
            lower: min,
            upper: max,
        }];
    }

    let step = (max - min) / CONTINUOUS_LEGEND_BINS as f64;
    (0..CONTINUOUS_LEGEND_BINS)
        .map(|i| {
            let lower = min + step * i as f64;
            let upper = if i + 1 == CONTINUOUS_LEGEND_BINS {
                max
            } else {
                min + step * (i + 1) as f64
            };
            LegendBin {
                label: format!("{lower:.4}"),
                lower,
                upper,
            }
        })
        .collect()
}
