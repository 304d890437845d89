//! phylostate library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod tree;

#[cfg(test)]
pub mod test_support;

/// How `phylostate` prints a replay report.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}
