//! Display utilities and shared CLI helpers.

use clap::ValueEnum;
use directories::ProjectDirs;
use shipeta_lib::{FEATURE_NAMES, ModelKind};
use std::path::PathBuf;

/// File name of the artifact in the data directory.
pub(crate) const ARTIFACT_FILE: &str = "delivery_time_model.bin";

/// Model family selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum ModelArg {
    Forest,
    Linear,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Forest => Self::Forest,
            ModelArg::Linear => Self::Linear,
        }
    }
}

/// Returns the default artifact location.
///
/// - Linux: `~/.local/share/shipeta/delivery_time_model.bin`
/// - macOS: `~/Library/Application Support/shipeta/delivery_time_model.bin`
/// - Windows: `C:\Users\<User>\AppData\Roaming\shipeta\delivery_time_model.bin`
///
/// Falls back to the working directory if no home directory is known.
pub(crate) fn default_model_path() -> PathBuf {
    ProjectDirs::from("", "", "shipeta").map_or_else(
        || PathBuf::from(ARTIFACT_FILE),
        |dirs| dirs.data_dir().join(ARTIFACT_FILE),
    )
}

/// Resolves an optional `--model`/`--output` flag.
pub(crate) fn model_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(default_model_path)
}

/// Prints feature importances as a bar table, largest first.
pub(crate) fn print_importances(importances: &[f64]) {
    let mut rows: Vec<(&str, f64)> = FEATURE_NAMES
        .iter()
        .copied()
        .zip(importances.iter().copied())
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("\nFeature Importances:");
    println!("{:<16} {:>8}", "FEATURE", "SHARE");
    println!("{}", "-".repeat(46));
    for (name, share) in rows {
        let bar = "#".repeat((share * 20.0).round() as usize);
        println!("{name:<16} {:>7.1}%  {bar}", share * 100.0);
    }
}
