//! Info command implementation.
//!
//! Displays the metadata stored in a model artifact along with a summary of
//! the fitted model.

use anyhow::{Context, Result};
use shipeta_lib::{EstimatorState, FEATURE_NAMES, load};
use std::path::PathBuf;

use crate::display::{model_path, print_importances};

/// Show artifact metadata and model summary.
pub(crate) fn show_info(model: Option<PathBuf>) -> Result<()> {
    let path = model_path(model);
    let artifact =
        load(&path).with_context(|| format!("Failed to load model from {}", path.display()))?;
    let metadata = &artifact.metadata;

    println!("Artifact:   {}", path.display());
    println!("ID:         {}", metadata.id);
    println!("Model:      {}", metadata.kind);
    println!("Trained:    {}", metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Examples:   {}", metadata.training_examples);
    match metadata.seed {
        Some(seed) => println!("Seed:       {seed}"),
        None => println!("Seed:       -"),
    }
    println!("Features:   {}", metadata.feature_names.join(", "));
    if let Some(evaluation) = &metadata.evaluation {
        println!("Holdout:    {evaluation}");
    }

    match &artifact.state {
        EstimatorState::Forest(forest) => {
            let trees = forest.trees();
            let leaves: usize = trees.iter().map(|t| t.leaf_count()).sum();
            let max_depth = trees.iter().map(|t| t.depth()).max().unwrap_or(0);
            println!("\nTrees:      {}", trees.len());
            println!("Leaves:     {leaves}");
            println!("Max depth:  {max_depth}");
            print_importances(forest.feature_importances());
        }
        EstimatorState::Linear(linear) => {
            println!("\nIntercept:  {:.6}", linear.intercept());
            for (name, coefficient) in FEATURE_NAMES.iter().zip(linear.coefficients()) {
                println!("{name:<16} {coefficient:>12.6}");
            }
        }
    }

    Ok(())
}
