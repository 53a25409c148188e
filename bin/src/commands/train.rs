//! Train command implementation.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use shipeta_lib::{
    DataSource, ForestConfig, ModelConfig, ModelKind, PipelineConfig, SyntheticConfig,
    TrainingPipeline, save,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::display::{ModelArg, model_path, print_importances};

/// Flags of the `train` subcommand.
pub(crate) struct TrainArgs {
    pub(crate) data: Option<PathBuf>,
    pub(crate) samples: usize,
    pub(crate) seed: u64,
    pub(crate) model: ModelArg,
    pub(crate) trees: usize,
    pub(crate) max_depth: Option<usize>,
    pub(crate) test_fraction: f64,
    pub(crate) output: Option<PathBuf>,
    pub(crate) export_data: Option<PathBuf>,
    pub(crate) quiet: bool,
}

impl TrainArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        let source = self.data.clone().map_or_else(
            || {
                DataSource::Synthetic(
                    SyntheticConfig::default()
                        .with_samples(self.samples)
                        .with_seed(self.seed),
                )
            },
            DataSource::Csv,
        );

        let model = match ModelKind::from(self.model) {
            ModelKind::Forest => ModelConfig::Forest(
                ForestConfig::default()
                    .with_trees(self.trees)
                    .with_seed(self.seed)
                    .with_max_depth(self.max_depth),
            ),
            ModelKind::Linear => ModelConfig::Linear,
        };

        let test_fraction = (self.test_fraction > 0.0).then_some(self.test_fraction);

        let config = PipelineConfig::default()
            .with_source(source)
            .with_model(model)
            .with_test_fraction(test_fraction)
            .with_split_seed(self.seed);
        match &self.export_data {
            Some(path) => config.with_export_data(path.clone()),
            None => config,
        }
    }
}

/// Train a model, report holdout accuracy and save the artifact.
pub(crate) fn train(args: TrainArgs) -> Result<()> {
    let config = args.pipeline_config();
    let output = model_path(args.output.clone());

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.set_message(format!("Training {} on {}", config.model.kind(), config.source));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let report = TrainingPipeline::new(config)
        .run()
        .context("Training failed")?;
    progress.finish_with_message(format!(
        "Trained {} on {} examples in {:.2?}",
        report.artifact.metadata.kind, report.train_examples, report.fit_time
    ));

    save(&report.artifact, &output)
        .with_context(|| format!("Failed to save model to {}", output.display()))?;

    if !args.quiet {
        match &report.evaluation {
            Some(evaluation) => println!("Holdout: {evaluation}"),
            None => println!("Holdout: disabled"),
        }
        if let Some(importances) = report.artifact.state.feature_importances() {
            print_importances(importances);
        }
        println!("\nModel written to: {}", output.display());
    }

    Ok(())
}
