//! The end-to-end training run.

use shipeta_model::{Artifact, Evaluation, ModelConfig, train};
use shipeta_types::TrainingSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::{SyntheticConfig, TrainError, generate, read_csv, train_test_split, write_csv};

/// Where training examples come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Generate a synthetic set.
    Synthetic(SyntheticConfig),
    /// Read a CSV file with the standard header.
    Csv(PathBuf),
}

impl Default for DataSource {
    fn default() -> Self {
        Self::Synthetic(SyntheticConfig::default())
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synthetic(config) => write!(
                f,
                "synthetic ({} samples, seed {})",
                config.samples, config.seed
            ),
            Self::Csv(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Settings for a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Training data source.
    pub source: DataSource,
    /// Estimator family and hyperparameters.
    pub model: ModelConfig,
    /// Fraction of examples held out for evaluation; `None` trains on everything.
    pub test_fraction: Option<f64>,
    /// Seed for the holdout shuffle.
    pub split_seed: u64,
    /// Optional path to dump the loaded training set as CSV.
    pub export_data: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            model: ModelConfig::default(),
            test_fraction: Some(0.2),
            split_seed: 42,
            export_data: None,
        }
    }
}

impl PipelineConfig {
    /// Sets the data source.
    #[must_use]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    /// Sets the model configuration.
    #[must_use]
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Sets the holdout fraction.
    #[must_use]
    pub const fn with_test_fraction(mut self, test_fraction: Option<f64>) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Sets the holdout shuffle seed.
    #[must_use]
    pub const fn with_split_seed(mut self, split_seed: u64) -> Self {
        self.split_seed = split_seed;
        self
    }

    /// Dumps the training set to `path` during the run.
    #[must_use]
    pub fn with_export_data(mut self, path: PathBuf) -> Self {
        self.export_data = Some(path);
        self
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// The fitted model with its metadata, ready to save.
    pub artifact: Artifact,
    /// Holdout accuracy, if a holdout was taken.
    pub evaluation: Option<Evaluation>,
    /// Examples used for fitting.
    pub train_examples: usize,
    /// Examples held out.
    pub test_examples: usize,
    /// Wall time of the fit.
    pub fit_time: Duration,
}

/// Runs load, split, fit and evaluate.
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: PipelineConfig,
}

impl TrainingPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the configured training set.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be generated or read.
    pub fn load_data(&self) -> Result<TrainingSet, TrainError> {
        match &self.config.source {
            DataSource::Synthetic(synthetic) => generate(synthetic),
            DataSource::Csv(path) => read_csv(path),
        }
    }

    /// Executes the run. The artifact is not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, splitting, exporting or fitting fails.
    pub fn run(&self) -> Result<TrainingReport, TrainError> {
        let set = self.load_data()?;
        tracing::info!(
            source = %self.config.source,
            examples = set.len(),
            model = %self.config.model.kind(),
            "starting training run"
        );

        if let Some(path) = &self.config.export_data {
            write_csv(&set, path)?;
        }

        let (train_set, test_set) = match self.config.test_fraction {
            Some(fraction) => {
                let (train_set, test_set) =
                    train_test_split(&set, fraction, self.config.split_seed)?;
                (train_set, Some(test_set))
            }
            None => (set, None),
        };

        let started = Instant::now();
        let state = train(&self.config.model, &train_set)?;
        let fit_time = started.elapsed();

        let evaluation = test_set
            .as_ref()
            .and_then(|test_set| Evaluation::of(&state, test_set));
        if let Some(evaluation) = &evaluation {
            tracing::info!(
                mae = evaluation.mae,
                rmse = evaluation.rmse,
                r2 = evaluation.r2,
                samples = evaluation.samples,
                "holdout evaluation"
            );
        }

        let artifact = Artifact::new(state, train_set.len(), self.config.model.seed())
            .with_evaluation(evaluation);

        Ok(TrainingReport {
            artifact,
            evaluation,
            train_examples: train_set.len(),
            test_examples: test_set.as_ref().map_or(0, TrainingSet::len),
            fit_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipeta_model::{Estimator, ForestConfig, ModelError, ModelKind, Predictor};
    use shipeta_types::FeatureVector;
    use tempfile::TempDir;

    fn small_forest() -> ModelConfig {
        ModelConfig::Forest(ForestConfig::default().with_trees(20))
    }

    fn queries() -> Vec<FeatureVector> {
        vec![
            FeatureVector::encode(8000.0, 0, 40),
            FeatureVector::encode(8000.0, 2, 40),
            FeatureVector::encode(350.0, 1, 20),
            FeatureVector::encode(11_500.0, 0, 20),
            FeatureVector::encode(5000.0, 5, 45),
        ]
    }

    #[test]
    fn test_default_run_sea_shipment() {
        let report = TrainingPipeline::default().run().unwrap();
        assert_eq!(report.train_examples, 800);
        assert_eq!(report.test_examples, 200);
        assert_eq!(report.artifact.metadata.kind, ModelKind::Forest);
        assert_eq!(report.artifact.metadata.training_examples, 800);
        assert_eq!(report.artifact.metadata.seed, Some(42));

        let predictor = Predictor::from_artifact(report.artifact);
        // 8000 / 500 + 10 + noise in 1..=4
        let days = predictor.predict(8000.0, 0, 40);
        assert!((24.0..=32.0).contains(&days), "got {days}");
        assert!(predictor.predict(8000.0, 2, 40) < days);

        let evaluation = report.evaluation.unwrap();
        assert_eq!(evaluation.samples, 200);
        assert!(evaluation.r2 > 0.9, "r2 {}", evaluation.r2);
        assert!(evaluation.mae < 2.5, "mae {}", evaluation.mae);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let config = PipelineConfig::default().with_model(small_forest());
        let a = TrainingPipeline::new(config.clone()).run().unwrap();
        let b = TrainingPipeline::new(config).run().unwrap();

        assert_eq!(a.artifact.state, b.artifact.state);
        assert_eq!(a.evaluation, b.evaluation);
        for query in queries() {
            assert_eq!(
                a.artifact.state.predict_batch(&[query]),
                b.artifact.state.predict_batch(&[query])
            );
        }
    }

    #[test]
    fn test_without_holdout() {
        let config = PipelineConfig::default()
            .with_model(ModelConfig::Linear)
            .with_test_fraction(None);
        let report = TrainingPipeline::new(config).run().unwrap();
        assert_eq!(report.train_examples, 1000);
        assert_eq!(report.test_examples, 0);
        assert!(report.evaluation.is_none());
        assert!(report.artifact.metadata.evaluation.is_none());
        assert_eq!(report.artifact.metadata.seed, None);
    }

    #[test]
    fn test_csv_source_and_export() {
        let temp = TempDir::new().unwrap();
        let exported = temp.path().join("synthetic.csv");

        let synthetic = PipelineConfig::default()
            .with_model(small_forest())
            .with_export_data(exported.clone());
        let from_synthetic = TrainingPipeline::new(synthetic).run().unwrap();
        assert!(exported.exists());

        let csv = PipelineConfig::default()
            .with_model(small_forest())
            .with_source(DataSource::Csv(exported));
        let from_csv = TrainingPipeline::new(csv).run().unwrap();

        assert_eq!(from_synthetic.artifact.state, from_csv.artifact.state);
    }

    #[test]
    fn test_malformed_csv_aborts_run() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.csv");
        std::fs::write(
            &path,
            "distance_km,transport_mode,container_type,delivery_days\n8000,0,40,x\n",
        )
        .unwrap();

        let config = PipelineConfig::default().with_source(DataSource::Csv(path));
        let err = TrainingPipeline::new(config).run().unwrap_err();
        assert!(matches!(err, TrainError::MalformedExample(e) if e.location == "line 2"));
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.csv");
        write_csv(&TrainingSet::default(), &path).unwrap();

        let config = PipelineConfig::default()
            .with_source(DataSource::Csv(path.clone()))
            .with_test_fraction(None);
        assert!(matches!(
            TrainingPipeline::new(config).run(),
            Err(TrainError::Model(ModelError::EmptyTrainingSet))
        ));

        let config = PipelineConfig::default().with_source(DataSource::Csv(path));
        assert!(matches!(
            TrainingPipeline::new(config).run(),
            Err(TrainError::InvalidConfig(_))
        ));
    }
}
