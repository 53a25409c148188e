//! Persisted model artifacts.
//!
//! Layout (all integers big-endian):
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0      | 8    | magic `SHIPETA\0`             |
//! | 8      | 2    | `u16` format version          |
//! | 10     | 8    | `u64` payload length in bytes |
//! | 18     | n    | bincode payload               |
//!
//! The payload is the bincode encoding of [`Artifact`]: its metadata
//! (including the feature order the model was trained on) and the fitted
//! [`EstimatorState`].

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipeta_types::FEATURE_NAMES;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::{EstimatorState, Evaluation, ModelError, ModelKind};

/// Leading bytes of every artifact file.
pub const ARTIFACT_MAGIC: &[u8; 8] = b"SHIPETA\0";

/// Current artifact format version.
pub const ARTIFACT_VERSION: u16 = 1;

/// Header size: magic + version + payload length.
const HEADER_LEN: usize = 8 + 2 + 8;

/// Reasons an artifact's bytes cannot be decoded.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// File does not start with [`ARTIFACT_MAGIC`].
    #[error("not a shipeta model artifact (bad magic bytes)")]
    BadMagic,

    /// Written by an unknown format version.
    #[error("unsupported artifact version {found} (expected {})", ARTIFACT_VERSION)]
    UnsupportedVersion {
        /// Version found in the header.
        found: u16,
    },

    /// Fewer bytes than the header declares.
    #[error("truncated artifact: expected {expected} bytes, found {actual}")]
    Truncated {
        /// Bytes the header promised.
        expected: u64,
        /// Bytes actually present.
        actual: u64,
    },

    /// Trailing bytes after the payload.
    #[error("{0} unexpected trailing bytes after payload")]
    TrailingBytes(u64),

    /// Payload is not a valid encoding.
    #[error("payload decode failed: {0}")]
    Payload(#[from] bincode::Error),

    /// The model was trained on a different feature order.
    #[error("feature order mismatch: artifact has {found:?}, expected {:?}", FEATURE_NAMES)]
    FeatureOrder {
        /// Feature names recorded in the artifact.
        found: Vec<String>,
    },

    /// The payload decoded but the model inside it is malformed.
    #[error("invalid model in artifact: {0}")]
    InvalidModel(#[source] ModelError),
}

/// Errors that can occur while saving or loading an artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file does not exist.
    #[error("Model artifact not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the artifact file.
    #[error("Failed to read model artifact '{path}': {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the artifact file.
    #[error("Failed to write model artifact '{path}': {source}")]
    Write {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact exists but is unreadable.
    #[error("Corrupt model artifact '{path}': {source}")]
    Corrupt {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        source: DecodeError,
    },

    /// Failed to encode the artifact payload.
    #[error("Failed to encode model artifact: {0}")]
    Encode(#[source] bincode::Error),
}

/// Descriptive information stored alongside a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Unique artifact identifier.
    pub id: Uuid,
    /// When training finished.
    pub trained_at: DateTime<Utc>,
    /// Model family.
    pub kind: ModelKind,
    /// Number of examples the model was fitted on.
    pub training_examples: usize,
    /// Seed used for fitting, if the model family is randomized.
    pub seed: Option<u64>,
    /// Feature names in the order the model consumes them.
    pub feature_names: Vec<String>,
    /// Accuracy on a held-out split, if one was evaluated.
    pub evaluation: Option<Evaluation>,
}

/// A fitted model together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Descriptive metadata.
    pub metadata: ArtifactMetadata,
    /// The fitted model.
    pub state: EstimatorState,
}

impl Artifact {
    /// Wraps a freshly fitted state with new metadata.
    #[must_use]
    pub fn new(state: EstimatorState, training_examples: usize, seed: Option<u64>) -> Self {
        let metadata = ArtifactMetadata {
            id: Uuid::new_v4(),
            trained_at: Utc::now(),
            kind: state.kind(),
            training_examples,
            seed,
            feature_names: FEATURE_NAMES.iter().map(ToString::to_string).collect(),
            evaluation: None,
        };
        Self { metadata, state }
    }

    /// Attaches a holdout evaluation.
    #[must_use]
    pub fn with_evaluation(mut self, evaluation: Option<Evaluation>) -> Self {
        self.metadata.evaluation = evaluation;
        self
    }

    /// Encodes the artifact into its on-disk byte layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let payload = bincode::serialize(self).map_err(ArtifactError::Encode)?;

        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[..8].copy_from_slice(ARTIFACT_MAGIC);
        BigEndian::write_u16(&mut bytes[8..10], ARTIFACT_VERSION);
        BigEndian::write_u64(&mut bytes[10..18], payload.len() as u64);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decodes an artifact from its on-disk byte layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid, the payload is truncated or
    /// undecodable, the recorded feature order differs from
    /// [`FEATURE_NAMES`], or the decoded model is structurally invalid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            if bytes.len() < 8 || &bytes[..8] != ARTIFACT_MAGIC {
                return Err(DecodeError::BadMagic);
            }
            return Err(DecodeError::Truncated {
                expected: HEADER_LEN as u64,
                actual: bytes.len() as u64,
            });
        }
        if &bytes[..8] != ARTIFACT_MAGIC {
            return Err(DecodeError::BadMagic);
        }

        let version = BigEndian::read_u16(&bytes[8..10]);
        if version != ARTIFACT_VERSION {
            return Err(DecodeError::UnsupportedVersion { found: version });
        }

        let declared = BigEndian::read_u64(&bytes[10..18]);
        let actual = (bytes.len() - HEADER_LEN) as u64;
        if actual < declared {
            return Err(DecodeError::Truncated {
                expected: HEADER_LEN as u64 + declared,
                actual: bytes.len() as u64,
            });
        }
        if actual > declared {
            return Err(DecodeError::TrailingBytes(actual - declared));
        }

        let artifact: Self = bincode::deserialize(&bytes[HEADER_LEN..])?;
        if artifact.metadata.feature_names != FEATURE_NAMES {
            return Err(DecodeError::FeatureOrder {
                found: artifact.metadata.feature_names,
            });
        }
        artifact.state.validate().map_err(DecodeError::InvalidModel)?;
        Ok(artifact)
    }
}

/// Writes an artifact to `path`, creating parent directories as needed.
///
/// The bytes are written to a sibling temporary file and renamed into place,
/// so a reader never observes a partially written artifact.
///
/// # Errors
///
/// Returns an error if encoding or any filesystem operation fails.
pub fn save(artifact: &Artifact, path: &Path) -> Result<(), ArtifactError> {
    let bytes = artifact.to_bytes()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ArtifactError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).map_err(|e| ArtifactError::Write {
        path: tmp.clone(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| ArtifactError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        id = %artifact.metadata.id,
        kind = %artifact.metadata.kind,
        bytes = bytes.len(),
        "saved model artifact"
    );
    Ok(())
}

/// Reads an artifact from `path`.
///
/// # Errors
///
/// Returns [`ArtifactError::NotFound`] if the file is missing,
/// [`ArtifactError::Read`] if it cannot be read, and
/// [`ArtifactError::Corrupt`] if its contents are invalid.
pub fn load(path: &Path) -> Result<Artifact, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| ArtifactError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let artifact = Artifact::from_bytes(&bytes).map_err(|e| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        id = %artifact.metadata.id,
        kind = %artifact.metadata.kind,
        "loaded model artifact"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Estimator, ForestConfig, LinearRegression, ModelConfig, Node, RandomForest,
        RegressionTree, train,
    };
    use shipeta_types::{FeatureVector, TrainingExample, TrainingSet};
    use tempfile::TempDir;

    fn fitted_artifact() -> Artifact {
        let set: TrainingSet = (0..60)
            .map(|i| {
                let distance = 300.0 + 190.0 * f64::from(i);
                let mode = i64::from(i % 3);
                let container = if i % 2 == 0 { 20 } else { 40 };
                TrainingExample::new(
                    FeatureVector::encode(distance, mode, container),
                    distance / 500.0 + f64::from(i % 4),
                )
            })
            .collect();
        let config = ModelConfig::Forest(ForestConfig::default().with_trees(8));
        let state = train(&config, &set).unwrap();
        Artifact::new(state, set.len(), config.seed())
    }

    fn queries() -> Vec<FeatureVector> {
        vec![
            FeatureVector::encode(8000.0, 0, 40),
            FeatureVector::encode(450.5, 2, 20),
            FeatureVector::encode(12000.0, 1, 40),
            FeatureVector::encode(-1.0, 5, 33),
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("models").join("delivery.bin");
        let artifact = fitted_artifact();

        save(&artifact, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, artifact);
        for query in queries() {
            assert_eq!(loaded.state.predict(&query), artifact.state.predict(&query));
        }
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_header_layout() {
        let bytes = fitted_artifact().to_bytes().unwrap();
        assert_eq!(&bytes[..8], ARTIFACT_MAGIC);
        assert_eq!(BigEndian::read_u16(&bytes[8..10]), ARTIFACT_VERSION);
        assert_eq!(
            BigEndian::read_u64(&bytes[10..18]) as usize,
            bytes.len() - HEADER_LEN
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load(&temp.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_load_garbage_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("garbage.bin");
        fs::write(&path, b"definitely not a model").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Corrupt {
                source: DecodeError::BadMagic,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = fitted_artifact().to_bytes().unwrap();
        let cut = &bytes[..bytes.len() - 10];
        assert!(matches!(
            Artifact::from_bytes(cut),
            Err(DecodeError::Truncated { .. })
        ));
        assert!(matches!(
            Artifact::from_bytes(&bytes[..12]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = fitted_artifact().to_bytes().unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            Artifact::from_bytes(&bytes),
            Err(DecodeError::TrailingBytes(3))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = fitted_artifact().to_bytes().unwrap();
        BigEndian::write_u16(&mut bytes[8..10], 99);
        assert!(matches!(
            Artifact::from_bytes(&bytes),
            Err(DecodeError::UnsupportedVersion { found: 99 })
        ));
    }

    #[test]
    fn test_corrupted_payload() {
        let mut bytes = fitted_artifact().to_bytes().unwrap();
        // Overwrite the payload with an enum tag bincode cannot accept.
        let len = bytes.len();
        for b in &mut bytes[HEADER_LEN..len] {
            *b = 0xff;
        }
        assert!(matches!(
            Artifact::from_bytes(&bytes),
            Err(DecodeError::Payload(_))
        ));
    }

    #[test]
    fn test_feature_order_mismatch() {
        let mut artifact = fitted_artifact();
        artifact.metadata.feature_names.swap(1, 2);
        let bytes = artifact.to_bytes().unwrap();
        assert!(matches!(
            Artifact::from_bytes(&bytes),
            Err(DecodeError::FeatureOrder { .. })
        ));
    }

    fn decode_state(state: EstimatorState) -> Result<Artifact, DecodeError> {
        let bytes = Artifact::new(state, 1, None).to_bytes().unwrap();
        Artifact::from_bytes(&bytes)
    }

    fn forest_of(nodes: Vec<Node>) -> EstimatorState {
        EstimatorState::Forest(RandomForest::from_trees(vec![RegressionTree::from_nodes(nodes)]))
    }

    fn assert_invalid_model(result: Result<Artifact, DecodeError>) {
        assert!(
            matches!(
                result,
                Err(DecodeError::InvalidModel(ModelError::InvalidStructure(_)))
            ),
            "expected invalid model, got {result:?}"
        );
    }

    #[test]
    fn test_empty_forest_is_rejected() {
        assert_invalid_model(decode_state(EstimatorState::Forest(RandomForest::from_trees(
            Vec::new(),
        ))));
    }

    #[test]
    fn test_out_of_range_child_is_rejected() {
        let nodes = vec![
            Node::Split {
                feature: 0,
                threshold: 500.0,
                left: 1,
                right: 99,
            },
            Node::Leaf {
                value: 3.0,
                samples: 1,
            },
        ];
        assert_invalid_model(decode_state(forest_of(nodes)));
    }

    #[test]
    fn test_node_cycle_is_rejected() {
        let nodes = vec![
            Node::Split {
                feature: 0,
                threshold: 500.0,
                left: 1,
                right: 2,
            },
            Node::Split {
                feature: 1,
                threshold: 0.5,
                left: 0,
                right: 2,
            },
            Node::Leaf {
                value: 3.0,
                samples: 1,
            },
        ];
        assert_invalid_model(decode_state(forest_of(nodes)));
    }

    #[test]
    fn test_unknown_split_feature_is_rejected() {
        let nodes = vec![
            Node::Split {
                feature: 3,
                threshold: 500.0,
                left: 1,
                right: 2,
            },
            Node::Leaf {
                value: 3.0,
                samples: 1,
            },
            Node::Leaf {
                value: 4.0,
                samples: 1,
            },
        ];
        assert_invalid_model(decode_state(forest_of(nodes)));
    }

    #[test]
    fn test_non_finite_leaf_is_rejected() {
        let nodes = vec![Node::Leaf {
            value: f64::NAN,
            samples: 1,
        }];
        assert_invalid_model(decode_state(forest_of(nodes)));
    }

    #[test]
    fn test_non_finite_linear_parameters_are_rejected() {
        let state = EstimatorState::Linear(LinearRegression::new(1.0, [f64::INFINITY, 0.0, 0.0]));
        assert_invalid_model(decode_state(state));
    }

    #[test]
    fn test_hand_built_models_decode() {
        let nodes = vec![Node::Leaf {
            value: 3.0,
            samples: 1,
        }];
        let decoded = decode_state(forest_of(nodes)).unwrap();
        assert_eq!(decoded.state.predict(&FeatureVector::encode(8000.0, 0, 40)), 3.0);

        let linear = EstimatorState::Linear(LinearRegression::new(1.0, [0.001, 0.0, 0.0]));
        assert!(decode_state(linear).is_ok());
    }

    #[test]
    fn test_corrupt_model_file_fails_to_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.bin");
        let nodes = vec![Node::Leaf {
            value: f64::INFINITY,
            samples: 1,
        }];
        let artifact = Artifact::new(forest_of(nodes), 1, None);
        std::fs::write(&path, artifact.to_bytes().unwrap()).unwrap();
        assert!(matches!(
            load(&path),
            Err(ArtifactError::Corrupt {
                source: DecodeError::InvalidModel(_),
                ..
            })
        ));
    }

    #[test]
    fn test_metadata() {
        let artifact = fitted_artifact().with_evaluation(None);
        assert_eq!(artifact.metadata.kind, ModelKind::Forest);
        assert_eq!(artifact.metadata.training_examples, 60);
        assert_eq!(artifact.metadata.seed, Some(42));
        assert_eq!(artifact.metadata.feature_names, FEATURE_NAMES);
    }
}
