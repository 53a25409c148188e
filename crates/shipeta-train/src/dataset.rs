//! CSV training sets.

use serde::{Deserialize, Serialize};
use shipeta_types::{ExampleError, FeatureVector, TrainingExample, TrainingSet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::TrainError;

/// Column names of a training CSV file, in order.
pub const CSV_HEADER: [&str; 4] = [
    "distance_km",
    "transport_mode",
    "container_type",
    "delivery_days",
];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    distance_km: f64,
    transport_mode: i64,
    container_type: i64,
    delivery_days: f64,
}

impl From<&TrainingExample> for CsvRow {
    fn from(example: &TrainingExample) -> Self {
        Self {
            distance_km: example.features.distance_km,
            transport_mode: example.features.transport_mode,
            container_type: example.features.container_type,
            delivery_days: example.delivery_days,
        }
    }
}

impl From<CsvRow> for TrainingExample {
    fn from(row: CsvRow) -> Self {
        Self::new(
            FeatureVector::encode(row.distance_km, row.transport_mode, row.container_type),
            row.delivery_days,
        )
    }
}

/// Reads a training set from a CSV file.
///
/// # Errors
///
/// Returns [`TrainError::Io`] if the file cannot be opened, and
/// [`TrainError::MalformedExample`] naming the offending line if any row has
/// the wrong shape, an unparsable field or a non-finite value.
pub fn read_csv(path: &Path) -> Result<TrainingSet, TrainError> {
    let file = File::open(path).map_err(|source| TrainError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = read_csv_from(file)?;
    tracing::info!(path = %path.display(), examples = set.len(), "loaded training data");
    Ok(set)
}

/// Reads a training set from any CSV source.
///
/// The first row must be [`CSV_HEADER`]. Surrounding whitespace is ignored.
///
/// # Errors
///
/// See [`read_csv`].
pub fn read_csv_from(source: impl Read) -> Result<TrainingSet, TrainError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let header = reader.headers()?;
    if !header.iter().eq(CSV_HEADER) {
        return Err(ExampleError::at_line(
            1,
            format!("expected header '{}'", CSV_HEADER.join(",")),
        )
        .into());
    }

    let mut set = TrainingSet::default();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let fallback_line = index + 2;
        let row = row.map_err(|err| malformed_row(err, fallback_line))?;
        let example = TrainingExample::from(row);
        example
            .check(index)
            .map_err(|err| ExampleError::at_line(fallback_line, err.reason))?;
        set.push(example);
    }
    Ok(set)
}

fn malformed_row(err: csv::Error, fallback_line: usize) -> TrainError {
    let line = err
        .position()
        .and_then(|pos| usize::try_from(pos.line()).ok())
        .unwrap_or(fallback_line);
    match err.kind() {
        csv::ErrorKind::Deserialize { err: inner, .. } => {
            ExampleError::at_line(line, inner.to_string()).into()
        }
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => ExampleError::at_line(line, format!("expected {expected_len} fields, found {len}"))
            .into(),
        _ => TrainError::Csv(err),
    }
}

/// Writes a training set to a CSV file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(set: &TrainingSet, path: &Path) -> Result<(), TrainError> {
    let io_err = |source| TrainError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    write_csv_to(set, file)?;
    tracing::info!(path = %path.display(), examples = set.len(), "wrote training data");
    Ok(())
}

/// Writes a training set as CSV to any sink.
///
/// An empty set still produces the header row.
///
/// # Errors
///
/// Returns an error if the sink fails.
pub fn write_csv_to(set: &TrainingSet, sink: impl Write) -> Result<(), TrainError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(CSV_HEADER)?;
    for example in set {
        writer.serialize(CsvRow::from(example))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
