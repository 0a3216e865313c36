//! Tabular dataset ingestion.
//!
//! Reads a delimited table with a SMILES column and one selected binary
//! label column, featurizes every row, and drops unusable rows (structure
//! that fails to parse, label that is missing or non-binary) jointly so
//! the matrix and the label vector stay row-aligned throughout.

use std::path::Path;

use tracing::{info, warn};

use toxscreen_core::{Error, Result};
use toxscreen_chem::featurize_with_radius;

use crate::pipeline::TrainingData;

/// Column names and featurizer parameters for one training run.
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    pub smiles_column: String,
    pub label_column: String,
    pub n_bits: usize,
    pub radius: usize,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            smiles_column: "smiles".into(),
            label_column: "NR-AR".into(),
            n_bits: 2048,
            radius: 2,
        }
    }
}

/// Row counts from one ingestion pass, for the console report.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestStats {
    pub total_rows: usize,
    pub unparseable_structures: usize,
    pub missing_labels: usize,
    pub kept_rows: usize,
}

/// Load and featurize a CSV file into [`TrainingData`].
pub fn load_csv(path: &Path, options: &DatasetOptions) -> Result<(TrainingData, IngestStats)> {
    if options.n_bits == 0 {
        return Err(Error::dataset("n_bits must be > 0"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::dataset(format!("cannot open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::dataset(format!("cannot read header row: {e}")))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::dataset(format!("column '{name}' not found in {headers:?}")))
    };
    let smiles_idx = column(&options.smiles_column)?;
    let label_idx = column(&options.label_column)?;

    let mut features: Vec<f64> = Vec::new();
    let mut labels: Vec<u8> = Vec::new();
    let mut stats = IngestStats::default();

    for record in reader.records() {
        let record = record.map_err(|e| Error::dataset(format!("malformed CSV row: {e}")))?;
        stats.total_rows += 1;

        let Some(label) = record.get(label_idx).and_then(parse_binary_label) else {
            stats.missing_labels += 1;
            continue;
        };

        let smiles = record.get(smiles_idx).unwrap_or("");
        let Some(featurized) = featurize_with_radius(smiles, options.radius, options.n_bits)
        else {
            stats.unparseable_structures += 1;
            continue;
        };

        features.extend(featurized.fingerprint.to_dense());
        labels.push(label);
        stats.kept_rows += 1;
    }

    if stats.kept_rows == 0 {
        return Err(Error::dataset(format!(
            "no usable rows in {} ({} total, {} unparseable, {} without labels)",
            path.display(),
            stats.total_rows,
            stats.unparseable_structures,
            stats.missing_labels
        )));
    }

    if stats.kept_rows < stats.total_rows {
        warn!(
            dropped = stats.total_rows - stats.kept_rows,
            unparseable = stats.unparseable_structures,
            missing_labels = stats.missing_labels,
            "dropped unusable rows"
        );
    }
    info!(
        rows = stats.kept_rows,
        n_bits = options.n_bits,
        label = %options.label_column,
        "dataset featurized"
    );

    let data = TrainingData::new(features, options.n_bits, labels)?;
    Ok((data, stats))
}

/// Accept "0"/"1" (also "0.0"/"1.0" as written by dataframe exports);
/// anything else counts as missing.
fn parse_binary_label(field: &str) -> Option<u8> {
    match field.trim() {
        "" => None,
        s => match s.parse::<f64>().ok()? {
            v if v == 0.0 => Some(0),
            v if v == 1.0 => Some(1),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn options(n_bits: usize) -> DatasetOptions {
        DatasetOptions {
            smiles_column: "smiles".into(),
            label_column: "NR-AR".into(),
            n_bits,
            radius: 2,
        }
    }

    #[test]
    fn loads_and_featurizes_rows() {
        let file = write_csv(
            "smiles,NR-AR\n\
             CCO,0\n\
             c1ccccc1,1\n\
             CC(=O)O,0.0\n",
        );
        let (data, stats) = load_csv(file.path(), &options(128)).unwrap();
        assert_eq!(stats.kept_rows, 3);
        assert_eq!(data.n_rows(), 3);
        assert_eq!(data.n_features(), 128);
        assert_eq!(data.positives(), 1);
    }

    #[test]
    fn drops_bad_structures_and_missing_labels_jointly() {
        let file = write_csv(
            "smiles,NR-AR\n\
             CCO,1\n\
             not_a_molecule,1\n\
             CCN,\n\
             CCC,0\n",
        );
        let (data, stats) = load_csv(file.path(), &options(64)).unwrap();
        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.unparseable_structures, 1);
        assert_eq!(stats.missing_labels, 1);
        assert_eq!(data.n_rows(), 2);
        // Alignment: the two kept labels are CCO=1, CCC=0
        assert_eq!(data.positives(), 1);
    }

    #[test]
    fn missing_column_errors() {
        let file = write_csv("smiles,other\nCCO,1\n");
        let err = load_csv(file.path(), &options(64)).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn all_rows_unusable_errors() {
        let file = write_csv("smiles,NR-AR\ngarbage,1\nCCO,\n");
        assert!(load_csv(file.path(), &options(64)).is_err());
    }

    #[test]
    fn zero_bit_width_is_rejected_up_front() {
        let file = write_csv("smiles,NR-AR\nCCO,1\n");
        let err = load_csv(file.path(), &options(0)).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn label_parsing_accepts_float_spellings() {
        assert_eq!(parse_binary_label("0"), Some(0));
        assert_eq!(parse_binary_label("1.0"), Some(1));
        assert_eq!(parse_binary_label(" 1 "), Some(1));
        assert_eq!(parse_binary_label(""), None);
        assert_eq!(parse_binary_label("nan"), None);
        assert_eq!(parse_binary_label("2"), None);
    }
}
