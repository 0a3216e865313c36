//! Model artifact persistence.
//!
//! A trained run leaves two JSON files in the artifact directory: the
//! serialized forest and the [`ModelConfig`] the serving surface needs to
//! reproduce the training-time featurization.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use toxscreen_core::{Error, ModelConfig, Result};

use crate::forest::RandomForest;

pub const MODEL_FILE: &str = "model.json";
pub const CONFIG_FILE: &str = "config.json";

/// Write both artifacts into `dir`, creating it if needed.
pub fn save_artifacts(dir: &Path, model: &RandomForest, config: &ModelConfig) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    write_json(&dir.join(MODEL_FILE), model)?;
    write_json(&dir.join(CONFIG_FILE), config)?;

    info!(dir = %dir.display(), "saved model artifacts");
    Ok(())
}

/// Read both artifacts back. Errors name the file that failed so a
/// half-written artifact directory is diagnosable.
pub fn load_artifacts(dir: &Path) -> Result<(RandomForest, ModelConfig)> {
    let model: RandomForest = read_json(&dir.join(MODEL_FILE))?;
    if model.n_trees() == 0 {
        return Err(Error::artifact(format!(
            "{} holds an unfitted model",
            dir.join(MODEL_FILE).display()
        )));
    }
    let config: ModelConfig = read_json(&dir.join(CONFIG_FILE))?;
    if config.n_bits != model.n_features() {
        return Err(Error::artifact(format!(
            "config n_bits {} does not match model feature width {}",
            config.n_bits,
            model.n_features()
        )));
    }

    info!(dir = %dir.display(), trees = model.n_trees(), "loaded model artifacts");
    Ok((model, config))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::artifact(format!("cannot write {}: {e}", path.display())))?;
    serde_json::to_writer(BufWriter::new(file), value)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| Error::artifact(format!("cannot open {}: {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::artifact(format!("corrupt artifact {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ProbClassifier;
    use crate::forest::RandomForestConfig;

    fn fitted_forest() -> RandomForest {
        let data = vec![0.0, 0.0, 0.1, 0.1, 5.0, 5.0, 5.1, 5.1];
        let labels = vec![0, 0, 1, 1];
        let weights = vec![1.0; 4];
        let mut forest = RandomForest::new(RandomForestConfig {
            n_trees: 4,
            ..Default::default()
        });
        forest.fit(&data, 2, &labels, &weights).unwrap();
        forest
    }

    #[test]
    fn round_trip_preserves_model_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let forest = fitted_forest();
        let config = ModelConfig {
            n_bits: 2,
            label_column: "NR-AR".into(),
            ..Default::default()
        };

        save_artifacts(dir.path(), &forest, &config).unwrap();
        let (model, cfg) = load_artifacts(dir.path()).unwrap();

        assert_eq!(model.n_trees(), 4);
        assert_eq!(cfg.label_column, "NR-AR");
        let sample = [5.05, 5.05];
        assert_eq!(
            model.predict_proba(&sample).unwrap(),
            forest.predict_proba(&sample).unwrap()
        );
    }

    #[test]
    fn missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifacts(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn corrupt_model_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), "{not json").unwrap();
        let err = load_artifacts(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn mismatched_width_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig {
            n_bits: 2048,
            ..Default::default()
        };
        save_artifacts(dir.path(), &fitted_forest(), &config).unwrap();
        let err = load_artifacts(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }
}
