//! Shared serving state: the loaded model and its training-time config.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use toxscreen_chem::{depict_svg, featurize_with_radius};
use toxscreen_core::{ModelConfig, Prediction, Result};
use toxscreen_pipeline::{load_artifacts, ProbClassifier, RandomForest};

/// Immutable after load; cloned `Arc` per request.
pub struct PredictService {
    model: RandomForest,
    config: ModelConfig,
}

/// A scored request, with an SVG depiction when the structure parsed.
pub struct Scored {
    pub prediction: Prediction,
    pub depiction: Option<String>,
}

impl PredictService {
    /// Load the artifacts once at startup.
    pub fn load(artifacts: &Path) -> Result<Arc<Self>> {
        let (model, config) = load_artifacts(artifacts)?;
        Ok(Arc::new(Self { model, config }))
    }

    #[cfg(test)]
    pub fn from_parts(model: RandomForest, config: ModelConfig) -> Arc<Self> {
        Arc::new(Self { model, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }

    /// Score one structure. An unparseable SMILES is a valid outcome, not
    /// an error: the verdict says so and no probability is attached.
    pub fn predict(&self, smiles: &str, threshold: Option<f64>) -> Result<Scored> {
        let threshold = threshold.unwrap_or(self.config.threshold);

        let Some(featurized) =
            featurize_with_radius(smiles, self.config.radius, self.config.n_bits)
        else {
            debug!(smiles, "structure not recognized");
            return Ok(Scored {
                prediction: Prediction::unrecognized(threshold),
                depiction: None,
            });
        };

        let proba = self.model.predict_proba(&featurized.fingerprint.to_dense())?;
        Ok(Scored {
            prediction: Prediction::from_probability(proba[1], threshold),
            depiction: Some(depict_svg(&featurized.molecule)),
        })
    }
}
