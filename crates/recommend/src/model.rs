use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{FEATURE_LEN, FeatureVector};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model layer {layer}: {reason}")]
    Shape { layer: usize, reason: String },

    #[error("model output {0} is outside [0, 1]")]
    OutOfRange(f32),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model definition: {0}")]
    Format(#[from] serde_json::Error),

    #[error("{0}")]
    Inference(String),

    #[error("model source is disabled")]
    Disabled,
}

/// Learned relevance scorer. Implementations must be pure reads so one instance can
/// serve concurrent scoring calls.
pub trait ScoringModel: Send + Sync {
    /// Relevance in `[0, 1]`.
    fn predict(&self, features: &FeatureVector) -> Result<f32, ModelError>;
}

/// What the scoring engine is allowed to use for one pass.
#[derive(Clone, Copy)]
pub enum ModelCapability<'a> {
    Available(&'a dyn ScoringModel),
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply(&self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// Fully connected layer; `weights[unit][input]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn units(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                let sum = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
                self.activation.apply(sum)
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct NetworkDefinition {
    layers: Vec<DenseLayer>,
}

/// Small feed-forward network loaded from a JSON weights file.
///
/// ```json
/// { "layers": [ { "weights": [[...]], "bias": [...], "activation": "relu" }, ... ] }
/// ```
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Checks that the layers chain from [`FEATURE_LEN`] inputs to one sigmoid output.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self, ModelError> {
        let Some(last) = layers.last() else {
            return Err(ModelError::Shape {
                layer: 0,
                reason: "network has no layers".to_owned(),
            });
        };

        if last.units() != 1 || last.activation != Activation::Sigmoid {
            return Err(ModelError::Shape {
                layer: layers.len() - 1,
                reason: "output layer must be a single sigmoid unit".to_owned(),
            });
        }

        let mut inputs = FEATURE_LEN;
        for (index, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.units() {
                return Err(ModelError::Shape {
                    layer: index,
                    reason: format!(
                        "{} weight rows for {} biases",
                        layer.weights.len(),
                        layer.units()
                    ),
                });
            }

            if let Some(row) = layer.weights.iter().find(|row| row.len() != inputs) {
                return Err(ModelError::Shape {
                    layer: index,
                    reason: format!("expected {inputs} inputs, got {}", row.len()),
                });
            }

            inputs = layer.units();
        }

        Ok(Self { layers })
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let definition: NetworkDefinition = serde_json::from_str(json)?;

        Self::from_layers(definition.layers)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let json = tokio::fs::read_to_string(path).await?;

        Self::from_json(&json)
    }
}

impl ScoringModel for DenseNetwork {
    fn predict(&self, features: &FeatureVector) -> Result<f32, ModelError> {
        let output = self
            .layers
            .iter()
            .fold(features.as_slice().to_vec(), |input, layer| {
                layer.forward(&input)
            });

        output
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("network produced no output".to_owned()))
    }
}

/// Produces a model from somewhere other than a local file, e.g. an artifact store.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn ScoringModel>, ModelError>;
}

/// Where the engine gets its model from.
#[derive(Clone, Default)]
pub enum ModelSource {
    #[default]
    Disabled,
    File(PathBuf),
    Loader(Arc<dyn ModelLoader>),
    Preloaded(Arc<dyn ScoringModel>),
}

/// Owns the optional learned model for the lifetime of a recommender.
///
/// Loads are single-flight: concurrent callers queue behind the one in progress and
/// return as soon as it lands. A failed load leaves the engine unavailable so a later
/// call can retry.
pub struct ModelEngine {
    source: ModelSource,
    model: RwLock<Option<Arc<dyn ScoringModel>>>,
    loading: Mutex<()>,
}

impl ModelEngine {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            model: RwLock::new(None),
            loading: Mutex::new(()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(ModelSource::Disabled)
    }

    pub async fn initialize(&self) -> Result<(), ModelError> {
        if matches!(self.source, ModelSource::Disabled) || self.is_ready() {
            return Ok(());
        }

        let _loading = self.loading.lock().await;
        if self.is_ready() {
            return Ok(());
        }

        let model = self.load().await?;
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Some(model);

        Ok(())
    }

    async fn load(&self) -> Result<Arc<dyn ScoringModel>, ModelError> {
        match &self.source {
            ModelSource::Disabled => Err(ModelError::Disabled),
            ModelSource::File(path) => {
                tracing::info!("Loading scoring model from {}", path.display());
                Ok(Arc::new(DenseNetwork::load(path).await?))
            }
            ModelSource::Loader(loader) => loader.load().await,
            ModelSource::Preloaded(model) => Ok(model.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Snapshot of the loaded model, if any. Holding it keeps the model alive across
    /// a concurrent [`Self::dispose`].
    pub fn model(&self) -> Option<Arc<dyn ScoringModel>> {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the loaded model. The engine can be initialized again afterwards.
    pub fn dispose(&self) {
        let disposed = self
            .model
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if disposed.is_some() {
            tracing::info!("Scoring model disposed");
        }
    }
}

impl<'a> From<Option<&'a Arc<dyn ScoringModel>>> for ModelCapability<'a> {
    fn from(model: Option<&'a Arc<dyn ScoringModel>>) -> Self {
        match model {
            Some(model) => ModelCapability::Available(model.as_ref()),
            None => ModelCapability::Unavailable,
        }
    }
}
