//! TorchScript backend. Built with `--features torch`.

use parking_lot::Mutex;
use std::path::Path;
use tch::{kind::Kind, CModule, Device, Tensor};

use crate::error::{ArtifactLoadError, ModelError};
use crate::model::{read_artifact, version_from_path, MetaJson, Predictor};
use crate::types::Label;

fn load_err(e: tch::TchError) -> ArtifactLoadError {
    ArtifactLoadError::Torch(e.to_string())
}

/// Module whose forward pass maps `[1, in_dim]` features to `[1, 2]` logits.
pub struct TorchModel {
    module: Mutex<CModule>,
    device: Device,
    version: String,
    feat_list: Vec<String>,
}

impl TorchModel {
    pub fn load(model_path: &Path, meta_path: &Path) -> Result<Self, ArtifactLoadError> {
        let device = Device::Cpu;

        let meta_txt = read_artifact(meta_path)?;
        let meta: MetaJson =
            serde_json::from_str(&meta_txt).map_err(|source| ArtifactLoadError::Parse {
                path: meta_path.to_path_buf(),
                source,
            })?;
        meta.check_in_dim();
        let in_dim = meta.feat_list.len();

        let module = CModule::load_on_device(model_path, device).map_err(load_err)?;

        // Probe output shape with a dummy forward, expect [B=1, 2]
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let t = module.forward_ts(&[dummy]).map_err(load_err)?;
        let sz = t.size();
        if sz != [1, 2] {
            return Err(ArtifactLoadError::Invalid(format!(
                "unexpected model output size: {sz:?}"
            )));
        }

        Ok(Self {
            module: Mutex::new(module),
            device,
            version: meta.version.unwrap_or_else(|| version_from_path(model_path)),
            feat_list: meta.feat_list,
        })
    }

    fn probabilities(&self, x: &[f64]) -> Result<[f64; 2], ModelError> {
        if x.len() != self.feat_list.len() {
            return Err(ModelError::FeatureLength {
                got: x.len(),
                expected: self.feat_list.len(),
            });
        }
        let row: Vec<f32> = x.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&row)
            .reshape([1, row.len() as i64])
            .to_device(self.device);

        let logits = self
            .module
            .lock()
            .forward_ts(&[input])
            .map_err(|e| ModelError::Backend(e.to_string()))?;
        let probs = logits.softmax(-1, Kind::Double);
        if probs.size() != [1, 2] {
            return Err(ModelError::Output(format!("shape {:?}", probs.size())));
        }
        Ok([probs.double_value(&[0, 0]), probs.double_value(&[0, 1])])
    }
}

impl Predictor for TorchModel {
    fn version(&self) -> &str {
        &self.version
    }

    fn feature_names(&self) -> &[String] {
        &self.feat_list
    }

    fn predict(&self, x: &[f64]) -> Result<Label, ModelError> {
        let [died, survived] = self.probabilities(x)?;
        Ok(if survived > died { Label::Survived } else { Label::Died })
    }

    fn predict_probability(&self, x: &[f64]) -> Result<[f64; 2], ModelError> {
        self.probabilities(x)
    }
}
