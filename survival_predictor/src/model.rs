use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use crate::error::{ArtifactLoadError, ModelError};
use crate::types::Label;

/// Opaque binary classifier. `x` is one row laid out in `feature_names()` order.
pub trait Predictor: Send + Sync {
    fn version(&self) -> &str;

    fn feature_names(&self) -> &[String];

    fn predict(&self, x: &[f64]) -> Result<Label, ModelError>;

    /// `[p_died, p_survived]`, each in [0, 1].
    fn predict_probability(&self, x: &[f64]) -> Result<[f64; 2], ModelError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetaJson {
    #[serde(default)]
    pub(crate) version: Option<String>,
    pub(crate) feat_list: Vec<String>,
    #[serde(default)]
    pub(crate) in_dim: Option<usize>,
}

impl MetaJson {
    /// `feat_list` is authoritative; a disagreeing `in_dim` is only reported.
    pub(crate) fn check_in_dim(&self) {
        if let Some(in_dim) = self.in_dim {
            if in_dim != self.feat_list.len() {
                tracing::warn!(
                    "meta.in_dim ({}) != feat_list.len() ({}); using feat_list.len()",
                    in_dim,
                    self.feat_list.len()
                );
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct LogisticJson {
    meta: MetaJson,
    coef: Vec<f64>,
    intercept: f64,
}

pub(crate) fn read_artifact(path: &Path) -> Result<String, ArtifactLoadError> {
    fs::read_to_string(path).map_err(|source| ArtifactLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Version fallback when the artifact does not name itself: the file stem.
pub(crate) fn version_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unversioned")
        .to_string()
}

/// Logistic-regression export: `p_survived = σ(coef · x + intercept)`.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    version: String,
    feat_list: Vec<String>,
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticModel {
    pub fn new(
        version: impl Into<String>,
        feat_list: Vec<String>,
        coef: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ArtifactLoadError> {
        if coef.len() != feat_list.len() {
            return Err(ArtifactLoadError::Invalid(format!(
                "coef has {} entries but feat_list has {}",
                coef.len(),
                feat_list.len()
            )));
        }
        if !intercept.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactLoadError::Invalid(
                "non-finite coefficient".to_string(),
            ));
        }
        Ok(Self {
            version: version.into(),
            feat_list,
            coef,
            intercept,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let txt = read_artifact(path)?;
        let raw: LogisticJson =
            serde_json::from_str(&txt).map_err(|source| ArtifactLoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        raw.meta.check_in_dim();
        let version = raw.meta.version.unwrap_or_else(|| version_from_path(path));
        Self::new(version, raw.meta.feat_list, raw.coef, raw.intercept)
    }

    fn decision(&self, x: &[f64]) -> Result<f64, ModelError> {
        if x.len() != self.coef.len() {
            return Err(ModelError::FeatureLength {
                got: x.len(),
                expected: self.coef.len(),
            });
        }
        let z: f64 = self.coef.iter().zip(x).map(|(w, v)| w * v).sum();
        Ok(z + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for LogisticModel {
    fn version(&self) -> &str {
        &self.version
    }

    fn feature_names(&self) -> &[String] {
        &self.feat_list
    }

    fn predict(&self, x: &[f64]) -> Result<Label, ModelError> {
        let z = self.decision(x)?;
        Ok(if z > 0.0 { Label::Survived } else { Label::Died })
    }

    fn predict_probability(&self, x: &[f64]) -> Result<[f64; 2], ModelError> {
        let p = sigmoid(self.decision(x)?);
        Ok([1.0 - p, p])
    }
}

/// Which loader reads the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Json,
    Torch,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "torch" => Ok(Backend::Torch),
            other => Err(format!("unknown model backend {other:?} (expected json or torch)")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Json => "json",
            Backend::Torch => "torch",
        })
    }
}

/// Where the artifact lives and how to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub backend: Backend,
    pub model_path: PathBuf,
    /// Sidecar feature list, torch backend only.
    pub meta_path: Option<PathBuf>,
}

/// Load the process-wide predictor. Called once at startup.
pub fn load_predictor(src: &ModelSource) -> Result<Arc<dyn Predictor>, ArtifactLoadError> {
    match src.backend {
        Backend::Json => Ok(Arc::new(LogisticModel::load(&src.model_path)?)),
        #[cfg(feature = "torch")]
        Backend::Torch => {
            let meta = src.meta_path.as_deref().ok_or_else(|| {
                ArtifactLoadError::Invalid("torch backend needs META_PATH".to_string())
            })?;
            Ok(Arc::new(crate::torch_model::TorchModel::load(
                &src.model_path,
                meta,
            )?))
        }
        #[cfg(not(feature = "torch"))]
        Backend::Torch => Err(ArtifactLoadError::Invalid(
            "built without the `torch` feature".to_string(),
        )),
    }
}
