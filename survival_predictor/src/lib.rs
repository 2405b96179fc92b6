//! Titanic survival demo: form fields → feature vector → pre-trained
//! classifier → verdict and probabilities.

pub mod adapter;
pub mod config;
pub mod encoder;
pub mod error;
pub mod model;
pub mod ports;
pub mod report;
pub mod schema;
pub mod session;
#[cfg(feature = "torch")]
pub mod torch_model;
pub mod types;

pub use adapter::PredictionAdapter;
pub use encoder::{encode, encode_checked, validate, FeatureRecord};
pub use error::{ArtifactLoadError, InvalidInputError, ModelError, PredictError};
pub use model::{load_predictor, Backend, LogisticModel, ModelSource, Predictor};
pub use schema::{FeatureSchema, TITANIC_V0};
pub use types::{Label, PassengerClass, Port, PredictionResult, RawInput, Sex};
