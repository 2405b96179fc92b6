use std::path::PathBuf;

/// The classifier could not be brought up. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to read model artifact at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error("feature list {got:?} does not match schema {schema} {expected:?}")]
    Schema {
        schema: &'static str,
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("failed to load TorchScript module: {0}")]
    Torch(String),
}

/// A form field outside the range the model was trained on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("age must not be negative, got {0}")]
    NegativeAge(i32),

    #[error("siblings/spouses must be between 0 and 8, got {0}")]
    SiblingsSpouses(u8),

    #[error("parents/children must be between 0 and 8, got {0}")]
    ParentsChildren(u8),

    #[error("fare must be between 15 and 500, got {0}")]
    Fare(f64),
}

/// Failure inside a predictor backend.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature length mismatch: got {got}, expected {expected}")]
    FeatureLength { got: usize, expected: usize },

    #[error("unexpected model output: {0}")]
    Output(String),

    #[error("backend: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("record built for schema {record} but predictor expects {predictor}")]
    SchemaMismatch {
        record: &'static str,
        predictor: &'static str,
    },

    #[error("record has {got} columns, predictor expects {expected}")]
    ColumnCount { got: usize, expected: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PredictError {
    /// Errors the caller can fix by changing the form.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::InvalidInput(_))
    }
}
