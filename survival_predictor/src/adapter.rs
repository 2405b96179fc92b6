use std::sync::Arc;

use crate::encoder::{self, FeatureRecord};
use crate::error::{ArtifactLoadError, PredictError};
use crate::model::Predictor;
use crate::schema::FeatureSchema;
use crate::types::{Label, PredictionResult, RawInput};

/// Turns feature records into verdicts using a shared, read-only predictor.
#[derive(Clone)]
pub struct PredictionAdapter {
    predictor: Arc<dyn Predictor>,
    schema: &'static FeatureSchema,
}

impl std::fmt::Debug for PredictionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionAdapter")
            .field("version", &self.predictor.version())
            .field("schema", &self.schema.name)
            .finish()
    }
}

impl PredictionAdapter {
    /// Binds `predictor` to `schema`. Fails when the predictor was trained on a
    /// different column list, so a reordered artifact never reaches a request.
    pub fn new(
        predictor: Arc<dyn Predictor>,
        schema: &'static FeatureSchema,
    ) -> Result<Self, ArtifactLoadError> {
        if !schema.matches(predictor.feature_names()) {
            return Err(ArtifactLoadError::Schema {
                schema: schema.name,
                expected: schema.column_names(),
                got: predictor.feature_names().to_vec(),
            });
        }
        Ok(Self { predictor, schema })
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn model_version(&self) -> &str {
        self.predictor.version()
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult, PredictError> {
        if record.schema() != self.schema {
            return Err(PredictError::SchemaMismatch {
                record: record.schema().name,
                predictor: self.schema.name,
            });
        }
        if record.len() != self.schema.len() {
            return Err(PredictError::ColumnCount {
                got: record.len(),
                expected: self.schema.len(),
            });
        }

        let x = record.values();
        let label = self.predictor.predict(x)?;
        let [died, survived] = self.predictor.predict_probability(x)?;

        Ok(PredictionResult {
            survived: label == Label::Survived,
            probability_died: died * 100.0,
            probability_survived: survived * 100.0,
        })
    }

    /// Validate, encode and predict in one step.
    pub fn predict_raw(&self, input: &RawInput) -> Result<PredictionResult, PredictError> {
        let record = encoder::encode_checked(input)?;
        self.predict(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::schema::TITANIC_V0;
    use crate::types::{PassengerClass, Port, Sex};

    /// Fixed answers regardless of input.
    struct Stub {
        names: Vec<String>,
        label: Label,
        proba: [f64; 2],
    }

    impl Stub {
        fn new(label: Label, proba: [f64; 2]) -> Self {
            Self {
                names: TITANIC_V0.column_names(),
                label,
                proba,
            }
        }
    }

    impl Predictor for Stub {
        fn version(&self) -> &str {
            "stub"
        }
        fn feature_names(&self) -> &[String] {
            &self.names
        }
        fn predict(&self, _x: &[f64]) -> Result<Label, ModelError> {
            Ok(self.label)
        }
        fn predict_probability(&self, _x: &[f64]) -> Result<[f64; 2], ModelError> {
            Ok(self.proba)
        }
    }

    fn raw() -> RawInput {
        RawInput {
            age: 40,
            sex: Sex::Male,
            siblings_spouses: 1,
            parents_children: 2,
            fare: 20.0,
            passenger_class: PassengerClass::Third,
            boarded_port: Port::Queenstown,
        }
    }

    #[test]
    fn probabilities_are_scaled_to_percent() {
        let a = PredictionAdapter::new(Arc::new(Stub::new(Label::Died, [0.75, 0.25])), &TITANIC_V0)
            .unwrap();
        let r = a.predict_raw(&raw()).unwrap();
        assert!(!r.survived);
        assert!((r.probability_died - 75.0).abs() < 1e-9);
        assert!((r.probability_survived - 25.0).abs() < 1e-9);
        assert!((r.probability_died + r.probability_survived - 100.0).abs() < 1e-6);
    }

    #[test]
    fn label_is_reported_even_when_probabilities_disagree() {
        let a = PredictionAdapter::new(
            Arc::new(Stub::new(Label::Survived, [0.6, 0.4])),
            &TITANIC_V0,
        )
        .unwrap();
        let r = a.predict_raw(&raw()).unwrap();
        assert!(r.survived);
        assert!(r.probability_survived < r.probability_died);
    }

    #[test]
    fn reordered_predictor_is_rejected_at_construction() {
        let mut stub = Stub::new(Label::Died, [0.5, 0.5]);
        stub.names.swap(6, 8);
        let err = PredictionAdapter::new(Arc::new(stub), &TITANIC_V0).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Schema { .. }));
    }

    #[test]
    fn record_from_another_schema_is_rejected() {
        static OTHER: FeatureSchema = FeatureSchema {
            name: "other",
            columns: ["a", "b", "c", "d", "e", "f", "g", "h", "i"],
        };
        let a = PredictionAdapter::new(Arc::new(Stub::new(Label::Died, [0.5, 0.5])), &TITANIC_V0)
            .unwrap();
        let rec = FeatureRecord::from_parts(&OTHER, vec![0.0; 9]);
        assert!(matches!(
            a.predict(&rec),
            Err(PredictError::SchemaMismatch { record: "other", .. })
        ));
    }

    #[test]
    fn short_record_is_rejected_before_invoking_predictor() {
        let a = PredictionAdapter::new(Arc::new(Stub::new(Label::Died, [0.5, 0.5])), &TITANIC_V0)
            .unwrap();
        let rec = FeatureRecord::from_parts(&TITANIC_V0, vec![0.0; 8]);
        assert!(matches!(
            a.predict(&rec),
            Err(PredictError::ColumnCount { got: 8, expected: 9 })
        ));
    }

    #[test]
    fn invalid_input_is_a_client_error() {
        let a = PredictionAdapter::new(Arc::new(Stub::new(Label::Died, [0.5, 0.5])), &TITANIC_V0)
            .unwrap();
        let mut bad = raw();
        bad.fare = 501.0;
        let err = a.predict_raw(&bad).unwrap_err();
        assert!(err.is_client_error());
    }
}
