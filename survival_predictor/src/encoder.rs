//! Raw form fields → model feature vector.
//!
//! Column order is fixed by [`TITANIC_V0`]; age and fare go through
//! untouched because the classifier was fit on raw values.

use serde::Serialize;

use crate::error::InvalidInputError;
use crate::schema::{FeatureSchema, TITANIC_V0};
use crate::types::RawInput;

pub const MAX_RELATIVES: u8 = 8;
pub const MIN_FARE: f64 = 15.0;
pub const MAX_FARE: f64 = 500.0;

/// Ordered feature values tagged with the schema that laid them out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    #[serde(skip)]
    schema: &'static FeatureSchema,
    values: Vec<f64>,
}

impl FeatureRecord {
    /// Assemble a record from values already in `schema` order.
    pub fn from_parts(schema: &'static FeatureSchema, values: Vec<f64>) -> Self {
        Self { schema, values }
    }

    pub fn zeros(schema: &'static FeatureSchema) -> Self {
        Self::from_parts(schema, vec![0.0; schema.len()])
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs, for logging.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema.columns.iter().copied().zip(self.values.iter().copied())
    }
}

/// Check the numeric fields the form widgets are supposed to constrain.
pub fn validate(input: &RawInput) -> Result<(), InvalidInputError> {
    if input.age < 0 {
        return Err(InvalidInputError::NegativeAge(input.age));
    }
    if input.siblings_spouses > MAX_RELATIVES {
        return Err(InvalidInputError::SiblingsSpouses(input.siblings_spouses));
    }
    if input.parents_children > MAX_RELATIVES {
        return Err(InvalidInputError::ParentsChildren(input.parents_children));
    }
    // NaN fails the range check too.
    if !(MIN_FARE..=MAX_FARE).contains(&input.fare) {
        return Err(InvalidInputError::Fare(input.fare));
    }
    Ok(())
}

/// Lay out `input` as
/// `[Pclass, Sex, Age, SibSp, Parch, Fare, Embarked_C, Embarked_Q, Embarked_S]`.
///
/// Total: does not range-check. Use [`encode_checked`] on untrusted input.
pub fn encode(input: &RawInput) -> FeatureRecord {
    let [c, q, s] = input.boarded_port.one_hot();
    let values = vec![
        f64::from(input.passenger_class.number()),
        input.sex.encoded(),
        f64::from(input.age),
        f64::from(input.siblings_spouses),
        f64::from(input.parents_children),
        input.fare,
        c,
        q,
        s,
    ];
    FeatureRecord::from_parts(&TITANIC_V0, values)
}

pub fn encode_checked(input: &RawInput) -> Result<FeatureRecord, InvalidInputError> {
    validate(input)?;
    Ok(encode(input))
}
