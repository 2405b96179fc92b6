//! Column layout the classifier was trained on.
//!
//! Every [`FeatureRecord`](crate::encoder::FeatureRecord) is stamped with the
//! schema that produced it, and the adapter refuses to hand a record to a
//! predictor whose declared feature list differs.

use serde::Serialize;

pub const FEATURE_COUNT: usize = 9;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    pub name: &'static str,
    pub columns: [&'static str; FEATURE_COUNT],
}

pub static TITANIC_V0: FeatureSchema = FeatureSchema {
    name: "titanic_v0",
    columns: [
        "Pclass",
        "Sex",
        "Age",
        "SibSp",
        "Parch",
        "Fare",
        "Embarked_C",
        "Embarked_Q",
        "Embarked_S",
    ],
};

impl FeatureSchema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when `names` lists exactly these columns in this order.
    pub fn matches<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.len() == self.columns.len()
            && names
                .iter()
                .zip(self.columns.iter())
                .all(|(a, b)| a.as_ref() == *b)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.to_string()).collect()
    }
}
