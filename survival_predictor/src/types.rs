use serde::{Deserialize, Serialize};
use std::fmt;

/// One form submission. Field names follow the form, not the model columns.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawInput {
    pub age: i32,
    pub sex: Sex,
    pub siblings_spouses: u8, // 0..=8
    pub parents_children: u8, // 0..=8
    pub fare: f64,            // 15..=500
    pub passenger_class: PassengerClass,
    pub boarded_port: Port,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const CHOICES: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn encoded(self) -> f64 {
        match self {
            Sex::Male => 0.0,
            Sex::Female => 1.0,
        }
    }
}

/// Ticket class, carried on the wire as the bare integer 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    pub const CHOICES: [PassengerClass; 3] = [
        PassengerClass::First,
        PassengerClass::Second,
        PassengerClass::Third,
    ];

    pub fn number(self) -> u8 {
        match self {
            PassengerClass::First => 1,
            PassengerClass::Second => 2,
            PassengerClass::Third => 3,
        }
    }
}

impl From<PassengerClass> for u8 {
    fn from(class: PassengerClass) -> u8 {
        class.number()
    }
}

impl TryFrom<u8> for PassengerClass {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(PassengerClass::First),
            2 => Ok(PassengerClass::Second),
            3 => Ok(PassengerClass::Third),
            other => Err(format!("passenger class must be 1, 2 or 3, got {other}")),
        }
    }
}

/// Port of embarkation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Port {
    Southampton,
    Cherbourg,
    Queenstown,
}

impl Port {
    /// Order the form offers them in.
    pub const CHOICES: [Port; 3] = [Port::Cherbourg, Port::Queenstown, Port::Southampton];

    pub fn name(self) -> &'static str {
        match self {
            Port::Southampton => "Southampton",
            Port::Cherbourg => "Cherbourg",
            Port::Queenstown => "Queenstown",
        }
    }

    /// One-hot flags in column order C, Q, S.
    pub fn one_hot(self) -> [f64; 3] {
        match self {
            Port::Cherbourg => [1.0, 0.0, 0.0],
            Port::Queenstown => [0.0, 1.0, 0.0],
            Port::Southampton => [0.0, 0.0, 1.0],
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Class label emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Died,
    Survived,
}

impl Label {
    pub fn from_class_index(idx: i64) -> Option<Label> {
        match idx {
            0 => Some(Label::Died),
            1 => Some(Label::Survived),
            _ => None,
        }
    }
}

/// Adapter output. Percentages are in [0, 100] and sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub survived: bool,
    pub probability_died: f64,
    pub probability_survived: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passenger_class_parses_from_bare_integer() {
        let c: PassengerClass = serde_json::from_str("2").unwrap();
        assert_eq!(c, PassengerClass::Second);
        assert_eq!(serde_json::to_string(&PassengerClass::Third).unwrap(), "3");
        assert!(serde_json::from_str::<PassengerClass>("4").is_err());
    }

    #[test]
    fn sex_and_port_reject_unknown_values() {
        assert!(serde_json::from_str::<Sex>("\"other\"").is_err());
        assert!(serde_json::from_str::<Port>("\"Belfast\"").is_err());
        assert_eq!(serde_json::from_str::<Sex>("\"female\"").unwrap(), Sex::Female);
    }

    #[test]
    fn one_hot_sets_exactly_one_flag() {
        for port in Port::CHOICES {
            let flags = port.one_hot();
            assert_eq!(flags.iter().sum::<f64>(), 1.0, "{port}");
        }
    }
}
