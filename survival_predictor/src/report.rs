//! Values the results sidebar shows. Rendering is left to the client.

use serde::Serialize;

use crate::types::PredictionResult;

pub const PAGE_TITLE: &str = "Titanic Survival Prediction App";
pub const HEADLINE: &str = "Titanic Survival Prediction with ML";
pub const QUESTION: &str = "Would you have survived the Titanic Disaster?";
pub const IDLE_HINT: &str = "Fill the form and click the predict button!";

const DIED_COLOR: &str = "#D9534F";
const SURVIVED_COLOR: &str = "#5CB85C";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub survival_chances: &'static str,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: &'static str,
    pub size: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub verdict: &'static str,
    pub summary: &'static str,
    pub table: Vec<TableRow>,
    pub chart: Vec<ChartSlice>,
    pub model_version: String,
}

impl PredictionReport {
    pub fn new(result: PredictionResult, model_version: impl Into<String>) -> Self {
        let (verdict, summary) = if result.survived {
            ("Congrats you made it!", "Your chances of survival are high")
        } else {
            ("Oops..RIP", "Your chances of survival are low")
        };

        let table = vec![
            TableRow {
                survival_chances: "No",
                percentage: format!("{:.2}%", result.probability_died),
            },
            TableRow {
                survival_chances: "Yes",
                percentage: format!("{:.2}%", result.probability_survived),
            },
        ];

        let chart = vec![
            ChartSlice {
                label: "Not Survived",
                size: result.probability_died,
                color: DIED_COLOR,
            },
            ChartSlice {
                label: "Survived",
                size: result.probability_survived,
                color: SURVIVED_COLOR,
            },
        ];

        Self {
            result,
            verdict,
            summary,
            table,
            chart,
            model_version: model_version.into(),
        }
    }
}
