use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::adapter::PredictionAdapter;
use crate::encoder::{self, FeatureRecord, MAX_FARE, MAX_RELATIVES, MIN_FARE};
use crate::error::PredictError;
use crate::ports::{port_map, PortMap};
use crate::report::{PredictionReport, HEADLINE, IDLE_HINT, PAGE_TITLE, QUESTION};
use crate::types::{PassengerClass, Port, RawInput, Sex};

const DEFAULT_FARE: f64 = 40.0;

// ---------- Session state ----------

#[derive(Clone, Debug)]
pub struct AppState {
    pub adapter: PredictionAdapter,
    pub log_predictions: bool,
}

// ---------- Form descriptor ----------

#[derive(Serialize, Debug)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    NumberInput { step: u32, min: i32 },
    Select { choices: Vec<Value> },
    Slider { min: f64, max: f64, default: f64 },
}

#[derive(Serialize, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub widget: Widget,
}

#[derive(Serialize, Debug)]
pub struct FormDescriptor {
    pub page_title: &'static str,
    pub headline: &'static str,
    pub question: &'static str,
    pub idle_hint: &'static str,
    pub model_version: String,
    pub fields: Vec<FormField>,
    pub port_map: PortMap,
}

fn count_choices() -> Vec<Value> {
    (0..=MAX_RELATIVES).map(|n| json!(n)).collect()
}

pub fn form_descriptor(model_version: &str) -> FormDescriptor {
    let fields = vec![
        FormField {
            name: "age",
            label: "What is your Age?",
            widget: Widget::NumberInput { step: 1, min: 0 },
        },
        FormField {
            name: "sex",
            label: "Select your Gender: ",
            widget: Widget::Select {
                choices: Sex::CHOICES.iter().map(|s| json!(s)).collect(),
            },
        },
        FormField {
            name: "siblings_spouses",
            label: "How many siblings/spouses do you have on board?",
            widget: Widget::Select {
                choices: count_choices(),
            },
        },
        FormField {
            name: "parents_children",
            label: "How many parents/children do you have on board?",
            widget: Widget::Select {
                choices: count_choices(),
            },
        },
        FormField {
            name: "fare",
            label: "Enter your Ticket Fare: ",
            widget: Widget::Slider {
                min: MIN_FARE,
                max: MAX_FARE,
                default: DEFAULT_FARE,
            },
        },
        FormField {
            name: "passenger_class",
            label: "Select Passenger Class: ",
            widget: Widget::Select {
                choices: PassengerClass::CHOICES.iter().map(|c| json!(c)).collect(),
            },
        },
        FormField {
            name: "boarded_port",
            label: "Boarded From: ",
            widget: Widget::Select {
                choices: Port::CHOICES.iter().map(|p| json!(p)).collect(),
            },
        },
    ];

    FormDescriptor {
        page_title: PAGE_TITLE,
        headline: HEADLINE,
        question: QUESTION,
        idle_hint: IDLE_HINT,
        model_version: model_version.to_string(),
        fields,
        port_map: port_map(),
    }
}

// ---------- Handlers ----------

async fn form(State(state): State<AppState>) -> Json<FormDescriptor> {
    Json(form_descriptor(state.adapter.model_version()))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "model_version": state.adapter.model_version() }))
}

fn log_features(rec: &FeatureRecord) {
    let v = rec.values();
    let nz = v.iter().filter(|x| **x != 0.0).count();
    let mean = if v.is_empty() { 0.0 } else { v.iter().sum::<f64>() / (v.len() as f64) };
    let sample: Vec<String> = rec
        .named()
        .take(6)
        .map(|(name, x)| format!("{}={:.3}", name, x))
        .collect();
    tracing::info!(
        "recv in_dim={} nonzero={} mean={:.3} sample=[{}]",
        v.len(),
        nz,
        mean,
        sample.join(", ")
    );
}

fn error_response(e: PredictError) -> (StatusCode, Json<Value>) {
    let status = if e.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        tracing::error!("prediction failed: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": e.to_string() })))
}

async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<RawInput>,
) -> Result<Json<PredictionReport>, (StatusCode, Json<Value>)> {
    let record = encoder::encode_checked(&payload)
        .map_err(|e| error_response(PredictError::from(e)))?;

    if state.log_predictions {
        log_features(&record);
    }

    let result = state.adapter.predict(&record).map_err(error_response)?;
    tracing::debug!(
        survived = result.survived,
        p_survived = result.probability_survived,
        "prediction"
    );

    Ok(Json(PredictionReport::new(
        result,
        state.adapter.model_version(),
    )))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/form", get(form))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_lists_every_raw_input_field() {
        let f = form_descriptor("titanic_v0");
        let names: Vec<_> = f.fields.iter().map(|x| x.name).collect();
        assert_eq!(
            names,
            [
                "age",
                "sex",
                "siblings_spouses",
                "parents_children",
                "fare",
                "passenger_class",
                "boarded_port"
            ]
        );
    }

    #[test]
    fn form_serializes_widget_tags() {
        let v = serde_json::to_value(form_descriptor("v")).unwrap();
        assert_eq!(v["fields"][0]["widget"], "number_input");
        assert_eq!(v["fields"][4]["widget"], "slider");
        assert_eq!(v["fields"][4]["default"], 40.0);
        assert_eq!(v["fields"][2]["choices"].as_array().unwrap().len(), 9);
        assert_eq!(
            v["fields"][6]["choices"],
            json!(["Cherbourg", "Queenstown", "Southampton"])
        );
        assert_eq!(v["fields"][5]["choices"], json!([1, 2, 3]));
        assert_eq!(v["idle_hint"], IDLE_HINT);
    }
}
