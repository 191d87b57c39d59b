//! Subcommand bodies. Each takes parsed input and returns the JSON document
//! printed on stdout, so the binary only handles I/O.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use freight_core::lifecycle::{allowed_transitions, sort_by_urgency};
use freight_core::{
    assess_route, classify, create_status, project_eta, request_transition, FlightState,
    RenderedReport, ReportFormat, ReportRequest, RouteWeather, ShipmentStatus, StatusKind,
    TransitionRequest, Vehicle, WeatherReading, WeatherVerdict,
};

use crate::input::{EtaInput, FlightInput};

pub fn classify_readings(readings: Vec<WeatherReading>) -> Vec<WeatherVerdict> {
    readings.iter().map(classify).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub summary: freight_core::RouteWeatherSummary,
    pub verdicts: Vec<WeatherVerdict>,
}

pub fn route(readings: Vec<WeatherReading>) -> RouteReport {
    let verdicts = classify_readings(readings);
    RouteReport {
        summary: assess_route(&verdicts),
        verdicts,
    }
}

pub fn eta(input: EtaInput) -> Value {
    let weather = RouteWeather::new(
        input.origin_weather.as_ref().map(classify),
        input.destination_weather.as_ref().map(classify),
    );
    let projection = project_eta(&input.vehicle, input.destination, Some(&weather));
    let arrival = projection.arrival_time(Utc::now());

    json!({
        "vehicle": Vehicle::Ground(input.vehicle),
        "projection": projection,
        "arrivalTime": arrival,
        "weather": {
            "origin": weather.origin,
            "destination": weather.destination,
        },
    })
}

/// Normalize tracker state vectors. With `predict_seconds`, each flight also
/// carries a dead-reckoned position that far ahead.
pub fn flights(input: FlightInput, predict_seconds: Option<f64>) -> Result<Vec<Value>> {
    input
        .into_vectors()
        .iter()
        .enumerate()
        .map(|(index, vector)| {
            let flight = FlightState::from_state_vector(vector)
                .with_context(|| format!("state vector {index} rejected"))?;
            let predicted = predict_seconds.map(|seconds| flight.predict_position(seconds));
            let mut value = serde_json::to_value(Vehicle::Flight(flight))?;
            if let (Some(position), Some(object)) = (predicted, value.as_object_mut()) {
                object.insert("predictedPosition".to_string(), serde_json::to_value(position)?);
            }
            Ok(value)
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: ShipmentStatus,
    pub allowed_transitions: Vec<StatusKind>,
    pub terminal: bool,
}

pub fn status(name: &str, reason: Option<&str>) -> Result<StatusReport> {
    let status = create_status(name, reason)?;
    Ok(StatusReport {
        allowed_transitions: allowed_transitions(status.kind),
        terminal: status.kind.is_terminal(),
        status,
    })
}

/// Build statuses from names and order them most urgent first.
pub fn triage(names: &[String]) -> Result<Vec<ShipmentStatus>> {
    let mut statuses = names
        .iter()
        .map(|name| create_status(name, None))
        .collect::<Result<Vec<_>, _>>()?;
    sort_by_urgency(&mut statuses);
    Ok(statuses)
}

pub fn transition(request: &TransitionRequest) -> Result<Value> {
    let outcome = request_transition(request)?;
    if !outcome.accepted {
        tracing::info!(from = %outcome.from, to = %outcome.to, "transition rejected");
    }
    Ok(serde_json::to_value(outcome)?)
}

/// The `--format` flag wins over the request's own format, which wins over
/// the configured default.
pub fn report(
    request: ReportRequest,
    flag: Option<ReportFormat>,
    default: ReportFormat,
) -> Result<RenderedReport> {
    let (spec, requested) = request.into_spec();
    let format = match (flag, requested) {
        (Some(format), _) => format,
        (None, Some(name)) => name.parse()?,
        (None, None) => default,
    };
    Ok(format.generate(&spec)?)
}
