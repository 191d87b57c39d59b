//! Request documents accepted on the command line.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use freight_core::{Position, VehicleState, WeatherReading};

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_source(path)?;
    parse_json(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// A single reading or a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtaInput {
    pub vehicle: VehicleState,
    pub destination: Position,
    #[serde(default)]
    pub origin_weather: Option<WeatherReading>,
    #[serde(default)]
    pub destination_weather: Option<WeatherReading>,
}

/// Flight tracker output: either a bare state vector or a
/// `{"time": .., "states": [[..], ..]}` snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlightInput {
    Vector(Vec<Value>),
    Snapshot { states: Option<Vec<Vec<Value>>> },
}

impl FlightInput {
    pub fn into_vectors(self) -> Vec<Vec<Value>> {
        match self {
            FlightInput::Vector(values) => vec![values],
            FlightInput::Snapshot { states } => states.unwrap_or_default(),
        }
    }
}
