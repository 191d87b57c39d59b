//! Core data models for tracked vehicles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::geo;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Current kinematic state of a tracked vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub id: String,
    pub position: Position,
    /// Ground speed in meters per second
    #[serde(default)]
    pub speed_mps: f64,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
}

impl VehicleState {
    pub fn new(id: impl Into<String>, position: Position, speed_mps: f64) -> Self {
        Self {
            id: id.into(),
            position,
            speed_mps,
            last_update: Utc::now(),
        }
    }

    /// Move the vehicle, optionally change its speed, and stamp the update time.
    pub fn update_position(
        &mut self,
        position: Position,
        speed_mps: Option<f64>,
        timestamp: DateTime<Utc>,
    ) {
        self.position = position;
        if let Some(speed) = speed_mps {
            self.speed_mps = speed;
        }
        self.last_update = timestamp;
    }
}

/// An aircraft built from an external state vector.
///
/// Never partially updated: [`FlightState::refresh`] replaces every field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "FlightPayload")]
pub struct FlightState {
    pub vehicle: VehicleState,
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub altitude_m: f64,
    /// True track in degrees clockwise from north
    pub heading_deg: f64,
    pub vertical_rate_mps: f64,
    pub on_ground: bool,
    pub squawk: Option<String>,
}

// Positions in the state vector array.
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_TIME_POSITION: usize = 3;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_HEADING: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;
const IDX_SQUAWK: usize = 14;

impl FlightState {
    /// Build a flight from a positional state vector.
    ///
    /// Missing numeric fields default to 0 and a missing callsign to the
    /// empty string. The ICAO24 address is required.
    pub fn from_state_vector(values: &[Value]) -> CoreResult<Self> {
        let icao24 = values
            .get(IDX_ICAO24)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::InvalidStateVector("missing icao24 address".into()))?
            .to_lowercase();

        let callsign = text_at(values, IDX_CALLSIGN).unwrap_or_default();
        let origin_country = text_at(values, IDX_ORIGIN_COUNTRY).unwrap_or_default();

        let last_update = timestamp_at(values, IDX_LAST_CONTACT)
            .or_else(|| timestamp_at(values, IDX_TIME_POSITION))
            .unwrap_or_else(Utc::now);

        let position = Position::new(
            number_at(values, IDX_LATITUDE),
            number_at(values, IDX_LONGITUDE),
        );

        Ok(Self {
            vehicle: VehicleState {
                id: icao24.clone(),
                position,
                speed_mps: number_at(values, IDX_VELOCITY),
                last_update,
            },
            icao24,
            callsign,
            origin_country,
            altitude_m: number_at(values, IDX_ALTITUDE),
            heading_deg: number_at(values, IDX_HEADING),
            vertical_rate_mps: number_at(values, IDX_VERTICAL_RATE),
            on_ground: values
                .get(IDX_ON_GROUND)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            squawk: text_at(values, IDX_SQUAWK).filter(|s| !s.is_empty()),
        })
    }

    /// Replace this flight with the contents of a newer state vector.
    pub fn refresh(&mut self, values: &[Value]) -> CoreResult<()> {
        *self = Self::from_state_vector(values)?;
        Ok(())
    }

    /// Callsign when present, otherwise `Flight <ICAO24>`.
    pub fn display_name(&self) -> String {
        if self.callsign.is_empty() {
            format!("Flight {}", self.icao24.to_uppercase())
        } else {
            self.callsign.clone()
        }
    }

    /// Dead-reckoned position after `seconds` at the current speed and heading.
    pub fn predict_position(&self, seconds: f64) -> Position {
        if self.on_ground || self.vehicle.speed_mps <= 0.0 {
            return self.vehicle.position;
        }
        let distance_km = self.vehicle.speed_mps * seconds / 1000.0;
        geo::offset_by_bearing(self.vehicle.position, distance_km, self.heading_deg)
    }
}

fn text_at(values: &[Value], idx: usize) -> Option<String> {
    values
        .get(idx)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

fn number_at(values: &[Value], idx: usize) -> f64 {
    values.get(idx).and_then(Value::as_f64).unwrap_or(0.0)
}

fn timestamp_at(values: &[Value], idx: usize) -> Option<DateTime<Utc>> {
    values
        .get(idx)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Wire form of a flight, including derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPayload {
    pub id: String,
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub heading: f64,
    pub vertical_rate: f64,
    pub on_ground: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squawk: Option<String>,
    pub last_update: DateTime<Utc>,
    pub vehicle_type: &'static str,
    pub display_name: String,
}

impl From<FlightState> for FlightPayload {
    fn from(flight: FlightState) -> Self {
        let display_name = flight.display_name();
        Self {
            id: flight.vehicle.id,
            icao24: flight.icao24,
            callsign: flight.callsign,
            origin_country: flight.origin_country,
            latitude: flight.vehicle.position.lat,
            longitude: flight.vehicle.position.lon,
            altitude: flight.altitude_m,
            velocity: flight.vehicle.speed_mps,
            heading: flight.heading_deg,
            vertical_rate: flight.vertical_rate_mps,
            on_ground: flight.on_ground,
            squawk: flight.squawk,
            last_update: flight.vehicle.last_update,
            vehicle_type: VehicleType::Flight.as_str(),
            display_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Ground,
    Flight,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Ground => "ground",
            VehicleType::Flight => "flight",
        }
    }
}

/// Any vehicle the tracker can follow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Vehicle {
    Ground(VehicleState),
    Flight(FlightState),
}

impl Vehicle {
    /// Kinematic state shared by every vehicle kind.
    pub fn state(&self) -> &VehicleState {
        match self {
            Vehicle::Ground(state) => state,
            Vehicle::Flight(flight) => &flight.vehicle,
        }
    }

    pub fn vehicle_type(&self) -> VehicleType {
        match self {
            Vehicle::Ground(_) => VehicleType::Ground,
            Vehicle::Flight(_) => VehicleType::Flight,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Vehicle::Ground(state) => state.id.clone(),
            Vehicle::Flight(flight) => flight.display_name(),
        }
    }
}

impl From<VehicleState> for Vehicle {
    fn from(state: VehicleState) -> Self {
        Vehicle::Ground(state)
    }
}

impl From<FlightState> for Vehicle {
    fn from(flight: FlightState) -> Self {
        Vehicle::Flight(flight)
    }
}
