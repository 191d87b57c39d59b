//! Spherical distance, bearing and time-to-arrival arithmetic.

use crate::models::Position;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mean Earth radius used by every great-circle calculation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Conversion factor from meters per second to kilometers per hour.
pub const MPS_TO_KMH: f64 = 3.6;

/// Great-circle distance between two positions in kilometers (Haversine formula).
///
/// Symmetric in its arguments and zero for identical positions.
pub fn distance_km(a: Position, b: Position) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `from` to `to` in degrees, 0 = north, clockwise, in `[0, 360)`.
pub fn bearing_deg(from: Position, to: Position) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lon - from.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Move a position along a heading for a distance.
///
/// # Arguments
/// * `start` - Starting position
/// * `distance_km` - Distance to travel in kilometers
/// * `heading_deg` - Heading in degrees (0 = north, 90 = east)
pub fn offset_by_bearing(start: Position, distance_km: f64, heading_deg: f64) -> Position {
    if distance_km.abs() <= f64::EPSILON {
        return start;
    }

    let lat1 = start.lat.to_radians();
    let lon1 = start.lon.to_radians();
    let bearing_rad = heading_deg.to_radians();
    let angular_distance = distance_km / EARTH_RADIUS_KM;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    Position::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Time to arrival in whole minutes.
///
/// `Infinite` is the sentinel for a vehicle that is not moving; it is a
/// value, not an error, and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    Minutes(u64),
    Infinite,
}

impl Eta {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Eta::Infinite)
    }

    /// Whole minutes, or `None` for the infinity sentinel.
    pub fn minutes(&self) -> Option<u64> {
        match self {
            Eta::Minutes(m) => Some(*m),
            Eta::Infinite => None,
        }
    }

    /// Minutes as a float, `f64::INFINITY` for the sentinel.
    pub fn as_f64(&self) -> f64 {
        match self {
            Eta::Minutes(m) => *m as f64,
            Eta::Infinite => f64::INFINITY,
        }
    }

    /// Inflate by a multiplier and round to the nearest minute.
    pub fn scaled(&self, multiplier: f64) -> Eta {
        match self {
            Eta::Minutes(m) => Eta::Minutes((*m as f64 * multiplier).round().max(0.0) as u64),
            Eta::Infinite => Eta::Infinite,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Minutes(m) if *m >= 60 => write!(f, "{}h {}m", m / 60, m % 60),
            Eta::Minutes(m) => write!(f, "{m}m"),
            Eta::Infinite => write!(f, "unknown"),
        }
    }
}

impl Serialize for Eta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Eta::Minutes(m) => serializer.serialize_u64(*m),
            Eta::Infinite => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Eta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minutes = Option::<u64>::deserialize(deserializer)?;
        Ok(minutes.map(Eta::Minutes).unwrap_or(Eta::Infinite))
    }
}

/// Time to cover `distance_km` at `speed_mps`, rounded to the nearest minute.
///
/// Returns [`Eta::Infinite`] when the speed is zero or negative.
pub fn eta_minutes(distance_km: f64, speed_mps: f64) -> Eta {
    if speed_mps.is_nan() || speed_mps <= 0.0 {
        return Eta::Infinite;
    }
    let speed_kmh = speed_mps * MPS_TO_KMH;
    let hours = distance_km / speed_kmh;
    Eta::Minutes((hours * 60.0).round().max(0.0) as u64)
}
