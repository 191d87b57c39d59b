//! Weather-adjusted arrival projection for a moving vehicle.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::geo::{self, Eta};
use crate::models::{Position, VehicleState};
use crate::weather::{ImpactLevel, WeatherVerdict};

/// Weather at either end of a leg. Either side may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteWeather {
    pub origin: Option<WeatherVerdict>,
    pub destination: Option<WeatherVerdict>,
}

impl RouteWeather {
    pub fn new(origin: Option<WeatherVerdict>, destination: Option<WeatherVerdict>) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// The larger of the origin and destination delay factors, 0 when neither is known.
    pub fn max_delay_factor(&self) -> f64 {
        [&self.origin, &self.destination]
            .into_iter()
            .flatten()
            .map(WeatherVerdict::delay_factor)
            .fold(0.0, f64::max)
    }
}

/// Display severity and reason for a delay factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelayAssessment {
    pub impact: ImpactLevel,
    pub reason: &'static str,
}

pub fn assess_delay(max_delay_factor: f64) -> DelayAssessment {
    let (impact, reason) = if max_delay_factor >= 0.4 {
        (ImpactLevel::Critical, "severe weather")
    } else if max_delay_factor >= 0.2 {
        (ImpactLevel::High, "poor weather")
    } else if max_delay_factor >= 0.1 {
        (ImpactLevel::Medium, "moderate weather")
    } else if max_delay_factor > 0.0 {
        (ImpactLevel::Low, "minor weather impact")
    } else {
        (ImpactLevel::None, "clear conditions")
    };
    DelayAssessment { impact, reason }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedEta {
    pub distance_km: f64,
    pub base_eta_minutes: Eta,
    pub eta_minutes: Eta,
    pub added_minutes: u64,
    pub delay_factor: f64,
    pub delay: DelayAssessment,
}

impl ProjectedEta {
    /// Wall-clock arrival from `now`, or `None` when the vehicle is not moving.
    pub fn arrival_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let minutes = i64::try_from(self.eta_minutes.minutes()?).ok()?;
        now.checked_add_signed(Duration::try_minutes(minutes)?)
    }
}

/// Distance and weather-adjusted ETA from a vehicle's current position to `destination`.
///
/// The base ETA is inflated by `1 + max delay factor`. An infinite base ETA
/// stays infinite and adds no minutes.
pub fn project_eta(
    vehicle: &VehicleState,
    destination: Position,
    weather: Option<&RouteWeather>,
) -> ProjectedEta {
    let distance_km = geo::distance_km(vehicle.position, destination);
    let base_eta_minutes = geo::eta_minutes(distance_km, vehicle.speed_mps);

    let delay_factor = weather.map(RouteWeather::max_delay_factor).unwrap_or(0.0);
    let eta_minutes = base_eta_minutes.scaled(1.0 + delay_factor);
    let added_minutes = match (eta_minutes, base_eta_minutes) {
        (Eta::Minutes(adjusted), Eta::Minutes(base)) => adjusted.saturating_sub(base),
        _ => 0,
    };

    tracing::debug!(
        vehicle = %vehicle.id,
        distance_km,
        base = %base_eta_minutes,
        adjusted = %eta_minutes,
        delay_factor,
        "projected eta"
    );

    ProjectedEta {
        distance_km,
        base_eta_minutes,
        eta_minutes,
        added_minutes,
        delay_factor,
        delay: assess_delay(delay_factor),
    }
}
