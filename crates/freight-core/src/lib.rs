//! Freight tracking core - pure domain logic shared by the API layer.
//!
//! Weather risk classification, distance and ETA projection, shipment
//! lifecycle rules and report rendering. Every function is synchronous and
//! works on caller-owned values only.

pub mod error;
pub mod eta;
pub mod geo;
pub mod lifecycle;
pub mod models;
pub mod report;
pub mod weather;

pub use error::{CoreError, CoreResult};
pub use eta::{assess_delay, project_eta, DelayAssessment, ProjectedEta, RouteWeather};
pub use geo::{distance_km, eta_minutes, Eta};
pub use lifecycle::{
    can_transition, create_status, request_transition, ShipmentStatus, StatusKind,
    TransitionOutcome, TransitionRequest,
};
pub use models::{FlightState, Position, Vehicle, VehicleState, VehicleType};
pub use report::{
    DateRange, RenderedReport, ReportColumn, ReportFormat, ReportRequest, ReportRow, ReportSpec,
    ReportValue,
};
pub use weather::{
    assess_route, classify, ImpactLevel, RouteWeatherSummary, WeatherCondition, WeatherReading,
    WeatherVerdict,
};
