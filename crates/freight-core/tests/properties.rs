//! Property tests for the freight core.
//!
//! Run with: cargo test -p freight-core --test properties

use freight_core::lifecycle::{allowed_transitions, ShipmentStatus};
use freight_core::weather::{Intensity, StormSeverity};
use freight_core::{
    can_transition, classify, distance_km, eta_minutes, project_eta, Eta, ImpactLevel, Position,
    ReportColumn, ReportFormat, ReportRow, ReportSpec, ReportValue, RouteWeather, StatusKind,
    VehicleState, WeatherCondition, WeatherReading,
};
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Position> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Position::new(lat, lon))
}

fn status_kind() -> impl Strategy<Value = StatusKind> {
    prop::sample::select(StatusKind::ALL.to_vec())
}

fn reading() -> impl Strategy<Value = WeatherReading> {
    (
        -30.0f64..45.0,
        0.0f64..40.0,
        prop::option::of(0.0f64..15_000.0),
        prop::option::of(0.0f64..100.0),
        prop::option::of(0.0f64..12.0),
        prop::option::of(150i64..950),
    )
        .prop_map(
            |(temp, wind_speed, visibility, cloud_coverage, snow_accumulation, condition_code)| {
                WeatherReading {
                    temp,
                    wind_speed,
                    visibility,
                    cloud_coverage,
                    snow_accumulation,
                    condition_code,
                    ..WeatherReading::default()
                }
            },
        )
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in position(), b in position()) {
        let there = distance_km(a, b);
        let back = distance_km(b, a);
        prop_assert!((there - back).abs() < 1e-6);
        prop_assert!(there >= 0.0);
    }

    #[test]
    fn distance_to_self_is_zero(a in position()) {
        prop_assert!(distance_km(a, a).abs() < 1e-9);
    }

    #[test]
    fn verdicts_stay_in_range(r in reading()) {
        let v = classify(&r);
        let delay = v.delay_factor();
        prop_assert!((0.0..=1.0).contains(&delay));
    }

    #[test]
    fn grounding_implies_severe_impact(r in reading()) {
        let v = classify(&r);
        if v.should_ground() {
            match v.condition {
                WeatherCondition::Clear | WeatherCondition::Cloudy { .. } => {}
                // Heavy rain in strong wind grounds at medium impact.
                WeatherCondition::Rain { .. } => prop_assert_eq!(v.impact_level(), ImpactLevel::Medium),
                _ => prop_assert!(v.impact_level() >= ImpactLevel::High),
            }
        }
    }

    #[test]
    fn fog_impact_never_drops_as_visibility_falls(a in 0.0f64..12_000.0, b in 0.0f64..12_000.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let fog = |visibility: f64| {
            let mut r = WeatherReading::new(5.0, 2.0, 741);
            r.visibility = Some(visibility);
            classify(&r)
        };
        prop_assert!(fog(near).impact_level() >= fog(far).impact_level());
        prop_assert!(fog(near).delay_factor() >= fog(far).delay_factor());
    }

    #[test]
    fn wind_never_lowers_clear_impact(a in 0.0f64..40.0, b in 0.0f64..40.0) {
        let (calm, windy) = if a <= b { (a, b) } else { (b, a) };
        let calm = classify(&WeatherReading::new(20.0, calm, 800));
        let windy = classify(&WeatherReading::new(20.0, windy, 800));
        prop_assert!(windy.impact_level() >= calm.impact_level());
    }

    #[test]
    fn table_and_status_agree(from in status_kind(), to in status_kind()) {
        let status = ShipmentStatus::new(from, None);
        prop_assert_eq!(can_transition(from, to), status.can_transition_to(to));
        prop_assert_eq!(can_transition(from, to), from.can_transition_to(to));
    }

    #[test]
    fn terminal_statuses_go_nowhere(to in status_kind()) {
        prop_assert!(!can_transition(StatusKind::Arrived, to));
        prop_assert!(!can_transition(StatusKind::Cancelled, to));
    }

    #[test]
    fn weather_never_shortens_eta(
        start in position(),
        end in position(),
        speed in 1.0f64..300.0,
        code in prop::option::of(200u16..900),
    ) {
        let vehicle = VehicleState::new("V", start, speed);
        let weather = RouteWeather::new(
            code.map(|c| classify(&WeatherReading::new(10.0, 5.0, c))),
            None,
        );
        let eta = project_eta(&vehicle, end, Some(&weather));
        prop_assert!(eta.eta_minutes.as_f64() >= eta.base_eta_minutes.as_f64());
        prop_assert_eq!(
            eta.added_minutes as f64,
            eta.eta_minutes.as_f64() - eta.base_eta_minutes.as_f64()
        );
    }

    #[test]
    fn csv_quotes_round_trip(text in "[a-zA-Z0-9 ,\"']{0,24}") {
        let row = ReportRow::from([("note".to_string(), ReportValue::Text(text.clone()))]);
        let spec = ReportSpec::new("Notes", vec![ReportColumn::new("note", "Note")], vec![row]);
        let payload = ReportFormat::Csv.generate(&spec).unwrap().payload().unwrap();

        // Skip the title, generated and blank lines; read header + one row.
        let table: String = payload.lines().skip(3).take(2).collect::<Vec<_>>().join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(table.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        prop_assert_eq!(record.get(0).unwrap(), text.as_str());
    }
}

#[test]
fn storm_severity_never_lowers_impact() {
    let impact = |severity, lightning| {
        let v = classify(&WeatherReading::new(20.0, 5.0, 200));
        freight_core::WeatherVerdict {
            condition: WeatherCondition::Storm {
                severity,
                lightning,
            },
            ..v
        }
        .impact_level()
    };
    for lightning in [false, true] {
        assert!(impact(StormSeverity::Light, lightning) <= impact(StormSeverity::Moderate, lightning));
        assert!(impact(StormSeverity::Moderate, lightning) <= impact(StormSeverity::Severe, lightning));
    }
    assert_eq!(impact(StormSeverity::Light, true), ImpactLevel::Critical);
}

#[test]
fn rain_and_snow_intensity_never_lower_impact() {
    let base = classify(&WeatherReading::new(0.0, 5.0, 500));
    let tiers = [Intensity::Light, Intensity::Moderate, Intensity::Heavy];
    let rain: Vec<_> = tiers
        .iter()
        .map(|&intensity| {
            freight_core::WeatherVerdict {
                condition: WeatherCondition::Rain { intensity },
                ..base.clone()
            }
            .impact_level()
        })
        .collect();
    let snow: Vec<_> = tiers
        .iter()
        .map(|&intensity| {
            freight_core::WeatherVerdict {
                condition: WeatherCondition::Snow {
                    intensity,
                    accumulation_cm_per_hr: 1.0,
                },
                ..base.clone()
            }
            .impact_level()
        })
        .collect();
    assert!(rain.windows(2).all(|w| w[0] <= w[1]));
    assert!(snow.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn stationary_vehicle_scenario() {
    assert_eq!(eta_minutes(42.0, 0.0), Eta::Infinite);
    let vehicle = VehicleState::new("V", Position::new(10.0, 10.0), 0.0);
    let weather = RouteWeather::new(Some(classify(&WeatherReading::new(10.0, 5.0, 202))), None);
    let eta = project_eta(&vehicle, Position::new(11.0, 10.0), Some(&weather));
    assert!(eta.eta_minutes.is_infinite());
    assert_eq!(eta.added_minutes, 0);
}

#[test]
fn empty_report_scenario() {
    let spec = ReportSpec::new("Nothing Yet", vec![ReportColumn::new("id", "ID")], Vec::new());
    let csv = ReportFormat::Csv.generate(&spec).unwrap().payload().unwrap();
    assert!(csv.starts_with("Nothing Yet\n"));
    assert!(csv.contains("\"Total Rows: 0\""));

    let json = ReportFormat::Json.generate(&spec).unwrap().payload().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["metadata"]["totalRows"], 0);
}

#[test]
fn every_status_has_a_reachable_or_terminal_shape() {
    for kind in StatusKind::ALL {
        let next = allowed_transitions(kind);
        assert_eq!(kind.is_terminal(), next.is_empty());
        assert!(!next.contains(&kind), "{kind} should not loop to itself");
    }
}
