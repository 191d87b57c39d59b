//! Weather risk classification.
//!
//! A raw reading from a weather provider is mapped onto exactly one
//! [`WeatherCondition`] variant. Every verdict yields an [`ImpactLevel`],
//! a delay factor in `[0, 1]` and a ground-stop decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Visibility assumed when the provider does not report one (meters).
pub const DEFAULT_VISIBILITY_M: f64 = 10_000.0;
/// Cloud coverage assumed when the provider does not report one (percent).
pub const DEFAULT_CLOUD_COVERAGE: f64 = 0.0;
/// Relative humidity assumed when the provider does not report one (percent).
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// Ordinal severity of a weather effect on operations.
///
/// Ordered `None < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::None => "none",
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precipitation tier shared by rain and snow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StormSeverity {
    Light,
    Moderate,
    Severe,
}

impl StormSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            StormSeverity::Light => "light",
            StormSeverity::Moderate => "moderate",
            StormSeverity::Severe => "severe",
        }
    }
}

/// Raw reading handed over by a weather provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    #[serde(alias = "temperature")]
    pub temp: f64,
    /// Meters per second
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Meters
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Percent
    #[serde(default)]
    pub cloud_coverage: Option<f64>,
    /// Provider condition code. Non-integral values read as absent.
    #[serde(default, deserialize_with = "lenient_code")]
    pub condition_code: Option<i64>,
    /// Centimeters per hour; estimated from the snow tier when absent
    #[serde(default)]
    pub snow_accumulation: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl WeatherReading {
    pub fn new(temp: f64, wind_speed: f64, condition_code: u16) -> Self {
        Self {
            temp,
            wind_speed,
            condition_code: Some(condition_code.into()),
            ..Self::default()
        }
    }
}

/// Accept any JSON number for the condition code; range checks happen at
/// classification so out-of-range codes fall back instead of failing.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<f64>::deserialize(deserializer)?;
    Ok(code.and_then(|c| (c.is_finite() && c.fract() == 0.0).then_some(c as i64)))
}

/// The weather variant selected for a reading, with its type-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WeatherCondition {
    Clear,
    Cloudy {
        /// Percent
        cloud_coverage: f64,
    },
    Rain {
        intensity: Intensity,
    },
    Storm {
        severity: StormSeverity,
        lightning: bool,
    },
    Fog {
        visibility_m: f64,
    },
    Snow {
        intensity: Intensity,
        accumulation_cm_per_hr: f64,
    },
}

impl WeatherCondition {
    /// Discriminant name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy { .. } => "cloudy",
            WeatherCondition::Rain { .. } => "rain",
            WeatherCondition::Storm { .. } => "storm",
            WeatherCondition::Fog { .. } => "fog",
            WeatherCondition::Snow { .. } => "snow",
        }
    }

    fn default_description(&self) -> String {
        match self {
            WeatherCondition::Clear => "clear sky".to_string(),
            WeatherCondition::Cloudy { cloud_coverage } if *cloud_coverage > 84.0 => {
                "overcast clouds".to_string()
            }
            WeatherCondition::Cloudy { cloud_coverage } if *cloud_coverage > 50.0 => {
                "broken clouds".to_string()
            }
            WeatherCondition::Cloudy { .. } => "scattered clouds".to_string(),
            WeatherCondition::Rain { intensity } => format!("{} rain", intensity.as_str()),
            WeatherCondition::Storm { severity, lightning: true } => {
                format!("{} thunderstorm with lightning", severity.as_str())
            }
            WeatherCondition::Storm { severity, .. } => {
                format!("{} thunderstorm", severity.as_str())
            }
            WeatherCondition::Fog { .. } => "fog".to_string(),
            WeatherCondition::Snow { intensity, .. } => format!("{} snow", intensity.as_str()),
        }
    }
}

/// A classified reading. Created once from a reading and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "VerdictPayload")]
pub struct WeatherVerdict {
    pub condition: WeatherCondition,
    pub temperature: f64,
    pub description: String,
    pub wind_speed: f64,
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl WeatherVerdict {
    pub fn impact_level(&self) -> ImpactLevel {
        match &self.condition {
            WeatherCondition::Clear => {
                if self.wind_speed > 15.0 {
                    ImpactLevel::Low
                } else {
                    ImpactLevel::None
                }
            }
            WeatherCondition::Cloudy { cloud_coverage } => {
                if *cloud_coverage > 90.0 && self.wind_speed > 10.0 {
                    ImpactLevel::Low
                } else {
                    ImpactLevel::None
                }
            }
            WeatherCondition::Rain { intensity } => match intensity {
                Intensity::Light => ImpactLevel::None,
                Intensity::Moderate => ImpactLevel::Low,
                Intensity::Heavy => ImpactLevel::Medium,
            },
            WeatherCondition::Storm { lightning: true, .. } => ImpactLevel::Critical,
            WeatherCondition::Storm { severity, .. } => match severity {
                StormSeverity::Light => ImpactLevel::Medium,
                StormSeverity::Moderate => ImpactLevel::High,
                StormSeverity::Severe => ImpactLevel::Critical,
            },
            WeatherCondition::Fog { visibility_m } => fog_band(*visibility_m).0,
            WeatherCondition::Snow {
                intensity,
                accumulation_cm_per_hr,
            } => {
                if *intensity == Intensity::Heavy || *accumulation_cm_per_hr > 5.0 {
                    ImpactLevel::High
                } else if *intensity == Intensity::Moderate {
                    ImpactLevel::Medium
                } else {
                    ImpactLevel::Low
                }
            }
        }
    }

    /// Fractional ETA inflation in `[0, 1]`.
    pub fn delay_factor(&self) -> f64 {
        match &self.condition {
            WeatherCondition::Clear => {
                if self.wind_speed > 15.0 {
                    0.05
                } else {
                    0.0
                }
            }
            WeatherCondition::Cloudy { cloud_coverage } => {
                if *cloud_coverage > 90.0 && self.wind_speed > 10.0 {
                    0.05
                } else {
                    0.0
                }
            }
            WeatherCondition::Rain { intensity } => match intensity {
                Intensity::Light => 0.05,
                Intensity::Moderate => 0.10,
                Intensity::Heavy => 0.20,
            },
            WeatherCondition::Storm { severity, .. } => match severity {
                StormSeverity::Light => 0.15,
                StormSeverity::Moderate => 0.30,
                StormSeverity::Severe => 0.50,
            },
            WeatherCondition::Fog { visibility_m } => fog_band(*visibility_m).1,
            WeatherCondition::Snow { intensity, .. } => match intensity {
                Intensity::Light => 0.10,
                Intensity::Moderate => 0.25,
                Intensity::Heavy => 0.40,
            },
        }
    }

    pub fn should_ground(&self) -> bool {
        match &self.condition {
            WeatherCondition::Clear => self.wind_speed > 25.0,
            WeatherCondition::Cloudy { .. } => false,
            WeatherCondition::Rain { intensity } => {
                *intensity == Intensity::Heavy && self.wind_speed > 15.0
            }
            WeatherCondition::Storm {
                severity,
                lightning,
            } => *severity == StormSeverity::Severe || *lightning,
            WeatherCondition::Fog { visibility_m } => *visibility_m < 200.0,
            WeatherCondition::Snow {
                intensity,
                accumulation_cm_per_hr,
            } => *intensity == Intensity::Heavy && *accumulation_cm_per_hr > 5.0,
        }
    }

    /// One-line human summary, e.g. `Fog (fog): high impact, 40% delay`.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} ({}): {} impact, {:.0}% delay",
            capitalize(self.condition.kind()),
            self.description,
            self.impact_level(),
            self.delay_factor() * 100.0
        );
        if self.should_ground() {
            summary.push_str(", ground stop");
        }
        summary
    }
}

// (impact, delay) for fog by visibility in meters.
fn fog_band(visibility_m: f64) -> (ImpactLevel, f64) {
    if visibility_m < 200.0 {
        (ImpactLevel::Critical, 0.60)
    } else if visibility_m < 500.0 {
        (ImpactLevel::High, 0.40)
    } else if visibility_m < 1000.0 {
        (ImpactLevel::Medium, 0.25)
    } else if visibility_m < 2000.0 {
        (ImpactLevel::Low, 0.15)
    } else {
        (ImpactLevel::None, 0.05)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Wire form of a verdict, including the derived risk fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictPayload {
    #[serde(flatten)]
    pub condition: WeatherCondition,
    pub temperature: f64,
    pub description: String,
    pub wind_speed: f64,
    pub humidity: f64,
    pub impact: ImpactLevel,
    pub delay_factor: f64,
    pub should_ground: bool,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl From<WeatherVerdict> for VerdictPayload {
    fn from(verdict: WeatherVerdict) -> Self {
        let impact = verdict.impact_level();
        let delay_factor = verdict.delay_factor();
        let should_ground = verdict.should_ground();
        let summary = verdict.summary();
        Self {
            condition: verdict.condition,
            temperature: verdict.temperature,
            description: verdict.description,
            wind_speed: verdict.wind_speed,
            humidity: verdict.humidity,
            impact,
            delay_factor,
            should_ground,
            summary,
            timestamp: verdict.timestamp,
        }
    }
}

fn storm_from_code(code: i64) -> WeatherCondition {
    let severity = match code % 10 {
        0 => StormSeverity::Light,
        1 => StormSeverity::Moderate,
        _ => StormSeverity::Severe,
    };
    WeatherCondition::Storm {
        severity,
        lightning: code >= 210,
    }
}

fn rain_intensity(code: i64) -> Intensity {
    match code {
        300..=399 | 500 | 520 => Intensity::Light,
        502..=504 | 522 | 531 => Intensity::Heavy,
        _ => Intensity::Moderate,
    }
}

fn snow_intensity(code: i64) -> Intensity {
    match code {
        600 | 612 | 615 | 620 => Intensity::Light,
        602 | 622 => Intensity::Heavy,
        _ => Intensity::Moderate,
    }
}

fn estimated_snow_accumulation(intensity: Intensity) -> f64 {
    match intensity {
        Intensity::Light => 0.5,
        Intensity::Moderate => 2.0,
        Intensity::Heavy => 6.0,
    }
}

/// Select the weather variant for a reading's condition code.
///
/// Unknown or missing codes fall back to [`WeatherCondition::Clear`].
pub fn condition_for(reading: &WeatherReading) -> WeatherCondition {
    let Some(code) = reading.condition_code else {
        tracing::warn!("weather reading has no condition code, defaulting to clear");
        return WeatherCondition::Clear;
    };

    match code {
        200..=299 => storm_from_code(code),
        300..=599 => WeatherCondition::Rain {
            intensity: rain_intensity(code),
        },
        600..=699 => {
            let intensity = snow_intensity(code);
            WeatherCondition::Snow {
                intensity,
                accumulation_cm_per_hr: reading
                    .snow_accumulation
                    .unwrap_or_else(|| estimated_snow_accumulation(intensity)),
            }
        }
        700..=799 => WeatherCondition::Fog {
            visibility_m: reading.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
        },
        800 => WeatherCondition::Clear,
        801..=899 => WeatherCondition::Cloudy {
            cloud_coverage: reading.cloud_coverage.unwrap_or(DEFAULT_CLOUD_COVERAGE),
        },
        _ => {
            tracing::warn!(code, "unknown weather condition code, defaulting to clear");
            WeatherCondition::Clear
        }
    }
}

/// Classify a raw reading into a verdict.
pub fn classify(reading: &WeatherReading) -> WeatherVerdict {
    let condition = condition_for(reading);
    let description = reading
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| condition.default_description());

    let verdict = WeatherVerdict {
        condition,
        temperature: reading.temp,
        description,
        wind_speed: reading.wind_speed,
        humidity: reading.humidity.unwrap_or(DEFAULT_HUMIDITY),
        timestamp: reading.timestamp.unwrap_or_else(Utc::now),
    };

    tracing::debug!(
        kind = verdict.condition.kind(),
        impact = %verdict.impact_level(),
        delay = verdict.delay_factor(),
        ground = verdict.should_ground(),
        "classified weather reading"
    );

    verdict
}

/// Aggregate risk for every reading along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteWeatherSummary {
    pub worst_impact: ImpactLevel,
    pub average_delay: f64,
    pub readings: usize,
    pub any_ground_stop: bool,
}

/// Worst impact and mean delay factor over a set of verdicts.
///
/// An empty route has impact `none` and a mean delay of 0.
pub fn assess_route(verdicts: &[WeatherVerdict]) -> RouteWeatherSummary {
    if verdicts.is_empty() {
        return RouteWeatherSummary {
            worst_impact: ImpactLevel::None,
            average_delay: 0.0,
            readings: 0,
            any_ground_stop: false,
        };
    }

    let worst_impact = verdicts
        .iter()
        .map(WeatherVerdict::impact_level)
        .max()
        .unwrap_or_default();
    let total_delay: f64 = verdicts.iter().map(WeatherVerdict::delay_factor).sum();

    RouteWeatherSummary {
        worst_impact,
        average_delay: total_delay / verdicts.len() as f64,
        readings: verdicts.len(),
        any_ground_stop: verdicts.iter().any(WeatherVerdict::should_ground),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(condition: WeatherCondition, wind_speed: f64) -> WeatherVerdict {
        WeatherVerdict {
            condition,
            temperature: 20.0,
            description: "test".into(),
            wind_speed,
            humidity: 50.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn impact_levels_are_ordered() {
        assert!(ImpactLevel::None < ImpactLevel::Low);
        assert!(ImpactLevel::Low < ImpactLevel::Medium);
        assert!(ImpactLevel::Medium < ImpactLevel::High);
        assert!(ImpactLevel::High < ImpactLevel::Critical);
    }

    #[test]
    fn strong_wind_on_clear_day_grounds_with_low_impact() {
        let v = classify(&WeatherReading {
            temp: 25.0,
            wind_speed: 30.0,
            humidity: Some(50.0),
            condition_code: Some(800),
            ..WeatherReading::default()
        });
        assert_eq!(v.condition, WeatherCondition::Clear);
        assert_eq!(v.impact_level(), ImpactLevel::Low);
        assert_eq!(v.delay_factor(), 0.05);
        assert!(v.should_ground());
    }

    #[test]
    fn calm_clear_day_has_no_impact() {
        let v = classify(&WeatherReading::new(18.0, 4.0, 800));
        assert_eq!(v.impact_level(), ImpactLevel::None);
        assert_eq!(v.delay_factor(), 0.0);
        assert!(!v.should_ground());
        assert_eq!(v.description, "clear sky");
    }

    #[test]
    fn thunderstorm_with_lightning_is_critical() {
        let v = classify(&WeatherReading::new(22.0, 20.0, 211));
        assert_eq!(
            v.condition,
            WeatherCondition::Storm {
                severity: StormSeverity::Moderate,
                lightning: true
            }
        );
        assert_eq!(v.impact_level(), ImpactLevel::Critical);
        assert_eq!(v.delay_factor(), 0.30);
        assert!(v.should_ground());
    }

    #[test]
    fn storm_without_lightning_follows_severity() {
        let light = classify(&WeatherReading::new(22.0, 5.0, 200));
        assert_eq!(light.impact_level(), ImpactLevel::Medium);
        assert!(!light.should_ground());

        let moderate = classify(&WeatherReading::new(22.0, 5.0, 201));
        assert_eq!(moderate.impact_level(), ImpactLevel::High);
        assert!(!moderate.should_ground());

        let severe = classify(&WeatherReading::new(22.0, 5.0, 202));
        assert_eq!(severe.impact_level(), ImpactLevel::Critical);
        assert_eq!(severe.delay_factor(), 0.50);
        assert!(severe.should_ground());
    }

    #[test]
    fn cloudy_needs_dense_cover_and_wind() {
        let mut reading = WeatherReading::new(12.0, 12.0, 804);
        reading.cloud_coverage = Some(95.0);
        let v = classify(&reading);
        assert_eq!(v.impact_level(), ImpactLevel::Low);
        assert_eq!(v.delay_factor(), 0.05);
        assert!(!v.should_ground());

        reading.wind_speed = 40.0;
        assert!(!classify(&reading).should_ground());

        reading.cloud_coverage = None;
        let v = classify(&reading);
        assert_eq!(v.condition, WeatherCondition::Cloudy { cloud_coverage: 0.0 });
        assert_eq!(v.impact_level(), ImpactLevel::None);
    }

    #[test]
    fn rain_intensity_from_code() {
        assert_eq!(rain_intensity(300), Intensity::Light);
        assert_eq!(rain_intensity(500), Intensity::Light);
        assert_eq!(rain_intensity(501), Intensity::Moderate);
        assert_eq!(rain_intensity(502), Intensity::Heavy);
        assert_eq!(rain_intensity(531), Intensity::Heavy);

        let heavy = classify(&WeatherReading::new(15.0, 16.0, 502));
        assert_eq!(heavy.impact_level(), ImpactLevel::Medium);
        assert_eq!(heavy.delay_factor(), 0.20);
        assert!(heavy.should_ground());

        let heavy_calm = classify(&WeatherReading::new(15.0, 15.0, 502));
        assert!(!heavy_calm.should_ground());
    }

    #[test]
    fn fog_bands_by_visibility() {
        let cases = [
            (150.0, ImpactLevel::Critical, 0.60, true),
            (200.0, ImpactLevel::High, 0.40, false),
            (499.0, ImpactLevel::High, 0.40, false),
            (800.0, ImpactLevel::Medium, 0.25, false),
            (1500.0, ImpactLevel::Low, 0.15, false),
            (2000.0, ImpactLevel::None, 0.05, false),
        ];
        for (visibility, impact, delay, ground) in cases {
            let mut reading = WeatherReading::new(8.0, 2.0, 741);
            reading.visibility = Some(visibility);
            let v = classify(&reading);
            assert_eq!(v.impact_level(), impact, "visibility {visibility}");
            assert_eq!(v.delay_factor(), delay, "visibility {visibility}");
            assert_eq!(v.should_ground(), ground, "visibility {visibility}");
        }
    }

    #[test]
    fn fog_without_visibility_uses_default() {
        let v = classify(&WeatherReading::new(8.0, 2.0, 741));
        assert_eq!(
            v.condition,
            WeatherCondition::Fog {
                visibility_m: DEFAULT_VISIBILITY_M
            }
        );
        assert_eq!(v.impact_level(), ImpactLevel::None);
        assert_eq!(v.delay_factor(), 0.05);
    }

    #[test]
    fn snow_accumulation_raises_impact() {
        let v = verdict(
            WeatherCondition::Snow {
                intensity: Intensity::Light,
                accumulation_cm_per_hr: 6.0,
            },
            3.0,
        );
        assert_eq!(v.impact_level(), ImpactLevel::High);
        assert_eq!(v.delay_factor(), 0.10);
        assert!(!v.should_ground());

        let v = verdict(
            WeatherCondition::Snow {
                intensity: Intensity::Heavy,
                accumulation_cm_per_hr: 7.5,
            },
            3.0,
        );
        assert!(v.should_ground());
        assert_eq!(v.delay_factor(), 0.40);

        let v = verdict(
            WeatherCondition::Snow {
                intensity: Intensity::Moderate,
                accumulation_cm_per_hr: 2.0,
            },
            3.0,
        );
        assert_eq!(v.impact_level(), ImpactLevel::Medium);
    }

    #[test]
    fn snow_accumulation_estimated_when_missing() {
        let v = classify(&WeatherReading::new(-3.0, 4.0, 602));
        assert_eq!(
            v.condition,
            WeatherCondition::Snow {
                intensity: Intensity::Heavy,
                accumulation_cm_per_hr: 6.0
            }
        );
        assert!(v.should_ground());

        let mut reading = WeatherReading::new(-3.0, 4.0, 602);
        reading.snow_accumulation = Some(1.0);
        assert!(!classify(&reading).should_ground());
    }

    #[test]
    fn unknown_or_missing_code_is_clear() {
        let v = classify(&WeatherReading::new(21.0, 3.0, 950));
        assert_eq!(v.condition, WeatherCondition::Clear);
        assert_eq!(v.temperature, 21.0);

        let v = classify(&WeatherReading {
            temp: 9.0,
            wind_speed: 1.0,
            ..WeatherReading::default()
        });
        assert_eq!(v.condition, WeatherCondition::Clear);
        assert_eq!(v.humidity, DEFAULT_HUMIDITY);
    }

    #[test]
    fn route_assessment_takes_worst_and_mean() {
        let verdicts = vec![
            classify(&WeatherReading::new(20.0, 3.0, 800)),
            classify(&WeatherReading::new(20.0, 3.0, 501)),
            classify(&WeatherReading::new(20.0, 3.0, 202)),
        ];
        let summary = assess_route(&verdicts);
        assert_eq!(summary.worst_impact, ImpactLevel::Critical);
        assert!((summary.average_delay - 0.2).abs() < 1e-12);
        assert_eq!(summary.readings, 3);
        assert!(summary.any_ground_stop);
    }

    #[test]
    fn empty_route_is_calm() {
        let summary = assess_route(&[]);
        assert_eq!(summary.worst_impact, ImpactLevel::None);
        assert_eq!(summary.average_delay, 0.0);
        assert!(!summary.any_ground_stop);
    }

    #[test]
    fn verdict_payload_carries_derived_fields() {
        let v = classify(&WeatherReading::new(22.0, 20.0, 211));
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["type"], "storm");
        assert_eq!(value["severity"], "moderate");
        assert_eq!(value["lightning"], true);
        assert_eq!(value["impact"], "critical");
        assert_eq!(value["delayFactor"], 0.30);
        assert_eq!(value["shouldGround"], true);
        assert_eq!(value["windSpeed"], 20.0);
        assert!(value["summary"].as_str().unwrap().ends_with("ground stop"));
    }

    #[test]
    fn reading_deserializes_from_provider_json() {
        let reading: WeatherReading = serde_json::from_str(
            r#"{"temp": 4.5, "windSpeed": 7.0, "humidity": 88, "visibility": 350, "conditionCode": 741}"#,
        )
        .unwrap();
        assert_eq!(reading.condition_code, Some(741));
        let v = classify(&reading);
        assert_eq!(v.impact_level(), ImpactLevel::High);
        assert_eq!(v.humidity, 88.0);
    }

    #[test]
    fn odd_provider_codes_fall_back_to_clear() {
        for raw in ["-1", "70000", "800.5"] {
            let reading: WeatherReading = serde_json::from_str(&format!(
                r#"{{"temp": 20, "windSpeed": 3, "conditionCode": {raw}}}"#
            ))
            .unwrap();
            assert_eq!(classify(&reading).condition, WeatherCondition::Clear, "code {raw}");
        }
    }

    #[test]
    fn integral_float_code_is_honored() {
        let reading: WeatherReading =
            serde_json::from_str(r#"{"temp": 20, "windSpeed": 3, "conditionCode": 502.0}"#).unwrap();
        assert_eq!(reading.condition_code, Some(502));
        assert_eq!(
            classify(&reading).condition,
            WeatherCondition::Rain {
                intensity: Intensity::Heavy
            }
        );
    }

    #[test]
    fn heavy_rain_in_strong_wind_grounds_at_medium_impact() {
        let v = classify(&WeatherReading::new(12.0, 18.0, 502));
        assert_eq!(v.impact_level(), ImpactLevel::Medium);
        assert_eq!(v.delay_factor(), 0.20);
        assert!(v.should_ground());

        let calmer = classify(&WeatherReading::new(12.0, 15.0, 502));
        assert!(!calmer.should_ground());
    }

    #[test]
    fn summary_mentions_impact_and_delay() {
        let v = classify(&WeatherReading::new(22.0, 5.0, 501));
        assert_eq!(v.summary(), "Rain (moderate rain): low impact, 10% delay");
    }
}
