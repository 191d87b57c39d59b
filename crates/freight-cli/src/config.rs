//! CLI configuration from environment.

use std::env;

use freight_core::ReportFormat;

pub const DEFAULT_LOG_FILTER: &str = "freight_cli=info,freight_core=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_filter: String,
    pub log_format: LogFormat,
    pub pretty: bool,
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Text,
            pretty: true,
            report_format: ReportFormat::Csv,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_filter: lookup("FREIGHT_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            log_format: lookup("FREIGHT_LOG_FORMAT")
                .and_then(|s| parse_log_format(&s))
                .unwrap_or(defaults.log_format),
            pretty: lookup("FREIGHT_PRETTY")
                .and_then(|s| parse_bool(&s))
                .unwrap_or(defaults.pretty),
            report_format: lookup("FREIGHT_REPORT_FORMAT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.report_format),
        }
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "text" | "plain" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
