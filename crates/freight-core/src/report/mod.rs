//! Tabular report generation.
//!
//! One [`ReportSpec`] renders into delimited text, structured JSON, or an
//! HTML document. Row and column counts, the generation timestamp and the
//! totals mean the same thing in every encoding.

mod delimited;
mod markup;
mod structured;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A single cell value.
///
/// Incoming JSON strings always stay [`ReportValue::Text`]; dates only come
/// from callers building [`ReportValue::Date`] directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),
    Text(String),
}

impl ReportValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ReportValue::Null)
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Null => Ok(()),
            ReportValue::Bool(b) => write!(f, "{b}"),
            ReportValue::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() => write!(f, "{x}"),
                _ => write!(f, "{n}"),
            },
            ReportValue::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ReportValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ReportValue {
    fn from(value: &str) -> Self {
        ReportValue::Text(value.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(value: String) -> Self {
        ReportValue::Text(value)
    }
}

/// Non-finite floats have no JSON form and become [`ReportValue::Null`].
impl From<f64> for ReportValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(ReportValue::Number)
            .unwrap_or(ReportValue::Null)
    }
}

impl From<i64> for ReportValue {
    fn from(value: i64) -> Self {
        ReportValue::Number(value.into())
    }
}

impl From<bool> for ReportValue {
    fn from(value: bool) -> Self {
        ReportValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ReportValue {
    fn from(value: DateTime<Utc>) -> Self {
        ReportValue::Date(value)
    }
}

impl<T: Into<ReportValue>> From<Option<T>> for ReportValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ReportValue::Null)
    }
}

/// One record, keyed by column key.
pub type ReportRow = BTreeMap<String, ReportValue>;

/// Text of `row[key]`, empty when the key is missing or null.
pub(crate) fn cell_text(row: &ReportRow, key: &str) -> String {
    row.get(key).map(ToString::to_string).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColumn {
    pub key: String,
    pub header: String,
    /// Pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

impl ReportColumn {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width: None,
            align: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }
}

/// Inclusive date window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Human-readable timestamp shared by every encoding.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p UTC").to_string()
}

/// Everything needed to render a report. The generation time is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub title: String,
    pub subtitle: Option<String>,
    pub columns: Vec<ReportColumn>,
    pub date_range: Option<DateRange>,
    pub rows: Vec<ReportRow>,
    generated_at: DateTime<Utc>,
}

impl ReportSpec {
    pub fn new(title: impl Into<String>, columns: Vec<ReportColumn>, rows: Vec<ReportRow>) -> Self {
        Self::generated(title, columns, rows, Utc::now())
    }

    /// Like [`ReportSpec::new`] with an explicit generation time.
    pub fn generated(
        title: impl Into<String>,
        columns: Vec<ReportColumn>,
        rows: Vec<ReportRow>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            columns,
            date_range: None,
            rows,
            generated_at,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(self.generated_at)
    }

    pub fn formatted_date_range(&self) -> Option<String> {
        self.date_range.map(|range| range.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Json,
    Html,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Json => "application/json",
            ReportFormat::Html => "text/html",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        self.as_str()
    }

    /// Render `spec` in this encoding. `spec` is left untouched.
    pub fn generate(&self, spec: &ReportSpec) -> CoreResult<RenderedReport> {
        let body = match self {
            ReportFormat::Csv => ReportBody::Text(delimited::render(spec)?),
            ReportFormat::Json => ReportBody::Structured(structured::render(spec)?),
            ReportFormat::Html => ReportBody::Text(markup::render(spec)),
        };

        tracing::debug!(
            format = self.as_str(),
            title = %spec.title,
            rows = spec.row_count(),
            columns = spec.column_count(),
            "rendered report"
        );

        Ok(RenderedReport {
            format: *self,
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            generated_at: spec.generated_at,
            row_count: spec.row_count(),
            column_count: spec.column_count(),
            columns: spec.columns.clone(),
            body,
        })
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            _ => Err(CoreError::UnknownReportFormat(s.to_string())),
        }
    }
}

/// Render `spec` in the format named by `format`.
pub fn generate(spec: &ReportSpec, format: &str) -> CoreResult<RenderedReport> {
    format.parse::<ReportFormat>()?.generate(spec)
}

/// Encoding-specific report content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportBody {
    Text(String),
    Structured(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub title: String,
    pub subtitle: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ReportColumn>,
    pub body: ReportBody,
}

impl RenderedReport {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn file_extension(&self) -> &'static str {
        self.format.file_extension()
    }

    /// The bytes to hand to a client, as text.
    pub fn payload(&self) -> CoreResult<String> {
        match &self.body {
            ReportBody::Text(text) => Ok(text.clone()),
            ReportBody::Structured(value) => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    /// Suggested download name, e.g. `fleet-status-20240301-142500.csv`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            slugify(&self.title),
            self.generated_at.format("%Y%m%d-%H%M%S"),
            self.file_extension()
        )
    }
}

fn slugify(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug
    }
}

/// A report request as received from the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub columns: Vec<ReportColumn>,
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub format: Option<String>,
}

impl ReportRequest {
    /// Split into a `ReportSpec` and the requested format name, stamped with the current time.
    pub fn into_spec(self) -> (ReportSpec, Option<String>) {
        let mut spec = ReportSpec::new(self.title, self.columns, self.rows);
        spec.subtitle = self.subtitle;
        spec.date_range = self.date_range;
        (spec, self.format)
    }
}
