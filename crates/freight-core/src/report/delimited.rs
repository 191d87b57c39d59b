//! Comma-separated encoding. Every table field is quoted and embedded quotes are doubled.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io;

use super::{cell_text, ReportSpec};
use crate::error::CoreResult;

pub(super) fn render(spec: &ReportSpec) -> CoreResult<String> {
    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');
    out.push_str(&format!("Generated: {}\n", spec.formatted_timestamp()));
    if let Some(range) = spec.formatted_date_range() {
        out.push_str(&format!("Date Range: {range}\n"));
    }
    out.push('\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(spec.columns.iter().map(|column| column.header.as_str()))?;
    for row in &spec.rows {
        writer.write_record(spec.columns.iter().map(|column| cell_text(row, &column.key)))?;
    }

    let table = writer
        .into_inner()
        .map_err(|err| csv::Error::from(io::Error::new(err.error().kind(), err.to_string())))?;
    out.push_str(&String::from_utf8_lossy(&table));
    out.push('\n');
    out.push_str(&format!("\"Total Rows: {}\"\n", spec.row_count()));
    Ok(out)
}
