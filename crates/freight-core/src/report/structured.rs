//! JSON encoding. Rows are carried verbatim under `data`.

use serde::Serialize;
use serde_json::Value;

use super::{ReportRow, ReportSpec};
use crate::error::CoreResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Metadata<'a> {
    title: &'a str,
    subtitle: Option<&'a str>,
    generated_at: String,
    date_range: Option<String>,
    total_rows: usize,
    total_columns: usize,
}

#[derive(Serialize)]
struct ColumnRef<'a> {
    key: &'a str,
    header: &'a str,
}

#[derive(Serialize)]
struct Document<'a> {
    metadata: Metadata<'a>,
    columns: Vec<ColumnRef<'a>>,
    data: &'a [ReportRow],
}

pub(super) fn render(spec: &ReportSpec) -> CoreResult<Value> {
    let document = Document {
        metadata: Metadata {
            title: &spec.title,
            subtitle: spec.subtitle.as_deref(),
            generated_at: spec.formatted_timestamp(),
            date_range: spec.formatted_date_range(),
            total_rows: spec.row_count(),
            total_columns: spec.column_count(),
        },
        columns: spec
            .columns
            .iter()
            .map(|column| ColumnRef {
                key: &column.key,
                header: &column.header,
            })
            .collect(),
        data: &spec.rows,
    };
    Ok(serde_json::to_value(document)?)
}
