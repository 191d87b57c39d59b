//! Standalone HTML document encoding.

use super::{cell_text, ReportColumn, ReportSpec};

const STYLE: &str = "body { font-family: sans-serif; margin: 24px; color: #1f2937; }
h1 { margin-bottom: 4px; }
h2 { margin-top: 0; color: #4b5563; font-weight: normal; }
.meta { color: #6b7280; font-size: 0.9em; margin: 2px 0; }
table { border-collapse: collapse; width: 100%; margin-top: 16px; }
th, td { border: 1px solid #d1d5db; padding: 6px 10px; text-align: left; }
th { background: #f3f4f6; }
.footer { margin-top: 12px; font-weight: bold; }";

pub(super) fn render(spec: &ReportSpec) -> String {
    let title = escape_html(&spec.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<style>\n{STYLE}\n</style>\n"));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{title}</h1>\n"));
    if let Some(subtitle) = &spec.subtitle {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(subtitle)));
    }
    html.push_str(&format!(
        "<p class=\"meta\">Generated: {}</p>\n",
        escape_html(&spec.formatted_timestamp())
    ));
    if let Some(range) = spec.formatted_date_range() {
        html.push_str(&format!(
            "<p class=\"meta\">Date Range: {}</p>\n",
            escape_html(&range)
        ));
    }

    html.push_str("<table>\n<thead>\n<tr>");
    for column in &spec.columns {
        html.push_str(&format!(
            "<th{}>{}</th>",
            header_style(column),
            escape_html(&column.header)
        ));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &spec.rows {
        html.push_str("<tr>");
        for column in &spec.columns {
            html.push_str(&format!(
                "<td{}>{}</td>",
                cell_style(column),
                escape_html(&cell_text(row, &column.key))
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html.push_str(&format!(
        "<p class=\"footer\">Total Rows: {}</p>\n",
        spec.row_count()
    ));
    html.push_str("</body>\n</html>\n");
    html
}

fn header_style(column: &ReportColumn) -> String {
    let mut rules = Vec::new();
    if let Some(width) = column.width {
        rules.push(format!("width: {width}px"));
    }
    if let Some(align) = column.align {
        rules.push(format!("text-align: {}", align.as_str()));
    }
    style_attr(&rules)
}

fn cell_style(column: &ReportColumn) -> String {
    match column.align {
        Some(align) => style_attr(&[format!("text-align: {}", align.as_str())]),
        None => String::new(),
    }
}

fn style_attr(rules: &[String]) -> String {
    if rules.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", rules.join("; "))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
