//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined, rendering the
//! system card tree as nested sections and definition lists. Sequences of
//! mappings, such as saved answer files, become tables.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde_yaml::Value;

use crate::card::SystemCard;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Convert a Unix timestamp in seconds to ISO 8601 (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// Returns `None` if the input is not a number or out of range.
pub fn timestamp_to_iso8601(timestamp: &str) -> Option<String> {
    let seconds: f64 = timestamp.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    let datetime = DateTime::from_timestamp(whole as i64, nanos)?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Generate an HTML report from a system card.
pub fn generate_html(card: &SystemCard) -> String {
    let title = card.name();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>amt report: {}</title>\n", html_escape(&title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
    html.push_str(&format!(
        "<p class=\"meta\">System card: {}</p>\n",
        html_escape(&card.source.display().to_string())
    ));
    html.push_str("</header>\n");

    for (key, value) in &card.data {
        let key = scalar_text(key);
        if key == "name" {
            continue;
        }
        html.push_str(&format!(
            "<section id=\"{}\">\n<h2>{}</h2>\n",
            html_escape(&anchor(&key)),
            html_escape(&key)
        ));
        render_value(&mut html, &key, value);
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(card: &SystemCard, path: &Path) -> Result<()> {
    let html = generate_html(card);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!("wrote report to {}", path.display());
    Ok(())
}

fn render_value(html: &mut String, key: &str, value: &Value) {
    match value {
        Value::Mapping(mapping) => {
            html.push_str("<dl>\n");
            for (k, v) in mapping {
                let k = scalar_text(k);
                html.push_str(&format!("<dt>{}</dt>\n<dd>", html_escape(&k)));
                render_value(html, &k, v);
                html.push_str("</dd>\n");
            }
            html.push_str("</dl>\n");
        }
        Value::Sequence(items) if items.is_empty() => {
            html.push_str("<span class=\"empty\">none</span>");
        }
        Value::Sequence(items) if items.iter().all(Value::is_mapping) => {
            render_table(html, items);
        }
        Value::Sequence(items) => {
            html.push_str("<ul>\n");
            for item in items {
                html.push_str("<li>");
                render_value(html, key, item);
                html.push_str("</li>\n");
            }
            html.push_str("</ul>\n");
        }
        Value::Tagged(tagged) => render_value(html, key, &tagged.value),
        scalar => {
            let text = scalar_text(scalar);
            let text = if key == "timestamp" {
                timestamp_to_iso8601(&text).unwrap_or(text)
            } else {
                text
            };
            html.push_str(&html_escape(&text));
        }
    }
}

/// Render mappings as table rows; columns are the union of their keys in
/// first-seen order.
fn render_table(html: &mut String, rows: &[Value]) {
    let mut columns: Vec<String> = Vec::new();
    for row in rows.iter().filter_map(Value::as_mapping) {
        for key in row.keys() {
            let key = scalar_text(key);
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    html.push_str("<table>\n<thead>\n<tr>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows.iter().filter_map(Value::as_mapping) {
        html.push_str("<tr>");
        for column in &columns {
            html.push_str("<td>");
            if let Some(value) = row.get(column.as_str()) {
                render_value(html, column, value);
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default(),
    }
}

fn anchor(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --muted: #9ca3af; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
section { border-top: 1px solid var(--border); }
.meta, .empty { color: var(--muted); }
dl { margin: 0.5rem 0 0.5rem 1rem; }
dt { font-weight: bold; margin-top: 0.5rem; }
dd { margin-left: 1rem; }
ul { margin: 0.25rem 0; padding-left: 1.25rem; }
table { border-collapse: collapse; margin: 0.5rem 0; }
th, td { border: 1px solid var(--border); padding: 0.25rem 0.5rem; text-align: left; vertical-align: top; }
"#;
