//! HTML rendering of the dashboard.
use chrono::{DateTime, Utc};
use crate::checker::IONET_PROVIDER;
use crate::config::Platform;
use super::model::{Probe, Row};

const STYLES: &str = include_str!("assets/styles.css");
const SCRIPT: &str = include_str!("assets/script.js");

const TITLE: &str = "LLM Tool Support Matrix";

/// Everything the page shows.
pub struct Page<'a> {
    /// Rows of the HTTP tables.
    pub rows: Vec<Row<'a>>,
    /// Provider columns of the HTTP tables.
    pub providers: Vec<String>,
    /// HTTP results carry structured output data.
    pub has_structured: bool,
    /// Rows of the library tables, `None` when there are no library results.
    pub library_rows: Option<Vec<Row<'a>>>,
    /// Library results carry structured output data.
    pub library_has_structured: bool,
    /// Most recent generation time of the results.
    pub generated_at: DateTime<Utc>,
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn head() -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{TITLE}</title>
    <style>
{STYLES}
    </style>
</head>"#)
}

fn legend() -> &'static str {
    r#"
    <div class="legend">
        <div class="legend-item"><div class="legend-color success-swatch"></div><span>All trials succeeded</span></div>
        <div class="legend-item"><div class="legend-color partial-swatch"></div><span>Some trials succeeded</span></div>
        <div class="legend-item"><div class="legend-color failure-swatch"></div><span>No trial succeeded</span></div>
        <div class="legend-item"><div class="legend-color not-available-swatch"></div><span>Not available</span></div>
    </div>"#
}

fn filter_controls() -> String {
    let mut html = String::from(r#"
    <div class="filter-controls">
        <h3>Filter by Platform</h3>
        <div class="filter-checkboxes">"#);

    for platform in [Platform::OpenRouter, Platform::HuggingFace, Platform::IoNet] {
        let key = platform.filter_key();
        html.push_str(&format!(r#"
            <div class="filter-checkbox">
                <input type="checkbox" id="filter-{key}" data-platform="{key}" checked>
                <label for="filter-{key}">{}</label>
            </div>"#, escape_html(platform.display_name())));
    }

    html.push_str(r#"
        </div>
    </div>"#);
    html
}

fn table_headers(providers: &[String]) -> String {
    let mut html = String::from(r#"<th class="model-header">Model</th>"#);
    for (i, provider) in providers.iter().enumerate() {
        let provider = escape_html(provider);
        html.push_str(&format!(r#"<th class="provider-header" data-provider="{provider}" data-col-index="{}">{provider}</th>"#, i + 1));
    }
    html
}

fn table_row(row: &Row, providers: &[String], probe: Probe) -> String {
    let mut html = format!(r#"<tr data-platform="{}"><td class="model-name-cell">{}</td>"#,
        row.platform.filter_key(), escape_html(&row.display_name));

    for provider in providers {
        let cell = row.cell(provider, probe);
        let status = cell.status.class();

        let title = if cell.reasons.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(&cell.reasons.join(" | ")))
        };

        html.push_str(&format!(
            r#"<td class="provider-cell" data-provider="{}" data-status="{status}"><span class="cell {status}"{title}>{}</span></td>"#,
            escape_html(provider), escape_html(&cell.text)));
    }

    html.push_str("</tr>");
    html
}

fn table(rows: &[Row], providers: &[String], probe: Probe, id: &str) -> String {
    let body: String = rows.iter()
        .map(|row| table_row(row, providers, probe))
        .collect::<Vec<_>>()
        .join("\n                ");

    format!(r#"
    <div class="table-container">
        <table id="{id}">
            <thead>
                <tr>{}</tr>
            </thead>
            <tbody>
                {body}
            </tbody>
        </table>
    </div>"#, table_headers(providers))
}

// Tool table alone, or nested tool/structured tabs.
fn probe_tables(rows: &[Row], providers: &[String], has_structured: bool, prefix: &str) -> String {
    let tool_table = table(rows, providers, Probe::Tool, &format!("{prefix}-tool-support-table"));

    if !has_structured {
        return tool_table;
    }

    let structured_table = table(rows, providers, Probe::Structured, &format!("{prefix}-structured-output-table"));

    format!(r#"
            <div class="nested-tabs">
                <div class="nested-tab active" id="nested-tab-{prefix}-tool">Tool Support</div>
                <div class="nested-tab" id="nested-tab-{prefix}-structured">Structured Output</div>
            </div>
            <div class="nested-tab-content active" id="content-{prefix}-tool">
                {tool_table}
            </div>
            <div class="nested-tab-content" id="content-{prefix}-structured">
                {structured_table}
            </div>"#)
}

fn library_content(page: &Page) -> String {
    let Some(rows) = &page.library_rows else {
        return r#"
            <div class="table-container">
                <p class="empty-notice">No library test results available.<br>
                    Run <code>toolcheck test ionet-library</code> to generate them.</p>
            </div>"#.to_owned();
    };

    let providers = [IONET_PROVIDER.to_owned()];

    format!(r#"
            <div class="library-notice">
                <strong>Library Results</strong><br>
                <span>These results show model capabilities when accessed through an agent client library,
                which may differ from direct HTTP API calls.</span>
            </div>
            {}"#, probe_tables(rows, &providers, page.library_has_structured, "library"))
}

fn tabs(page: &Page) -> String {
    format!(r#"
        <div class="tabs">
            <div class="tab active" id="tab-http">HTTP</div>
            <div class="tab" id="tab-library">Library</div>
        </div>
        <div class="tab-content active" id="content-http">
            {}
        </div>
        <div class="tab-content" id="content-library">
            {}
        </div>"#,
        probe_tables(&page.rows, &page.providers, page.has_structured, "http"),
        library_content(page))
}

fn footer(generated_at: &DateTime<Utc>) -> String {
    format!(r#"
    <div class="footer">
        <p>Last updated: {}</p>
        <p>
            <a href="https://openrouter.ai" target="_blank">OpenRouter</a> |
            <a href="https://huggingface.co" target="_blank">Hugging Face</a> |
            <a href="https://io.net" target="_blank">io.net</a>
        </p>
    </div>"#, generated_at.format("%Y-%m-%d %H:%M UTC"))
}

/// Render the complete page.
pub fn render(page: &Page) -> String {
    let mut html = head();

    html.push_str(&format!(r#"
<body>
    <div class="container">
        <h1>AI Model Tool Support Matrix</h1>
        <div class="subtitle">Testing function calling capabilities across OpenRouter, Hugging Face, and io.net platforms</div>
        {}
        {}
        {}
        {}
    </div>
    <script>
{SCRIPT}
    </script>
</body>
</html>
"#, legend(), filter_controls(), tabs(page), footer(&page.generated_at)));

    html
}
