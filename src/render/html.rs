use super::plotly::figure;
use super::{emphasis_runs, Renderer};
use crate::dashboard::{Dashboard, Section, Table};
use std::io::{self, Write};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
table { border-collapse: collapse; margin: 0.5rem 0 1.5rem; font-size: 0.9rem; }
th, td { border: 1px solid #e6e9ef; padding: 0.3rem 0.6rem; text-align: right; }
th { background: #f0f2f6; }
.chart { height: 450px; margin-bottom: 1.5rem; }
.notice { color: #555; }
.error { background: #ffecec; border: 1px solid #ff4b4b; padding: 0.75rem; border-radius: 4px; }
";

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, dashboard: &Dashboard, out: &mut dyn Write) -> io::Result<()> {
        let mut body = format!(
            "<h1>{}</h1>\n<p>{}</p>\n",
            escape(&dashboard.title),
            escape(&dashboard.intro)
        );
        let mut chart_id = 0;
        for section in &dashboard.sections {
            match section {
                Section::Heading(text) => body.push_str(&format!("<h2>{}</h2>\n", escape(text))),
                Section::Table(table) => body.push_str(&table_html(table)),
                Section::Chart(chart) => {
                    chart_id += 1;
                    let spec = script_safe(&figure(chart).to_string());
                    body.push_str(&format!(
                        "<div class=\"chart\" id=\"chart-{id}\"></div>\n\
                         <script>(function() {{ var fig = {spec}; \
                         Plotly.newPlot('chart-{id}', fig.data, fig.layout, {{responsive: true}}); }})();</script>\n",
                        id = chart_id,
                        spec = spec
                    ));
                }
                Section::Notice(text) => {
                    body.push_str(&format!("<p class=\"notice\">{}</p>\n", escape(text)))
                }
                Section::List(items) => {
                    body.push_str("<ol>\n");
                    for item in items {
                        body.push_str(&format!("<li>{}</li>\n", emphasized(item)));
                    }
                    body.push_str("</ol>\n");
                }
                Section::Error(text) => {
                    body.push_str(&format!("<div class=\"error\">{}</div>\n", escape(text)))
                }
            }
        }
        out.write_all(page(&dashboard.title, &body).as_bytes())
    }
}

/// Wraps `body` in a complete document that loads plotly.js
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{cdn}\"></script>\n<style>\n{style}</style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n",
        title = escape(title),
        cdn = PLOTLY_CDN,
        style = STYLE,
        body = body
    )
}

pub fn escape(text: &str) -> String {
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

fn emphasized(text: &str) -> String {
    emphasis_runs(text)
        .into_iter()
        .map(|(run, bold)| {
            if bold {
                format!("<strong>{}</strong>", escape(run))
            } else {
                escape(run)
            }
        })
        .collect()
}

/// JSON placed inside a script element must not close it
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn table_html(table: &Table) -> String {
    if table.headers.is_empty() {
        return "<p class=\"notice\">(empty)</p>\n".to_string();
    }
    let mut html = String::from("<table>\n<thead><tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}
