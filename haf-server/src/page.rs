//! Server-rendered HTML shell for the dashboard.

use crate::assets::D3_URL;
use haf_chart::Layout;
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 0 24px; }
h1 { text-align: center; }
.haf-selector { margin: 12px 0; }
.haf-tabs { border-bottom: 1px solid #ccc; margin-bottom: 12px; }
.haf-tab { border: none; background: none; padding: 8px 16px; cursor: pointer; }
.haf-tab.active { border-bottom: 3px solid #1f77b4; font-weight: bold; }
.haf-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(560px, 1fr)); gap: 16px; }
.haf-chart-region { min-height: 360px; }
.haf-error { color: #b00020; padding: 16px; }
.haf-tooltip { background: #fff; border: 1px solid #999; padding: 4px 8px; font-size: 12px; }
";

/// Minimal escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the page: header, MSA selector, tab strip and one empty
/// container per chart region. Charts are filled in by the client script.
pub fn render(layout: &Layout) -> String {
    let mut options = String::new();
    for key in &layout.dropdown.options {
        let selected = if *key == layout.dropdown.value { " selected" } else { "" };
        let key = escape(key);
        let _ = writeln!(options, r#"      <option value="{key}"{selected}>{key}</option>"#);
    }

    let mut tabs = String::new();
    let mut panels = String::new();
    for tab in &layout.tabs {
        let _ = writeln!(tabs, r#"    <button class="haf-tab">{}</button>"#, escape(tab.label));
        let _ = writeln!(panels, r#"  <div class="haf-tab-panel"><div class="haf-grid">"#);
        for region in &tab.regions {
            let _ = writeln!(panels, r#"    <div id="{region}" class="haf-chart-region"></div>"#);
        }
        let _ = writeln!(panels, "  </div></div>");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{page_title}</title>
  <style>
{STYLE}  </style>
  <script src="{D3_URL}"></script>
  <script src="/assets/dashboard.js"></script>
</head>
<body>
  <h1>{title}</h1>
  <div class="haf-selector">
    <label for="{id}">{label}</label>
    <select id="{id}">
{options}    </select>
  </div>
  <div class="haf-tabs">
{tabs}  </div>
{panels}</body>
</html>
"#,
        page_title = escape(layout.page_title),
        title = escape(layout.title),
        id = layout.dropdown.id,
        label = escape(layout.dropdown.label),
    )
}
