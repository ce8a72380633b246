//! Server-side rendering of the dashboard page.
//!
//! The page is a pure function of the catalog and a [`ViewState`].

use std::fmt::Write;

use crate::catalog::{resolve_chart_asset_path, Catalog};
use crate::error::Result;
use crate::view::{current_descriptor, ViewState};

pub const PAGE_TITLE: &str = "Africa Central: AI Readiness Dashboard";

/// Adds `visible` on the next frame when the server has not revealed yet.
const REVEAL_SCRIPT: &str = "<script>requestAnimationFrame(function(){document.querySelectorAll('[data-reveal]').forEach(function(e){e.classList.add('visible');});});</script>";

const STYLE: &str = "<style>\
body{margin:0;font-family:sans-serif;background:#f4f6f7;color:#2c3e50}\
.content{max-width:1100px;margin:0 auto;padding:2rem}\
[data-reveal]{opacity:0;transform:translateY(12px);transition:opacity .6s ease,transform .6s ease}\
[data-reveal].visible{opacity:1;transform:none}\
.metric-selector{display:flex;gap:.5rem;margin:1.5rem 0}\
.metric-selector form{margin:0}\
.metric-button{padding:.6rem 1.2rem;border:1px solid #2e86c1;background:#fff;color:#2e86c1;border-radius:4px;cursor:pointer}\
.metric-button.active{background:#2e86c1;color:#fff}\
.chart-frame{width:100%;height:520px;border:0;background:#fff}\
</style>";

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn class(base: &str, on: bool, extra: &str) -> String {
    if on {
        format!("{} {}", base, extra)
    } else {
        base.to_string()
    }
}

/// Render the full HTML document for `state`.
pub fn render_page(catalog: &Catalog, state: &ViewState) -> Result<String> {
    let current = current_descriptor(state, catalog)?;
    let visible = state.revealed;
    let mut html = String::with_capacity(4096);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title>{STYLE}</head><body><div class=\"app\"><div class=\"content\">",
        title = html_escape(PAGE_TITLE),
    );

    let _ = write!(
        html,
        "<h1 class=\"{}\" data-reveal>{}</h1>",
        class("title", visible, "visible"),
        html_escape(PAGE_TITLE)
    );

    let _ = write!(html, "<div class=\"{}\" data-reveal>", class("metric-selector", visible, "visible"));
    for metric in catalog.entries() {
        let active = metric.id == state.selected_metric_id;
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/select/{id}\">\
             <button type=\"submit\" class=\"{cls}\" aria-label=\"View {title} data\">{title}</button></form>",
            id = html_escape(metric.id),
            cls = class("metric-button", active, "active"),
            title = html_escape(metric.title),
        );
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        "<div class=\"{}\" data-reveal><iframe src=\"{}\" title=\"{} Chart\" class=\"chart-frame\" loading=\"lazy\"></iframe></div>",
        class("chart-container", visible, "visible"),
        html_escape(&resolve_chart_asset_path(&state.selected_metric_id)),
        html_escape(&state.selected_metric_id),
    );

    let _ = write!(
        html,
        "<div class=\"{}\" data-reveal><h2>{}</h2><p>{}</p></div>",
        class("description", visible, "visible"),
        html_escape(current.title),
        html_escape(current.description),
    );

    html.push_str("</div></div>");
    if !visible {
        html.push_str(REVEAL_SCRIPT);
    }
    html.push_str("</body></html>");
    Ok(html)
}
