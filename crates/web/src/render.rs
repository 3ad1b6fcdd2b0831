//! HTML fragments swapped into the page by its script.

use crate::remote::{SearchHit, StatusProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Online,
    Degraded,
    Offline,
}

impl StatusIndicator {
    pub fn from_probe<E>(probe: &Result<StatusProbe, E>) -> Self {
        match probe {
            Ok(p) if p.is_healthy() => StatusIndicator::Online,
            Ok(_) => StatusIndicator::Degraded,
            Err(_) => StatusIndicator::Offline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusIndicator::Online => "● Online",
            StatusIndicator::Degraded => "● Degraded",
            StatusIndicator::Offline => "● Offline",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            StatusIndicator::Online => "#00ff88",
            StatusIndicator::Degraded => "#ffaa00",
            StatusIndicator::Offline => "#ff4444",
        }
    }

    pub fn render(self) -> String {
        format!(
            r#"<span style="color: {}">{}</span>"#,
            self.color(),
            self.label()
        )
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
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

/// `0.857` becomes `85.7`; missing or zero similarity shows as `?`.
/// Ties round away from zero, so `12.25` shows as `12.3`.
pub fn format_similarity(similarity: Option<f64>) -> String {
    match similarity {
        Some(s) if s != 0.0 => format!("{:.1}", (s * 100.0 * 10.0).round() / 10.0),
        _ => "?".to_string(),
    }
}

pub fn render_card(hit: &SearchHit) -> String {
    let source = hit
        .source_transcript
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| hit.source.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or("Unknown");
    format!(
        concat!(
            r#"<div class="result-card"><div class="result-source">"#,
            r#"<span>📄 {}</span><span class="similarity-badge">{}% match</span></div>"#,
            r#"<div class="result-content">{}</div></div>"#
        ),
        escape_html(source),
        format_similarity(hit.similarity),
        escape_html(hit.content.as_deref().unwrap_or(""))
    )
}

pub fn render_results(query: &str, hits: &[SearchHit]) -> String {
    let query = escape_html(query);
    if hits.is_empty() {
        return format!(
            concat!(
                r#"<div class="empty-state"><div class="icon">🤔</div>"#,
                r#"<p>No results found for "{}"</p>"#,
                r#"<p style="margin-top: 10px; font-size: 0.9rem;">Try different keywords or broader terms</p></div>"#
            ),
            query
        );
    }
    let mut html = format!(
        r#"<div class="results-header"><h3>Results for "{}"</h3><span class="results-count">{} matches</span></div>"#,
        query,
        hits.len()
    );
    for hit in hits {
        html.push_str(&render_card(hit));
    }
    html
}

pub fn render_error(message: &str) -> String {
    format!(
        concat!(
            r#"<div class="error"><p>⚠️ Error connecting to The Cortex</p>"#,
            r#"<p style="font-size: 0.9rem; margin-top: 10px;">{}</p></div>"#
        ),
        escape_html(message)
    )
}
