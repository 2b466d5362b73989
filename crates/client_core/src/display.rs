use shared::{
    domain::{MAX_DISPLAY_TAGS, PLACEHOLDER_TAG},
    protocol::{Opportunity, ProgressState},
};

use crate::filter::parse_date;

const MISSING: &str = "—";

/// Human date like `Mar 4, 2026`; unparseable input is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => parse_date(text)
            .map(|date| date.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| text.to_string()),
        None => MISSING.to_string(),
    }
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) if value.is_finite() => format!("{:.0}", value.clamp(0.0, 100.0)),
        _ => MISSING.to_string(),
    }
}

pub fn display_tags(item: &Opportunity) -> Vec<String> {
    let tags: Vec<String> = item
        .focus_tags
        .iter()
        .flatten()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .take(MAX_DISPLAY_TAGS)
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        vec![PLACEHOLDER_TAG.to_string()]
    } else {
        tags
    }
}

pub fn progress_label(progress: &ProgressState) -> String {
    let stage = if progress.stage.trim().is_empty() {
        "working"
    } else {
        progress.stage.trim()
    };
    format!(
        "{stage}: {}/{} ({}%)",
        progress.done,
        progress.total,
        progress.percent()
    )
}
