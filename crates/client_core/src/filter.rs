//! Client-side view over the loaded page: drops expired opportunities and
//! applies the free-text quick filter.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use shared::protocol::Opportunity;

/// Parses the date formats the backend emits for posted/due dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    None
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Items without a parseable due date are treated as still open.
pub fn is_active(item: &Opportunity, today: NaiveDate) -> bool {
    match item.due_date.as_deref().and_then(parse_date) {
        Some(due) => due >= today,
        None => true,
    }
}

pub fn matches_query(item: &Opportunity, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contains = |text: &str| text.to_lowercase().contains(&needle);
    contains(&item.title)
        || contains(&item.agency)
        || item.summary_text().is_some_and(contains)
}

pub fn filter_opportunities<'a>(
    items: &'a [Opportunity],
    query: &str,
    today: NaiveDate,
) -> Vec<&'a Opportunity> {
    items
        .iter()
        .filter(|item| is_active(item, today) && matches_query(item, query))
        .collect()
}
