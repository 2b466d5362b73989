use std::fmt::Write as _;

use chrono::NaiveDate;
use client_core::{
    display::{display_tags, format_date, format_score, progress_label},
    AppState,
};
use shared::protocol::{Opportunity, ProgressState, SavedDetail};

const BAR_WIDTH: usize = 30;

pub fn progress_bar(progress: &ProgressState) -> String {
    let filled = usize::from(progress.percent()) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress_label(progress)
    )
}

fn opportunity_line(out: &mut String, item: &Opportunity) {
    let _ = writeln!(
        out,
        "#{:<5} [{:>3}] {}",
        item.id,
        format_score(item.score),
        item.title
    );
    let _ = writeln!(
        out,
        "        {} | posted {} | due {} | {}",
        if item.agency.is_empty() { "Unknown agency" } else { item.agency.as_str() },
        format_date(item.posted_date.as_deref()),
        format_date(item.due_date.as_deref()),
        display_tags(item).join(", ")
    );
    if let Some(summary) = item.summary_text() {
        let _ = writeln!(out, "        {}", summary.lines().next().unwrap_or_default());
    }
}

pub fn list(state: &AppState, today: NaiveDate) -> String {
    let mut out = String::new();
    let visible = state.list.visible(today);
    let _ = writeln!(
        out,
        "Page {}/{} ({} total, {} shown{})",
        state.list.page + 1,
        state.list.total_pages(),
        state.list.total_count,
        visible.len(),
        if state.list.query.trim().is_empty() {
            String::new()
        } else {
            format!(", filter \"{}\"", state.list.query.trim())
        }
    );
    if visible.is_empty() {
        let _ = writeln!(out, "  no active opportunities match");
    }
    for item in visible {
        opportunity_line(&mut out, item);
        if state.saved.is_saved(item.id) {
            let _ = writeln!(out, "        (saved)");
        }
    }
    out
}

pub fn saved(state: &AppState) -> String {
    let mut out = String::new();
    if state.saved.items.is_empty() {
        let _ = writeln!(out, "No saved opportunities.");
        return out;
    }
    let _ = writeln!(out, "Saved ({}):", state.saved.items.len());
    for item in &state.saved.items {
        let _ = writeln!(
            out,
            "  #{:<5} {} | {} | due {}",
            item.rfp_id,
            item.title,
            item.agency,
            format_date(item.due_date.as_deref())
        );
    }
    out
}

pub fn detail(detail: &SavedDetail) -> String {
    let mut out = String::new();
    let item = &detail.item;
    let _ = writeln!(out, "#{} {}", item.rfp_id, item.title);
    let _ = writeln!(out, "  {} | {}", item.agency, item.url);
    let _ = writeln!(
        out,
        "  posted {} | due {}",
        format_date(item.posted_date.as_deref()),
        format_date(item.due_date.as_deref())
    );
    if let Some(summary) = &detail.ai_full_summary {
        let _ = writeln!(out, "  Summary: {summary}");
    }
    if let Some(insights) = &detail.ai_insights {
        let _ = writeln!(out, "  Insights: {insights}");
    }
    if detail.documents.is_empty() {
        let _ = writeln!(out, "  Documents: none");
    } else {
        let _ = writeln!(out, "  Documents:");
        for name in &detail.documents {
            let _ = writeln!(out, "    - {name}");
        }
    }
    if detail.notes.is_empty() {
        let _ = writeln!(out, "  Notes: none");
    } else {
        let _ = writeln!(out, "  Notes:");
        for note in &detail.notes {
            let when = note.created_at.as_deref().unwrap_or("");
            let _ = writeln!(out, "    [{when}] {}", note.note);
        }
    }
    out
}
