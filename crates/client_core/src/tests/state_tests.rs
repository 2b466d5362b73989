use super::*;
use shared::domain::SavedId;

fn opportunity(id: i64) -> Opportunity {
    Opportunity {
        id: RfpId(id),
        title: format!("Opportunity {id}"),
        agency: "Dept".into(),
        url: String::new(),
        score: None,
        posted_date: None,
        due_date: None,
        focus_tags: None,
        summary: None,
        description: None,
        category: None,
    }
}

fn saved(rfp_id: i64) -> SavedItem {
    SavedItem {
        id: SavedId(rfp_id * 10),
        rfp_id: RfpId(rfp_id),
        title: format!("Saved {rfp_id}"),
        agency: "Dept".into(),
        url: String::new(),
        posted_date: None,
        due_date: None,
    }
}

fn detail(rfp_id: i64) -> SavedDetail {
    SavedDetail {
        item: saved(rfp_id),
        documents: Vec::new(),
        notes: Vec::new(),
        ai_full_summary: None,
        ai_insights: None,
    }
}

fn loaded_state(total_count: u64, page: u32) -> AppState {
    let mut state = AppState::default();
    state.apply(Action::PageLoaded {
        page,
        data: Page {
            items: vec![opportunity(1)],
            total_count,
        },
    });
    state
}

#[test]
fn total_pages_is_at_least_one() {
    assert_eq!(loaded_state(0, 0).list.total_pages(), 1);
    assert_eq!(loaded_state(100, 0).list.total_pages(), 1);
    assert_eq!(loaded_state(101, 0).list.total_pages(), 2);
    assert_eq!(loaded_state(250, 0).list.total_pages(), 3);
}

#[test]
fn last_page_has_no_next() {
    let state = loaded_state(250, 2);
    assert!(!state.list.has_next());
    assert!(!state.can_go_next());
    assert!(state.can_go_prev());
    assert_eq!(state.list.clamp_page(7), 2);
    assert_eq!(ListStore::offset_for(2), 200);
}

#[test]
fn page_jump_is_not_clamped_before_the_total_is_known() {
    let fresh = AppState::default();
    assert!(!fresh.list.total_known);
    assert_eq!(fresh.list.clamp_page(4), 4);

    let loaded = loaded_state(0, 0);
    assert!(loaded.list.total_known);
    assert_eq!(loaded.list.clamp_page(4), 0);
}

#[test]
fn navigation_disabled_while_loading_or_refreshing() {
    let mut state = loaded_state(250, 1);
    assert!(state.can_go_next() && state.can_go_prev());

    state.apply(Action::PageRequested);
    assert!(!state.can_go_next() && !state.can_go_prev());

    let mut state = loaded_state(250, 1);
    state.apply(Action::RefreshStarted);
    assert!(!state.can_go_next() && !state.can_go_prev());
}

#[test]
fn refresh_start_clears_error_and_settle_always_stops_refreshing() {
    let mut state = AppState::default();
    state.apply(Action::ActionFailed("old failure".into()));

    state.apply(Action::RefreshStarted);
    assert!(state.is_refreshing());
    assert!(state.error.is_none());

    state.apply(Action::ProgressPolled(ProgressState {
        total: 10,
        done: 4,
        stage: "scoring".into(),
    }));
    assert_eq!(state.progress.percent(), 40);

    state.apply(Action::RefreshSettled(Err("Refresh failed: ingest timeout".into())));
    assert!(!state.is_refreshing());
    assert_eq!(
        state.status,
        RefreshStatus::Failed("Refresh failed: ingest timeout".into())
    );
    assert_eq!(state.error.as_deref(), Some("Refresh failed: ingest timeout"));
    assert!(state.progress.is_empty());

    state.apply(Action::RefreshStarted);
    state.apply(Action::RefreshSettled(Ok(Some("Ingested 3 notices.".into()))));
    assert_eq!(state.status, RefreshStatus::Idle);
    assert_eq!(state.last_refresh_message.as_deref(), Some("Ingested 3 notices."));
}

#[test]
fn progress_after_settlement_is_ignored() {
    let mut state = AppState::default();
    state.apply(Action::RefreshStarted);
    state.apply(Action::RefreshSettled(Ok(None)));
    state.apply(Action::ProgressPolled(ProgressState {
        total: 5,
        done: 5,
        stage: "done".into(),
    }));
    assert!(state.progress.is_empty());
}

#[test]
fn successful_settle_keeps_errors_from_reload_chain() {
    let mut state = AppState::default();
    state.apply(Action::RefreshStarted);
    state.apply(Action::ActionFailed("Failed to load saved items".into()));
    state.apply(Action::RefreshSettled(Ok(None)));
    assert_eq!(state.error.as_deref(), Some("Failed to load saved items"));
    assert_eq!(state.status, RefreshStatus::Idle);
}

#[test]
fn failed_page_load_keeps_previous_items() {
    let mut state = loaded_state(250, 1);
    state.apply(Action::PageRequested);
    state.apply(Action::PageFailed("Server unreachable".into()));
    assert!(!state.list.loading);
    assert_eq!(state.list.page, 1);
    assert_eq!(state.list.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Server unreachable"));
}

#[test]
fn removing_open_item_closes_detail() {
    let mut state = AppState::default();
    state.apply(Action::SavedLoaded(vec![saved(1), saved(2)]));
    state.apply(Action::DetailLoaded(detail(2)));
    assert!(state.saved.is_saved(RfpId(2)));

    state.apply(Action::SavedRemoved(RfpId(1)));
    assert_eq!(state.saved.open_rfp_id(), Some(RfpId(2)));

    state.apply(Action::SavedRemoved(RfpId(2)));
    assert!(state.saved.open.is_none());
    assert!(state.saved.items.is_empty());
}

#[test]
fn dismissing_error_resets_failed_status() {
    let mut state = AppState::default();
    state.apply(Action::RefreshStarted);
    state.apply(Action::RefreshSettled(Err("boom".into())));
    state.apply(Action::ErrorDismissed);
    assert!(state.error.is_none());
    assert_eq!(state.status, RefreshStatus::Idle);
}
