//! Client state container and the reducer that drives every transition.
//!
//! All mutation goes through [`AppState::apply`]. The coordinator performs
//! the network calls and feeds their results back in as [`Action`]s, so the
//! rules below (most importantly: settlement always leaves the refresh
//! status non-refreshing and clears progress) hold no matter which code path
//! produced the action.

use chrono::NaiveDate;
use shared::{
    domain::{RfpId, PAGE_SIZE},
    protocol::{Opportunity, ProgressState, SavedDetail, SavedItem},
};

use crate::{filter::filter_opportunities, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RefreshStatus {
    #[default]
    Idle,
    Refreshing,
    Failed(String),
}

impl RefreshStatus {
    pub fn is_refreshing(&self) -> bool {
        matches!(self, Self::Refreshing)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListStore {
    pub items: Vec<Opportunity>,
    pub page: u32,
    pub total_count: u64,
    /// Set once a page load has reported the server-side total.
    pub total_known: bool,
    pub loading: bool,
    pub query: String,
}

impl ListStore {
    pub fn offset_for(page: u32) -> u64 {
        u64::from(page) * u64::from(PAGE_SIZE)
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(PAGE_SIZE)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Clamps to the known page range; before any page has loaded the
    /// request is passed through unchanged.
    pub fn clamp_page(&self, page: u32) -> u32 {
        if !self.total_known {
            return page;
        }
        page.min(self.total_pages() - 1)
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Active items matching the current query, in server order.
    pub fn visible(&self, today: NaiveDate) -> Vec<&Opportunity> {
        filter_opportunities(&self.items, &self.query, today)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SavedStore {
    pub items: Vec<SavedItem>,
    pub open: Option<SavedDetail>,
}

impl SavedStore {
    pub fn is_saved(&self, rfp_id: RfpId) -> bool {
        self.items.iter().any(|item| item.rfp_id == rfp_id)
    }

    pub fn open_rfp_id(&self) -> Option<RfpId> {
        self.open.as_ref().map(SavedDetail::rfp_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub status: RefreshStatus,
    pub progress: ProgressState,
    pub list: ListStore,
    pub saved: SavedStore,
    pub error: Option<String>,
    pub last_refresh_message: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Action {
    RefreshStarted,
    ProgressPolled(ProgressState),
    /// `Ok` carries the backend's summary message, `Err` the user-facing
    /// failure text.
    RefreshSettled(Result<Option<String>, String>),
    PageReset,
    PageRequested,
    PageLoaded { page: u32, data: Page<Opportunity> },
    PageFailed(String),
    QueryChanged(String),
    SavedLoaded(Vec<SavedItem>),
    DetailLoaded(SavedDetail),
    DetailClosed,
    SavedRemoved(RfpId),
    ActionFailed(String),
    ErrorDismissed,
}

impl AppState {
    pub fn is_refreshing(&self) -> bool {
        self.status.is_refreshing()
    }

    /// Whether any list or refresh load is in flight; navigation is
    /// disabled while this holds.
    pub fn is_busy(&self) -> bool {
        self.list.loading || self.is_refreshing()
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_busy() && self.list.has_next()
    }

    pub fn can_go_prev(&self) -> bool {
        !self.is_busy() && self.list.has_prev()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::RefreshStarted => {
                self.error = None;
                self.status = RefreshStatus::Refreshing;
                self.progress = ProgressState::default();
            }
            Action::ProgressPolled(progress) => {
                // Late polls that land after settlement are dropped.
                if self.is_refreshing() {
                    self.progress = progress;
                }
            }
            Action::RefreshSettled(outcome) => {
                self.progress = ProgressState::default();
                match outcome {
                    Ok(message) => {
                        self.status = RefreshStatus::Idle;
                        self.last_refresh_message = message;
                    }
                    Err(message) => {
                        self.status = RefreshStatus::Failed(message.clone());
                        self.error = Some(message);
                    }
                }
            }
            Action::PageReset => {
                self.list.page = 0;
            }
            Action::PageRequested => {
                self.list.loading = true;
            }
            Action::PageLoaded { page, data } => {
                self.list.loading = false;
                self.list.page = page;
                self.list.total_count = data.total_count;
                self.list.total_known = true;
                self.list.items = data.items;
            }
            Action::PageFailed(message) => {
                self.list.loading = false;
                self.error = Some(message);
            }
            Action::QueryChanged(query) => {
                self.list.query = query;
            }
            Action::SavedLoaded(items) => {
                self.saved.items = items;
            }
            Action::DetailLoaded(detail) => {
                self.saved.open = Some(detail);
            }
            Action::DetailClosed => {
                self.saved.open = None;
            }
            Action::SavedRemoved(rfp_id) => {
                self.saved.items.retain(|item| item.rfp_id != rfp_id);
                if self.saved.open_rfp_id() == Some(rfp_id) {
                    self.saved.open = None;
                }
            }
            Action::ActionFailed(message) => {
                self.error = Some(message);
            }
            Action::ErrorDismissed => {
                self.error = None;
                if matches!(self.status, RefreshStatus::Failed(_)) {
                    self.status = RefreshStatus::Idle;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
