use chrono::NaiveDate;
use shared::{domain::PAGE_SIZE, protocol::Opportunity};
use tracing::{debug, error};

use super::RefreshCoordinator;
use crate::{
    error::Result,
    state::{Action, ListStore},
};

impl RefreshCoordinator {
    /// Loads `page`, clamped to the known page range.
    ///
    /// Returns `Ok(false)` without fetching while a list load or a refresh
    /// is already in flight.
    pub async fn go_to_page(&self, page: u32) -> Result<bool> {
        let target = {
            let state = self.state.lock().await;
            if state.is_busy() {
                debug!(page, "page change ignored while busy");
                return Ok(false);
            }
            state.list.clamp_page(page)
        };
        self.fetch_page(target).await?;
        Ok(true)
    }

    pub async fn go_next(&self) -> Result<bool> {
        let next = {
            let state = self.state.lock().await;
            if !state.can_go_next() {
                return Ok(false);
            }
            state.list.page + 1
        };
        self.go_to_page(next).await
    }

    pub async fn go_prev(&self) -> Result<bool> {
        let prev = {
            let state = self.state.lock().await;
            if !state.can_go_prev() {
                return Ok(false);
            }
            state.list.page - 1
        };
        self.go_to_page(prev).await
    }

    /// Re-fetches the page currently shown.
    pub async fn reload_list(&self) -> Result<bool> {
        let page = self.state.lock().await.list.page;
        self.go_to_page(page).await
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.dispatch(Action::QueryChanged(query.into())).await;
    }

    /// Filtered view of the loaded page for the given calendar day.
    pub async fn visible_items(&self, today: NaiveDate) -> Vec<Opportunity> {
        let state = self.state.lock().await;
        state.list.visible(today).into_iter().cloned().collect()
    }

    pub(super) async fn fetch_page(&self, page: u32) -> Result<()> {
        self.dispatch(Action::PageRequested).await;
        match self
            .api
            .list_rfps(PAGE_SIZE, ListStore::offset_for(page))
            .await
        {
            Ok(data) => {
                debug!(page, items = data.items.len(), total = data.total_count, "page loaded");
                self.dispatch(Action::PageLoaded { page, data }).await;
                Ok(())
            }
            Err(err) => {
                error!(page, "failed to load opportunities: {err}");
                self.dispatch(Action::PageFailed(err.user_message())).await;
                Err(err)
            }
        }
    }
}
