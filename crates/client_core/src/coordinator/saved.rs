use shared::{
    domain::RfpId,
    protocol::{SavedDetail, SavedItem},
};
use tracing::info;

use super::RefreshCoordinator;
use crate::{
    error::{ClientError, Result},
    state::Action,
    DocumentUpload,
};

// Each mutation makes one backend call and then refetches what it touched,
// so server-derived fields (summaries, insights) come from the server.
impl RefreshCoordinator {
    pub async fn reload_saved(&self) -> Result<Vec<SavedItem>> {
        match self.api.list_saved().await {
            Ok(items) => {
                self.dispatch(Action::SavedLoaded(items.clone())).await;
                Ok(items)
            }
            Err(err) => Err(self.fail("load saved items", err).await),
        }
    }

    pub async fn save(&self, rfp_id: RfpId) -> Result<()> {
        if let Err(err) = self.api.save_rfp(rfp_id).await {
            return Err(self.fail("save opportunity", err).await);
        }
        info!(%rfp_id, "opportunity saved");
        let _ = self.reload_saved().await;
        Ok(())
    }

    pub async fn remove(&self, rfp_id: RfpId) -> Result<()> {
        if let Err(err) = self.api.remove_saved(rfp_id).await {
            return Err(self.fail("remove saved item", err).await);
        }
        info!(%rfp_id, "saved item removed");
        self.dispatch(Action::SavedRemoved(rfp_id)).await;
        let _ = self.reload_saved().await;
        Ok(())
    }

    pub async fn open_saved(&self, rfp_id: RfpId) -> Result<SavedDetail> {
        self.reload_detail(rfp_id).await
    }

    pub async fn close_detail(&self) {
        self.dispatch(Action::DetailClosed).await;
    }

    pub(super) async fn reload_detail(&self, rfp_id: RfpId) -> Result<SavedDetail> {
        match self.api.saved_detail(rfp_id).await {
            Ok(detail) => {
                self.dispatch(Action::DetailLoaded(detail.clone())).await;
                Ok(detail)
            }
            Err(err) => {
                // Removed elsewhere: drop the stale panel.
                if err.is_not_found() && self.open_detail_id().await == Some(rfp_id) {
                    self.dispatch(Action::DetailClosed).await;
                }
                Err(self.fail("open saved item", err).await)
            }
        }
    }

    /// Uploads a document to the open saved item.
    pub async fn upload_document(&self, upload: DocumentUpload) -> Result<SavedDetail> {
        let rfp_id = self.require_open_detail().await?;
        let filename = upload.filename.clone();
        let detail = match self.api.upload_document(rfp_id, upload).await {
            Ok(detail) => detail,
            Err(err) => return Err(self.fail("upload document", err).await),
        };
        info!(%rfp_id, %filename, "document uploaded");
        self.dispatch(Action::DetailLoaded(detail.clone())).await;
        let _ = self.reload_saved().await;
        Ok(detail)
    }

    /// Adds a note to the open saved item. Blank notes are rejected locally.
    pub async fn add_note(&self, text: &str) -> Result<SavedDetail> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self
                .fail(
                    "add note",
                    ClientError::Validation("note must not be empty".into()),
                )
                .await);
        }
        let rfp_id = self.require_open_detail().await?;
        let detail = match self.api.add_note(rfp_id, text).await {
            Ok(detail) => detail,
            Err(err) => return Err(self.fail("add note", err).await),
        };
        self.dispatch(Action::DetailLoaded(detail.clone())).await;
        let _ = self.reload_saved().await;
        Ok(detail)
    }

    pub async fn download_document(&self, rfp_id: RfpId, name: &str) -> Result<Vec<u8>> {
        match self.api.download_document(rfp_id, name).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.fail("download document", err).await),
        }
    }

    async fn require_open_detail(&self) -> Result<RfpId> {
        match self.open_detail_id().await {
            Some(rfp_id) => Ok(rfp_id),
            None => Err(self.fail("saved item action", ClientError::NoDetailOpen).await),
        }
    }
}
