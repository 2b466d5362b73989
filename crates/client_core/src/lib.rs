use async_trait::async_trait;
use shared::{
    domain::RfpId,
    protocol::{Opportunity, ProgressState, RefreshResponse, SavedDetail, SavedItem},
};

pub mod config;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod filter;
pub mod poller;
pub mod state;
pub mod transport;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use error::{ClientError, Result};
pub use poller::ProgressPoller;
pub use state::{Action, AppState, ListStore, RefreshStatus, SavedStore};
pub use transport::HttpRfpClient;

/// One page of a listing plus the server-side total.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Backend operations the client depends on.
#[async_trait]
pub trait RfpApi: Send + Sync {
    async fn list_rfps(&self, limit: u32, offset: u64) -> Result<Page<Opportunity>>;
    async fn trigger_refresh(&self) -> Result<RefreshResponse>;
    async fn progress(&self) -> Result<ProgressState>;
    async fn list_saved(&self) -> Result<Vec<SavedItem>>;
    async fn saved_detail(&self, rfp_id: RfpId) -> Result<SavedDetail>;
    async fn save_rfp(&self, rfp_id: RfpId) -> Result<()>;
    async fn remove_saved(&self, rfp_id: RfpId) -> Result<()>;
    async fn upload_document(&self, rfp_id: RfpId, upload: DocumentUpload)
        -> Result<SavedDetail>;
    async fn add_note(&self, rfp_id: RfpId, note: &str) -> Result<SavedDetail>;
    async fn download_document(&self, rfp_id: RfpId, name: &str) -> Result<Vec<u8>>;
    async fn health(&self) -> Result<String>;
    async fn seed_demo_data(&self) -> Result<String>;
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;
