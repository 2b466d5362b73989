//! In-memory [`RfpApi`] used by the coordinator tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::{NoteId, RfpId, SavedId},
    protocol::{Note, Opportunity, ProgressState, RefreshResponse, SavedDetail, SavedItem},
};
use tokio::sync::Notify;

use crate::{ClientError, DocumentUpload, Page, Result, RfpApi};

pub fn opportunity(id: i64, title: &str) -> Opportunity {
    Opportunity {
        id: RfpId(id),
        title: title.into(),
        agency: "Dept. Example".into(),
        url: format!("https://example.com/rfp{id}"),
        score: Some(50.0),
        posted_date: None,
        due_date: None,
        focus_tags: None,
        summary: None,
        description: None,
        category: None,
    }
}

pub fn opportunities(count: i64) -> Vec<Opportunity> {
    (1..=count)
        .map(|id| opportunity(id, &format!("Notice {id}")))
        .collect()
}

/// Pauses `trigger_refresh` until the test releases it.
#[derive(Default)]
pub struct RefreshGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub rfps: Mutex<Vec<Opportunity>>,
    /// Replaces `rfps` when a refresh succeeds.
    pub refreshed_rfps: Mutex<Option<Vec<Opportunity>>>,
    pub saved: Mutex<Vec<SavedItem>>,
    pub details: Mutex<HashMap<RfpId, SavedDetail>>,
    pub progress: Mutex<ProgressState>,
    pub progress_calls: AtomicUsize,
    pub refresh_response: Mutex<Option<RefreshResponse>>,
    pub refresh_failure: Mutex<Option<(StatusCode, String)>>,
    pub list_failure: Mutex<Option<(StatusCode, String)>>,
    pub saved_failure: Mutex<Option<(StatusCode, String)>>,
    pub progress_failure: Mutex<bool>,
    pub gate: Option<Arc<RefreshGate>>,
}

impl FakeApi {
    pub fn with_rfps(rfps: Vec<Opportunity>) -> Self {
        let api = Self::default();
        *api.rfps.lock().expect("lock") = rfps;
        api
    }

    pub fn gated(mut self, gate: Arc<RefreshGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("lock").push(call.into());
    }

    fn failure(slot: &Mutex<Option<(StatusCode, String)>>) -> Result<()> {
        match slot.lock().expect("lock").clone() {
            Some((status, message)) => Err(ClientError::status(status, message)),
            None => Ok(()),
        }
    }

    fn item_for(&self, rfp_id: RfpId) -> SavedItem {
        let rfps = self.rfps.lock().expect("lock");
        let source = rfps.iter().find(|rfp| rfp.id == rfp_id);
        SavedItem {
            id: SavedId(rfp_id.0 + 1000),
            rfp_id,
            title: source.map(|rfp| rfp.title.clone()).unwrap_or_default(),
            agency: source.map(|rfp| rfp.agency.clone()).unwrap_or_default(),
            url: source.map(|rfp| rfp.url.clone()).unwrap_or_default(),
            posted_date: None,
            due_date: None,
        }
    }

    fn detail_mut<T>(&self, rfp_id: RfpId, f: impl FnOnce(&mut SavedDetail) -> T) -> Result<T> {
        let mut details = self.details.lock().expect("lock");
        let detail = details
            .get_mut(&rfp_id)
            .ok_or_else(|| ClientError::status(StatusCode::NOT_FOUND, "Saved item not found"))?;
        Ok(f(detail))
    }
}

#[async_trait]
impl RfpApi for FakeApi {
    async fn list_rfps(&self, limit: u32, offset: u64) -> Result<Page<Opportunity>> {
        self.record(format!("list_rfps offset={offset}"));
        Self::failure(&self.list_failure)?;
        let rfps = self.rfps.lock().expect("lock");
        let items = rfps
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total_count: rfps.len() as u64,
        })
    }

    async fn trigger_refresh(&self) -> Result<RefreshResponse> {
        self.record("trigger_refresh");
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Self::failure(&self.refresh_failure)?;
        if let Some(rfps) = self.refreshed_rfps.lock().expect("lock").take() {
            *self.rfps.lock().expect("lock") = rfps;
        }
        Ok(self
            .refresh_response
            .lock()
            .expect("lock")
            .clone()
            .unwrap_or(RefreshResponse {
                ok: true,
                message: Some("Ingested notices.".into()),
                error: None,
                errors: Vec::new(),
            }))
    }

    async fn progress(&self) -> Result<ProgressState> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        if *self.progress_failure.lock().expect("lock") {
            return Err(ClientError::status(
                StatusCode::SERVICE_UNAVAILABLE,
                "progress unavailable",
            ));
        }
        Ok(self.progress.lock().expect("lock").clone())
    }

    async fn list_saved(&self) -> Result<Vec<SavedItem>> {
        self.record("list_saved");
        Self::failure(&self.saved_failure)?;
        Ok(self.saved.lock().expect("lock").clone())
    }

    async fn saved_detail(&self, rfp_id: RfpId) -> Result<SavedDetail> {
        self.record(format!("saved_detail {rfp_id}"));
        self.detail_mut(rfp_id, |detail| detail.clone())
    }

    async fn save_rfp(&self, rfp_id: RfpId) -> Result<()> {
        self.record(format!("save_rfp {rfp_id}"));
        let item = self.item_for(rfp_id);
        self.details.lock().expect("lock").insert(
            rfp_id,
            SavedDetail {
                item: item.clone(),
                documents: Vec::new(),
                notes: Vec::new(),
                ai_full_summary: Some(format!("Generated summary for {rfp_id}")),
                ai_insights: None,
            },
        );
        self.saved.lock().expect("lock").push(item);
        Ok(())
    }

    async fn remove_saved(&self, rfp_id: RfpId) -> Result<()> {
        self.record(format!("remove_saved {rfp_id}"));
        self.saved
            .lock()
            .expect("lock")
            .retain(|item| item.rfp_id != rfp_id);
        self.details.lock().expect("lock").remove(&rfp_id);
        Ok(())
    }

    async fn upload_document(
        &self,
        rfp_id: RfpId,
        upload: DocumentUpload,
    ) -> Result<SavedDetail> {
        self.record(format!("upload_document {rfp_id} {}", upload.filename));
        self.detail_mut(rfp_id, |detail| {
            detail.documents.push(upload.filename);
            detail.clone()
        })
    }

    async fn add_note(&self, rfp_id: RfpId, note: &str) -> Result<SavedDetail> {
        self.record(format!("add_note {rfp_id}"));
        self.detail_mut(rfp_id, |detail| {
            let id = NoteId(detail.notes.len() as i64 + 1);
            detail.notes.push(Note {
                id,
                note: note.to_string(),
                created_at: Some("2026-01-01T00:00:00".into()),
            });
            detail.clone()
        })
    }

    async fn download_document(&self, rfp_id: RfpId, name: &str) -> Result<Vec<u8>> {
        self.record(format!("download_document {rfp_id} {name}"));
        Ok(name.as_bytes().to_vec())
    }

    async fn health(&self) -> Result<String> {
        self.record("health");
        Ok("up".into())
    }

    async fn seed_demo_data(&self) -> Result<String> {
        self.record("seed_demo_data");
        *self.rfps.lock().expect("lock") = opportunities(2);
        Ok("Seeded 2 sample RFPs".into())
    }
}
