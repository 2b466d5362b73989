use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;

use crate::{
    state::{Action, AppState},
    RfpApi,
};

/// Background task polling `/progress` while a refresh runs.
///
/// The first poll fires immediately; the next is scheduled only after the
/// previous fetch settles. Dropping the handle aborts the task.
pub struct ProgressPoller {
    task: Option<JoinHandle<()>>,
}

impl ProgressPoller {
    pub fn start(api: Arc<dyn RfpApi>, state: Arc<Mutex<AppState>>, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            loop {
                match api.progress().await {
                    Ok(progress) => state.lock().await.apply(Action::ProgressPolled(progress)),
                    Err(err) => debug!("progress poll failed: {err}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
        Self { task: Some(task) }
    }

    /// Aborts the task and waits until it is gone, so no poll can land
    /// after this returns.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for ProgressPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
