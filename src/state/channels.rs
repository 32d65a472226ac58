//! Social accounts connected to the active workspace.
//!
//! Subscribes to the workspace watch channel; every workspace change clears
//! the list and refetches, so channels from a previous workspace are never
//! shown. Failures collapse to an empty list, no retry.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};
use tracing::{info, warn};

use crate::api::{BackendApi, CreateChannelRequest};
use crate::error::{AppError, AppResult};
use crate::models::{ConnectionStatus, Provider, SocialAccount};

#[derive(Default)]
struct Inner {
    accounts: Vec<SocialAccount>,
    workspace_id: Option<String>,
    loading: bool,
}

pub struct ChannelState {
    backend: Arc<dyn BackendApi>,
    workspace: Mutex<watch::Receiver<Option<String>>>,
    inner: RwLock<Inner>,
}

impl ChannelState {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        workspace: watch::Receiver<Option<String>>,
    ) -> Self {
        ChannelState {
            backend,
            workspace: Mutex::new(workspace),
            inner: RwLock::new(Inner::default()),
        }
    }

    async fn active_workspace(&self) -> Option<String> {
        self.workspace.lock().await.borrow().clone()
    }

    /// Fetch accounts scoped to the active workspace. With no active
    /// workspace the list is empty and no request is issued.
    pub async fn refresh(&self) -> AppResult<()> {
        let workspace_id = self.active_workspace().await;

        {
            let mut inner = self.inner.write().await;
            if inner.workspace_id != workspace_id {
                // Workspace changed since the last fetch; drop stale data now
                inner.accounts.clear();
                inner.workspace_id = workspace_id.clone();
            }
            inner.loading = true;
        }

        let Some(workspace_id) = workspace_id else {
            let mut inner = self.inner.write().await;
            inner.accounts.clear();
            inner.loading = false;
            return Ok(());
        };

        let fetched = self.backend.list_accounts(&workspace_id, None).await;

        // The workspace may have changed while the request was in flight;
        // a stale completion must not leak into the new workspace's view.
        if self.active_workspace().await.as_deref() != Some(workspace_id.as_str()) {
            return Ok(());
        }

        let mut inner = self.inner.write().await;
        inner.loading = false;
        match fetched {
            Ok(accounts) => {
                info!(workspace_id = %workspace_id, count = accounts.len(), "channels fetched");
                inner.accounts = accounts;
                Ok(())
            }
            Err(e) => {
                inner.accounts.clear();
                Err(e)
            }
        }
    }

    /// One-shot catch-up: refetch if the active workspace changed since the
    /// last refresh or sync.
    pub async fn sync(&self) -> AppResult<()> {
        let pending = {
            let mut rx = self.workspace.lock().await;
            match rx.has_changed() {
                Ok(changed) => {
                    if changed {
                        rx.borrow_and_update();
                    }
                    changed
                }
                Err(_) => false,
            }
        };
        if pending {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    /// Driver loop: await workspace changes and refetch until the workspace
    /// store goes away. Cooperative, runs on a single task.
    pub async fn run(&self) {
        let mut rx = { self.workspace.lock().await.clone() };
        loop {
            if rx.changed().await.is_err() {
                break;
            }
            rx.borrow_and_update();
            if let Err(e) = self.refresh().await {
                warn!("channel refresh failed: {}", e);
            }
        }
    }

    pub async fn accounts(&self) -> Vec<SocialAccount> {
        self.inner.read().await.accounts.clone()
    }

    pub async fn connected_accounts(&self) -> Vec<SocialAccount> {
        self.inner
            .read()
            .await
            .accounts
            .iter()
            .filter(|a| a.status == ConnectionStatus::Connected)
            .cloned()
            .collect()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    pub async fn create_channel(
        &self,
        provider: Provider,
        name: &str,
    ) -> AppResult<SocialAccount> {
        let workspace_id = self
            .active_workspace()
            .await
            .ok_or_else(|| AppError::Validation("no active workspace".to_string()))?;
        if name.trim().is_empty() {
            return Err(AppError::Validation("channel name is required".to_string()));
        }
        let created = self
            .backend
            .create_account(CreateChannelRequest {
                provider,
                name: name.trim().to_string(),
                workspace_id,
            })
            .await?;
        self.refresh().await?;
        Ok(created)
    }

    pub async fn rename_channel(&self, account_id: &str, name: &str) -> AppResult<SocialAccount> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("channel name is required".to_string()));
        }
        let renamed = self.backend.rename_account(account_id, name.trim()).await?;
        self.refresh().await?;
        Ok(renamed)
    }

    pub async fn disconnect_channel(&self, account_id: &str) -> AppResult<SocialAccount> {
        let account = self.backend.disconnect_account(account_id).await?;
        self.refresh().await?;
        Ok(account)
    }

    pub async fn delete_channel(&self, account_id: &str) -> AppResult<()> {
        self.backend.delete_account(account_id).await?;
        self.refresh().await
    }
}
