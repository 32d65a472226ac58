//! Single source of truth for "which workspace's data is displayed".
//!
//! Resolves the signed-in viewer's workspaces, keeps the active selection
//! stable across sessions through the selection store, derives the viewer's
//! role, and broadcasts the active workspace id on a watch channel that the
//! workspace-scoped stores subscribe to.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::api::{BackendApi, InviteMemberRequest};
use crate::error::{AppError, AppResult};
use crate::models::{UserSummary, UserWorkspace, Workspace, WorkspaceRole};
use crate::session::Viewer;
use crate::storage::SelectionStore;

#[derive(Default)]
struct Inner {
    workspaces: Vec<Workspace>,
    current: Option<Workspace>,
    role: Option<WorkspaceRole>,
    loading: bool,
}

pub struct WorkspaceState {
    backend: Arc<dyn BackendApi>,
    selection: Arc<dyn SelectionStore>,
    viewer: Viewer,
    inner: RwLock<Inner>,
    changed: watch::Sender<Option<String>>,
}

impl WorkspaceState {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        selection: Arc<dyn SelectionStore>,
        viewer: Viewer,
    ) -> Self {
        let (changed, _) = watch::channel(None);
        WorkspaceState {
            backend,
            selection,
            viewer,
            inner: RwLock::new(Inner::default()),
            changed,
        }
    }

    /// Receiver for active-workspace changes. `None` means no workspace.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.changed.subscribe()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Fetch the viewer's workspaces and resolve the active selection:
    /// the persisted id when still present, otherwise the first workspace,
    /// otherwise nothing (clearing the persisted id).
    pub async fn fetch_workspaces(&self) -> AppResult<()> {
        self.inner.write().await.loading = true;

        let fetched = self.backend.list_workspaces(&self.viewer.user_id).await;
        let list = match fetched {
            Ok(list) => list,
            Err(e) => {
                warn!("workspace fetch failed: {}", e);
                let mut inner = self.inner.write().await;
                inner.workspaces.clear();
                inner.current = None;
                inner.role = None;
                inner.loading = false;
                drop(inner);
                self.changed.send_replace(None);
                return Err(e);
            }
        };

        if list.is_empty() {
            self.selection.clear()?;
            let mut inner = self.inner.write().await;
            inner.workspaces.clear();
            inner.current = None;
            inner.role = None;
            inner.loading = false;
            drop(inner);
            self.changed.send_replace(None);
            return Ok(());
        }

        let saved = self.selection.get()?;
        let chosen = saved
            .as_deref()
            .and_then(|id| list.iter().find(|ws| ws.id == id))
            .unwrap_or(&list[0])
            .clone();
        self.selection.set(&chosen.id)?;

        let role = chosen.role_of(&self.viewer.user_id);
        info!(workspace_id = %chosen.id, "active workspace resolved");

        let mut inner = self.inner.write().await;
        inner.workspaces = list;
        inner.role = role;
        inner.current = Some(chosen.clone());
        inner.loading = false;
        drop(inner);
        self.changed.send_replace(Some(chosen.id));
        Ok(())
    }

    /// Local-only switch within the already-fetched set.
    pub async fn switch_workspace(&self, workspace_id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let Some(ws) = inner
            .workspaces
            .iter()
            .find(|ws| ws.id == workspace_id)
            .cloned()
        else {
            return Err(AppError::NotFound(format!(
                "workspace {} is not in the fetched set",
                workspace_id
            )));
        };
        self.selection.set(&ws.id)?;
        inner.role = ws.role_of(&self.viewer.user_id);
        inner.current = Some(ws);
        drop(inner);
        self.changed.send_replace(Some(workspace_id.to_string()));
        Ok(())
    }

    pub async fn workspaces(&self) -> Vec<Workspace> {
        self.inner.read().await.workspaces.clone()
    }

    pub async fn current(&self) -> Option<Workspace> {
        self.inner.read().await.current.clone()
    }

    pub async fn current_id(&self) -> Option<String> {
        self.inner.read().await.current.as_ref().map(|ws| ws.id.clone())
    }

    pub async fn role(&self) -> Option<WorkspaceRole> {
        self.inner.read().await.role
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// Interface-level permission gate: management operations require the
    /// ADMINISTRATOR role in the active workspace.
    async fn require_admin(&self) -> AppResult<String> {
        let inner = self.inner.read().await;
        let ws = inner
            .current
            .as_ref()
            .ok_or_else(|| AppError::Validation("no active workspace".to_string()))?;
        if inner.role != Some(WorkspaceRole::Administrator) {
            return Err(AppError::Forbidden(
                "administrator role required".to_string(),
            ));
        }
        Ok(ws.id.clone())
    }

    pub async fn create_workspace(&self, name: &str) -> AppResult<Workspace> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("workspace name is required".to_string()));
        }
        let created = self
            .backend
            .create_workspace(name.trim(), &self.viewer.user_id)
            .await?;
        self.fetch_workspaces().await?;
        Ok(created)
    }

    pub async fn rename_workspace(&self, name: &str) -> AppResult<Workspace> {
        let workspace_id = self.require_admin().await?;
        if name.trim().is_empty() {
            return Err(AppError::Validation("workspace name is required".to_string()));
        }
        let renamed = self
            .backend
            .rename_workspace(&workspace_id, name.trim(), &self.viewer.user_id)
            .await?;
        self.fetch_workspaces().await?;
        Ok(renamed)
    }

    pub async fn delete_workspace(&self) -> AppResult<()> {
        let workspace_id = self.require_admin().await?;
        self.backend.delete_workspace(&workspace_id).await?;
        // Refetch re-selects the first remaining workspace, or clears
        self.fetch_workspaces().await
    }

    pub async fn invite_member(
        &self,
        email: &str,
        role: WorkspaceRole,
    ) -> AppResult<UserWorkspace> {
        let workspace_id = self.require_admin().await?;
        if email.trim().is_empty() {
            return Err(AppError::Validation("email is required".to_string()));
        }
        let membership = self
            .backend
            .invite_member(
                &workspace_id,
                InviteMemberRequest {
                    email: email.trim().to_string(),
                    role,
                    inviter_user_id: self.viewer.user_id.clone(),
                },
            )
            .await?;
        self.fetch_workspaces().await?;
        Ok(membership)
    }

    pub async fn update_member_role(
        &self,
        user_id: &str,
        role: WorkspaceRole,
    ) -> AppResult<UserWorkspace> {
        let workspace_id = self.require_admin().await?;
        let membership = self
            .backend
            .update_member_role(&workspace_id, user_id, role, &self.viewer.user_id)
            .await?;
        self.fetch_workspaces().await?;
        Ok(membership)
    }

    pub async fn remove_member(&self, user_id: &str) -> AppResult<()> {
        let workspace_id = self.require_admin().await?;
        if user_id == self.viewer.user_id {
            return Err(AppError::Validation(
                "administrators cannot remove themselves".to_string(),
            ));
        }
        self.backend
            .remove_member(&workspace_id, user_id, &self.viewer.user_id)
            .await?;
        self.fetch_workspaces().await
    }

    /// Typeahead lookup for the invite dialog. Empty input short-circuits.
    pub async fn search_users(&self, query: &str) -> AppResult<Vec<UserSummary>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.backend.search_users(query.trim()).await
    }
}
