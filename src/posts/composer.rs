//! Draft composition and the other per-post mutations that go through plain
//! request/refetch (no optimistic state): create, edit, delete, comment.
//! Validation runs before any network call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::api::{BackendApi, CreateCommentRequest, CreatePostRequest, UpdatePostRequest};
use crate::error::{AppError, AppResult};
use crate::models::{Comment, Post};
use crate::session::Viewer;
use crate::state::feed::FeedState;

#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub target_account_ids: Vec<String>,
}

impl PostDraft {
    fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("post content is required".to_string()));
        }
        if self.target_account_ids.is_empty() {
            return Err(AppError::Validation(
                "select at least one target channel".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct PostComposer {
    backend: Arc<dyn BackendApi>,
    feed: Arc<FeedState>,
    viewer: Viewer,
}

impl PostComposer {
    pub fn new(backend: Arc<dyn BackendApi>, feed: Arc<FeedState>, viewer: Viewer) -> Self {
        PostComposer {
            backend,
            feed,
            viewer,
        }
    }

    /// Create a post in the active workspace. The backend assigns DRAFT.
    pub async fn create(&self, draft: PostDraft) -> AppResult<Post> {
        draft.validate()?;
        let workspace_id = self
            .feed
            .workspace_id()
            .await
            .ok_or_else(|| AppError::Validation("no active workspace".to_string()))?;
        let created = self
            .backend
            .create_post(CreatePostRequest {
                content: draft.content,
                author_id: self.viewer.user_id.clone(),
                workspace_id,
                scheduled_at: draft.scheduled_at,
                target_account_ids: draft.target_account_ids,
            })
            .await?;
        self.feed.refresh().await?;
        Ok(created)
    }

    pub async fn update(&self, post_id: &str, draft: PostDraft) -> AppResult<Post> {
        draft.validate()?;
        let updated = self
            .backend
            .update_post(
                post_id,
                UpdatePostRequest {
                    content: draft.content,
                    target_account_ids: draft.target_account_ids,
                    scheduled_at: draft.scheduled_at,
                },
            )
            .await?;
        self.feed.refresh().await?;
        Ok(updated)
    }

    /// Permanent removal, offered from the archive view.
    pub async fn delete(&self, post_id: &str) -> AppResult<()> {
        self.backend.delete_post(post_id).await?;
        if let Err(e) = self.feed.refresh_archived().await {
            warn!("archived list refresh after delete failed: {}", e);
        }
        self.feed.refresh().await
    }

    pub async fn add_comment(&self, post_id: &str, text: &str) -> AppResult<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("comment text is required".to_string()));
        }
        let comment = self
            .backend
            .add_comment(
                post_id,
                CreateCommentRequest {
                    text: text.trim().to_string(),
                    author_id: self.viewer.user_id.clone(),
                },
            )
            .await?;
        self.feed.refresh().await?;
        Ok(comment)
    }
}
