// Backend API boundary. Everything the dashboard knows about the outside
// world goes through this trait; the HTTP implementation lives in `http`,
// tests substitute an in-memory double.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{
    Comment, ConnectionStatus, Post, PostStatus, Provider, SocialAccount, UserSummary,
    UserWorkspace, Workspace, WorkspaceRole,
};

pub use http::HttpBackend;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    pub author_id: String,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub target_account_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: String,
    pub target_account_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub text: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    pub provider: Provider,
    pub name: String,
    pub workspace_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: WorkspaceRole,
    pub inviter_user_id: String,
}

/// REST contract of the scheduling backend. One method per endpoint; no
/// retries, no caching. Callers own both policies.
#[async_trait]
pub trait BackendApi: Send + Sync {
    // -- posts --
    async fn list_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>>;
    async fn list_archived_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>>;
    async fn create_post(&self, req: CreatePostRequest) -> AppResult<Post>;
    async fn update_post(&self, post_id: &str, req: UpdatePostRequest) -> AppResult<Post>;
    async fn delete_post(&self, post_id: &str) -> AppResult<()>;
    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> AppResult<Post>;
    async fn publish_post(&self, post_id: &str) -> AppResult<Post>;
    async fn add_comment(&self, post_id: &str, req: CreateCommentRequest) -> AppResult<Comment>;

    // -- social accounts --
    async fn list_accounts(
        &self,
        workspace_id: &str,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<SocialAccount>>;
    async fn create_account(&self, req: CreateChannelRequest) -> AppResult<SocialAccount>;
    async fn rename_account(&self, account_id: &str, name: &str) -> AppResult<SocialAccount>;
    async fn disconnect_account(&self, account_id: &str) -> AppResult<SocialAccount>;
    async fn delete_account(&self, account_id: &str) -> AppResult<()>;

    // -- workspaces and membership --
    async fn list_workspaces(&self, user_id: &str) -> AppResult<Vec<Workspace>>;
    async fn create_workspace(&self, name: &str, user_id: &str) -> AppResult<Workspace>;
    async fn rename_workspace(
        &self,
        workspace_id: &str,
        name: &str,
        user_id: &str,
    ) -> AppResult<Workspace>;
    async fn delete_workspace(&self, workspace_id: &str) -> AppResult<()>;
    async fn invite_member(
        &self,
        workspace_id: &str,
        req: InviteMemberRequest,
    ) -> AppResult<UserWorkspace>;
    async fn update_member_role(
        &self,
        workspace_id: &str,
        user_id: &str,
        role: WorkspaceRole,
        admin_user_id: &str,
    ) -> AppResult<UserWorkspace>;
    async fn remove_member(
        &self,
        workspace_id: &str,
        user_id: &str,
        admin_user_id: &str,
    ) -> AppResult<()>;

    // -- users --
    async fn search_users(&self, query: &str) -> AppResult<Vec<UserSummary>>;
}
