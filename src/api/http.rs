//! HTTP implementation of the backend contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::api::{
    BackendApi, CreateChannelRequest, CreateCommentRequest, CreatePostRequest,
    InviteMemberRequest, UpdatePostRequest,
};
use crate::config::BackendConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    Comment, ConnectionStatus, Post, PostStatus, SocialAccount, UserSummary, UserWorkspace,
    Workspace, WorkspaceRole,
};

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpBackend {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an `AppError::Api`, pulling the
    /// message out of a JSON error body when the backend provides one.
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        };
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(message));
        }
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json_of<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let checked = Self::check(response).await?;
        Ok(checked.json::<T>().await?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>> {
        debug!(workspace_id, "GET /posts");
        let response = self
            .client
            .get(self.url("/posts"))
            .query(&[("workspaceId", workspace_id)])
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn list_archived_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>> {
        let response = self
            .client
            .get(self.url("/posts/archived"))
            .query(&[("workspaceId", workspace_id)])
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn create_post(&self, req: CreatePostRequest) -> AppResult<Post> {
        let response = self
            .client
            .post(self.url("/posts"))
            .json(&req)
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn update_post(&self, post_id: &str, req: UpdatePostRequest) -> AppResult<Post> {
        let response = self
            .client
            .put(self.url(&format!("/posts/{}", post_id)))
            .json(&req)
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn delete_post(&self, post_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/posts/{}", post_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> AppResult<Post> {
        debug!(post_id, %status, "PUT /posts/{{id}}/status");
        let response = self
            .client
            .put(self.url(&format!("/posts/{}/status", post_id)))
            .json(&json!({ "status": status }))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn publish_post(&self, post_id: &str) -> AppResult<Post> {
        let response = self
            .client
            .post(self.url(&format!("/posts/{}/publish", post_id)))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn add_comment(&self, post_id: &str, req: CreateCommentRequest) -> AppResult<Comment> {
        let response = self
            .client
            .post(self.url(&format!("/posts/{}/comments", post_id)))
            .json(&req)
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn list_accounts(
        &self,
        workspace_id: &str,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<SocialAccount>> {
        let mut request = self
            .client
            .get(self.url("/social-accounts"))
            .query(&[("workspaceId", workspace_id)]);
        if let Some(status) = status {
            let value = match status {
                ConnectionStatus::Connected => "CONNECTED",
                ConnectionStatus::Disconnected => "DISCONNECTED",
            };
            request = request.query(&[("status", value)]);
        }
        let response = request.send().await?;
        Self::json_of(response).await
    }

    async fn create_account(&self, req: CreateChannelRequest) -> AppResult<SocialAccount> {
        let response = self
            .client
            .post(self.url("/social-accounts"))
            .json(&req)
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn rename_account(&self, account_id: &str, name: &str) -> AppResult<SocialAccount> {
        let response = self
            .client
            .put(self.url(&format!("/social-accounts/{}", account_id)))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn disconnect_account(&self, account_id: &str) -> AppResult<SocialAccount> {
        let response = self
            .client
            .put(self.url(&format!("/social-accounts/{}/disconnect", account_id)))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn delete_account(&self, account_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/social-accounts/{}", account_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_workspaces(&self, user_id: &str) -> AppResult<Vec<Workspace>> {
        debug!(user_id, "GET /workspaces");
        let response = self
            .client
            .get(self.url("/workspaces"))
            .query(&[("userId", user_id)])
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn create_workspace(&self, name: &str, user_id: &str) -> AppResult<Workspace> {
        let response = self
            .client
            .post(self.url("/workspaces"))
            .json(&json!({ "name": name, "userId": user_id }))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn rename_workspace(
        &self,
        workspace_id: &str,
        name: &str,
        user_id: &str,
    ) -> AppResult<Workspace> {
        let response = self
            .client
            .put(self.url(&format!("/workspaces/{}", workspace_id)))
            .json(&json!({ "name": name, "userId": user_id }))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn delete_workspace(&self, workspace_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/workspaces/{}", workspace_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn invite_member(
        &self,
        workspace_id: &str,
        req: InviteMemberRequest,
    ) -> AppResult<UserWorkspace> {
        let response = self
            .client
            .post(self.url(&format!("/workspaces/{}/members", workspace_id)))
            .json(&req)
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn update_member_role(
        &self,
        workspace_id: &str,
        user_id: &str,
        role: WorkspaceRole,
        admin_user_id: &str,
    ) -> AppResult<UserWorkspace> {
        let response = self
            .client
            .put(self.url(&format!(
                "/workspaces/{}/members/{}",
                workspace_id, user_id
            )))
            .json(&json!({ "role": role, "adminUserId": admin_user_id }))
            .send()
            .await?;
        Self::json_of(response).await
    }

    async fn remove_member(
        &self,
        workspace_id: &str,
        user_id: &str,
        admin_user_id: &str,
    ) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!(
                "/workspaces/{}/members/{}",
                workspace_id, user_id
            )))
            .query(&[("adminUserId", admin_user_id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn search_users(&self, query: &str) -> AppResult<Vec<UserSummary>> {
        let response = self
            .client
            .get(self.url("/users/search"))
            .query(&[("query", query)])
            .send()
            .await?;
        Self::json_of(response).await
    }
}
