#![allow(dead_code)]

// Scriptable in-memory stand-in for the scheduling backend: canned data per
// workspace, per-operation failure injection, call counters, and a hold
// point for exercising in-flight behavior.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use postplan::api::{
    BackendApi, CreateChannelRequest, CreateCommentRequest, CreatePostRequest,
    InviteMemberRequest, UpdatePostRequest,
};
use postplan::error::{AppError, AppResult};
use postplan::models::{
    Comment, ConnectionStatus, Post, PostStatus, Provider, SocialAccount, UserSummary,
    UserWorkspace, Workspace, WorkspaceRole,
};

pub fn account(id: &str, name: &str, status: ConnectionStatus) -> SocialAccount {
    SocialAccount {
        id: id.to_string(),
        provider: Provider::Linkedin,
        name: name.to_string(),
        status,
    }
}

pub fn post(id: &str, status: PostStatus, targets: Vec<SocialAccount>) -> Post {
    Post {
        id: id.to_string(),
        content: format!("content of {}", id),
        status,
        created_at: Utc::now(),
        author_id: "author-1".to_string(),
        scheduled_at: None,
        comments: Vec::new(),
        targets,
    }
}

pub fn member(user_id: &str, role: WorkspaceRole) -> UserWorkspace {
    UserWorkspace {
        id: format!("m-{}", user_id),
        user: UserSummary {
            id: user_id.to_string(),
            name: None,
            email: None,
            image: None,
        },
        role,
    }
}

pub fn workspace(id: &str, name: &str, members: Vec<UserWorkspace>) -> Workspace {
    Workspace {
        id: id.to_string(),
        name: name.to_string(),
        user_workspaces: members,
    }
}

#[derive(Default)]
pub struct MockBackend {
    pub workspaces: Mutex<Vec<Workspace>>,
    /// Accounts keyed by workspace id
    pub accounts: Mutex<HashMap<String, Vec<SocialAccount>>>,
    /// Posts keyed by workspace id
    pub posts: Mutex<HashMap<String, Vec<Post>>>,
    calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    status_hold: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspaces(workspaces: Vec<Workspace>) -> Self {
        let mock = Self::default();
        *mock.workspaces.lock().unwrap() = workspaces;
        mock
    }

    pub fn put_accounts(&self, workspace_id: &str, accounts: Vec<SocialAccount>) {
        self.accounts
            .lock()
            .unwrap()
            .insert(workspace_id.to_string(), accounts);
    }

    pub fn put_posts(&self, workspace_id: &str, posts: Vec<Post>) {
        self.posts
            .lock()
            .unwrap()
            .insert(workspace_id.to_string(), posts);
    }

    /// Make every subsequent call of `op` fail with a 500.
    pub fn fail_on(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    /// Park status updates until the returned notify fires. Used to observe
    /// in-flight behavior deterministically.
    pub fn hold_status_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.status_hold.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    fn record(&self, op: &str) -> AppResult<()> {
        *self.calls.lock().unwrap().entry(op.to_string()).or_insert(0) += 1;
        if self.failing.lock().unwrap().contains(op) {
            return Err(AppError::Api {
                status: 500,
                message: format!("injected failure for {}", op),
            });
        }
        Ok(())
    }

    fn set_status(&self, post_id: &str, status: PostStatus) -> AppResult<Post> {
        let mut posts = self.posts.lock().unwrap();
        for workspace_posts in posts.values_mut() {
            if let Some(p) = workspace_posts.iter_mut().find(|p| p.id == post_id) {
                p.status = status;
                return Ok(p.clone());
            }
        }
        Err(AppError::NotFound(format!("post {}", post_id)))
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn list_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>> {
        self.record("list_posts")?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .get(workspace_id)
            .map(|posts| {
                posts
                    .iter()
                    .filter(|p| p.status != PostStatus::Archived)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_archived_posts(&self, workspace_id: &str) -> AppResult<Vec<Post>> {
        self.record("list_archived_posts")?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .get(workspace_id)
            .map(|posts| {
                posts
                    .iter()
                    .filter(|p| p.status == PostStatus::Archived)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_post(&self, req: CreatePostRequest) -> AppResult<Post> {
        self.record("create_post")?;
        let created = Post {
            id: format!("p-{}", self.calls("create_post")),
            content: req.content,
            status: PostStatus::Draft,
            created_at: Utc::now(),
            author_id: req.author_id,
            scheduled_at: req.scheduled_at,
            comments: Vec::new(),
            targets: Vec::new(),
        };
        self.posts
            .lock()
            .unwrap()
            .entry(req.workspace_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, post_id: &str, req: UpdatePostRequest) -> AppResult<Post> {
        self.record("update_post")?;
        let mut posts = self.posts.lock().unwrap();
        for workspace_posts in posts.values_mut() {
            if let Some(p) = workspace_posts.iter_mut().find(|p| p.id == post_id) {
                p.content = req.content;
                p.scheduled_at = req.scheduled_at;
                return Ok(p.clone());
            }
        }
        Err(AppError::NotFound(format!("post {}", post_id)))
    }

    async fn delete_post(&self, post_id: &str) -> AppResult<()> {
        self.record("delete_post")?;
        for workspace_posts in self.posts.lock().unwrap().values_mut() {
            workspace_posts.retain(|p| p.id != post_id);
        }
        Ok(())
    }

    async fn update_post_status(&self, post_id: &str, status: PostStatus) -> AppResult<Post> {
        let gate = self.status_hold.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("update_post_status")?;
        self.set_status(post_id, status)
    }

    async fn publish_post(&self, post_id: &str) -> AppResult<Post> {
        self.record("publish_post")?;
        self.set_status(post_id, PostStatus::Published)
    }

    async fn add_comment(&self, post_id: &str, req: CreateCommentRequest) -> AppResult<Comment> {
        self.record("add_comment")?;
        let comment = Comment {
            id: format!("c-{}", self.calls("add_comment")),
            text: req.text,
            author_id: req.author_id,
            created_at: Utc::now(),
        };
        let mut posts = self.posts.lock().unwrap();
        for workspace_posts in posts.values_mut() {
            if let Some(p) = workspace_posts.iter_mut().find(|p| p.id == post_id) {
                p.comments.push(comment.clone());
                return Ok(comment);
            }
        }
        Err(AppError::NotFound(format!("post {}", post_id)))
    }

    async fn list_accounts(
        &self,
        workspace_id: &str,
        status: Option<ConnectionStatus>,
    ) -> AppResult<Vec<SocialAccount>> {
        self.record("list_accounts")?;
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(workspace_id)
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|a| status.map_or(true, |s| a.status == s))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_account(&self, req: CreateChannelRequest) -> AppResult<SocialAccount> {
        self.record("create_account")?;
        let created = SocialAccount {
            id: format!("a-{}", self.calls("create_account")),
            provider: req.provider,
            name: req.name,
            status: ConnectionStatus::Connected,
        };
        self.accounts
            .lock()
            .unwrap()
            .entry(req.workspace_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn rename_account(&self, account_id: &str, name: &str) -> AppResult<SocialAccount> {
        self.record("rename_account")?;
        let mut accounts = self.accounts.lock().unwrap();
        for workspace_accounts in accounts.values_mut() {
            if let Some(a) = workspace_accounts.iter_mut().find(|a| a.id == account_id) {
                a.name = name.to_string();
                return Ok(a.clone());
            }
        }
        Err(AppError::NotFound(format!("account {}", account_id)))
    }

    async fn disconnect_account(&self, account_id: &str) -> AppResult<SocialAccount> {
        self.record("disconnect_account")?;
        let mut accounts = self.accounts.lock().unwrap();
        for workspace_accounts in accounts.values_mut() {
            if let Some(a) = workspace_accounts.iter_mut().find(|a| a.id == account_id) {
                a.status = ConnectionStatus::Disconnected;
                return Ok(a.clone());
            }
        }
        Err(AppError::NotFound(format!("account {}", account_id)))
    }

    async fn delete_account(&self, account_id: &str) -> AppResult<()> {
        self.record("delete_account")?;
        for workspace_accounts in self.accounts.lock().unwrap().values_mut() {
            workspace_accounts.retain(|a| a.id != account_id);
        }
        Ok(())
    }

    async fn list_workspaces(&self, _user_id: &str) -> AppResult<Vec<Workspace>> {
        self.record("list_workspaces")?;
        Ok(self.workspaces.lock().unwrap().clone())
    }

    async fn create_workspace(&self, name: &str, user_id: &str) -> AppResult<Workspace> {
        self.record("create_workspace")?;
        let created = workspace(
            &format!("w-{}", self.calls("create_workspace")),
            name,
            vec![member(user_id, WorkspaceRole::Administrator)],
        );
        self.workspaces.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn rename_workspace(
        &self,
        workspace_id: &str,
        name: &str,
        _user_id: &str,
    ) -> AppResult<Workspace> {
        self.record("rename_workspace")?;
        let mut workspaces = self.workspaces.lock().unwrap();
        let ws = workspaces
            .iter_mut()
            .find(|ws| ws.id == workspace_id)
            .ok_or_else(|| AppError::NotFound(format!("workspace {}", workspace_id)))?;
        ws.name = name.to_string();
        Ok(ws.clone())
    }

    async fn delete_workspace(&self, workspace_id: &str) -> AppResult<()> {
        self.record("delete_workspace")?;
        self.workspaces
            .lock()
            .unwrap()
            .retain(|ws| ws.id != workspace_id);
        Ok(())
    }

    async fn invite_member(
        &self,
        workspace_id: &str,
        req: InviteMemberRequest,
    ) -> AppResult<UserWorkspace> {
        self.record("invite_member")?;
        let membership = member(&format!("invited-{}", req.email), req.role);
        let mut workspaces = self.workspaces.lock().unwrap();
        let ws = workspaces
            .iter_mut()
            .find(|ws| ws.id == workspace_id)
            .ok_or_else(|| AppError::NotFound(format!("workspace {}", workspace_id)))?;
        ws.user_workspaces.push(membership.clone());
        Ok(membership)
    }

    async fn update_member_role(
        &self,
        workspace_id: &str,
        user_id: &str,
        role: WorkspaceRole,
        _admin_user_id: &str,
    ) -> AppResult<UserWorkspace> {
        self.record("update_member_role")?;
        let mut workspaces = self.workspaces.lock().unwrap();
        let ws = workspaces
            .iter_mut()
            .find(|ws| ws.id == workspace_id)
            .ok_or_else(|| AppError::NotFound(format!("workspace {}", workspace_id)))?;
        let uw = ws
            .user_workspaces
            .iter_mut()
            .find(|uw| uw.user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("member {}", user_id)))?;
        uw.role = role;
        Ok(uw.clone())
    }

    async fn remove_member(
        &self,
        workspace_id: &str,
        user_id: &str,
        _admin_user_id: &str,
    ) -> AppResult<()> {
        self.record("remove_member")?;
        let mut workspaces = self.workspaces.lock().unwrap();
        let ws = workspaces
            .iter_mut()
            .find(|ws| ws.id == workspace_id)
            .ok_or_else(|| AppError::NotFound(format!("workspace {}", workspace_id)))?;
        ws.user_workspaces.retain(|uw| uw.user.id != user_id);
        Ok(())
    }

    async fn search_users(&self, query: &str) -> AppResult<Vec<UserSummary>> {
        self.record("search_users")?;
        Ok(vec![UserSummary {
            id: format!("found-{}", query),
            name: Some(query.to_string()),
            email: Some(format!("{}@example.com", query)),
            image: None,
        }])
    }
}
