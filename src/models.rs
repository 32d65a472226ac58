// Wire-shaped entities as the backend serves them. The backend owns the
// authoritative copies; everything here is a transient client-side view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Scheduled,
    Published,
    Archived,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::PendingApproval => "PENDING_APPROVAL",
            PostStatus::Approved => "APPROVED",
            PostStatus::Rejected => "REJECTED",
            PostStatus::Scheduled => "SCHEDULED",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Archived => "ARCHIVED",
        };
        write!(f, "{}", s)
    }
}

/// Closed set of publishing destinations the dashboard can connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Linkedin,
    Facebook,
    X,
    Instagram,
    Mastodon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceRole {
    Administrator,
    Publisher,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// A connected social-media account ("channel") belonging to one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub id: String,
    pub provider: Provider,
    pub name: String,
    pub status: ConnectionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Channels this post will be published to
    #[serde(default)]
    pub targets: Vec<SocialAccount>,
}

impl Post {
    /// Publish Now is only meaningful with at least one connected target.
    pub fn has_connected_target(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.status == ConnectionStatus::Connected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Membership link between a user and a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorkspace {
    pub id: String,
    pub user: UserSummary,
    pub role: WorkspaceRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user_workspaces: Vec<UserWorkspace>,
}

impl Workspace {
    pub fn role_of(&self, user_id: &str) -> Option<WorkspaceRole> {
        self.user_workspaces
            .iter()
            .find(|uw| uw.user.id == user_id)
            .map(|uw| uw.role)
    }
}
