// PostPlan smoke CLI - wires the stores against a live backend and prints
// what the dashboard would render.

use std::sync::Arc;

use postplan::api::HttpBackend;
use postplan::config::Config;
use postplan::posts::PostLifecycle;
use postplan::session::Viewer;
use postplan::state::{ChannelState, FeedState, WorkspaceState};
use postplan::storage::FileSelectionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let viewer = Viewer::new(
        std::env::var("VIEWER_USER_ID").unwrap_or_else(|_| "demo-user".to_string()),
    );

    // Wire the stores
    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let selection = Arc::new(FileSelectionStore::new(&config.storage.selection_path));
    let workspace = Arc::new(WorkspaceState::new(
        backend.clone(),
        selection,
        viewer.clone(),
    ));
    let channels = ChannelState::new(backend.clone(), workspace.subscribe());
    let feed = Arc::new(FeedState::new(backend.clone(), workspace.subscribe()));

    workspace.fetch_workspaces().await?;
    channels.sync().await?;
    feed.refresh().await?;

    match workspace.current().await {
        Some(ws) => {
            println!(
                "Workspace: {} ({:?})",
                ws.name,
                workspace.role().await
            );
            println!("Channels:");
            for account in channels.accounts().await {
                println!("  {:?} {} [{:?}]", account.provider, account.name, account.status);
            }
            println!("Posts:");
            for post in feed.posts().await {
                let publishable = if PostLifecycle::can_publish_now(&post) {
                    "publishable"
                } else {
                    "no connected target"
                };
                println!(
                    "  [{}] {} ({} comments, {})",
                    post.status,
                    post.content.chars().take(60).collect::<String>(),
                    post.comments.len(),
                    publishable
                );
            }
        }
        None => println!("No workspaces for user {}", viewer.user_id),
    }

    Ok(())
}
