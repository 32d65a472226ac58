//! Post collections for the active workspace: the live feed and the archive.
//! Refreshed after every acknowledged mutation so filtered views derived
//! from the collection stay consistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex, RwLock};

use crate::api::BackendApi;
use crate::error::AppResult;
use crate::models::Post;

pub struct FeedState {
    backend: Arc<dyn BackendApi>,
    workspace: Mutex<watch::Receiver<Option<String>>>,
    posts: RwLock<Vec<Post>>,
    archived: RwLock<Vec<Post>>,
    loading: AtomicBool,
}

impl FeedState {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        workspace: watch::Receiver<Option<String>>,
    ) -> Self {
        FeedState {
            backend,
            workspace: Mutex::new(workspace),
            posts: RwLock::new(Vec::new()),
            archived: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn workspace_id(&self) -> Option<String> {
        self.workspace.lock().await.borrow().clone()
    }

    /// Refetch the live feed (the backend already excludes archived posts
    /// from this listing). No active workspace means an empty feed.
    pub async fn refresh(&self) -> AppResult<()> {
        let Some(workspace_id) = self.workspace_id().await else {
            self.posts.write().await.clear();
            return Ok(());
        };
        self.loading.store(true, Ordering::SeqCst);
        let fetched = self.backend.list_posts(&workspace_id).await;
        self.loading.store(false, Ordering::SeqCst);
        match fetched {
            Ok(posts) => {
                *self.posts.write().await = posts;
                Ok(())
            }
            Err(e) => {
                self.posts.write().await.clear();
                Err(e)
            }
        }
    }

    /// Refetch the archive view.
    pub async fn refresh_archived(&self) -> AppResult<()> {
        let Some(workspace_id) = self.workspace_id().await else {
            self.archived.write().await.clear();
            return Ok(());
        };
        let fetched = self.backend.list_archived_posts(&workspace_id).await;
        match fetched {
            Ok(posts) => {
                *self.archived.write().await = posts;
                Ok(())
            }
            Err(e) => {
                self.archived.write().await.clear();
                Err(e)
            }
        }
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn archived(&self) -> Vec<Post> {
        self.archived.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}
