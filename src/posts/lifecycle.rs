//! Optimistic status mutations for a single post.
//!
//! The displayed status flips immediately, the backend write follows, and a
//! failed acknowledgment reverts to the snapshot taken just before the flip.
//! Mutations are single-flight per post id; a completion that lost its
//! generation (a newer mutation started meanwhile) is discarded instead of
//! clobbering newer state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::BackendApi;
use crate::error::{AppError, AppResult};
use crate::models::{Post, PostStatus};
use crate::posts::status;
use crate::state::feed::FeedState;

/// Client-side view of one post's status. The backend stays authoritative;
/// this is what the card renders while a write is in flight.
pub struct PostHandle {
    id: String,
    displayed: RwLock<PostStatus>,
    generation: AtomicU64,
}

impl PostHandle {
    pub fn new(post: &Post) -> Self {
        PostHandle {
            id: post.id.clone(),
            displayed: RwLock::new(post.status),
            generation: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn status(&self) -> PostStatus {
        *self.displayed.read().await
    }
}

/// Drops the in-flight marker when the mutation settles, success or not.
struct FlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.id);
    }
}

pub struct PostLifecycle {
    backend: Arc<dyn BackendApi>,
    feed: Arc<FeedState>,
    in_flight: Mutex<HashSet<String>>,
}

impl PostLifecycle {
    pub fn new(backend: Arc<dyn BackendApi>, feed: Arc<FeedState>) -> Self {
        PostLifecycle {
            backend,
            feed,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Whether the Publish Now affordance should be enabled at all.
    pub fn can_publish_now(post: &Post) -> bool {
        post.has_connected_target()
    }

    fn begin(&self, post_id: &str) -> AppResult<FlightGuard<'_>> {
        let mut set = self.in_flight.lock().unwrap();
        if !set.insert(post_id.to_string()) {
            return Err(AppError::Busy(format!(
                "a mutation for post {} is already in flight",
                post_id
            )));
        }
        Ok(FlightGuard {
            set: &self.in_flight,
            id: post_id.to_string(),
        })
    }

    /// Move a post along the transition table, optimistically.
    pub async fn request_status_change(
        &self,
        handle: &PostHandle,
        new_status: PostStatus,
    ) -> AppResult<()> {
        let prior = handle.status().await;
        if !status::can_transition(prior, new_status) {
            return Err(AppError::Validation(format!(
                "cannot move a {} post to {}",
                prior, new_status
            )));
        }
        self.apply(handle, prior, new_status, false).await
    }

    /// Publish immediately. Requires an eligible status and at least one
    /// connected target; refused before any request is issued otherwise.
    pub async fn publish_now(&self, handle: &PostHandle, post: &Post) -> AppResult<()> {
        if !Self::can_publish_now(post) {
            return Err(AppError::Validation(
                "post has no connected target channel".to_string(),
            ));
        }
        let prior = handle.status().await;
        if !status::can_transition(prior, PostStatus::Published) {
            return Err(AppError::Validation(format!(
                "cannot publish a {} post",
                prior
            )));
        }
        self.apply(handle, prior, PostStatus::Published, true).await
    }

    /// Restore an archived post back to PUBLISHED. Distinct operation; the
    /// transition table deliberately has no edge out of ARCHIVED.
    pub async fn restore(&self, handle: &PostHandle) -> AppResult<()> {
        let prior = handle.status().await;
        if prior != PostStatus::Archived {
            return Err(AppError::Validation(format!(
                "only archived posts can be restored, post is {}",
                prior
            )));
        }
        let result = self.apply(handle, prior, PostStatus::Published, false).await;
        if result.is_ok() {
            if let Err(e) = self.feed.refresh_archived().await {
                warn!("archived list refresh after restore failed: {}", e);
            }
        }
        result
    }

    async fn apply(
        &self,
        handle: &PostHandle,
        prior: PostStatus,
        new_status: PostStatus,
        via_publish_endpoint: bool,
    ) -> AppResult<()> {
        let _flight = self.begin(&handle.id)?;
        let generation = handle.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Optimistic flip before the write goes out
        *handle.displayed.write().await = new_status;

        let outcome = if via_publish_endpoint {
            self.backend.publish_post(&handle.id).await
        } else {
            self.backend.update_post_status(&handle.id, new_status).await
        };

        // A newer mutation owns the handle now; drop this completion
        if handle.generation.load(Ordering::SeqCst) != generation {
            return outcome.map(|_| ());
        }

        match outcome {
            Ok(_) => {
                info!(post_id = %handle.id, from = %prior, to = %new_status, "status change acknowledged");
                if let Err(e) = self.feed.refresh().await {
                    warn!("feed refresh after status change failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                // Revert to the snapshot, never to a creation-time default
                *handle.displayed.write().await = prior;
                warn!(post_id = %handle.id, "status change failed, reverted to {}: {}", prior, e);
                Err(e)
            }
        }
    }
}
