//! Allowed status transitions for a post.
//!
//! DRAFT -> PENDING_APPROVAL -> {APPROVED | REJECTED};
//! APPROVED -> SCHEDULED -> PUBLISHED -> ARCHIVED, with a direct
//! APPROVED -> PUBLISHED edge for Publish Now. REJECTED and ARCHIVED are
//! terminal here; leaving ARCHIVED goes through the separate restore
//! operation, not this table.

use crate::models::PostStatus;

pub fn allowed_transitions(from: PostStatus) -> &'static [PostStatus] {
    match from {
        PostStatus::Draft => &[PostStatus::PendingApproval],
        PostStatus::PendingApproval => &[PostStatus::Approved, PostStatus::Rejected],
        PostStatus::Approved => &[PostStatus::Scheduled, PostStatus::Published],
        PostStatus::Scheduled => &[PostStatus::Published],
        PostStatus::Published => &[PostStatus::Archived],
        PostStatus::Rejected | PostStatus::Archived => &[],
    }
}

pub fn can_transition(from: PostStatus, to: PostStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

pub fn is_terminal(status: PostStatus) -> bool {
    allowed_transitions(status).is_empty()
}
