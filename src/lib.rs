// PostPlan - client-side core for a social post scheduling dashboard

// Backend API contract and HTTP implementation
pub mod api;

// Wire-shaped entities
pub mod models;

// Shared client-side state (workspace, channels, feed)
pub mod state;

// Post lifecycle: status machine, optimistic updates, composition
pub mod posts;

// Common utilities
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use session::Viewer;
