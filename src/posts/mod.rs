// Post lifecycle: the status state machine, the optimistic-update
// controller, and draft composition.

pub mod composer;
pub mod lifecycle;
pub mod status;

pub use composer::{PostComposer, PostDraft};
pub use lifecycle::{PostHandle, PostLifecycle};
