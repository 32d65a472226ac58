// Shared client-side state. Each store owns its data behind async locks and
// is mutated only through its methods; consumers read snapshots. Stores are
// wired together explicitly (constructor injection + a watch channel for the
// active workspace), never through ambient globals.

pub mod channels;
pub mod feed;
pub mod workspace;

pub use channels::ChannelState;
pub use feed::FeedState;
pub use workspace::WorkspaceState;
