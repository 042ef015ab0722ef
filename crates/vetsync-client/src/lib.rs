//! vetsync-client - network layer for vetsync
//!
//! Pairs the REST snapshot fetcher with the push-channel listener and ties
//! them together in [`LiveList`], the per-view host that owns a
//! reconciliation engine and keeps its list converged.

pub mod api;
pub mod error;
pub mod listener;
pub mod live;
pub mod transport;
pub mod ws;

pub use api::ContentApi;
pub use error::{ClientError, ClientResult};
pub use listener::{subscribe, PushDecode, PushUpdate, Subscription};
pub use live::{LiveList, ListState, SnapshotSource};
pub use transport::{ActorIdentity, ChannelTransport, PushFrame, Transport};
pub use ws::WsTransport;
