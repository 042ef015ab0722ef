//! Content models shared by the reconciler, the network layer, and the CLI.

mod event;
mod forum_post;
mod notification;
mod record;
mod tip;
mod video;

pub use event::{ChangeAction, ChangeEvent, ChangeKind};
pub use forum_post::ForumPost;
pub use notification::Notification;
pub use record::{ContentKind, InsertPolicy, LiveRecord, RecordId};
pub use tip::PetTip;
pub use video::Video;
