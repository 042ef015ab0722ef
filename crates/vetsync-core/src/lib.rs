//! vetsync-core - Core library for vetsync
//!
//! This crate contains the shared models, the reconciliation engine, the
//! view projection, and client configuration used by the network layer
//! and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod notices;
pub mod project;
pub mod reconcile;
pub mod util;

pub use error::{Error, Result};
pub use models::{ChangeEvent, ChangeKind, ContentKind, LiveRecord, RecordId};
pub use reconcile::Reconciler;
