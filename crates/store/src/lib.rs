//! Airdrop Checker persistence
//!
//! Typed access to the two hosted tables, `airdrops` and
//! `airdrop_suggestions`, plus a change feed for live views.
//!
//! - [`RestStore`] speaks PostgREST to the hosted project
//! - [`MemoryStore`] keeps everything in process, for tests and offline runs
//! - [`SuggestionStore`] / [`AirdropStore`] are the seams callers depend on
//! - [`ChangeFeed`] / [`Subscription`] carry row changes to subscribers
//!
//! ```
//! use store::{AirdropFilter, AirdropStatus, AirdropStore, MemoryStore, NewAirdrop};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), store::StoreError> {
//! let store = MemoryStore::new();
//! store.create_airdrop(&NewAirdrop::new("Zeta", AirdropStatus::Upcoming)).await?;
//! let active = store.list_airdrops(&AirdropFilter::active()).await?;
//! assert_eq!(active.len(), 1);
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod error;
mod feed;
mod memory;
mod rest;
mod types;

pub use crate::backend::{AirdropStore, SuggestionStore};
pub use crate::config::StoreConfig;
pub use crate::error::StoreError;
pub use crate::feed::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSource, Subscription};
pub use crate::memory::MemoryStore;
pub use crate::rest::RestStore;
pub use crate::types::{
    Airdrop, AirdropChanges, AirdropFilter, AirdropStatus, NewAirdrop, NewSuggestion, RecordId,
    StatusCounts, Suggestion, Table,
};
