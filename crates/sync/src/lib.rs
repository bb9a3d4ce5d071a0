//! Synchronization and persistence layer for shared game boards.
//!
//! This crate wires the deterministic state machine from `squares-core` to
//! the world: a per-process cache with one critical section per game id, a
//! pluggable durable store, and the merge engine that reconciles divergent
//! snapshots produced by independent serving instances. Consumers embed
//! [`GameService`] and drive every read and mutation through it.
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the coordinator and its builder
//! - [`merge`] reconciles two snapshots of the same game deterministically
//! - [`store`] defines the durable key-value seam with in-memory and
//!   file-backed implementations
//! - [`view`] provides the public projection handed to clients
//! - [`error`] exposes the typed failures callers can act on

pub mod error;
pub mod merge;
pub mod service;
pub mod store;
pub mod view;

pub use error::{Result, SyncError};
pub use merge::{MergeOutcome, merge_states};
pub use service::{Applied, GameService, GameServiceBuilder, JoinOutcome, SyncConfig};
pub use store::{DurableStore, FileStore, InMemoryStore, StoreError};
pub use view::PublicGameState;
