//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while encapsulating
//! the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    IntoQueryFilterMap, QueryFilterMap,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{campaigns, game_sessions, users, wiki_entries, Id};

pub mod campaign;
pub mod error;
pub mod extraction;
pub mod game_session;
pub mod ingestion;
pub mod recap;
pub mod suggestion;
pub mod transcription;
pub mod user;
pub mod wiki_entry;
pub mod wiki_merge;
pub mod wiki_tree;

pub mod gateway;
