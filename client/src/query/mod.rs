//! # Query Layer
//!
//! Wraps gateway reads in a per-key cache and gateway writes in the
//! invalidation rules that keep that cache honest.
//!
//! - **keys**: `QueryKey` (what a read is cached under) and `Mutation`
//!   (which keys a successful write makes stale)
//! - **client**: `QueryClient`, the cache itself, with in-flight
//!   de-duplication and generation-guarded invalidation
//!
//! The layer never retries. A failed read is not cached and the error goes
//! straight back to the page controller that asked for it.

mod client;
mod keys;

pub use client::QueryClient;
pub use keys::{Mutation, QueryKey};
