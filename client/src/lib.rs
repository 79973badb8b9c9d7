//! # Milk Ledger Client
//!
//! Contains all non-UI logic for the milk delivery ledger.
//!
//! The crate is the layer between the web frontend and the remote gateway
//! that owns households, milk types, deliveries, holidays and the monthly
//! summaries:
//!
//! ```text
//! UI Layer (Yew frontend)
//!     ↓
//! Domain Layer (page controllers, delivery grid)
//!     ↓
//! Query Layer (cache keys, de-duplication, invalidation)
//!     ↓
//! Gateway (remote backend, or the in-memory gateway)
//! ```
//!
//! Nothing in here touches the DOM, so the same code runs under `wasm32`
//! in the browser and natively under the test runner.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod query;

pub use config::ClientConfig;
pub use error::{ClientError, GatewayError, GatewayResult, ValidationError};
pub use gateway::{Gateway, MemoryGateway};
pub use query::{Mutation, QueryClient, QueryKey};
