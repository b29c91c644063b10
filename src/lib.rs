//! Buddy Dispatch - matching and push-notification worker for the Buddy
//! assistance platform.
//!
//! The worker keeps two periodically refreshed in-memory snapshots (buddies
//! with registered push tokens, unfulfilled assistance requests), pairs
//! waiting requests with every eligible buddy, and fans the resulting
//! notifications out through the Expo push gateway in provider-sized
//! batches. Each request gets exactly one notification round.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod worker;

// Re-export commonly used types
pub use self::core::{evaluate, NotifiedRequests, SnapshotCell, TickReport};
pub use models::{AvailableBuddy, HelpRequest, PushMessage, PushTicket, TicketStatus};
pub use services::{ExpoClient, PostgresClient, PushProvider, RequestStore};
pub use worker::WorkerState;
