// Core matching exports
pub mod dedup;
pub mod matcher;
pub mod snapshot;

pub use dedup::NotifiedRequests;
pub use matcher::{evaluate, TickReport};
pub use snapshot::SnapshotCell;
