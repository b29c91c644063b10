// Service exports
pub mod expo;
pub mod postgres;

pub use expo::{ExpoClient, PushError, PushProvider, DEFAULT_PUSH_ENDPOINT, PUSH_CHUNK_LIMIT};
pub use postgres::{GatewayError, PostgresClient, RequestStore};
