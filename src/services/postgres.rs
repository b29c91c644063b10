use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{AvailableBuddy, HelpRequest};

/// Errors that can occur when reading from the platform database
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Read-oriented view of the platform database.
///
/// The schema belongs to the CRUD backend; the dispatcher only polls it.
/// The trait exists so the refresh loops and the matcher tick can be tested
/// against an in-memory store.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Every buddy whose device has registered an Expo push token.
    async fn buddies_with_push_tokens(&self) -> Result<Vec<AvailableBuddy>, GatewayError>;

    /// Every request still waiting to be fulfilled.
    async fn unfulfilled_requests(&self) -> Result<Vec<HelpRequest>, GatewayError>;

    /// Mark a request cancelled. Reserved for the stale-request sweep; the
    /// base dispatch loop never calls it.
    async fn cancel_request(&self, request_id: i32) -> Result<bool, GatewayError>;
}

/// PostgreSQL-backed gateway for the dispatcher's read queries.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, GatewayError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }
}

#[async_trait]
impl RequestStore for PostgresClient {
    async fn buddies_with_push_tokens(&self) -> Result<Vec<AvailableBuddy>, GatewayError> {
        let query = r#"
            SELECT b_id, r_id, expo_push_token
            FROM "user"
                NATURAL JOIN buddy
                NATURAL JOIN refreshtoken
                NATURAL JOIN requester
            WHERE expo_push_token IS NOT NULL
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let buddies: Vec<AvailableBuddy> = rows
            .iter()
            .map(|row| AvailableBuddy {
                buddy_id: row.get("b_id"),
                requester_id: row.get("r_id"),
                push_token: row.get("expo_push_token"),
            })
            .collect();

        tracing::debug!("Fetched {} buddies with push tokens", buddies.len());

        Ok(buddies)
    }

    async fn unfulfilled_requests(&self) -> Result<Vec<HelpRequest>, GatewayError> {
        let query = r#"
            SELECT rq_id, r_id, request_meeting_point, request_destination,
                   is_urgent, request_date
            FROM request
            WHERE stat = 'UNFULFILLED'
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let requests: Vec<HelpRequest> = rows
            .iter()
            .map(|row| HelpRequest {
                request_id: row.get("rq_id"),
                requester_id: row.get("r_id"),
                meeting_point: row.get("request_meeting_point"),
                destination: row.get("request_destination"),
                urgent: row.get("is_urgent"),
                created_at: row.get("request_date"),
            })
            .collect();

        tracing::debug!("Fetched {} unfulfilled requests", requests.len());

        Ok(requests)
    }

    async fn cancel_request(&self, request_id: i32) -> Result<bool, GatewayError> {
        let query = r#"
            UPDATE request
            SET stat = 'CANCELLED'
            WHERE rq_id = $1
        "#;

        let result = sqlx::query(query)
            .bind(request_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
