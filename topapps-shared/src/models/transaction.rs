/// Transaction model
///
/// Each transaction records one metered call made through an app. Cost is
/// stored as `NUMERIC` so that aggregate ranking happens on exact values; the
/// Rust side sees `f64` through explicit `::float8` casts.
///
/// Archived transactions stay in the table but are excluded from every cost,
/// token, user and earnings aggregate.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE transactions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     app_id UUID NOT NULL REFERENCES apps(id) ON DELETE CASCADE,
///     user_id UUID,
///     total_cost NUMERIC(20, 10) NOT NULL DEFAULT 0,
///     markup_profit NUMERIC(20, 10) NOT NULL DEFAULT 0,
///     input_tokens BIGINT NOT NULL DEFAULT 0,
///     output_tokens BIGINT NOT NULL DEFAULT 0,
///     is_archived BOOLEAN NOT NULL DEFAULT false,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const TRANSACTION_COLUMNS: &str = "id, app_id, user_id, total_cost::float8 AS total_cost, \
                                   markup_profit::float8 AS markup_profit, input_tokens, \
                                   output_tokens, is_archived, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub app_id: Uuid,

    /// User who made the call, if known
    pub user_id: Option<Uuid>,

    /// Provider cost plus markup charged to the user
    pub total_cost: f64,

    /// The app owner's share of `total_cost`
    pub markup_profit: f64,

    pub input_tokens: i64,
    pub output_tokens: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTransaction {
    pub app_id: Uuid,
    pub user_id: Option<Uuid>,
    pub total_cost: f64,
    #[serde(default)]
    pub markup_profit: f64,
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
}

impl Transaction {
    /// Records a transaction against an app
    pub async fn create(pool: &PgPool, data: CreateTransaction) -> Result<Self, sqlx::Error> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions
                (app_id, user_id, total_cost, markup_profit, input_tokens, output_tokens)
            VALUES ($1, $2, $3::numeric, $4::numeric, $5, $6)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(data.app_id)
        .bind(data.user_id)
        .bind(data.total_cost)
        .bind(data.markup_profit)
        .bind(data.input_tokens)
        .bind(data.output_tokens)
        .fetch_one(pool)
        .await?;

        Ok(transaction)
    }

    /// Archives a transaction so it no longer counts toward aggregates
    pub async fn archive(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE transactions SET is_archived = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

}
