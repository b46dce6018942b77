/// Per-app usage metrics shown on each dashboard card
///
/// Cards look their figures up one app at a time, independently of the page
/// that listed them. All aggregates skip archived transactions.
///
/// | Metric | Definition |
/// |--------|------------|
/// | `total_cost` | `SUM(total_cost)` |
/// | `total_tokens` | `SUM(input_tokens + output_tokens)` |
/// | `user_count` | distinct `user_id`s with a transaction |
/// | `transaction_count` | number of transactions |
/// | `earnings` | `SUM(markup_profit)` |

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppStats {
    pub total_cost: f64,
    pub total_tokens: i64,
    pub user_count: i64,
    pub transaction_count: i64,
    pub earnings: f64,
}

impl AppStats {
    /// Lifetime stats for a non-archived app
    ///
    /// Returns `None` if the app doesn't exist or is archived. An app with
    /// no transactions gets all zeros.
    pub async fn overall(pool: &PgPool, app_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let stats = sqlx::query_as::<_, AppStats>(
            r#"
            SELECT
                COALESCE(SUM(t.total_cost), 0)::float8 AS total_cost,
                COALESCE(SUM(t.input_tokens + t.output_tokens), 0)::int8 AS total_tokens,
                COUNT(DISTINCT t.user_id) AS user_count,
                COUNT(t.id) AS transaction_count,
                COALESCE(SUM(t.markup_profit), 0)::float8 AS earnings
            FROM apps e
            LEFT JOIN transactions t ON t.app_id = e.id AND t.is_archived = false
            WHERE e.id = $1 AND e.is_archived = false
            GROUP BY e.id
            "#,
        )
        .bind(app_id)
        .fetch_optional(pool)
        .await?;

        debug!(%app_id, found = stats.is_some(), "Loaded app stats");
        Ok(stats)
    }
}
