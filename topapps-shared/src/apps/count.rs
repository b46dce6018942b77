/// Counting apps that match a filter
///
/// Every listing reports `total_count` through this function with the same
/// [`AppFilter`] it listed with.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::filter::AppFilter;

/// Number of apps matching `filter`
pub async fn count_apps(pool: &PgPool, filter: &AppFilter) -> Result<i64, sqlx::Error> {
    let mut builder = count_query(filter);
    let count = builder.build_query_scalar::<i64>().fetch_one(pool).await?;

    debug!(visibility = ?filter.visibility, search = ?filter.search(), count, "Counted apps");
    Ok(count)
}

fn count_query(filter: &AppFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM apps e");
    filter.push_where(&mut builder, "e");
    builder
}
