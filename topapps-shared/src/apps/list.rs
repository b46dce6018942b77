/// Paginated app listings
///
/// # Public listing
///
/// Public apps are ranked by aggregate cost, the sum of `total_cost` over the
/// app's non-archived transactions (zero when it has none). Ties are broken
/// by `id` ascending so a fixed dataset always pages the same way.
///
/// The listing runs in two steps:
///
/// ```text
/// rank   : SELECT e.id ... ORDER BY cost DESC, id ASC LIMIT/OFFSET  ─┐
/// fetch  : SELECT <summary> FROM apps WHERE id = ANY(ranked ids)    │ then restore rank order
/// count  : SELECT COUNT(*) FROM apps e WHERE <same filter>          ─┘ concurrently with the above
/// ```
///
/// The fetch step returns rows in arbitrary order, so the result is
/// reordered to match the rank before it is returned.
///
/// # Member and owner listings
///
/// A single query with the membership predicate, ordered by the number of
/// transactions the app has (all of them, archived included), then `id`.
///
/// # Example
///
/// ```no_run
/// use topapps_shared::apps::list::list_public_apps;
/// use topapps_shared::pagination::Pagination;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let page = list_public_apps(&pool, Some("chat"), Pagination::new(0, 20)?).await?;
/// for app in &page.items {
///     println!("{}", app.name);
/// }
/// if let Some(next) = page.next_page() {
///     println!("more on page {}", next);
/// }
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

use super::count::count_apps;
use super::filter::{AppFilter, MembershipScope};
use crate::models::app::{App, AppSummary, APP_SUMMARY_COLUMNS_QUALIFIED};
use crate::pagination::{Paginated, Pagination};

/// One row of the cost ranking
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RankedApp {
    pub id: Uuid,

    /// Sum of non-archived transaction costs
    pub total_cost: f64,
}

/// Lists public, non-archived apps by aggregate cost, highest first
///
/// `total_count` comes from [`count_apps`] with the same filter, so
/// `has_next` reflects every matching app, including those with no
/// transactions.
pub async fn list_public_apps(
    pool: &PgPool,
    search: Option<&str>,
    pagination: Pagination,
) -> Result<Paginated<AppSummary>, sqlx::Error> {
    let filter = AppFilter::public(search);

    let ranked_page = async {
        let ranked = rank_public_apps(pool, &filter, pagination).await?;
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.id).collect();
        let apps = App::find_summaries_by_ids(pool, &ids).await?;
        Ok::<_, sqlx::Error>(restore_rank_order(&ids, apps))
    };

    let (items, total_count) = tokio::try_join!(ranked_page, count_apps(pool, &filter))?;

    debug!(
        search = ?filter.search(),
        page = pagination.page(),
        page_size = pagination.page_size(),
        returned = items.len(),
        total_count,
        "Listed public apps"
    );

    Ok(Paginated::new(items, pagination, total_count))
}

/// The ranked id window for one page of the public listing
pub async fn rank_public_apps(
    pool: &PgPool,
    filter: &AppFilter,
    pagination: Pagination,
) -> Result<Vec<RankedApp>, sqlx::Error> {
    let mut builder = rank_query(filter, pagination);
    let ranked = builder.build_query_as::<RankedApp>().fetch_all(pool).await?;
    Ok(ranked)
}

fn rank_query(filter: &AppFilter, pagination: Pagination) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        r#"SELECT e.id, COALESCE(t.total_cost, 0)::float8 AS total_cost
FROM apps e
LEFT JOIN (
    SELECT app_id, SUM(total_cost) AS total_cost
    FROM transactions
    WHERE is_archived = false
    GROUP BY app_id
) t ON t.app_id = e.id"#,
    );
    filter.push_where(&mut builder, "e");
    builder.push(" ORDER BY COALESCE(t.total_cost, 0) DESC, e.id ASC");
    push_window(&mut builder, pagination);
    builder
}

/// Lists the apps `user_id` belongs to (`Member`) or owns (`Owner`)
///
/// Ordered by transaction count, highest first.
pub async fn list_member_apps(
    pool: &PgPool,
    user_id: Uuid,
    scope: MembershipScope,
    search: Option<&str>,
    pagination: Pagination,
) -> Result<Paginated<AppSummary>, sqlx::Error> {
    let filter = AppFilter::for_user(user_id, scope, search);

    let mut builder = membership_query(&filter, pagination);
    let page = builder.build_query_as::<AppSummary>().fetch_all(pool);

    let (items, total_count) = tokio::try_join!(page, count_apps(pool, &filter))?;

    debug!(
        %user_id,
        scope = scope.as_str(),
        search = ?filter.search(),
        page = pagination.page(),
        returned = items.len(),
        total_count,
        "Listed member apps"
    );

    Ok(Paginated::new(items, pagination, total_count))
}

// Orders by every transaction, archived ones included. `AppStats` counts only
// non-archived rows, so a card's Transactions figure can disagree with this order.
fn membership_query(filter: &AppFilter, pagination: Pagination) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        r#"SELECT {APP_SUMMARY_COLUMNS_QUALIFIED}
FROM apps e
LEFT JOIN (
    SELECT app_id, COUNT(*) AS transaction_count
    FROM transactions
    GROUP BY app_id
) t ON t.app_id = e.id"#
    ));
    filter.push_where(&mut builder, "e");
    builder.push(" ORDER BY COALESCE(t.transaction_count, 0) DESC, e.id ASC");
    push_window(&mut builder, pagination);
    builder
}

fn push_window(builder: &mut QueryBuilder<'static, Postgres>, pagination: Pagination) {
    builder.push(" LIMIT ");
    builder.push_bind(pagination.limit());
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset());
}

/// Orders `rows` to match `ranked_ids`
///
/// Ids with no row (deleted between the rank and fetch steps) are dropped
/// from the page; rows whose id was not ranked are discarded.
pub fn restore_rank_order(ranked_ids: &[Uuid], rows: Vec<AppSummary>) -> Vec<AppSummary> {
    let mut by_id: HashMap<Uuid, AppSummary> = rows.into_iter().map(|app| (app.id, app)).collect();

    let ordered: Vec<AppSummary> = ranked_ids.iter().filter_map(|id| by_id.remove(id)).collect();

    if ordered.len() < ranked_ids.len() {
        warn!(
            ranked = ranked_ids.len(),
            fetched = ordered.len(),
            "Some ranked apps disappeared before they could be fetched"
        );
    }

    ordered
}
