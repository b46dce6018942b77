/// Database models
///
/// - `app`: registered apps and the [`app::AppSummary`] listing projection
/// - `membership`: user-app relationships with role and status
/// - `transaction`: metered calls, aggregated into cost rankings and stats
///
/// # Example
///
/// ```no_run
/// use topapps_shared::models::app::App;
/// use topapps_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::from_url(std::env::var("DATABASE_URL")?)).await?;
/// for app in App::find_summaries_by_ids(&pool, &[Uuid::new_v4()]).await? {
///     println!("{}", app.name);
/// }
/// # Ok(())
/// # }
/// ```

pub mod app;
pub mod membership;
pub mod transaction;
