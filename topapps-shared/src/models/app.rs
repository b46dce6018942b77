/// App model and database operations
///
/// Apps are third-party applications registered on the platform. This crate
/// only reads them for listings; registration and editing belong to other
/// services. `create` and `archive` exist so fixtures and seed scripts can
/// populate a database through the same types the listings return.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE apps (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     description TEXT,
///     profile_picture_url TEXT,
///     homepage_url TEXT,
///     is_public BOOLEAN NOT NULL DEFAULT false,
///     is_archived BOOLEAN NOT NULL DEFAULT false,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use topapps_shared::models::app::{App, CreateApp};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let app = App::create(&pool, CreateApp {
///     name: "Story Writer".to_string(),
///     description: Some("Writes bedtime stories".to_string()),
///     profile_picture_url: None,
///     homepage_url: Some("https://stories.example.com".to_string()),
///     is_public: true,
/// }).await?;
///
/// let summaries = App::find_summaries_by_ids(&pool, &[app.id]).await?;
/// assert_eq!(summaries.len(), 1);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Columns of the [`AppSummary`] projection, unqualified
pub const APP_SUMMARY_COLUMNS: &str = "id, name, description, profile_picture_url, homepage_url";

/// Columns of the [`AppSummary`] projection, qualified with the `e` alias used by listing queries
pub const APP_SUMMARY_COLUMNS_QUALIFIED: &str =
    "e.id, e.name, e.description, e.profile_picture_url, e.homepage_url";

const APP_COLUMNS: &str = "id, name, description, profile_picture_url, homepage_url, \
                           is_public, is_archived, created_at, updated_at";

/// Full app row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct App {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub profile_picture_url: Option<String>,
    pub homepage_url: Option<String>,

    /// Listed in the public directory
    pub is_public: bool,

    /// Archived apps never appear in any listing
    pub is_archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a listing returns for each app
///
/// Cost, token, user, transaction and earnings figures are not part of the
/// projection; the dashboard looks them up per app through
/// [`crate::apps::stats::AppStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub profile_picture_url: Option<String>,
    pub homepage_url: Option<String>,
}

impl From<App> for AppSummary {
    fn from(app: App) -> Self {
        Self {
            id: app.id,
            name: app.name,
            description: app.description,
            profile_picture_url: app.profile_picture_url,
            homepage_url: app.homepage_url,
        }
    }
}

/// Input for registering an app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApp {
    pub name: String,
    pub description: Option<String>,
    pub profile_picture_url: Option<String>,
    pub homepage_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl App {
    /// Inserts a new, non-archived app
    pub async fn create(pool: &PgPool, data: CreateApp) -> Result<Self, sqlx::Error> {
        let app = sqlx::query_as::<_, App>(&format!(
            r#"
            INSERT INTO apps (name, description, profile_picture_url, homepage_url, is_public)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APP_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.profile_picture_url)
        .bind(data.homepage_url)
        .bind(data.is_public)
        .fetch_one(pool)
        .await?;

        Ok(app)
    }

    /// Fetches the listing projection for a set of ids
    ///
    /// Rows come back in whatever order the database chooses. Callers that
    /// need a particular order must restore it themselves (see
    /// [`crate::apps::list::restore_rank_order`]). Ids with no row are
    /// silently absent from the result.
    pub async fn find_summaries_by_ids(
        pool: &PgPool,
        ids: &[Uuid],
    ) -> Result<Vec<AppSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let apps = sqlx::query_as::<_, AppSummary>(&format!(
            "SELECT {APP_SUMMARY_COLUMNS} FROM apps WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(apps)
    }

    /// Archives an app, removing it from every listing
    ///
    /// Returns false if the app doesn't exist.
    pub async fn archive(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE apps SET is_archived = true, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_app() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let app = App {
            id,
            name: "Echo".to_string(),
            description: None,
            profile_picture_url: Some("https://cdn.example.com/echo.png".to_string()),
            homepage_url: None,
            is_public: true,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };

        let summary = AppSummary::from(app);
        assert_eq!(summary.id, id);
        assert_eq!(summary.name, "Echo");
        assert_eq!(
            summary.profile_picture_url.as_deref(),
            Some("https://cdn.example.com/echo.png")
        );
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = AppSummary {
            id: Uuid::nil(),
            name: "Echo".to_string(),
            description: None,
            profile_picture_url: None,
            homepage_url: Some("https://echo.example.com".to_string()),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["homepageUrl"], "https://echo.example.com");
        assert!(json["profilePictureUrl"].is_null());
        assert!(json.get("homepage_url").is_none());
    }

    #[test]
    fn test_qualified_columns_match_projection() {
        let unqualified: Vec<&str> = APP_SUMMARY_COLUMNS.split(", ").collect();
        let qualified: Vec<&str> = APP_SUMMARY_COLUMNS_QUALIFIED
            .split(", ")
            .map(|c| c.trim_start_matches("e."))
            .collect();
        assert_eq!(unqualified, qualified);
    }
}
