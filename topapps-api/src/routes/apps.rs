/// Dashboard listing and app stats endpoints
///
/// # Endpoints
///
/// - `GET /v1/apps/public`: public apps ranked by aggregate cost
/// - `GET /v1/apps/member`: apps the caller is an active member of (JWT)
/// - `GET /v1/apps/owner`: apps the caller owns (JWT)
/// - `GET /v1/apps/:app_id/stats`: usage metrics for one app
///
/// Listings accept `?search=&page=&page_size=` and answer with the
/// pagination envelope:
///
/// ```json
/// {
///   "items": [{ "id": "...", "name": "Chatbot", "description": null,
///               "profilePictureUrl": null, "homepageUrl": "https://..." }],
///   "page": 0,
///   "page_size": 20,
///   "total_count": 25,
///   "has_next": true
/// }
/// ```

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use topapps_shared::apps::{self, AppStats, MembershipScope};
use topapps_shared::models::app::AppSummary;
use topapps_shared::pagination::{Paginated, Pagination, DEFAULT_PAGE_SIZE};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListAppsQuery {
    /// Case-insensitive substring of the app name
    #[validate(length(max = 200, message = "search must be at most 200 characters"))]
    pub search: Option<String>,

    #[serde(default)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ListAppsQuery {
    /// Validates the query and splits it into search text and window
    fn into_parts(self) -> ApiResult<(Option<String>, Pagination)> {
        self.validate()
            .map_err(|e| ApiError::from_validation(&e))?;

        let pagination = Pagination::new(self.page, self.page_size)?;
        Ok((self.search, pagination))
    }
}

/// `GET /v1/apps/public`
pub async fn list_public_apps(
    State(state): State<AppState>,
    Query(query): Query<ListAppsQuery>,
) -> ApiResult<Json<Paginated<AppSummary>>> {
    let (search, pagination) = query.into_parts()?;

    let page = apps::list_public_apps(&state.db, search.as_deref(), pagination).await?;

    Ok(Json(page))
}

/// `GET /v1/apps/member`
pub async fn list_member_apps(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListAppsQuery>,
) -> ApiResult<Json<Paginated<AppSummary>>> {
    list_for_user(&state, user, MembershipScope::Member, query).await
}

/// `GET /v1/apps/owner`
pub async fn list_owner_apps(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListAppsQuery>,
) -> ApiResult<Json<Paginated<AppSummary>>> {
    list_for_user(&state, user, MembershipScope::Owner, query).await
}

async fn list_for_user(
    state: &AppState,
    user: CurrentUser,
    scope: MembershipScope,
    query: ListAppsQuery,
) -> ApiResult<Json<Paginated<AppSummary>>> {
    let (search, pagination) = query.into_parts()?;

    let page = apps::list_member_apps(
        &state.db,
        user.user_id,
        scope,
        search.as_deref(),
        pagination,
    )
    .await?;

    Ok(Json(page))
}

/// `GET /v1/apps/:app_id/stats`
///
/// 404 when the app doesn't exist or is archived.
pub async fn get_app_stats(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
) -> ApiResult<Json<AppStats>> {
    let stats = AppStats::overall(&state.db, app_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("App {} not found", app_id)))?;

    Ok(Json(stats))
}
