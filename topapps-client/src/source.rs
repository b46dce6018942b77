/// Where the dashboard gets its data
///
/// The feed and the cards depend only on [`PageSource`] and [`StatsSource`].
/// [`HttpApi`] implements both against the Top Apps API; tests use
/// [`crate::mock::MockSource`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use topapps_shared::apps::{AppStats, MembershipScope};
use topapps_shared::models::app::AppSummary;
use topapps_shared::pagination::Paginated;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the server's error message when it sent one
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unavailable(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// One page of a listing
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> SourceResult<Paginated<AppSummary>>;
}

/// Card metrics for one app
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_stats(&self, app_id: Uuid) -> SourceResult<AppStats>;
}

/// Which listing an [`HttpApi`] pages through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    #[default]
    Public,
    Member,
    Owner,
}

impl Listing {
    fn path(self) -> &'static str {
        match self {
            Listing::Public => "public",
            Listing::Member => MembershipScope::Member.as_str(),
            Listing::Owner => MembershipScope::Owner.as_str(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the `/v1/apps` endpoints
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    listing: Listing,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, listing: Listing, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            listing,
            token,
        }
    }

    fn listing_url(&self) -> String {
        format!("{}/v1/apps/{}", self.base_url, self.listing.path())
    }

    fn stats_url(&self, app_id: Uuid) -> String {
        format!("{}/v1/apps/{}/stats", self.base_url, app_id)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> SourceResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => SourceError::Unauthorized(message),
            StatusCode::SERVICE_UNAVAILABLE => SourceError::Unavailable(message),
            _ => SourceError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl PageSource for HttpApi {
    async fn fetch_page(
        &self,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> SourceResult<Paginated<AppSummary>> {
        debug!(listing = ?self.listing, page, page_size, ?search, "Fetching page");

        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }

        self.get(self.client.get(self.listing_url()).query(&query))
            .await
    }
}

#[async_trait]
impl StatsSource for HttpApi {
    async fn fetch_stats(&self, app_id: Uuid) -> SourceResult<AppStats> {
        self.get(self.client.get(self.stats_url(app_id))).await
    }
}
