/// In-memory source for tests and demos
///
/// Serves a fixed list of apps in the order given, so page `n` is a plain
/// slice of it. Search is a case-insensitive substring match like the
/// server's.
///
/// # Example
///
/// ```
/// use topapps_client::mock::MockSource;
/// use topapps_client::source::PageSource;
///
/// # async fn example() {
/// let source = MockSource::with_app_count(25);
/// let page = source.fetch_page(1, 20, None).await.unwrap();
/// assert_eq!(page.items.len(), 5);
/// assert!(!page.has_next);
/// # }
/// ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use topapps_shared::apps::AppStats;
use topapps_shared::models::app::AppSummary;
use topapps_shared::pagination::{to_paginated_response, Paginated};
use uuid::Uuid;

use crate::source::{PageSource, SourceError, SourceResult, StatsSource};

#[derive(Debug, Default)]
pub struct MockSource {
    apps: Vec<AppSummary>,
    stats: HashMap<Uuid, AppStats>,

    /// Pages that fail when requested
    failing_pages: HashSet<i64>,

    /// Apps whose stats lookup fails
    failing_stats: HashSet<Uuid>,

    /// Delay before each page is served
    delay: Option<Duration>,

    page_requests: AtomicUsize,
    stats_requests: AtomicUsize,
}

impl MockSource {
    pub fn new(apps: Vec<AppSummary>) -> Self {
        Self {
            apps,
            ..Default::default()
        }
    }

    /// `count` apps named `App 0`, `App 1`, ...
    pub fn with_app_count(count: usize) -> Self {
        Self::new((0..count).map(|i| mock_app(&format!("App {i}"))).collect())
    }

    pub fn with_stats(mut self, app_id: Uuid, stats: AppStats) -> Self {
        self.stats.insert(app_id, stats);
        self
    }

    pub fn failing_page(mut self, page: i64) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn failing_stats(mut self, app_id: Uuid) -> Self {
        self.failing_stats.insert(app_id);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn apps(&self) -> &[AppSummary] {
        &self.apps
    }

    /// Number of `fetch_page` calls served so far
    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    /// Number of `fetch_stats` calls served so far
    pub fn stats_requests(&self) -> usize {
        self.stats_requests.load(Ordering::SeqCst)
    }
}

/// An app with only a name
pub fn mock_app(name: &str) -> AppSummary {
    AppSummary {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        profile_picture_url: None,
        homepage_url: None,
    }
}

#[async_trait]
impl PageSource for MockSource {
    async fn fetch_page(
        &self,
        page: i64,
        page_size: i64,
        search: Option<&str>,
    ) -> SourceResult<Paginated<AppSummary>> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_pages.contains(&page) {
            return Err(SourceError::Status {
                status: 500,
                message: format!("page {page} failed"),
            });
        }

        let needle = search.map(str::to_lowercase);
        let matching: Vec<&AppSummary> = self
            .apps
            .iter()
            .filter(|app| match &needle {
                Some(needle) => app.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();

        let start = usize::try_from(page.saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(0);
        let items = matching
            .iter()
            .skip(start)
            .take(take)
            .map(|app| (*app).clone())
            .collect();

        Ok(to_paginated_response(
            items,
            page,
            page_size,
            matching.len() as i64,
        ))
    }
}

#[async_trait]
impl StatsSource for MockSource {
    async fn fetch_stats(&self, app_id: Uuid) -> SourceResult<AppStats> {
        self.stats_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing_stats.contains(&app_id) {
            return Err(SourceError::Unavailable(format!("stats for {app_id} unavailable")));
        }
        Ok(self.stats.get(&app_id).cloned().unwrap_or_default())
    }
}
