/// Infinite-list state for the dashboard
///
/// ```text
/// Idle ──fetch──> LoadingFirstPage ──ok──> Loaded <──ok── LoadingNextPage
///                        │                   │  └──fetch──────┘  │
///                        └──err──> Failed <──┴───────err─────────┘
/// ```
///
/// Each successful fetch appends the page's items. Only one fetch may be in
/// flight: a second `fetch_next_page` while one is running returns
/// [`FetchOutcome::AlreadyFetching`] without touching the source. `Failed` is
/// terminal.
///
/// State changes are published on a `watch` channel so a renderer can
/// redraw whenever the feed moves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use topapps_shared::models::app::AppSummary;
use topapps_shared::pagination::DEFAULT_PAGE_SIZE;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::source::PageSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingFirstPage,
    Loaded,
    LoadingNextPage,

    /// Loading failed; holds the error for logs, never shown to the user
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub phase: Phase,

    /// Every item loaded so far, in page order
    pub items: Vec<AppSummary>,

    /// Index of the last page loaded
    pub page: Option<i64>,

    pub has_next: bool,
    pub total_count: i64,
}

impl FeedState {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            items: Vec::new(),
            page: None,
            has_next: false,
            total_count: 0,
        }
    }

    /// Page to ask for next, `None` once the listing is exhausted
    pub fn next_page(&self) -> Option<i64> {
        match self.page {
            None => Some(0),
            Some(page) if self.has_next => Some(page + 1),
            Some(_) => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, Phase::LoadingFirstPage | Phase::LoadingNextPage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page arrived with this many items
    Appended(usize),

    /// Another fetch is in flight
    AlreadyFetching,

    /// There is no next page
    Exhausted,

    /// The feed has failed, now or earlier
    Failed,
}

/// Clears the busy flag when the fetch ends, even if its future is dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AppFeed<S> {
    source: Arc<S>,
    page_size: i64,
    search: Option<String>,
    busy: AtomicBool,
    state: watch::Sender<FeedState>,
}

impl<S: PageSource> AppFeed<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (state, _) = watch::channel(FeedState::new());
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            busy: AtomicBool::new(false),
            state,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.is_empty());
        self
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receives every state change
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Whether a fetch is in flight; the "load more" control is disabled
    /// while this holds
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Loads the first page, or the page after the last one loaded
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("Fetch already in flight, ignoring");
            return FetchOutcome::AlreadyFetching;
        };

        let snapshot = self.snapshot();
        if matches!(snapshot.phase, Phase::Failed(_)) {
            return FetchOutcome::Failed;
        }
        let Some(page) = snapshot.next_page() else {
            return FetchOutcome::Exhausted;
        };

        self.state.send_modify(|state| {
            state.phase = if page == 0 {
                Phase::LoadingFirstPage
            } else {
                Phase::LoadingNextPage
            };
        });

        let result = self
            .source
            .fetch_page(page, self.page_size, self.search.as_deref())
            .await;

        match result {
            Ok(envelope) => {
                let appended = envelope.items.len();
                self.state.send_modify(|state| {
                    state.items.extend(envelope.items);
                    state.page = Some(envelope.page);
                    state.has_next = envelope.has_next;
                    state.total_count = envelope.total_count;
                    state.phase = Phase::Loaded;
                });
                debug!(page, appended, has_next = envelope.has_next, "Loaded page");
                FetchOutcome::Appended(appended)
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load apps");
                self.state.send_modify(|state| {
                    state.phase = Phase::Failed(e.to_string());
                });
                FetchOutcome::Failed
            }
        }
    }
}
