/// View models for the top apps list
///
/// [`FeedView::build`] turns a feed snapshot into what the screen shows.
/// Card metrics are looked up per app, concurrently, after the page
/// arrives. A [`CardCache`] keeps finished cards so a redraw only looks up
/// apps it hasn't seen.

use std::collections::HashMap;

use futures::future::join_all;
use topapps_shared::apps::AppStats;
use topapps_shared::models::app::AppSummary;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::feed::{FeedState, Phase};
use crate::source::StatsSource;

pub const ERROR_MESSAGE: &str = "There was an error loading the top apps";
pub const EMPTY_MESSAGE: &str = "No apps found";
pub const NO_HOMEPAGE: &str = "No homepage URL";
pub const NO_DESCRIPTION: &str = "No description";

/// Placeholder cards shown while the first page loads
pub const SKELETON_CARDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Loading,
    Value(String),
}

impl Metric {
    pub fn text(&self) -> &str {
        match self {
            Metric::Loading => "...",
            Metric::Value(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMetrics {
    pub users: Metric,
    pub transactions: Metric,
    pub tokens: Metric,
    pub usage: Metric,
    pub earnings: Metric,
}

impl CardMetrics {
    fn loading() -> Self {
        Self {
            users: Metric::Loading,
            transactions: Metric::Loading,
            tokens: Metric::Loading,
            usage: Metric::Loading,
            earnings: Metric::Loading,
        }
    }

    fn from_stats(stats: &AppStats) -> Self {
        Self {
            users: Metric::Value(stats.user_count.to_string()),
            transactions: Metric::Value(stats.transaction_count.to_string()),
            tokens: Metric::Value(format_tokens(stats.total_tokens)),
            usage: Metric::Value(format_amount(stats.total_cost)),
            earnings: Metric::Value(format_amount(stats.earnings)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCard {
    /// Detail page, `/app/{id}`
    pub href: String,
    pub name: String,
    pub profile_picture_url: Option<String>,
    pub homepage: String,
    pub description: String,
    pub metrics: CardMetrics,
}

impl AppCard {
    /// A card whose metrics are still loading
    pub fn new(app: &AppSummary) -> Self {
        Self {
            href: format!("/app/{}", app.id),
            name: app.name.clone(),
            profile_picture_url: app.profile_picture_url.clone(),
            homepage: app
                .homepage_url
                .clone()
                .unwrap_or_else(|| NO_HOMEPAGE.to_string()),
            description: app
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            metrics: CardMetrics::loading(),
        }
    }

    pub fn with_stats(mut self, stats: &AppStats) -> Self {
        self.metrics = CardMetrics::from_stats(stats);
        self
    }
}

/// The "load more" control, present only while another page exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMore {
    pub enabled: bool,
}

impl LoadMore {
    pub fn label(&self) -> &'static str {
        if self.enabled {
            "Load more"
        } else {
            "Loading..."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading { skeletons: usize },
    Error(String),
    Empty(String),
    List {
        cards: Vec<AppCard>,
        load_more: Option<LoadMore>,
    },
}

impl FeedView {
    /// Renders `state`, fetching stats for loaded apps not yet in `cache`
    pub async fn build<S: StatsSource + ?Sized>(
        state: &FeedState,
        stats: &S,
        cache: &mut CardCache,
    ) -> Self {
        match &state.phase {
            Phase::Idle | Phase::LoadingFirstPage => FeedView::Loading {
                skeletons: SKELETON_CARDS,
            },
            Phase::Failed(_) => FeedView::Error(ERROR_MESSAGE.to_string()),
            Phase::Loaded | Phase::LoadingNextPage if state.items.is_empty() => {
                FeedView::Empty(EMPTY_MESSAGE.to_string())
            }
            Phase::Loaded | Phase::LoadingNextPage => FeedView::List {
                cards: cache.cards_for(&state.items, stats).await,
                load_more: state.has_next.then_some(LoadMore {
                    enabled: !state.is_fetching(),
                }),
            },
        }
    }
}

/// Finished cards by app id
#[derive(Debug, Default)]
pub struct CardCache {
    cards: HashMap<Uuid, AppCard>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards for `apps` in order, looking up stats only for new apps
    pub async fn cards_for<S: StatsSource + ?Sized>(
        &mut self,
        apps: &[AppSummary],
        stats: &S,
    ) -> Vec<AppCard> {
        let missing: Vec<AppSummary> = apps
            .iter()
            .filter(|app| !self.cards.contains_key(&app.id))
            .cloned()
            .collect();

        if !missing.is_empty() {
            debug!(new_cards = missing.len(), cached = self.cards.len(), "Loading card stats");
            for (app, card) in missing.iter().zip(load_cards(&missing, stats).await) {
                self.cards.insert(app.id, card);
            }
        }

        apps.iter()
            .map(|app| {
                self.cards
                    .get(&app.id)
                    .cloned()
                    .unwrap_or_else(|| AppCard::new(app))
            })
            .collect()
    }
}

/// Cards for `apps` with their stats filled in
///
/// A failed lookup is logged and the card shows zeros.
pub async fn load_cards<S: StatsSource + ?Sized>(apps: &[AppSummary], stats: &S) -> Vec<AppCard> {
    let lookups = apps.iter().map(|app| async move {
        let card = AppCard::new(app);
        match stats.fetch_stats(app.id).await {
            Ok(found) => card.with_stats(&found),
            Err(e) => {
                warn!(app_id = %app.id, error = %e, "Failed to load app stats");
                card.with_stats(&AppStats::default())
            }
        }
    });

    join_all(lookups).await
}

/// `1.5M`, `12.0K`, or the plain count below a thousand
pub fn format_tokens(tokens: i64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
