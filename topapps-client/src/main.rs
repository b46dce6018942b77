//! # Top Apps
//!
//! Prints the top apps list and loads another page each time Enter is
//! pressed. `q` or end of input quits.
//!
//! ```bash
//! TOPAPPS_API_URL=http://127.0.0.1:8080 cargo run -p topapps-client
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use topapps_client::{
    config::ClientConfig, feed::Phase, render::render, view::CardCache, AppFeed, FeedView,
    FetchOutcome, HttpApi,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topapps_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(api_url = %config.api_url, listing = ?config.listing, "Starting client");

    let api = Arc::new(HttpApi::new(
        config.api_url.clone(),
        config.listing,
        config.token.clone(),
    ));
    let feed = AppFeed::new(api.clone())
        .with_page_size(config.page_size)
        .with_search(config.search.clone());

    let mut cards = CardCache::new();
    print!(
        "{}",
        render(&FeedView::build(&feed.snapshot(), api.as_ref(), &mut cards).await)
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut outcome = feed.fetch_next_page().await;

    loop {
        let state = feed.snapshot();
        print!("{}", render(&FeedView::build(&state, api.as_ref(), &mut cards).await));

        if matches!(state.phase, Phase::Failed(_)) || !state.has_next {
            break;
        }
        if outcome == FetchOutcome::Exhausted {
            break;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }

        outcome = feed.fetch_next_page().await;
    }

    Ok(())
}
