/// Client configuration
///
/// Read from `TOPAPPS_*` environment variables (a `.env` file is honoured):
///
/// - `TOPAPPS_API_URL`: API base URL (default: `http://127.0.0.1:8080`)
/// - `TOPAPPS_LISTING`: `public`, `member` or `owner` (default: `public`)
/// - `TOPAPPS_PAGE_SIZE`: apps per page (default: 20)
/// - `TOPAPPS_SEARCH`: optional name filter
/// - `TOPAPPS_TOKEN`: bearer token, required for `member` and `owner`

use anyhow::Context;
use serde::Deserialize;
use topapps_shared::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::source::Listing;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,

    #[serde(default)]
    pub listing: Listing,

    pub page_size: i64,
    pub search: Option<String>,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::with_prefix("TOPAPPS").try_parsing(true))
    }

    fn load(source: config::Environment) -> anyhow::Result<Self> {
        let config: ClientConfig = config::Config::builder()
            .set_default("api_url", "http://127.0.0.1:8080")?
            .set_default("page_size", DEFAULT_PAGE_SIZE)?
            .add_source(source)
            .build()?
            .try_deserialize()
            .context("Invalid client configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            anyhow::bail!("TOPAPPS_PAGE_SIZE must be between 1 and {}", MAX_PAGE_SIZE);
        }
        if self.listing != Listing::Public && self.token.is_none() {
            anyhow::bail!("TOPAPPS_TOKEN is required for the {:?} listing", self.listing);
        }
        Ok(())
    }
}
