//! Common test utilities for integration tests
//!
//! - A router over a lazily-connected pool for tests that never reach the
//!   database (auth and validation failures)
//! - A router over a migrated database at `DATABASE_URL` for the rest
//! - JWT token generation and request helpers

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use topapps_api::app::{build_router, AppState};
use topapps_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use topapps_shared::auth::jwt::{create_token, Claims};
use topapps_shared::db::migrations::run_migrations;
use topapps_shared::models::app::{App, CreateApp};
use topapps_shared::models::transaction::{CreateTransaction, Transaction};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user_id: Uuid,
    pub jwt_token: String,
}

fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

impl TestContext {
    fn with_pool(db: PgPool, config: Config) -> Self {
        let user_id = Uuid::new_v4();
        let jwt_token = create_token(&Claims::new(user_id), &config.jwt.secret)
            .expect("Failed to create token");

        let app = build_router(AppState::new(db.clone(), config.clone()));

        Self {
            db,
            app,
            config,
            user_id,
            jwt_token,
        }
    }

    /// Router whose pool never connects unless a handler reaches it
    pub fn offline() -> Self {
        let url = "postgresql://localhost:1/unused";
        let db = PgPoolOptions::new()
            .connect_lazy(url)
            .expect("Failed to build lazy pool");
        Self::with_pool(db, test_config(url))
    }

    /// Router over a migrated database, or None when `DATABASE_URL` is unset
    pub async fn connected() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        let db = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("Failed to connect to database");
        run_migrations(&db).await.expect("Failed to run migrations");

        Some(Self::with_pool(db, test_config(&url)))
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a GET and returns the status and JSON body
    pub async fn get(&self, uri: &str, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let request = builder.body(Body::empty()).unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body).into()))
        };

        (status, json)
    }
}

pub fn unique_tag() -> String {
    format!("t{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn create_app(db: &PgPool, name: &str, is_public: bool) -> App {
    App::create(
        db,
        CreateApp {
            name: name.to_string(),
            description: None,
            profile_picture_url: None,
            homepage_url: Some(format!("https://{name}.example.com")),
            is_public,
        },
    )
    .await
    .expect("Failed to create app")
}

pub async fn add_transaction(db: &PgPool, app_id: Uuid, user_id: Option<Uuid>, total_cost: f64) {
    Transaction::create(
        db,
        CreateTransaction {
            app_id,
            user_id,
            total_cost,
            markup_profit: total_cost / 10.0,
            input_tokens: 100,
            output_tokens: 50,
        },
    )
    .await
    .expect("Failed to create transaction");
}

pub async fn cleanup(db: &PgPool, tag: &str) {
    sqlx::query("DELETE FROM apps WHERE name LIKE '%' || $1 || '%'")
        .bind(tag)
        .execute(db)
        .await
        .expect("Failed to clean up");
}
