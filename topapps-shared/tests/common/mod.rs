//! Shared fixtures for the database-backed suites
//!
//! Suites need a PostgreSQL database at `DATABASE_URL`. When the variable is
//! unset, [`test_pool`] returns `None` and each test returns early.
//!
//! Tests share one database and run concurrently, so every fixture is scoped
//! by a unique tag baked into app names (matched with `search`) or by a fresh
//! user id.

#![allow(dead_code)]

use sqlx::PgPool;
use topapps_shared::db::migrations::run_migrations;
use topapps_shared::db::pool::{create_pool, DatabaseConfig};
use topapps_shared::models::app::{App, CreateApp};
use topapps_shared::models::membership::{AppMembership, AppRole, CreateAppMembership, MembershipStatus};
use topapps_shared::models::transaction::{CreateTransaction, Transaction};
use uuid::Uuid;

/// Connects and migrates, or returns None without a database
pub async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = create_pool(DatabaseConfig::from_url(url).with_max_connections(5))
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

/// A short random tag to scope app names to one test
pub fn unique_tag() -> String {
    format!("t{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn create_app(pool: &PgPool, name: &str, is_public: bool) -> App {
    App::create(
        pool,
        CreateApp {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            profile_picture_url: None,
            homepage_url: None,
            is_public,
        },
    )
    .await
    .expect("Failed to create app")
}

pub async fn add_transaction(pool: &PgPool, app_id: Uuid, total_cost: f64) -> Transaction {
    Transaction::create(
        pool,
        CreateTransaction {
            app_id,
            user_id: None,
            total_cost,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create transaction")
}

pub async fn add_membership(
    pool: &PgPool,
    app_id: Uuid,
    user_id: Uuid,
    role: AppRole,
    status: MembershipStatus,
) {
    AppMembership::create(
        pool,
        CreateAppMembership {
            app_id,
            user_id,
            role,
            status,
        },
    )
    .await
    .expect("Failed to create membership");
}

/// Deletes every app whose name contains `tag` (cascades to the rest)
pub async fn cleanup(pool: &PgPool, tag: &str) {
    sqlx::query("DELETE FROM apps WHERE name LIKE '%' || $1 || '%'")
        .bind(tag)
        .execute(pool)
        .await
        .expect("Failed to clean up");
}
