/// App membership model and database operations
///
/// A membership relates a user to an app with a role and a status. Member
/// listings key off `status = active`; owner listings key off
/// `role = owner` regardless of status.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE app_role AS ENUM ('owner', 'admin', 'customer');
/// CREATE TYPE membership_status AS ENUM ('active', 'pending', 'suspended');
///
/// CREATE TABLE app_memberships (
///     app_id UUID NOT NULL REFERENCES apps(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL,
///     role app_role NOT NULL DEFAULT 'customer',
///     status membership_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (app_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use topapps_shared::models::membership::{AppMembership, CreateAppMembership, AppRole, MembershipStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, app_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// AppMembership::create(&pool, CreateAppMembership {
///     app_id,
///     user_id,
///     role: AppRole::Owner,
///     status: MembershipStatus::Active,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role a user holds in an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "app_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    /// Created the app; sees it in the owner listing
    Owner,

    /// Manages the app on the owner's behalf
    Admin,

    /// Uses the app
    Customer,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Owner => "owner",
            AppRole::Admin => "admin",
            AppRole::Customer => "customer",
        }
    }
}

/// Lifecycle status of a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Counts toward the member listing
    Active,

    /// Invited but not yet accepted
    Pending,

    /// Access revoked
    Suspended,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Pending => "pending",
            MembershipStatus::Suspended => "suspended",
        }
    }
}

/// User-app relationship
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppMembership {
    pub app_id: Uuid,
    pub user_id: Uuid,
    pub role: AppRole,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppMembership {
    pub app_id: Uuid,
    pub user_id: Uuid,

    #[serde(default = "default_role")]
    pub role: AppRole,

    #[serde(default = "default_status")]
    pub status: MembershipStatus,
}

fn default_role() -> AppRole {
    AppRole::Customer
}

fn default_status() -> MembershipStatus {
    MembershipStatus::Active
}

impl AppMembership {
    /// Adds a user to an app
    ///
    /// # Errors
    ///
    /// Fails on a duplicate (app, user) pair or an unknown app.
    pub async fn create(pool: &PgPool, data: CreateAppMembership) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, AppMembership>(
            r#"
            INSERT INTO app_memberships (app_id, user_id, role, status)
            VALUES ($1, $2, $3, $4)
            RETURNING app_id, user_id, role, status, created_at
            "#,
        )
        .bind(data.app_id)
        .bind(data.user_id)
        .bind(data.role)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(AppRole::Owner.as_str(), "owner");
        assert_eq!(AppRole::Admin.as_str(), "admin");
        assert_eq!(AppRole::Customer.as_str(), "customer");
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(MembershipStatus::Active.as_str(), "active");
        assert_eq!(MembershipStatus::Pending.as_str(), "pending");
        assert_eq!(MembershipStatus::Suspended.as_str(), "suspended");
    }

    #[test]
    fn test_create_membership_defaults() {
        let data: CreateAppMembership = serde_json::from_value(serde_json::json!({
            "app_id": Uuid::nil(),
            "user_id": Uuid::nil(),
        }))
        .unwrap();

        assert_eq!(data.role, AppRole::Customer);
        assert_eq!(data.status, MembershipStatus::Active);
    }

    #[test]
    fn test_role_serde_matches_db_labels() {
        let role: AppRole = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(role, AppRole::Owner);
        assert_eq!(serde_json::to_string(&MembershipStatus::Suspended).unwrap(), "\"suspended\"");
    }
}
