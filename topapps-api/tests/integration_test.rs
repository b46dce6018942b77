/// Integration tests for the Top Apps API
///
/// Auth and validation failures run against an offline router. Tests that
/// read data need `DATABASE_URL` and return early without it.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use topapps_shared::models::membership::{AppMembership, AppRole, CreateAppMembership, MembershipStatus};
use uuid::Uuid;

#[tokio::test]
async fn test_member_listing_requires_token() {
    let ctx = TestContext::offline();

    let (status, body) = ctx.get("/v1/apps/member", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = ctx.get("/v1/apps/owner", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_authorization_is_rejected() {
    let ctx = TestContext::offline();

    let (status, body) = ctx.get("/v1/apps/member", Some("Basic abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let ctx = TestContext::offline();

    let (status, _) = ctx.get("/v1/apps/owner", Some("Bearer not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_negative_page_is_unprocessable() {
    let ctx = TestContext::offline();

    let (status, body) = ctx.get("/v1/apps/public?page=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "page");
}

#[tokio::test]
async fn test_page_size_out_of_range_is_unprocessable() {
    let ctx = TestContext::offline();

    let (status, body) = ctx.get("/v1/apps/public?page_size=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "page_size");

    let (status, body) = ctx.get("/v1/apps/public?page_size=101", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "page_size");
    assert!(body["details"][0]["message"]
        .as_str()
        .is_some_and(|m| m.contains("service limit")));
}

#[tokio::test]
async fn test_member_listing_validates_after_auth() {
    let ctx = TestContext::offline();
    let auth = ctx.auth_header();

    let (status, _) = ctx.get("/v1/apps/member?page=-3", Some(&auth)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_app_id_is_bad_request() {
    let ctx = TestContext::offline();

    let (status, _) = ctx.get("/v1/apps/not-a-uuid/stats", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = TestContext::connected().await else { return };

    let (status, body) = ctx.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_public_listing_ranks_by_cost() {
    let Some(ctx) = TestContext::connected().await else { return };
    let tag = common::unique_tag();

    let low = common::create_app(&ctx.db, &format!("{tag}-low"), true).await;
    let high = common::create_app(&ctx.db, &format!("{tag}-high"), true).await;
    let idle = common::create_app(&ctx.db, &format!("{tag}-idle"), true).await;
    common::create_app(&ctx.db, &format!("{tag}-private"), false).await;

    common::add_transaction(&ctx.db, low.id, None, 1.0).await;
    common::add_transaction(&ctx.db, high.id, None, 9.0).await;

    let (status, body) = ctx
        .get(&format!("/v1/apps/public?search={tag}&page_size=2"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["has_next"], true);
    assert_eq!(body["items"][0]["id"], high.id.to_string());
    assert_eq!(body["items"][1]["id"], low.id.to_string());
    assert!(body["items"][0]["homepageUrl"].is_string());

    let (status, body) = ctx
        .get(&format!("/v1/apps/public?search={tag}&page=1&page_size=2"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["id"], idle.id.to_string());

    common::cleanup(&ctx.db, &tag).await;
}

#[tokio::test]
async fn test_member_and_owner_listings() {
    let Some(ctx) = TestContext::connected().await else { return };
    let tag = common::unique_tag();

    let owned = common::create_app(&ctx.db, &format!("{tag}-owned"), false).await;
    let joined = common::create_app(&ctx.db, &format!("{tag}-joined"), false).await;
    common::create_app(&ctx.db, &format!("{tag}-stranger"), true).await;

    for (app_id, role) in [(owned.id, AppRole::Owner), (joined.id, AppRole::Customer)] {
        AppMembership::create(
            &ctx.db,
            CreateAppMembership {
                app_id,
                user_id: ctx.user_id,
                role,
                status: MembershipStatus::Active,
            },
        )
        .await
        .unwrap();
    }
    common::add_transaction(&ctx.db, joined.id, Some(ctx.user_id), 0.5).await;

    let auth = ctx.auth_header();

    let (status, body) = ctx.get("/v1/apps/member", Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["items"][0]["id"], joined.id.to_string());
    assert_eq!(body["items"][1]["id"], owned.id.to_string());

    let (status, body) = ctx.get("/v1/apps/owner", Some(&auth)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["id"], owned.id.to_string());

    common::cleanup(&ctx.db, &tag).await;
}

#[tokio::test]
async fn test_app_stats() {
    let Some(ctx) = TestContext::connected().await else { return };
    let tag = common::unique_tag();

    let app = common::create_app(&ctx.db, &format!("{tag}-stats"), true).await;
    let user = Uuid::new_v4();
    common::add_transaction(&ctx.db, app.id, Some(user), 2.0).await;
    common::add_transaction(&ctx.db, app.id, Some(user), 3.0).await;

    let (status, body) = ctx.get(&format!("/v1/apps/{}/stats", app.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCost"], 5.0);
    assert_eq!(body["totalTokens"], 300);
    assert_eq!(body["userCount"], 1);
    assert_eq!(body["transactionCount"], 2);
    assert_eq!(body["earnings"], 0.5);

    common::cleanup(&ctx.db, &tag).await;
}

#[tokio::test]
async fn test_stats_for_unknown_app_is_not_found() {
    let Some(ctx) = TestContext::connected().await else { return };

    let (status, body) = ctx
        .get(&format!("/v1/apps/{}/stats", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
