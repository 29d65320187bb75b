//! HTTP-level integration tests for the public parts surface.
//!
//! Covers submission (create-or-get through the wire), published-only search
//! visibility, the public image projection, near-match lookup, contributor
//! image submission, and validation error shapes.

mod common;

use axum::http::StatusCode;
use common::{
    admin_post, admin_put_json, body_json, build_test_app, get, post_json, user_post_json,
    TEST_ADMIN_ID, TEST_USER_ID,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn submission(gear_type: &str, brand: &str, model: &str) -> serde_json::Value {
    serde_json::json!({
        "gear_type": gear_type,
        "brand": brand,
        "model": model,
    })
}

/// Submit a part anonymously and return its id.
async fn seed_part(pool: &PgPool, gear_type: &str, brand: &str, model: &str) -> i64 {
    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/parts",
        submission(gear_type, brand, model),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"]["part"]["id"].as_i64().unwrap()
}

async fn publish(pool: &PgPool, id: i64) {
    let resp = admin_put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/parts/{id}"),
        serde_json::json!({"status": "published"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: POST /parts creates on first submission, merges on the second
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_create_then_merge(pool: PgPool) {
    let create_resp = user_post_json(
        build_test_app(pool.clone()),
        "/api/v1/parts",
        submission("receiver", "TBS", "Crossfire Nano"),
    )
    .await;
    assert_eq!(create_resp.status(), StatusCode::CREATED);

    let created = body_json(create_resp).await;
    assert_eq!(created["data"]["existing"], false);
    let id = created["data"]["part"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["part"]["canonical_key"], "receiver|tbs|crossfire nano");
    assert_eq!(created["data"]["part"]["status"], "pending");
    assert_eq!(created["data"]["part"]["source"], "user-submitted");
    assert_eq!(created["data"]["part"]["created_by"], TEST_USER_ID);
    assert_eq!(created["data"]["part"]["usage_count"], 0);

    // Same product under different formatting merges into the same row.
    let merge_resp = post_json(
        build_test_app(pool),
        "/api/v1/parts",
        submission("receiver", "tbs", "CROSSFIRE-NANO"),
    )
    .await;
    assert_eq!(merge_resp.status(), StatusCode::OK, "merge responds 200, not 201");

    let merged = body_json(merge_resp).await;
    assert_eq!(merged["data"]["existing"], true);
    assert_eq!(merged["data"]["part"]["id"], id);
}

// ---------------------------------------------------------------------------
// Test: Submission validation errors are 400 with a code
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_validation_errors(pool: PgPool) {
    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/parts",
        submission("warp-drive", "TBS", "Crossfire"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());

    // Brand that normalizes to nothing.
    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/parts",
        submission("receiver", "!!!", "Crossfire"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A garbage x-user-id header is a gateway bug, not an anonymous user.
    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/v1/parts")
        .header("content-type", "application/json")
        .header("x-user-id", "not-a-number")
        .body(axum::body::Body::from(
            submission("receiver", "TBS", "Crossfire").to_string(),
        ))
        .unwrap();
    let resp = tower::ServiceExt::oneshot(build_test_app(pool), request)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: GET /parts only returns published parts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_search_scoping(pool: PgPool) {
    let published = seed_part(&pool, "camera", "RunCam", "Phoenix 2").await;
    let _pending = seed_part(&pool, "camera", "Caddx", "Ratel 2").await;
    publish(&pool, published).await;

    let resp = get(build_test_app(pool), "/api/v1/parts?gear_type=camera").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["total_count"], 1);
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], published);
    assert_eq!(items[0]["status"], "published");
}

// ---------------------------------------------------------------------------
// Test: Public projection hides unapproved images
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_image_projection(pool: PgPool) {
    let id = seed_part(&pool, "vtx", "Rush", "Tank Solo").await;

    // Contributor upload: the submitter sees their scanned image...
    let submit_resp = user_post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/parts/{id}/image"),
        serde_json::json!({"image_key": "parts/tank-solo.jpg"}),
    )
    .await;
    assert_eq!(submit_resp.status(), StatusCode::OK);
    let submitted = body_json(submit_resp).await;
    assert_eq!(submitted["data"]["image_status"], "scanned");
    assert_eq!(submitted["data"]["image_url"], "/assets/parts/tank-solo.jpg");

    // ...but the public fetch hides it until approval.
    let public = body_json(get(build_test_app(pool.clone()), &format!("/api/v1/parts/{id}")).await).await;
    assert_eq!(public["data"]["image_status"], "scanned");
    assert!(public["data"]["image_url"].is_null());
    // The raw image reference never appears in any payload.
    assert!(public["data"].get("image_key").is_none());

    let approve = admin_post(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/parts/{id}/image/approve"),
    )
    .await;
    assert_eq!(approve.status(), StatusCode::OK);

    let after = body_json(get(build_test_app(pool), &format!("/api/v1/parts/{id}")).await).await;
    assert_eq!(after["data"]["image_status"], "approved");
    assert_eq!(after["data"]["image_url"], "/assets/parts/tank-solo.jpg");
    assert_eq!(after["data"]["image_curated_by"], TEST_ADMIN_ID);
}

// ---------------------------------------------------------------------------
// Test: Contributor cannot replace an approved image
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_image_after_approval_conflicts(pool: PgPool) {
    let id = seed_part(&pool, "camera", "Foxeer", "Razer Mini").await;

    user_post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/parts/{id}/image"),
        serde_json::json!({"image_key": "parts/razer.jpg"}),
    )
    .await;
    admin_post(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/parts/{id}/image/approve"),
    )
    .await;

    let resp = user_post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/parts/{id}/image"),
        serde_json::json!({"image_key": "parts/razer-troll.jpg"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let json = body_json(resp).await;
    assert_eq!(json["code"], "ALREADY_CURATED");

    // Submitting to a part that does not exist is a plain 404.
    let resp = user_post_json(
        build_test_app(pool),
        "/api/v1/parts/99999/image",
        serde_json::json!({"image_key": "parts/ghost.jpg"}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: GET /parts/near-matches flags probable duplicates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_near_matches_over_http(pool: PgPool) {
    let stored = seed_part(&pool, "motor", "TMotor", "F80 Pro").await;
    publish(&pool, stored).await;
    let unpublished = seed_part(&pool, "motor", "TMotor", "F80 Pro II").await;

    let resp = get(
        build_test_app(pool),
        "/api/v1/parts/near-matches?gear_type=motor&brand=T-Motor&model=F80-Pro",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let matches = json["data"].as_array().unwrap();
    let hit = matches
        .iter()
        .find(|m| m["id"] == stored)
        .expect("cross-spelling duplicate should surface");
    assert!(hit["score"].as_f64().unwrap() >= 0.3);
    assert!(
        !matches.iter().any(|m| m["id"] == unpublished),
        "public lookup must not leak unpublished parts"
    );
}

// ---------------------------------------------------------------------------
// Test: GET /parts/{id} for a missing part returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_part_returns_404(pool: PgPool) {
    let resp = get(build_test_app(pool), "/api/v1/parts/99999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = body_json(resp).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
