//! Integration tests for catalog search, near-match detection, stats, and
//! deletion.
//!
//! Exercises the repository layer against a real database:
//! - Public search visibility (published parts only) and filters
//! - Relevance ranking with a free-text query
//! - Popularity ordering from inventory usage
//! - Admin search: explicit filters and the needs-work default view
//! - Near-match lookup on both the trigram and fallback paths
//! - Catalog stats, delete, and bulk delete

use rotorbase_core::gear;
use rotorbase_db::models::part::{
    AdminSearchParams, CreatePart, NearMatchQuery, PartSearchParams, UpdatePart,
};
use rotorbase_db::repositories::{CurationRepo, NearMatchRepo, PartRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_part(pool: &PgPool, gear_type: &str, brand: &str, model: &str) -> i64 {
    let input = CreatePart {
        gear_type: gear_type.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        variant: None,
        specs: None,
        best_for: vec![],
        msrp_cents: None,
        description: None,
        source: None,
    };
    let (part, _) = PartRepo::create_or_get(pool, &input, gear::SOURCE_USER_SUBMITTED, None)
        .await
        .unwrap();
    part.part.id
}

async fn publish(pool: &PgPool, id: i64) {
    let patch = UpdatePart {
        status: Some("published".to_string()),
        ..UpdatePart::default()
    };
    PartRepo::admin_update(pool, id, &patch, 1).await.unwrap();
}

async fn add_inventory(pool: &PgPool, user_id: i64, part_id: i64) {
    sqlx::query("INSERT INTO inventory_items (user_id, part_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(part_id)
        .execute(pool)
        .await
        .unwrap();
}

fn public_params() -> PartSearchParams {
    PartSearchParams::default()
}

// ---------------------------------------------------------------------------
// Test: Public search sees published parts only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_search_published_only(pool: PgPool) {
    let published_id = seed_part(&pool, "receiver", "TBS", "Crossfire Nano").await;
    let pending_id = seed_part(&pool, "receiver", "TBS", "Tracer Nano").await;
    publish(&pool, published_id).await;

    let page = PartRepo::search(&pool, &public_params()).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].part.id, published_id);
    assert!(
        !page.items.iter().any(|p| p.part.id == pending_id),
        "pending parts must stay invisible"
    );
}

// ---------------------------------------------------------------------------
// Test: Gear type and brand filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_search_filters(pool: PgPool) {
    let rx = seed_part(&pool, "receiver", "TBS", "Crossfire Nano").await;
    let cam = seed_part(&pool, "camera", "RunCam", "Phoenix 2").await;
    let cam2 = seed_part(&pool, "camera", "Foxeer", "Razer Mini").await;
    for id in [rx, cam, cam2] {
        publish(&pool, id).await;
    }

    let cameras = PartRepo::search(
        &pool,
        &PartSearchParams {
            gear_type: Some("camera".to_string()),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(cameras.total_count, 2);
    assert!(cameras.items.iter().all(|p| p.part.gear_type == "camera"));

    // Brand filter is case-insensitive on the stored form.
    let runcam = PartRepo::search(
        &pool,
        &PartSearchParams {
            brand: Some("runcam".to_string()),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(runcam.total_count, 1);
    assert_eq!(runcam.items[0].part.id, cam);
}

// ---------------------------------------------------------------------------
// Test: Free-text search ranks name matches above description matches
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_relevance_ranking(pool: PgPool) {
    let named = seed_part(&pool, "receiver", "TBS", "Crossfire Nano").await;
    let described = seed_part(&pool, "receiver", "Happymodel", "EP2").await;
    publish(&pool, named).await;
    publish(&pool, described).await;
    CurationRepo::set_description(&pool, described, 1, "Tiny ELRS receiver, a Crossfire rival.")
        .await
        .unwrap();

    let page = PartRepo::search(
        &pool,
        &PartSearchParams {
            q: Some("crossfire".to_string()),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.total_count, 2, "description matches count too");
    assert_eq!(
        page.items[0].part.id, named,
        "name match must outrank description match"
    );

    // Punctuation in the query is stripped, not fatal.
    let noisy = PartRepo::search(
        &pool,
        &PartSearchParams {
            q: Some("crossfire!!".to_string()),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(noisy.total_count, 2);

    // Interior punctuation splits into separate terms instead of reaching
    // to_tsquery as a literal, which Postgres would reject outright.
    let typo = PartRepo::search(
        &pool,
        &PartSearchParams {
            q: Some("crossfire!nano".to_string()),
            ..public_params()
        },
    )
    .await
    .expect("punctuated query must not produce a tsquery syntax error");
    assert_eq!(typo.items[0].part.id, named);

    // A query that sanitizes to nothing degrades to a plain listing.
    let blank = PartRepo::search(
        &pool,
        &PartSearchParams {
            q: Some("&&& !!".to_string()),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(blank.total_count, 2);
}

// ---------------------------------------------------------------------------
// Test: Browse ordering follows inventory popularity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_usage_ordering(pool: PgPool) {
    let quiet = seed_part(&pool, "motor", "iFlight", "XING2 2207").await;
    let popular = seed_part(&pool, "motor", "T-Motor", "F80 Pro").await;
    publish(&pool, quiet).await;
    publish(&pool, popular).await;

    for user_id in 1..=3 {
        add_inventory(&pool, user_id, popular).await;
    }
    add_inventory(&pool, 9, quiet).await;

    let page = PartRepo::search(&pool, &public_params()).await.unwrap();
    assert_eq!(page.items[0].part.id, popular);
    assert_eq!(page.items[0].usage_count, 3);
    assert_eq!(page.items[1].part.id, quiet);
    assert_eq!(page.items[1].usage_count, 1);
}

// ---------------------------------------------------------------------------
// Test: Pagination clamps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_pagination(pool: PgPool) {
    for i in 0..5 {
        let id = seed_part(&pool, "antenna", "Lumenier", &format!("AXII {i}")).await;
        publish(&pool, id).await;
    }

    let page = PartRepo::search(
        &pool,
        &PartSearchParams {
            limit: Some(2),
            offset: Some(2),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_count, 5, "total ignores pagination");

    // Out-of-range values clamp instead of erroring.
    let clamped = PartRepo::search(
        &pool,
        &PartSearchParams {
            limit: Some(-5),
            offset: Some(-10),
            ..public_params()
        },
    )
    .await
    .unwrap();
    assert_eq!(clamped.items.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: Admin search defaults to the needs-work view
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_search_needs_work_default(pool: PgPool) {
    let raw = seed_part(&pool, "camera", "Caddx", "Ratel 2").await;
    let finished = seed_part(&pool, "camera", "RunCam", "Phoenix 2").await;

    // Fully curate one part: approved image and description.
    CurationRepo::set_admin_image(&pool, finished, "parts/phoenix.jpg", 1)
        .await
        .unwrap();
    CurationRepo::set_description(&pool, finished, 1, "A solid starlight camera.")
        .await
        .unwrap();

    let page = PartRepo::admin_search(&pool, &AdminSearchParams::default())
        .await
        .unwrap();
    assert!(
        page.items.iter().any(|p| p.part.id == raw),
        "uncurated part belongs in the worklist"
    );
    assert!(
        !page.items.iter().any(|p| p.part.id == finished),
        "fully curated part is done"
    );

    // Any explicit status filter disables the default view.
    let pending = PartRepo::admin_search(
        &pool,
        &AdminSearchParams {
            status: Some("pending".to_string()),
            ..AdminSearchParams::default()
        },
    )
    .await
    .unwrap();
    assert!(pending.items.iter().any(|p| p.part.id == finished));
    assert!(pending.items.iter().all(|p| p.part.status == "pending"));

    // The worklist is oldest-first.
    let ids: Vec<i64> = page.items.iter().map(|p| p.part.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

// ---------------------------------------------------------------------------
// Test: Admin search curation filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_search_curation_filters(pool: PgPool) {
    let scanned = seed_part(&pool, "vtx", "Rush", "Tank Solo").await;
    let bare = seed_part(&pool, "vtx", "HDZero", "Race V3").await;
    CurationRepo::submit_user_image(&pool, scanned, "parts/tank.jpg")
        .await
        .unwrap();

    let review_queue = PartRepo::admin_search(
        &pool,
        &AdminSearchParams {
            image_status: Some("scanned".to_string()),
            ..AdminSearchParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(review_queue.total_count, 1);
    assert_eq!(review_queue.items[0].part.id, scanned);

    let missing = PartRepo::admin_search(
        &pool,
        &AdminSearchParams {
            image_status: Some("missing".to_string()),
            ..AdminSearchParams::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(missing.total_count, 1);
    assert_eq!(missing.items[0].part.id, bare);
}

// ---------------------------------------------------------------------------
// Test: Near-match finds cross-spelling duplicates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_near_match_cross_spelling(pool: PgPool) {
    let stored = seed_part(&pool, "motor", "TMotor", "F80 Pro").await;
    publish(&pool, stored).await;
    // Same gear type, unrelated identity: should not surface.
    let other = seed_part(&pool, "motor", "EMAX", "ECO II 2306").await;
    publish(&pool, other).await;

    let query = NearMatchQuery {
        gear_type: "motor".to_string(),
        brand: "T-Motor".to_string(),
        model: "F80-Pro".to_string(),
        threshold: None,
    };
    let matches = NearMatchRepo::find(&pool, &query, false).await.unwrap();

    let hit = matches
        .iter()
        .find(|m| m.part.id == stored)
        .expect("cross-spelling duplicate should be found");
    assert!(
        hit.score > 0.3,
        "score should clear the default threshold, got {}",
        hit.score
    );
    assert!(
        !matches.iter().any(|m| m.part.id == other),
        "unrelated part should not match"
    );
}

// ---------------------------------------------------------------------------
// Test: Near-match visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_near_match_visibility(pool: PgPool) {
    // Stays pending: visible to admins only.
    let pending = seed_part(&pool, "camera", "RunCam", "Phoenix 2").await;

    let query = NearMatchQuery {
        gear_type: "camera".to_string(),
        brand: "RunCam".to_string(),
        model: "Phoenix 2".to_string(),
        threshold: None,
    };

    let public = NearMatchRepo::find(&pool, &query, false).await.unwrap();
    assert!(
        !public.iter().any(|m| m.part.id == pending),
        "public lookup must not leak unpublished parts"
    );

    let admin = NearMatchRepo::find(&pool, &query, true).await.unwrap();
    assert!(
        admin.iter().any(|m| m.part.id == pending),
        "admin lookup sees unpublished parts"
    );
}

// ---------------------------------------------------------------------------
// Test: Fallback scoring is deterministic
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_near_match_fallback_scoring(pool: PgPool) {
    let exact = seed_part(&pool, "motor", "T-Motor", "F80 Pro").await;
    let brand_differs = seed_part(&pool, "motor", "TMotor Hobby", "F80 Pro").await;
    publish(&pool, exact).await;
    publish(&pool, brand_differs).await;

    let query = NearMatchQuery {
        gear_type: "motor".to_string(),
        brand: "T-Motor".to_string(),
        model: "F80-Pro".to_string(),
        threshold: None,
    };
    let matches = NearMatchRepo::find_fallback(&pool, &query, false)
        .await
        .unwrap();

    let exact_hit = matches.iter().find(|m| m.part.id == exact).unwrap();
    assert!((exact_hit.score - 1.0).abs() < 1e-9);

    let partial_hit = matches.iter().find(|m| m.part.id == brand_differs).unwrap();
    assert!((partial_hit.score - 0.75).abs() < 1e-9);

    // Best match first.
    assert_eq!(matches[0].part.id, exact);
}

// ---------------------------------------------------------------------------
// Test: Catalog stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_stats(pool: PgPool) {
    let published = seed_part(&pool, "camera", "RunCam", "Phoenix 2").await;
    let _pending = seed_part(&pool, "camera", "Caddx", "Ratel 2").await;
    let scanned = seed_part(&pool, "vtx", "Rush", "Tank Solo").await;
    publish(&pool, published).await;
    CurationRepo::submit_user_image(&pool, scanned, "parts/tank.jpg")
        .await
        .unwrap();

    let stats = PartRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total_parts, 3);
    assert_eq!(stats.published_parts, 1);
    assert_eq!(stats.pending_parts, 2);
    assert_eq!(stats.flagged_parts, 0);
    assert_eq!(stats.images_awaiting_review, 1);
    assert_eq!(stats.parts_missing_image, 2);
    assert_eq!(stats.parts_missing_description, 3);
}

// ---------------------------------------------------------------------------
// Test: Delete and bulk delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_bulk_delete(pool: PgPool) {
    let a = seed_part(&pool, "frame", "Source", "One V5").await;
    let b = seed_part(&pool, "frame", "iFlight", "Nazgul5 Frame").await;
    add_inventory(&pool, 11, a).await;

    // Single delete reports whether a row went away.
    assert!(PartRepo::delete(&pool, a).await.unwrap());
    assert!(!PartRepo::delete(&pool, a).await.unwrap());

    // Inventory references survive with the link severed.
    let orphaned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM inventory_items WHERE user_id = 11 AND part_id IS NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphaned, 1, "delete must null out references, not cascade");

    // Bulk delete reports per-id outcomes.
    let outcome = PartRepo::bulk_delete(&pool, &[b, 9999]).await.unwrap();
    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.missing, vec![9999]);
    assert!(outcome.failed.is_empty());

    assert_eq!(PartRepo::usage_count(&pool, b).await.unwrap(), 0);
}
