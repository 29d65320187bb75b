//! Repository for catalog part identity, search, and admin maintenance.

use rotorbase_core::types::DbId;
use rotorbase_core::{canonical, gear, search, CoreError};
use sqlx::PgPool;

use crate::error::{is_unique_violation, DbError};
use crate::models::part::{
    AdminSearchParams, BulkDeleteOutcome, CatalogPart, CatalogStats, CreatePart, PartSearchParams,
    PartWithUsage, SearchPage, UpdatePart, PART_COLUMNS,
};

/// Unique constraint guarding one row per canonical key.
const KEY_CONSTRAINT: &str = "uq_catalog_parts_canonical_key";

/// Scalar subquery computing the derived inventory usage count.
const USAGE_COUNT: &str =
    "(SELECT COUNT(*) FROM inventory_items ii WHERE ii.part_id = catalog_parts.id)";

/// Provides CRUD, identity resolution, and search for catalog parts.
pub struct PartRepo;

impl PartRepo {
    /// Exact canonical-key lookup. Also the recovery path when an insert
    /// loses the duplicate-submission race.
    pub async fn find_by_key(
        pool: &PgPool,
        canonical_key: &str,
    ) -> Result<Option<PartWithUsage>, sqlx::Error> {
        let query = format!(
            "SELECT {PART_COLUMNS}, {USAGE_COUNT} AS usage_count \
             FROM catalog_parts WHERE canonical_key = $1"
        );
        sqlx::query_as::<_, PartWithUsage>(&query)
            .bind(canonical_key)
            .fetch_optional(pool)
            .await
    }

    /// Find a part by its internal ID, with usage count.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PartWithUsage>, sqlx::Error> {
        let query = format!(
            "SELECT {PART_COLUMNS}, {USAGE_COUNT} AS usage_count \
             FROM catalog_parts WHERE id = $1"
        );
        sqlx::query_as::<_, PartWithUsage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of inventory rows referencing this part.
    pub async fn usage_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE part_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Create a part, or return the existing row for an equivalent identity.
    ///
    /// Returns `(part, existing)` where `existing` is `true` when the
    /// submission merged into a pre-existing row. Concurrency is optimistic:
    /// no lock is taken, and an insert that loses a race to an equivalent
    /// concurrent submission recovers by re-reading the winner. Only if that
    /// re-read finds nothing is the original insert error surfaced.
    pub async fn create_or_get(
        pool: &PgPool,
        input: &CreatePart,
        source: &str,
        created_by: Option<DbId>,
    ) -> Result<(PartWithUsage, bool), DbError> {
        gear::validate_gear_type(&input.gear_type)?;
        gear::validate_source(source)?;
        canonical::validate_identity(&input.brand, &input.model)?;
        if let Some(msrp_cents) = input.msrp_cents {
            gear::validate_msrp_cents(msrp_cents)?;
        }

        let variant = input
            .variant
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let canonical_key =
            canonical::build_key(&input.gear_type, &input.brand, &input.model, variant);

        if let Some(existing) = Self::find_by_key(pool, &canonical_key).await? {
            return Ok((existing, true));
        }

        let specs = input
            .specs
            .clone()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let insert_query = format!(
            "INSERT INTO catalog_parts \
                (gear_type, brand, model, variant, canonical_key, specs, best_for, \
                 msrp_cents, source, created_by, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {PART_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, CatalogPart>(&insert_query)
            .bind(&input.gear_type)
            .bind(input.brand.trim())
            .bind(input.model.trim())
            .bind(variant)
            .bind(&canonical_key)
            .bind(&specs)
            .bind(&input.best_for)
            .bind(input.msrp_cents)
            .bind(source)
            .bind(created_by)
            .bind(description)
            .fetch_one(pool)
            .await;

        match inserted {
            Ok(part) => Ok((
                PartWithUsage {
                    part,
                    usage_count: 0,
                },
                false,
            )),
            Err(err) if is_unique_violation(&err, KEY_CONSTRAINT) => {
                // Lost the race to an equivalent concurrent submission;
                // adopt the winning row.
                match Self::find_by_key(pool, &canonical_key).await? {
                    Some(existing) => Ok((existing, true)),
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Public catalog search: published parts only.
    ///
    /// With a free-text query, results are relevance-ranked; otherwise they
    /// are ordered by inventory popularity, then brand and model.
    pub async fn search(
        pool: &PgPool,
        params: &PartSearchParams,
    ) -> Result<SearchPage, sqlx::Error> {
        let limit = search::clamp_limit(
            params.limit,
            search::DEFAULT_SEARCH_LIMIT,
            search::MAX_SEARCH_LIMIT,
        );
        let offset = search::clamp_offset(params.offset);
        let tsquery = params.q.as_deref().and_then(search::build_tsquery);

        let order_by = if tsquery.is_some() {
            "ts_rank(search_vector, to_tsquery('english', $3)) DESC, \
             usage_count DESC, brand ASC, model ASC"
        } else {
            "usage_count DESC, brand ASC, model ASC"
        };

        let query = format!(
            "SELECT {PART_COLUMNS}, {USAGE_COUNT} AS usage_count \
             FROM catalog_parts \
             WHERE status = 'published' \
               AND ($1::text IS NULL OR gear_type = $1) \
               AND ($2::text IS NULL OR lower(brand) = lower($2)) \
               AND ($3::text IS NULL OR search_vector @@ to_tsquery('english', $3)) \
             ORDER BY {order_by} \
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, PartWithUsage>(&query)
            .bind(&params.gear_type)
            .bind(&params.brand)
            .bind(&tsquery)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM catalog_parts \
             WHERE status = 'published' \
               AND ($1::text IS NULL OR gear_type = $1) \
               AND ($2::text IS NULL OR lower(brand) = lower($2)) \
               AND ($3::text IS NULL OR search_vector @@ to_tsquery('english', $3))",
        )
        .bind(&params.gear_type)
        .bind(&params.brand)
        .bind(&tsquery)
        .fetch_one(pool)
        .await?;

        Ok(SearchPage { items, total_count })
    }

    /// Admin search: no status restriction.
    ///
    /// Without any explicit status / image-status / description-status
    /// filter this defaults to the review worklist: parts whose image is
    /// not yet approved or whose description is missing, oldest first.
    pub async fn admin_search(
        pool: &PgPool,
        params: &AdminSearchParams,
    ) -> Result<SearchPage, sqlx::Error> {
        let limit = search::clamp_limit(
            params.limit,
            search::DEFAULT_SEARCH_LIMIT,
            search::MAX_SEARCH_LIMIT,
        );
        let offset = search::clamp_offset(params.offset);
        let tsquery = params.q.as_deref().and_then(search::build_tsquery);
        let needs_work_default = params.status.is_none()
            && params.image_status.is_none()
            && params.description_status.is_none();

        let order_by = if tsquery.is_some() {
            "ts_rank(search_vector, to_tsquery('english', $3)) DESC, created_at ASC, id ASC"
        } else {
            "created_at ASC, id ASC"
        };

        let conditions = "($1::text IS NULL OR gear_type = $1) \
               AND ($2::text IS NULL OR lower(brand) = lower($2)) \
               AND ($3::text IS NULL OR search_vector @@ to_tsquery('english', $3)) \
               AND ($4::text IS NULL OR status = $4) \
               AND ($5::text IS NULL OR image_status = $5) \
               AND ($6::text IS NULL OR description_status = $6) \
               AND (NOT $7::bool OR image_status <> 'approved' OR description_status = 'missing')";

        let query = format!(
            "SELECT {PART_COLUMNS}, {USAGE_COUNT} AS usage_count \
             FROM catalog_parts \
             WHERE {conditions} \
             ORDER BY {order_by} \
             LIMIT $8 OFFSET $9"
        );
        let items = sqlx::query_as::<_, PartWithUsage>(&query)
            .bind(&params.gear_type)
            .bind(&params.brand)
            .bind(&tsquery)
            .bind(&params.status)
            .bind(&params.image_status)
            .bind(&params.description_status)
            .bind(needs_work_default)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM catalog_parts WHERE {conditions}");
        let total_count = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(&params.gear_type)
            .bind(&params.brand)
            .bind(&tsquery)
            .bind(&params.status)
            .bind(&params.image_status)
            .bind(&params.description_status)
            .bind(needs_work_default)
            .fetch_one(pool)
            .await?;

        Ok(SearchPage { items, total_count })
    }

    /// Admin metadata update.
    ///
    /// Identity edits (gear type, brand, model, variant) recompute the
    /// canonical key; a key already owned by another part rejects the whole
    /// update with [`CoreError::KeyConflict`] and mutates nothing. The
    /// collision pre-check is deliberately unlocked (admin renames are
    /// rare); the unique index backstops the remaining race and that
    /// violation is translated to the same error.
    ///
    /// Setting `status = published` while the image is scanned promotes the
    /// image to approved in the same statement, stamping `admin_id` as
    /// curator: publishing is an implicit final review.
    pub async fn admin_update(
        pool: &PgPool,
        id: DbId,
        patch: &UpdatePart,
        admin_id: DbId,
    ) -> Result<CatalogPart, DbError> {
        if let Some(ref gear_type) = patch.gear_type {
            gear::validate_gear_type(gear_type)?;
        }
        if let Some(ref status) = patch.status {
            gear::validate_status(status)?;
        }
        if let Some(msrp_cents) = patch.msrp_cents {
            gear::validate_msrp_cents(msrp_cents)?;
        }

        let fetch_query = format!("SELECT {PART_COLUMNS} FROM catalog_parts WHERE id = $1");
        let Some(current) = sqlx::query_as::<_, CatalogPart>(&fetch_query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Err(CoreError::NotFound {
                entity: "catalog_parts",
                id,
            }
            .into());
        };

        let gear_type = patch.gear_type.as_deref().unwrap_or(&current.gear_type);
        let brand = patch
            .brand
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.brand);
        let model = patch
            .model
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.model);
        // A blank patched variant clears the field; an absent one keeps it.
        let variant = match patch.variant.as_deref() {
            Some(v) => {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            }
            None => current.variant.as_deref(),
        };

        let identity_changed = patch.gear_type.is_some()
            || patch.brand.is_some()
            || patch.model.is_some()
            || patch.variant.is_some();

        let canonical_key = if identity_changed {
            canonical::validate_identity(brand, model)?;
            canonical::build_key(gear_type, brand, model, variant)
        } else {
            current.canonical_key.clone()
        };

        if canonical_key != current.canonical_key {
            let holder = sqlx::query_scalar::<_, DbId>(
                "SELECT id FROM catalog_parts WHERE canonical_key = $1 AND id <> $2",
            )
            .bind(&canonical_key)
            .bind(id)
            .fetch_optional(pool)
            .await?;
            if let Some(existing_id) = holder {
                return Err(CoreError::KeyConflict {
                    key: canonical_key,
                    existing_id,
                }
                .into());
            }
        }

        let update_query = format!(
            "UPDATE catalog_parts SET \
                gear_type = $2, \
                brand = $3, \
                model = $4, \
                variant = $5, \
                canonical_key = $6, \
                specs = COALESCE($7, specs), \
                best_for = COALESCE($8, best_for), \
                msrp_cents = COALESCE($9, msrp_cents), \
                status = COALESCE($10, status), \
                image_status = CASE \
                    WHEN $10::text = 'published' AND image_status = 'scanned' \
                    THEN 'approved' ELSE image_status END, \
                image_curated_by = CASE \
                    WHEN $10::text = 'published' AND image_status = 'scanned' \
                    THEN $11 ELSE image_curated_by END, \
                image_curated_at = CASE \
                    WHEN $10::text = 'published' AND image_status = 'scanned' \
                    THEN NOW() ELSE image_curated_at END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .bind(gear_type)
            .bind(brand)
            .bind(model)
            .bind(variant)
            .bind(&canonical_key)
            .bind(&patch.specs)
            .bind(&patch.best_for)
            .bind(patch.msrp_cents)
            .bind(&patch.status)
            .bind(admin_id)
            .fetch_optional(pool)
            .await;

        match updated {
            Ok(Some(part)) => Ok(part),
            Ok(None) => Err(CoreError::NotFound {
                entity: "catalog_parts",
                id,
            }
            .into()),
            Err(err) if is_unique_violation(&err, KEY_CONSTRAINT) => {
                // A concurrent rename landed on this key between the
                // pre-check and the write.
                let holder = sqlx::query_scalar::<_, DbId>(
                    "SELECT id FROM catalog_parts WHERE canonical_key = $1 AND id <> $2",
                )
                .bind(&canonical_key)
                .bind(id)
                .fetch_optional(pool)
                .await?;
                match holder {
                    Some(existing_id) => Err(CoreError::KeyConflict {
                        key: canonical_key,
                        existing_id,
                    }
                    .into()),
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Permanently delete a part. Inventory references are nulled by the
    /// `ON DELETE SET NULL` foreign key, not cascaded.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM catalog_parts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete many parts, each id independently.
    ///
    /// A failure on one id never aborts the rest; the outcome reports what
    /// actually happened per id instead of pretending the batch is atomic.
    pub async fn bulk_delete(pool: &PgPool, ids: &[DbId]) -> Result<BulkDeleteOutcome, DbError> {
        let mut outcome = BulkDeleteOutcome {
            deleted: 0,
            missing: Vec::new(),
            failed: Vec::new(),
        };

        for &id in ids {
            match Self::delete(pool, id).await {
                Ok(true) => outcome.deleted += 1,
                Ok(false) => outcome.missing.push(id),
                Err(err) => {
                    tracing::warn!(part_id = id, error = %err, "bulk delete: id failed");
                    outcome.failed.push(id);
                }
            }
        }

        Ok(outcome)
    }

    /// Catalog-wide curation counts for the admin dashboard.
    pub async fn stats(pool: &PgPool) -> Result<CatalogStats, sqlx::Error> {
        sqlx::query_as::<_, CatalogStats>(
            "SELECT \
                COUNT(*) AS total_parts, \
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_parts, \
                COUNT(*) FILTER (WHERE status = 'published') AS published_parts, \
                COUNT(*) FILTER (WHERE status = 'flagged') AS flagged_parts, \
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_parts, \
                COUNT(*) FILTER (WHERE image_status = 'scanned') AS images_awaiting_review, \
                COUNT(*) FILTER (WHERE image_status = 'missing') AS parts_missing_image, \
                COUNT(*) FILTER (WHERE description_status = 'missing') AS parts_missing_description \
             FROM catalog_parts",
        )
        .fetch_one(pool)
        .await
    }
}
