//! Near-duplicate detection for incoming part submissions.
//!
//! The primary path scores candidates with `pg_trgm` trigram similarity
//! against the generated `match_name` column. The extension is optional at
//! the database level (the migration installs it only when permitted), so
//! every lookup probes `pg_catalog` first and falls back to a heuristic
//! brand/model scorer when trigram support is absent. Both paths honor the
//! same visibility rule: public callers only see published parts.

use rotorbase_core::{canonical, gear, search};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::part::{CatalogPart, NearMatch, NearMatchQuery, PART_COLUMNS};

/// Finds existing parts that likely refer to the same product.
pub struct NearMatchRepo;

impl NearMatchRepo {
    /// Find near matches for a prospective submission.
    ///
    /// `include_unpublished` widens visibility to every catalog status and
    /// is reserved for admin callers. Results are capped at
    /// [`search::NEAR_MATCH_LIMIT`] and sorted best-first.
    pub async fn find(
        pool: &PgPool,
        query: &NearMatchQuery,
        include_unpublished: bool,
    ) -> Result<Vec<NearMatch>, DbError> {
        gear::validate_gear_type(&query.gear_type)?;
        canonical::validate_identity(&query.brand, &query.model)?;
        let threshold = query
            .threshold
            .unwrap_or(search::DEFAULT_NEAR_MATCH_THRESHOLD);
        search::validate_threshold(threshold)?;

        let matches = if Self::trgm_available(pool).await? {
            Self::find_trgm(pool, query, include_unpublished, threshold).await?
        } else {
            Self::find_fallback(pool, query, include_unpublished).await?
        };
        Ok(matches)
    }

    /// Whether the `pg_trgm` extension is installed in this database.
    pub async fn trgm_available(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'pg_trgm')",
        )
        .fetch_one(pool)
        .await
    }

    /// Trigram-scored lookup. Requires `pg_trgm`.
    ///
    /// Similarity runs over `match_name` (normalized brand + model). Exact
    /// brand and model-substring candidates are kept even below the
    /// threshold so a very short model name cannot hide an obvious double.
    pub async fn find_trgm(
        pool: &PgPool,
        query: &NearMatchQuery,
        include_unpublished: bool,
        threshold: f64,
    ) -> Result<Vec<NearMatch>, sqlx::Error> {
        let needle = canonical::match_name(&query.brand, &query.model);
        let norm_brand = canonical::normalize(&query.brand);
        let norm_model = canonical::normalize(&query.model);

        let sql = format!(
            "SELECT {PART_COLUMNS}, similarity(match_name, $1)::float8 AS score \
             FROM catalog_parts \
             WHERE gear_type = $2 \
               AND ($6::bool OR status = 'published') \
               AND (similarity(match_name, $1) >= $3 \
                    OR split_part(canonical_key, '|', 2) = $4 \
                    OR split_part(canonical_key, '|', 3) LIKE '%' || $5 || '%') \
             ORDER BY score DESC, id ASC \
             LIMIT {limit}",
            limit = search::NEAR_MATCH_LIMIT
        );
        sqlx::query_as::<_, NearMatch>(&sql)
            .bind(&needle)
            .bind(&query.gear_type)
            .bind(threshold)
            .bind(&norm_brand)
            .bind(&norm_model)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await
    }

    /// Heuristic lookup for databases without `pg_trgm`.
    ///
    /// Candidates share the gear type and match on exact normalized brand
    /// or model substring; scoring happens in Rust via
    /// [`search::fallback_score`]. Normalized text is plain `[a-z0-9 ]`, so
    /// interpolating it into the LIKE pattern is safe.
    pub async fn find_fallback(
        pool: &PgPool,
        query: &NearMatchQuery,
        include_unpublished: bool,
    ) -> Result<Vec<NearMatch>, sqlx::Error> {
        let norm_brand = canonical::normalize(&query.brand);
        let norm_model = canonical::normalize(&query.model);

        let sql = format!(
            "SELECT {PART_COLUMNS} \
             FROM catalog_parts \
             WHERE gear_type = $1 \
               AND ($4::bool OR status = 'published') \
               AND (split_part(canonical_key, '|', 2) = $2 \
                    OR split_part(canonical_key, '|', 3) LIKE '%' || $3 || '%')"
        );
        let candidates = sqlx::query_as::<_, CatalogPart>(&sql)
            .bind(&query.gear_type)
            .bind(&norm_brand)
            .bind(&norm_model)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await?;

        let mut matches: Vec<NearMatch> = candidates
            .into_iter()
            .map(|part| {
                let score =
                    search::fallback_score(&part.brand, &part.model, &query.brand, &query.model);
                NearMatch { part, score }
            })
            .collect();
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.part.id.cmp(&b.part.id))
        });
        matches.truncate(search::NEAR_MATCH_LIMIT as usize);
        Ok(matches)
    }
}
