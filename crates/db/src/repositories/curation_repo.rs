//! Repository for the part image and description curation lifecycle.
//!
//! Images move `missing -> scanned -> approved`. Contributor uploads land at
//! `scanned` and wait for review; only admins reach `approved`. Descriptions
//! have no intermediate state: they are `missing` until an admin writes one.

use rotorbase_core::curation::{self, IMAGE_APPROVED};
use rotorbase_core::types::DbId;
use rotorbase_core::CoreError;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::part::{CatalogPart, PART_COLUMNS};

/// State transitions for part imagery and descriptions.
pub struct CurationRepo;

impl CurationRepo {
    /// Record a contributor-submitted image, resetting review state.
    ///
    /// Replacing a not-yet-approved image is allowed and clears any stale
    /// curator stamp. A part whose image is already approved is frozen for
    /// contributors and rejects the submission with
    /// [`CoreError::AlreadyCurated`]. The row is locked for the check so a
    /// concurrent approval cannot slip between read and write.
    pub async fn submit_user_image(
        pool: &PgPool,
        id: DbId,
        image_key: &str,
    ) -> Result<CatalogPart, DbError> {
        curation::validate_image_key(image_key)?;

        let mut tx = pool.begin().await?;

        let fetch_query =
            format!("SELECT {PART_COLUMNS} FROM catalog_parts WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, CatalogPart>(&fetch_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Err(CoreError::NotFound {
                entity: "catalog_parts",
                id,
            }
            .into());
        };

        if current.image_status == IMAGE_APPROVED {
            // Dropping the transaction rolls back the lock untouched.
            return Err(CoreError::AlreadyCurated { id }.into());
        }

        let update_query = format!(
            "UPDATE catalog_parts SET \
                image_key = $2, \
                image_status = 'scanned', \
                image_curated_by = NULL, \
                image_curated_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .bind(image_key.trim())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Approve the part's current image, stamping the reviewing admin.
    ///
    /// Approving an already-approved image is a no-op that keeps the
    /// original curator stamp. A part with no image at all cannot be
    /// approved and returns [`CoreError::ImageMissing`].
    pub async fn approve_image(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<CatalogPart, DbError> {
        let update_query = format!(
            "UPDATE catalog_parts SET \
                image_status = 'approved', \
                image_curated_by = $2, \
                image_curated_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 AND image_key IS NOT NULL AND image_status <> 'approved' \
             RETURNING {PART_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .bind(admin_id)
            .fetch_optional(pool)
            .await?;
        if let Some(part) = updated {
            return Ok(part);
        }

        // The guarded update matched nothing: missing row, missing image,
        // or already approved. Re-read to tell them apart.
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
        if current.image_key.is_none() {
            return Err(CoreError::ImageMissing { id }.into());
        }
        Ok(current)
    }

    /// Admin-provided image: attach and approve in one step.
    pub async fn set_admin_image(
        pool: &PgPool,
        id: DbId,
        image_key: &str,
        admin_id: DbId,
    ) -> Result<CatalogPart, DbError> {
        curation::validate_image_key(image_key)?;

        let update_query = format!(
            "UPDATE catalog_parts SET \
                image_key = $2, \
                image_status = 'approved', \
                image_curated_by = $3, \
                image_curated_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .bind(image_key.trim())
            .bind(admin_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "catalog_parts",
                    id,
                }
                .into()
            })
    }

    /// Remove the part's image entirely, returning it to `missing`.
    pub async fn clear_image(pool: &PgPool, id: DbId) -> Result<CatalogPart, DbError> {
        let update_query = format!(
            "UPDATE catalog_parts SET \
                image_key = NULL, \
                image_status = 'missing', \
                image_curated_by = NULL, \
                image_curated_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "catalog_parts",
                    id,
                }
                .into()
            })
    }

    /// Write an admin-curated description. Descriptions are approved the
    /// moment an admin sets them.
    pub async fn set_description(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
        description: &str,
    ) -> Result<CatalogPart, DbError> {
        curation::validate_description(description)?;

        let update_query = format!(
            "UPDATE catalog_parts SET \
                description = $2, \
                description_status = 'approved', \
                description_curated_by = $3, \
                description_curated_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .bind(description.trim())
            .bind(admin_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "catalog_parts",
                    id,
                }
                .into()
            })
    }

    /// Remove the description, returning it to `missing`.
    pub async fn clear_description(pool: &PgPool, id: DbId) -> Result<CatalogPart, DbError> {
        let update_query = format!(
            "UPDATE catalog_parts SET \
                description = NULL, \
                description_status = 'missing', \
                description_curated_by = NULL, \
                description_curated_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, CatalogPart>(&update_query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "catalog_parts",
                    id,
                }
                .into()
            })
    }
}
