//! Repository for the `services` table.

use proposer_core::types::DbId;
use sqlx::PgPool;

use crate::models::service::{CreateService, Service, UpsertService};

const COLUMNS: &str = "id, name, title, display_order, created_at, updated_at";

/// Unique constraint on `services.title` (checked at commit).
pub const UQ_TITLE: &str = "uq_services_title";

/// Provides CRUD and transactional bulk upsert for the service catalog.
pub struct ServiceRepo;

impl ServiceRepo {
    /// List all services in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services ORDER BY display_order ASC, id ASC");
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }

    /// Find a service by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a single service, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateService) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (name, title, display_order)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.name)
            .bind(&input.title)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Upsert every entry of `services` in one transaction.
    ///
    /// Entries with an `id` overwrite all fields of that row, or insert it
    /// under that id when absent. Entries without an `id` are inserted
    /// afterwards with fresh ids, whatever their position in the payload.
    /// Rows not mentioned are left untouched. If any statement (or the
    /// deferred title check at commit) fails, nothing is written.
    ///
    /// Returns the number of entries written.
    pub async fn replace_all(
        pool: &PgPool,
        services: &[UpsertService],
    ) -> Result<usize, sqlx::Error> {
        let (explicit, fresh): (Vec<&UpsertService>, Vec<&UpsertService>) =
            services.iter().partition(|s| s.id.is_some());

        let mut tx = pool.begin().await?;

        for service in &explicit {
            sqlx::query(
                "INSERT INTO services (id, name, title, display_order)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    title = EXCLUDED.title,
                    display_order = EXCLUDED.display_order",
            )
            .bind(service.id)
            .bind(&service.name)
            .bind(&service.title)
            .bind(service.display_order)
            .execute(&mut *tx)
            .await?;
        }

        // Explicit ids bypass the sequence; move it past them before any
        // id-less insert draws from it.
        if !explicit.is_empty() {
            sqlx::query(
                "SELECT setval(pg_get_serial_sequence('services', 'id'),
                               GREATEST((SELECT MAX(id) FROM services), 1))",
            )
            .execute(&mut *tx)
            .await?;
        }

        for service in &fresh {
            sqlx::query("INSERT INTO services (name, title, display_order) VALUES ($1, $2, $3)")
                .bind(&service.name)
                .bind(&service.title)
                .bind(service.display_order)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            explicit = explicit.len(),
            inserted = fresh.len(),
            "Service catalog replaced"
        );
        Ok(services.len())
    }

    /// Delete a service. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of catalog entries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Display position just after the current last entry.
    pub async fn next_display_order(pool: &PgPool) -> Result<i32, sqlx::Error> {
        let (next,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(display_order), 0) + 1 FROM services")
                .fetch_one(pool)
                .await?;
        Ok(next)
    }
}
