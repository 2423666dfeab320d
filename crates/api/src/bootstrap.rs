//! First-start seeding.
//!
//! Each step only writes when its target is missing or empty, so running
//! the bootstrap on every start is safe.

use proposer_core::accounts::RESERVED_ADMIN_USERNAME;
use proposer_core::form_structure::initial_structure;
use proposer_core::service_catalog::DEFAULT_SERVICES;
use proposer_db::models::service::CreateService;
use proposer_db::models::user::CreateUser;
use proposer_db::repositories::{FormStructureRepo, ServiceRepo, UserRepo};
use proposer_db::DbPool;

use crate::auth::password::{hash_password_blocking, PasswordError};
use crate::config::ServerConfig;

/// Email given to the bootstrap administrator.
pub const ADMIN_BOOTSTRAP_EMAIL: &str = "admin@localhost";

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error during bootstrap: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// What a bootstrap run created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub admin_created: bool,
    pub form_structure_seeded: bool,
    pub services_seeded: usize,
}

/// Seed the admin account, the initial form structure, and the default
/// service catalog where each is absent.
pub async fn run(pool: &DbPool, config: &ServerConfig) -> Result<BootstrapReport, BootstrapError> {
    let report = BootstrapReport {
        admin_created: ensure_admin_account(pool, config).await?,
        form_structure_seeded: ensure_form_structure(pool).await?,
        services_seeded: ensure_service_catalog(pool).await?,
    };

    tracing::info!(
        admin_created = report.admin_created,
        form_structure_seeded = report.form_structure_seeded,
        services_seeded = report.services_seeded,
        "Bootstrap complete"
    );
    Ok(report)
}

async fn ensure_admin_account(
    pool: &DbPool,
    config: &ServerConfig,
) -> Result<bool, BootstrapError> {
    if UserRepo::find_by_username(pool, RESERVED_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let password_hash =
        hash_password_blocking(config.admin_bootstrap_password.clone(), config.password).await?;
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: RESERVED_ADMIN_USERNAME.to_string(),
            email: Some(ADMIN_BOOTSTRAP_EMAIL.to_string()),
            password_hash,
            is_admin: true,
        },
    )
    .await?;

    tracing::warn!(
        user_id = admin.id,
        "Created bootstrap admin account; change its password"
    );
    Ok(true)
}

async fn ensure_form_structure(pool: &DbPool) -> Result<bool, BootstrapError> {
    if FormStructureRepo::count(pool).await? > 0 {
        return Ok(false);
    }
    FormStructureRepo::insert(pool, &initial_structure()).await?;
    Ok(true)
}

async fn ensure_service_catalog(pool: &DbPool) -> Result<usize, BootstrapError> {
    if ServiceRepo::count(pool).await? > 0 {
        return Ok(0);
    }
    for (index, (name, title)) in DEFAULT_SERVICES.iter().enumerate() {
        ServiceRepo::create(
            pool,
            &CreateService {
                name: name.to_string(),
                title: title.to_string(),
                display_order: index as i32 + 1,
            },
        )
        .await?;
    }
    Ok(DEFAULT_SERVICES.len())
}
