//! First-run admin account.

use influx_core::validation::normalize_email;
use influx_db::models::admin::CreateAdmin;
use influx_db::repositories::AdminRepo;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin when the `admins` table is empty.
///
/// Returns `true` if an admin was created.
pub async fn ensure_admin(pool: &sqlx::PgPool, bootstrap: &AdminBootstrap) -> AppResult<bool> {
    if AdminRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    let email = normalize_email(&bootstrap.email)?;
    validate_password_strength(&bootstrap.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;
    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            name: bootstrap.name.clone(),
            email,
            password_hash,
        },
    )
    .await?;
    tracing::info!(admin_id = admin.id, "Bootstrap admin created");
    Ok(true)
}
