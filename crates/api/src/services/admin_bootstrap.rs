//! Startup admin provisioning.
//!
//! Profiles for the identity ids listed in `admin.bootstrap_user_ids` are
//! created or promoted to the admin role. Nothing else in the service writes
//! the role column.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::AdminConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Grants the admin role to every configured id in one transaction.
///
/// Idempotent: running it again with the same ids changes nothing. Returns
/// the number of ids processed.
pub async fn bootstrap_admins(pool: &PgPool, config: &AdminConfig) -> Result<usize, BootstrapError> {
    let ids = dedup(&config.bootstrap_user_ids);
    if ids.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for id in &ids {
        sqlx::query(
            r#"
            INSERT INTO user_profile (id, role)
            VALUES ($1, 'admin')
            ON CONFLICT (id) DO UPDATE SET role = 'admin'
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(count = ids.len(), "Bootstrap admin roles applied");
    Ok(ids.len())
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
