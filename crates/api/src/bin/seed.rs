//! Inserts approved test profiles into the configured database.
//!
//! Usage: `maknoon-seed [PROFILES_PER_GENDER]` (default 5).

use anyhow::{Context, Result};
use maknoon_api::{config, middleware, services};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);

    let per_gender = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("Invalid profile count: {}", arg))?,
        None => services::DEFAULT_PROFILES_PER_GENDER,
    };

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config).await?;

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;

    info!(per_gender, "Seeding approved test profiles");
    let profiles = services::seed_test_profiles(&pool, per_gender).await?;

    for profile in &profiles {
        println!(
            "{}  {:?}  {}",
            profile.id,
            profile.submission.gender,
            profile.submission.name.as_deref().unwrap_or_default()
        );
    }
    info!(count = profiles.len(), "Seed finished");
    Ok(())
}
