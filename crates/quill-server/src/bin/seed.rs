//! Seeding driver. Populates the configured database with the category
//! catalog and randomized users/posts:
//!
//! ```bash
//! QUILL_DB_PATH=quill.db cargo run --bin seed
//! ```
//!
//! Category seeding runs first; the post seeder depends on categories and
//! users existing (and synthesizes them against an empty store). Reruns
//! append a fresh batch rather than deduplicating.

use std::path::PathBuf;

use tracing::info;

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info".into()),
        )
        .init();

    let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
    let db = quill_db::Database::open(&PathBuf::from(&db_path))?;

    let mut rng = rand::rng();

    // Posts depend on categories, so order matters
    quill_seed::categories::run(&db, &mut rng)?;
    quill_seed::posts::run(&db, &mut rng)?;

    info!("Seeding complete, {} posts in store", db.count_posts()?);
    Ok(())
}
