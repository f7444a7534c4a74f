use anyhow::Result;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::factory::{self, NewCategory};
use crate::store::SeedStore;

/// The fixed catalog every deployment starts from.
pub const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Technology", "Latest technology trends, programming, and software development"),
    ("Health & Fitness", "Health tips, fitness routines, and wellness advice"),
    ("Travel", "Travel guides, destinations, and adventure stories"),
    ("Food & Cooking", "Recipes, cooking tips, and food reviews"),
    ("Business", "Business news, entrepreneurship, and career advice"),
    ("Sports", "Sports news, updates, and analysis"),
    ("Entertainment", "Movies, music, games, and entertainment news"),
    ("Education", "Learning resources, tutorials, and educational content"),
];

const RANDOM_CATEGORIES: usize = 2;

/// Inserts the 8 predefined categories plus 2 randomly generated ones.
/// Every invocation inserts 10 fresh rows; rerunning duplicates the catalog.
pub fn run(store: &impl SeedStore, rng: &mut impl Rng) -> Result<()> {
    for (name, description) in DEFAULT_CATEGORIES {
        let category = NewCategory {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
        };
        store.insert_category(&category)?;
    }

    for _ in 0..RANDOM_CATEGORIES {
        store.insert_category(&factory::category(rng))?;
    }

    info!(
        "Seeded {} categories ({} predefined, {} random)",
        DEFAULT_CATEGORIES.len() + RANDOM_CATEGORIES,
        DEFAULT_CATEGORIES.len(),
        RANDOM_CATEGORIES
    );
    Ok(())
}
