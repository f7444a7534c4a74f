use anyhow::{Result, anyhow};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use crate::factory;
use crate::store::SeedStore;

/// How many users/categories are synthesized when the store has none.
const SYNTH_USERS: usize = 5;
const SYNTH_CATEGORIES: usize = 5;

/// Unattributed filler posts created after the per-author batches.
const FILLER_POSTS: usize = 20;

/// Every synthesized user gets this password, hashed once per run.
const SEED_USER_PASSWORD: &str = "password";

/// Populates posts for every user in the store. Runs in three steps:
/// repair missing seed data, write one randomly-sized batch of posts per
/// author, then top up with unattributed filler posts.
pub fn run(store: &impl SeedStore, rng: &mut impl Rng) -> Result<()> {
    let (user_ids, category_ids) = ensure_seed_data(store, rng)?;

    if category_ids.is_empty() {
        return Err(anyhow!("post seeding requires at least one category"));
    }

    let batched = seed_author_batches(store, rng, &user_ids, &category_ids)?;
    seed_filler_posts(store, rng, &user_ids, &category_ids)?;

    info!(
        "Seeded {} posts ({} across {} authors, {} filler)",
        batched + FILLER_POSTS,
        batched,
        user_ids.len(),
        FILLER_POSTS
    );
    Ok(())
}

/// Precondition repair: posts need authors and categories to attach to.
/// Against an empty store this synthesizes 5 of each before any post is
/// written — a side effect callers should be aware of.
pub fn ensure_seed_data(
    store: &impl SeedStore,
    rng: &mut impl Rng,
) -> Result<(Vec<String>, Vec<String>)> {
    let mut user_ids = store.user_ids()?;
    let mut category_ids = store.category_ids()?;

    if user_ids.is_empty() {
        // One hash shared by the batch; hashing per user makes reseeding slow
        let password_hash = seed_password_hash()?;
        for _ in 0..SYNTH_USERS {
            let user = factory::user(rng, &password_hash);
            user_ids.push(store.insert_user(&user)?);
        }
        info!("No users found, synthesized {}", SYNTH_USERS);
    }

    if category_ids.is_empty() {
        for _ in 0..SYNTH_CATEGORIES {
            category_ids.push(store.insert_category(&factory::category(rng))?);
        }
        info!("No categories found, synthesized {}", SYNTH_CATEGORIES);
    }

    Ok((user_ids, category_ids))
}

/// For each author: draw a batch size in [2,5] and a single category for
/// the whole batch, then insert that many posts. Returns the total count.
fn seed_author_batches(
    store: &impl SeedStore,
    rng: &mut impl Rng,
    user_ids: &[String],
    category_ids: &[String],
) -> Result<usize> {
    let mut total = 0;
    for user_id in user_ids {
        let count = rng.random_range(2..=5);
        let category_id = pick(category_ids, rng)?;
        for _ in 0..count {
            store.insert_post(&factory::post(rng, user_id, category_id))?;
        }
        total += count;
    }
    Ok(total)
}

/// Filler posts with no fixed attribution: author and category are drawn
/// independently per post from the full existing sets.
fn seed_filler_posts(
    store: &impl SeedStore,
    rng: &mut impl Rng,
    user_ids: &[String],
    category_ids: &[String],
) -> Result<()> {
    for _ in 0..FILLER_POSTS {
        let user_id = pick(user_ids, rng)?;
        let category_id = pick(category_ids, rng)?;
        store.insert_post(&factory::post(rng, user_id, category_id))?;
    }
    Ok(())
}

fn pick<'a>(ids: &'a [String], rng: &mut impl Rng) -> Result<&'a str> {
    ids.choose(rng)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("random selection from an empty id set"))
}

fn seed_password_hash() -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(SEED_USER_PASSWORD.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hash failed: {}", e))?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_db::Database;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};
    use uuid::Uuid;

    fn add_user(db: &Database, username: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, username, &format!("{}@example.com", username), "hash")
            .unwrap();
        id
    }

    fn add_category(db: &Database, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.insert_category(&id, name, "a category").unwrap();
        id
    }

    #[test]
    fn empty_store_is_repaired_before_posting() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        run(&db, &mut rng).unwrap();

        let users = db.list_users().unwrap();
        let categories = db.list_categories().unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(categories.len(), 5);

        // 5 authors at 2..=5 posts each, plus 20 filler
        let posts = db.count_posts().unwrap();
        assert!((30..=45).contains(&posts), "unexpected post count {posts}");
    }

    #[test]
    fn single_user_single_category() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(22);

        let user_id = add_user(&db, "alice");
        let category_id = add_category(&db, "Technology");

        run(&db, &mut rng).unwrap();

        // No extra users or categories were synthesized
        assert_eq!(db.list_users().unwrap().len(), 1);
        assert_eq!(db.list_categories().unwrap().len(), 1);

        let posts = db.count_posts().unwrap();
        assert!((22..=25).contains(&posts), "unexpected post count {posts}");

        for post in db.list_posts(100).unwrap() {
            assert_eq!(post.user_id, user_id);
            assert_eq!(post.category_id, category_id);
        }
    }

    #[test]
    fn no_dangling_foreign_keys() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(23);

        run(&db, &mut rng).unwrap();

        let user_ids: HashSet<String> =
            db.list_users().unwrap().into_iter().map(|u| u.id).collect();
        let category_ids: HashSet<String> =
            db.list_categories().unwrap().into_iter().map(|c| c.id).collect();

        for post in db.list_posts(1000).unwrap() {
            assert!(user_ids.contains(&post.user_id));
            assert!(category_ids.contains(&post.category_id));
        }
    }

    #[test]
    fn author_batch_shares_one_category() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(24);

        let user_ids: Vec<String> = ["alice", "bruno", "carmen"]
            .iter()
            .map(|name| add_user(&db, name))
            .collect();
        let category_ids: Vec<String> = ["Travel", "Sports", "Business", "Education"]
            .iter()
            .map(|name| add_category(&db, name))
            .collect();

        let total = seed_author_batches(&db, &mut rng, &user_ids, &category_ids).unwrap();
        assert!((6..=15).contains(&total));

        let mut by_author: HashMap<String, HashSet<String>> = HashMap::new();
        let mut per_author_count: HashMap<String, usize> = HashMap::new();
        for post in db.list_posts(1000).unwrap() {
            by_author
                .entry(post.user_id.clone())
                .or_default()
                .insert(post.category_id.clone());
            *per_author_count.entry(post.user_id).or_default() += 1;
        }

        assert_eq!(by_author.len(), user_ids.len());
        for (author, categories) in by_author {
            assert_eq!(categories.len(), 1, "author {author} spans categories");
        }
        for (author, count) in per_author_count {
            assert!((2..=5).contains(&count), "author {author} has {count} posts");
        }
    }

    #[test]
    fn seeding_is_deterministic_per_seed() {
        let titles = |seed: u64| {
            let db = Database::open_in_memory().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            run(&db, &mut rng).unwrap();
            let mut titles: Vec<String> = db
                .list_posts(1000)
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect();
            titles.sort();
            titles
        };

        assert_eq!(titles(42), titles(42));
        assert_ne!(titles(42), titles(43));
    }

    #[test]
    fn empty_selection_is_an_explicit_error() {
        let mut rng = StdRng::seed_from_u64(25);
        let err = pick(&[], &mut rng).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
