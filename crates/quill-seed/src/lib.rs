//! Seed data for the blog API: a fixed category catalog plus randomized
//! users and posts. Seeders run against the [`store::SeedStore`] seam and
//! draw all randomness from a caller-supplied [`rand::Rng`], so tests can
//! pin a seed and get identical output.

pub mod categories;
pub mod factory;
pub mod posts;
pub mod store;

pub use store::SeedStore;
