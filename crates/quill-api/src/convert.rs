//! Row-to-model conversions. SQLite hands back TEXT ids and timestamps;
//! a row that fails to parse is corrupt and surfaces as an internal error.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

use quill_db::models::{CategoryRow, PostRow, UserRow};
use quill_types::models::{Category, Post, User};

pub fn user(row: UserRow) -> Result<User> {
    Ok(User {
        id: row.id.parse().context("bad user id")?,
        username: row.username,
        email: row.email,
        created_at: timestamp(&row.created_at)?,
    })
}

pub fn category(row: CategoryRow) -> Result<Category> {
    Ok(Category {
        id: row.id.parse().context("bad category id")?,
        name: row.name,
        description: row.description,
        created_at: timestamp(&row.created_at)?,
    })
}

pub fn post(row: PostRow) -> Result<Post> {
    Ok(Post {
        id: row.id.parse().context("bad post id")?,
        user_id: row.user_id.parse().context("bad post author id")?,
        category_id: row.category_id.parse().context("bad post category id")?,
        title: row.title,
        body: row.body,
        created_at: timestamp(&row.created_at)?,
        updated_at: timestamp(&row.updated_at)?,
    })
}

fn timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("bad timestamp {:?}", raw))
}

#[cfg(test)]
mod tests {
    use super::timestamp;

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        assert!(timestamp("2026-08-07 12:30:00").is_ok());
        assert!(timestamp("2026-08-07T12:30:00Z").is_ok());
        assert!(timestamp("yesterday").is_err());
    }
}
