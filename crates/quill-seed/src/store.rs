use anyhow::Result;
use quill_db::Database;

use crate::factory::{NewCategory, NewPost, NewUser};

/// Storage seam for the seeders: one insert per entity, returning the new
/// row's id, plus the id listings the post seeder associates against.
/// Store rejections (constraint violations) propagate to the caller and
/// abort the run.
pub trait SeedStore {
    fn user_ids(&self) -> Result<Vec<String>>;
    fn category_ids(&self) -> Result<Vec<String>>;
    fn insert_user(&self, user: &NewUser) -> Result<String>;
    fn insert_category(&self, category: &NewCategory) -> Result<String>;
    fn insert_post(&self, post: &NewPost) -> Result<String>;
}

impl SeedStore for Database {
    fn user_ids(&self) -> Result<Vec<String>> {
        Ok(self.list_users()?.into_iter().map(|u| u.id).collect())
    }

    fn category_ids(&self) -> Result<Vec<String>> {
        Ok(self.list_categories()?.into_iter().map(|c| c.id).collect())
    }

    fn insert_user(&self, user: &NewUser) -> Result<String> {
        self.create_user(&user.id, &user.username, &user.email, &user.password_hash)?;
        Ok(user.id.clone())
    }

    fn insert_category(&self, category: &NewCategory) -> Result<String> {
        quill_db::Database::insert_category(self, &category.id, &category.name, &category.description)?;
        Ok(category.id.clone())
    }

    fn insert_post(&self, post: &NewPost) -> Result<String> {
        quill_db::Database::insert_post(
            self,
            &post.id,
            &post.user_id,
            &post.category_id,
            &post.title,
            &post.body,
        )?;
        Ok(post.id.clone())
    }
}
