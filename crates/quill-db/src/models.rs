//! Database row types — these map directly to SQLite rows.
//! Distinct from the quill-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}
