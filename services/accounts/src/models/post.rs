//! Post model; every post belongs to exactly one user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub post_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// New post creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub post_url: String,
    pub user_id: i64,
}
