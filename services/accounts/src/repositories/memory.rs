//! In-process store, used for `STORAGE_BACKEND=memory` and in tests.
//!
//! Mirrors the PostgreSQL schema's constraints: unique email, required
//! post owner, and cascading delete of a user's posts.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::{PostStore, UserStore};
use crate::models::{NewPost, NewUser, Post, UpdateUser, User, UserResponse};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const POST_OWNER_CONSTRAINT: &str = "posts_user_id_fkey";

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

/// Shared in-memory tables; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_email() -> DatabaseError {
    DatabaseError::UniqueViolation {
        constraint: EMAIL_CONSTRAINT.to_string(),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<UserResponse> {
        let mut tables = self.tables.lock().await;
        if tables.email_taken(&new_user.email, None) {
            return Err(unique_email());
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
        };
        tables.users.insert(user.id, user.clone());
        info!("Created user {} in memory store", user.id);

        Ok(user.into_response())
    }

    async fn update(&self, id: i64, changes: &UpdateUser) -> DatabaseResult<Option<UserResponse>> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(unique_email());
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            user.password_hash = password_hash.clone();
        }

        Ok(Some(user.clone().into_response()))
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserResponse>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned().map(User::into_response))
    }

    async fn find_all(&self) -> DatabaseResult<Vec<UserResponse>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .cloned()
            .map(User::into_response)
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.posts.retain(|_, post| post.user_id != id);
        Ok(true)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, new_post: &NewPost) -> DatabaseResult<Post> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&new_post.user_id) {
            return Err(DatabaseError::ForeignKeyViolation {
                constraint: POST_OWNER_CONSTRAINT.to_string(),
            });
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: new_post.title.clone(),
            post_url: new_post.post_url.clone(),
            user_id: new_post.user_id,
            created_at: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn find_by_user(&self, user_id: i64) -> DatabaseResult<Vec<Post>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }
}
