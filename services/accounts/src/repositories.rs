//! Store traits and their implementations
//!
//! Each record type gets an explicit store trait. [`postgres`] backs them
//! with `sqlx`, [`memory`] with a locked in-process table set.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{NewPost, NewUser, Post, UpdateUser, User, UserResponse};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PostRepository, UserRepository};

/// Persistence port for users.
///
/// Only [`find_by_email`](UserStore::find_by_email) returns the password
/// hash; every other read returns the public projection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row; a taken email is `DatabaseError::UniqueViolation`
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<UserResponse>;

    /// Apply the present columns of `changes`; `None` when `id` is unknown
    async fn update(&self, id: i64, changes: &UpdateUser) -> DatabaseResult<Option<UserResponse>>;

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserResponse>>;

    /// All users ordered by id
    async fn find_all(&self) -> DatabaseResult<Vec<UserResponse>>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Returns whether a row was removed. A user's posts go with it.
    async fn delete(&self, id: i64) -> DatabaseResult<bool>;

    async fn health_check(&self) -> DatabaseResult<bool>;
}

/// Persistence port for posts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post; an unknown `user_id` is `DatabaseError::ForeignKeyViolation`
    async fn insert_post(&self, new_post: &NewPost) -> DatabaseResult<Post>;

    /// Posts owned by `user_id`, ordered by id
    async fn find_by_user(&self, user_id: i64) -> DatabaseResult<Vec<Post>>;
}
