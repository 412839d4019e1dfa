//! PostgreSQL repositories

use async_trait::async_trait;
use common::{
    database,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{PostStore, UserStore};
use crate::models::{NewPost, NewUser, Post, UpdateUser, User, UserResponse};

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<UserResponse> {
        info!("Creating new user: {}", new_user.email);

        sqlx::query_as::<_, UserResponse>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn update(&self, id: i64, changes: &UpdateUser) -> DatabaseResult<Option<UserResponse>> {
        info!("Updating user: {}", id);

        sqlx::query_as::<_, UserResponse>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, username, email
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<UserResponse>> {
        debug!("Finding user by ID: {}", id);

        sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_all(&self) -> DatabaseResult<Vec<UserResponse>> {
        sqlx::query_as::<_, UserResponse>(
            r#"
            SELECT id, username, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting user: {}", id);

        // posts.user_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        database::health_check(&self.pool).await
    }
}

/// Post repository for database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn insert_post(&self, new_post: &NewPost) -> DatabaseResult<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, post_url, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, post_url, user_id, created_at
            "#,
        )
        .bind(&new_post.title)
        .bind(&new_post.post_url)
        .bind(new_post.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_user(&self, user_id: i64) -> DatabaseResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, post_url, user_id, created_at
            FROM posts
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }
}
