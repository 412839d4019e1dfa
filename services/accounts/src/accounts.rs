//! Account store: the only write path for user credentials
//!
//! Every operation that accepts a plaintext password runs
//! validate → hash → persist, in that order, so nothing but a hasher
//! output ever reaches a store.

use std::sync::Arc;

use tracing::info;

use crate::{
    error::{AccountError, AccountResult, AuthFailure},
    models::{
        CreateUserRequest, LoginRequest, NewPost, NewUser, Post, UpdateUser, UpdateUserRequest,
        User, UserResponse,
    },
    password::CredentialHasher,
    repositories::{MemoryStore, PostStore, UserStore},
    validation::{validate_email, validate_password, validate_text_field, validate_username},
};
use common::error::DatabaseError;

/// User accounts on top of a [`UserStore`] and a [`PostStore`]
#[derive(Clone)]
pub struct AccountStore {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    hasher: CredentialHasher,
}

impl AccountStore {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            users,
            posts,
            hasher,
        }
    }

    /// Accounts backed by a fresh [`MemoryStore`]
    pub fn in_memory(hasher: CredentialHasher) -> Self {
        let store = MemoryStore::new();
        Self::new(Arc::new(store.clone()), Arc::new(store), hasher)
    }

    /// Create an account; the password is hashed before it is stored
    pub async fn create(&self, request: CreateUserRequest) -> AccountResult<UserResponse> {
        validate_username(&request.username).map_err(AccountError::Validation)?;
        validate_email(&request.email).map_err(AccountError::Validation)?;
        validate_password(&request.password).map_err(AccountError::Validation)?;

        let password_hash = self.hasher.hash_async(request.password).await?;
        let user = self
            .users
            .insert(&NewUser {
                username: request.username,
                email: request.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Update the fields present in `request`, re-hashing a new password
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> AccountResult<UserResponse> {
        if let Some(username) = &request.username {
            validate_username(username).map_err(AccountError::Validation)?;
        }
        if let Some(email) = &request.email {
            validate_email(email).map_err(AccountError::Validation)?;
        }
        if let Some(password) = &request.password {
            validate_password(password).map_err(AccountError::Validation)?;
            // no hashing work for an id that does not exist
            self.find_by_id(id).await?;
        }

        let password_hash = match request.password {
            Some(password) => Some(self.hasher.hash_async(password).await?),
            None => None,
        };
        let changes = UpdateUser {
            username: request.username,
            email: request.email,
            password_hash,
        };

        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let user = self
            .users
            .update(id, &changes)
            .await?
            .ok_or(AccountError::NotFound)?;

        info!(
            user_id = user.id,
            password_changed = changes.password_hash.is_some(),
            "user updated"
        );
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> AccountResult<UserResponse> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn find_all(&self) -> AccountResult<Vec<UserResponse>> {
        Ok(self.users.find_all().await?)
    }

    /// Full record including the password hash. Not for response bodies.
    pub async fn find_by_email(&self, email: &str) -> AccountResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or(AccountError::NotFound)
    }

    /// Delete an account together with its posts
    pub async fn delete(&self, id: i64) -> AccountResult<()> {
        if !self.users.delete(id).await? {
            return Err(AccountError::NotFound);
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Check a password; an unknown email and a wrong password fail alike
    pub async fn login(&self, request: LoginRequest) -> AccountResult<UserResponse> {
        let user = match self.find_by_email(&request.email).await {
            Ok(user) => user,
            Err(AccountError::NotFound) => {
                // same Argon2 cost as a wrong password
                self.hasher.verify_decoy_async(request.password).await?;
                return Err(AccountError::Auth(AuthFailure::UnknownAccount));
            }
            Err(e) => return Err(e),
        };

        let matches = self
            .hasher
            .verify_async(request.password, user.password_hash.clone())
            .await?;
        if !matches {
            return Err(AccountError::Auth(AuthFailure::BadCredentials));
        }

        info!(user_id = user.id, "user logged in");
        Ok(user.into_response())
    }

    /// Attach a post to an existing user
    pub async fn create_post(&self, new_post: NewPost) -> AccountResult<Post> {
        validate_text_field("Title", &new_post.title).map_err(AccountError::Validation)?;
        validate_text_field("Post URL", &new_post.post_url).map_err(AccountError::Validation)?;

        match self.posts.insert_post(&new_post).await {
            Ok(post) => Ok(post),
            Err(DatabaseError::ForeignKeyViolation { .. }) => Err(AccountError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Posts owned by a user; `NotFound` when the user does not exist
    pub async fn posts_for_user(&self, user_id: i64) -> AccountResult<Vec<Post>> {
        self.find_by_id(user_id).await?;
        Ok(self.posts.find_by_user(user_id).await?)
    }

    pub async fn health_check(&self) -> AccountResult<bool> {
        Ok(self.users.health_check().await?)
    }
}
