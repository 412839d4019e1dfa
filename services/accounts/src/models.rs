//! Records, projections and request/response payloads

pub mod post;
pub mod user;

pub use post::{NewPost, Post};
pub use user::{
    CreateUserRequest, LoginRequest, LoginResponse, NewUser, UpdateUser, UpdateUserRequest, User,
    UserResponse,
};
