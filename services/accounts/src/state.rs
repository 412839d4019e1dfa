//! Application state shared across handlers

use crate::accounts::AccountStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountStore,
}

impl AppState {
    pub fn new(accounts: AccountStore) -> Self {
        Self { accounts }
    }
}
