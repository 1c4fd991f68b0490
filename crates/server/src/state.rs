use std::sync::Arc;

use askdb_catalog::Catalog;
use askdb_nlq::QueryEngine;

use crate::auth::{TokenIssuer, UserStore};

/// Everything a handler needs; built once at startup and shared read-only.
pub struct AppState {
    pub engine: QueryEngine,
    pub users: UserStore,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, users: UserStore, tokens: TokenIssuer) -> Self {
        Self {
            engine: QueryEngine::new(catalog),
            users,
            tokens,
        }
    }
}
