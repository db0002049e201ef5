use sea_orm::DatabaseConnection;

use crate::services::storage::MediaStorage;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Shared application state handed to every route builder.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub storage: MediaStorage,
}

impl AppState {
    pub fn new(db: DbConn, storage: MediaStorage) -> Self {
        Self { db, storage }
    }
}
