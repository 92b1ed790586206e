use sqlx::PgPool;
use thiserror::Error;

mod users;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to the application's Postgres database.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}
