use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use super::{Store, StoreError};
use crate::identity::{IdentityError, IdentityFuture, IdentityResolver};

impl Store {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    pub async fn find_user_display_name(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let name: Option<Option<String>> =
            sqlx::query_scalar("SELECT name FROM users WHERE id::text = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(name
            .flatten()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()))
    }
}

impl IdentityResolver for Store {
    fn display_name<'a>(&'a self, caller_id: &'a str) -> IdentityFuture<'a> {
        Box::pin(async move {
            let name = self
                .find_user_display_name(caller_id)
                .await
                .map_err(|err| IdentityError::Lookup(err.to_string()))?;
            if name.is_none() {
                debug!(caller_id, "no display name on record for caller");
            }
            Ok(name)
        })
    }
}
