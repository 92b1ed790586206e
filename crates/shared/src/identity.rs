use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub type IdentityFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, IdentityError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity lookup failed: {0}")]
    Lookup(String),
}

/// Resolves a caller identity to the display name used to personalize replies.
pub trait IdentityResolver: Send + Sync {
    fn display_name<'a>(&'a self, caller_id: &'a str) -> IdentityFuture<'a>;
}

/// Fixed in-memory directory, used when no user database is configured and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityDirectory {
    names: HashMap<String, String>,
}

impl StaticIdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, caller_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.names.insert(caller_id.into(), display_name.into());
        self
    }
}

impl IdentityResolver for StaticIdentityDirectory {
    fn display_name<'a>(&'a self, caller_id: &'a str) -> IdentityFuture<'a> {
        Box::pin(async move { Ok(self.names.get(caller_id).cloned()) })
    }
}
