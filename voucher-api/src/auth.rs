//! Credential provider boundary.
//!
//! The surrounding application owns the login flow and token storage; the
//! API client only needs a way to read the current bearer token and to ask
//! for a refresh after a `401`.

use async_trait::async_trait;

use voucher_core::{Result, VoucherError};

/// Source of the bearer credential attached to every request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, if any.
    fn token(&self) -> Option<String>;

    /// Obtain a fresh access token after the current one was rejected.
    async fn refresh(&self) -> Result<()>;
}

/// Fixed-token provider for tools and tests. It cannot refresh, so a
/// rejected token surfaces as `Unauthorized` immediately.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        Some(self.token.clone())
    }

    async fn refresh(&self) -> Result<()> {
        Err(VoucherError::Unauthorized)
    }
}
