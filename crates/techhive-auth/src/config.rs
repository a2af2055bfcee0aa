//! Authentication configuration.

/// Configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric HMAC secret used to sign and verify tokens.
    pub token_secret: String,
    /// Token lifetime in seconds (default: 2_592_000 = 30 days).
    pub token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_lifetime_secs: 2_592_000,
        }
    }
}
