//! Token injection seam for authenticated requests.
//!
//! The backend authenticates with a bearer token attached to every
//! request. The token lives wherever the embedding application keeps it
//! (browser storage, a keychain, a test fixture); [`StoryApi`] only
//! sees this trait.
//!
//! [`StoryApi`]: crate::api::StoryApi

use std::sync::Arc;

/// Supplies the current bearer token, if any.
///
/// Returning `None` sends the request unauthenticated -- public story
/// reads work this way for guests.
pub trait TokenProvider: Send + Sync {
    /// The current token, without the `Bearer ` prefix.
    fn token(&self) -> Option<String>;
}

/// A fixed token, useful for tests and server-to-server callers.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No token: every request goes out unauthenticated.
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_returns_value() {
        let provider = StaticToken("abc123".into());
        assert_eq!(provider.token().as_deref(), Some("abc123"));
    }

    #[test]
    fn no_token_returns_none() {
        assert_eq!(NoToken.token(), None);
    }

    #[test]
    fn arc_delegates_to_inner() {
        let provider: Arc<dyn TokenProvider> = Arc::new(StaticToken("t".into()));
        assert_eq!(provider.token().as_deref(), Some("t"));
    }
}
