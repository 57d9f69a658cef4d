//! Authentication handling for GitHub API.

use secrecy::{ExposeSecret, SecretString};

/// Authentication method for GitHub API.
///
/// Public repositories can be polled anonymously; a token raises the rate
/// limit and grants access to private repositories.
#[derive(Debug, Default)]
pub enum Auth {
    /// No authorization header.
    #[default]
    Anonymous,

    /// Use a specific token.
    Token(SecretString),
}

impl Auth {
    /// Build auth from an optional configured token.
    #[must_use]
    pub fn from_token(token: Option<SecretString>) -> Self {
        token.map_or(Self::Anonymous, Self::Token)
    }

    /// The token to send, if any.
    #[must_use]
    pub fn resolve(&self) -> Option<SecretString> {
        match self {
            Self::Anonymous => None,
            Self::Token(t) => Some(SecretString::from(t.expose_secret())),
        }
    }
}
