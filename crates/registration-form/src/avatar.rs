//! Identicon avatar URLs.

use serde::{Deserialize, Serialize};
use md5::{Digest, Md5};

/// Default avatar service base URL.
pub const DEFAULT_GRAVATAR_BASE_URL: &str = "http://gravatar.com/avatar";

/// Builds Gravatar identicon URLs from e-mail addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gravatar {
    base_url: String,
}

impl Gravatar {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Avatar URL for an e-mail address.
    pub fn url(&self, email: &str) -> String {
        format!("{}/{}?d=identicon", self.base_url, email_hash(email))
    }
}

impl Default for Gravatar {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVATAR_BASE_URL)
    }
}

/// MD5 of the trimmed, lower-cased address, hex encoded.
pub fn email_hash(email: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}
