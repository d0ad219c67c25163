//! Content fingerprint - SHA-256 over the parts of a message that an edit can change
//!
//! Display text is excluded: it is re-rendered from raw text and the mention
//! list, so the same content can reach the store under different display
//! renderings.

use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint of (raw text, attachment URLs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentFingerprint([u8; 32]);

impl ContentFingerprint {
    /// Compute the fingerprint of raw text plus attachment URLs.
    ///
    /// Attachment order is significant; an attachment list is stored in the
    /// order the platform returned it.
    pub fn compute<'a, I>(raw_text: &str, attachments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut hasher = Sha256::new();
        hasher.update((raw_text.len() as u64).to_le_bytes());
        hasher.update(raw_text.as_bytes());
        for url in attachments {
            hasher.update([0u8]);
            hasher.update(url.as_bytes());
        }
        Self(hasher.finalize().into())
    }

    /// Hex encoding, for logs
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex()[..12])
    }
}
