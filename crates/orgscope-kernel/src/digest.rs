//! Content digests for derived selection lists.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hex sha256 over a list's substantive content, in list order.
///
/// Two fetches that flatten to the same digest render the same picker, so a
/// UI can keep its current list instead of redrawing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListDigest(pub String);

impl ListDigest {
    pub fn builder() -> ListDigestBuilder {
        ListDigestBuilder {
            hasher: Sha256::new(),
        }
    }
}

impl fmt::Display for ListDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feeds fields in call order. Callers keep the order stable.
pub struct ListDigestBuilder {
    hasher: Sha256,
}

impl ListDigestBuilder {
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.hasher.update(name.as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.len().to_string().as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    pub fn field_int(self, name: &str, value: i64) -> Self {
        self.field(name, &value.to_string())
    }

    /// Absent values still advance the stream so `None` and `""` differ.
    pub fn field_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self.field(&format!("{name}?"), ""),
        }
    }

    pub fn finish(self) -> ListDigest {
        let hash = self.hasher.finalize();
        ListDigest(format!("{hash:x}"))
    }
}
