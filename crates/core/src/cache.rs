//! In-memory memoization of selections by query signature.
//!
//! The cache is unbounded and lives as long as the process. Reads are
//! optional per request; every computed selection is written back.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;

use crate::aggregator::{ExtendedDetails, JoinPolicy};
use crate::config::CacheKeyScope;
use crate::torrent::{ContentKind, TorrentSelection};

/// Cache key derived from the semantically relevant request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature(String);

impl QuerySignature {
    /// Signature over details, return_all and join policy.
    ///
    /// The identifier is not part of it: two titles requested with equal
    /// parameters map to the same signature. See [`CacheKeyScope`].
    pub fn new(details: &ExtendedDetails, return_all: bool, method: JoinPolicy) -> Self {
        let value = json!({
            "extendedDetails": details,
            "returnAll": return_all,
            "method": method,
        });
        Self(value.to_string())
    }

    /// Signature over the query parameters plus identifier and kind.
    pub fn with_identity(
        details: &ExtendedDetails,
        return_all: bool,
        method: JoinPolicy,
        id: &str,
        kind: ContentKind,
    ) -> Self {
        let value = json!({
            "extendedDetails": details,
            "returnAll": return_all,
            "method": method,
            "id": id,
            "kind": kind,
        });
        Self(value.to_string())
    }

    pub fn for_scope(
        scope: CacheKeyScope,
        details: &ExtendedDetails,
        return_all: bool,
        method: JoinPolicy,
        id: &str,
        kind: ContentKind,
    ) -> Self {
        match scope {
            CacheKeyScope::Query => Self::new(details, return_all, method),
            CacheKeyScope::QueryAndId => {
                Self::with_identity(details, return_all, method, id, kind)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared signature -> selection map. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QuerySignature, TorrentSelection>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, signature: &QuerySignature) -> Option<TorrentSelection> {
        self.entries.read().await.get(signature).cloned()
    }

    /// Insert or overwrite. Last writer wins.
    pub async fn put(&self, signature: QuerySignature, selection: TorrentSelection) {
        self.entries.write().await.insert(signature, selection);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }
}
