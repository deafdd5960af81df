//! Mock identifier translator for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::torrent::ContentKind;
use crate::translation::{IdTranslator, TranslationError};

/// Mock implementation of the IdTranslator trait.
///
/// Translates from a configured id map. Unknown ids fail with `NotFound`.
pub struct MockTranslator {
    mappings: Arc<RwLock<HashMap<String, String>>>,
    /// If set, the next translation fails with this error.
    next_error: Arc<RwLock<Option<TranslationError>>>,
    calls: Arc<RwLock<Vec<(String, ContentKind)>>>,
}

impl std::fmt::Debug for MockTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTranslator")
            .field("mappings", &"<mappings>")
            .field("next_error", &"<next_error>")
            .finish()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            mappings: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Map `external_id` to `native_id`.
    pub async fn add_mapping(&self, external_id: &str, native_id: &str) {
        self.mappings
            .write()
            .await
            .insert(external_id.to_string(), native_id.to_string());
    }

    /// Configure the next translation to fail with the given error.
    pub async fn set_next_error(&self, error: TranslationError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get the ids translated so far, with the kind requested.
    pub async fn recorded_calls(&self) -> Vec<(String, ContentKind)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl IdTranslator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(
        &self,
        external_id: &str,
        kind: ContentKind,
    ) -> Result<String, TranslationError> {
        self.calls
            .write()
            .await
            .push((external_id.to_string(), kind));

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.mappings
            .read()
            .await
            .get(external_id)
            .cloned()
            .ok_or_else(|| TranslationError::NotFound(external_id.to_string()))
    }
}
