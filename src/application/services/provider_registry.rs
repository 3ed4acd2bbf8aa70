use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::TranscriptionProvider;
use crate::domain::ProviderKind;

/// Lookup table from provider variant to backend implementation.
///
/// Built once at startup; the submission handler resolves the caller's
/// string key here so that no unknown provider ever reaches the queue.
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn TranscriptionProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: HashMap<ProviderKind, Arc<dyn TranscriptionProvider>>) -> Self {
        Self { providers }
    }

    /// Validates a caller-supplied key against the registered backends.
    pub fn resolve(&self, key: &str) -> Option<ProviderKind> {
        let kind = key.parse::<ProviderKind>().ok()?;
        self.providers.contains_key(&kind).then_some(kind)
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn TranscriptionProvider>> {
        self.providers.get(&kind).map(Arc::clone)
    }

    /// Registered backend names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        ProviderKind::ALL
            .iter()
            .filter(|kind| self.providers.contains_key(kind))
            .map(ProviderKind::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::application::ports::TranscriptionError;

    use super::*;

    struct NullProvider;

    #[async_trait]
    impl TranscriptionProvider for NullProvider {
        async fn transcribe(
            &self,
            _audio: &[u8],
            _filename: &str,
        ) -> Result<Option<String>, TranscriptionError> {
            Ok(None)
        }
    }

    fn registry_with(kinds: &[ProviderKind]) -> ProviderRegistry {
        let providers = kinds
            .iter()
            .map(|&kind| (kind, Arc::new(NullProvider) as Arc<dyn TranscriptionProvider>))
            .collect();
        ProviderRegistry::new(providers)
    }

    #[test]
    fn given_registered_key_when_resolving_then_returns_kind() {
        let registry = registry_with(&[ProviderKind::OpenAi, ProviderKind::Google]);
        assert_eq!(registry.resolve("openai"), Some(ProviderKind::OpenAi));
        assert_eq!(registry.resolve("google"), Some(ProviderKind::Google));
    }

    #[test]
    fn given_unknown_or_unregistered_key_when_resolving_then_none() {
        let registry = registry_with(&[ProviderKind::OpenAi]);
        assert_eq!(registry.resolve("bogus"), None);
        // Known variant, but no backend registered for it.
        assert_eq!(registry.resolve("aws"), None);
    }

    #[test]
    fn given_registry_when_listing_names_then_order_is_stable() {
        let registry = registry_with(&[ProviderKind::Aws, ProviderKind::OpenAi]);
        assert_eq!(registry.names(), vec!["openai", "aws"]);
    }
}
