use super::providers::OAuthProvider;
use crate::modules::accounts::entities::enums::SocialProvider;
use crate::shared::error::{AppError, AppResult};
use std::{collections::HashMap, sync::Arc};

#[derive(Clone, Default)]
pub struct OAuthProviderRegistry {
    providers: HashMap<SocialProvider, Arc<dyn OAuthProvider>>,
}

impl OAuthProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: OAuthProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.insert(provider.source(), Arc::new(provider));
        self
    }

    pub fn get(&self, provider_type: SocialProvider) -> Option<Arc<dyn OAuthProvider>> {
        self.providers.get(&provider_type).cloned()
    }

    /// Looks a provider up by its route name; unknown or unregistered names
    /// are reported as not found.
    pub fn resolve(&self, name: &str) -> AppResult<Arc<dyn OAuthProvider>> {
        name.parse::<SocialProvider>()
            .ok()
            .and_then(|provider_type| self.get(provider_type))
            .ok_or(AppError::NotFound)
    }
}
