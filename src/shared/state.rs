use crate::modules::accounts::repository::LinkedAccountRepository;
use crate::modules::auth::registry::OAuthProviderRegistry;
use crate::shared::config::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_registry: OAuthProviderRegistry,
    pub account_repo: Arc<dyn LinkedAccountRepository>,
}
