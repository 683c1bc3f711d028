use crate::modules::auth::{providers::weibo::WeiboProvider, registry::OAuthProviderRegistry};
use crate::shared::config::Config;

pub fn init_auth_registry(config: &Config) -> OAuthProviderRegistry {
    if config.weibo.client_id.is_empty() {
        tracing::warn!("LINKS_WEIBO_CLIENT_ID is empty; Weibo will reject authorization requests");
    }
    OAuthProviderRegistry::new().register(WeiboProvider::new(config.weibo.clone()))
}
