use super::{OAuthProvider, ProfileInfo, TokenGrant, parse_fields, read_json, required};
use crate::modules::accounts::dtos::LinkedAccountInfo;
use crate::modules::accounts::entities::enums::SocialProvider;
use crate::shared::cache::{RequestCache, value_as_string};
use crate::shared::config::ProviderConfig;
use crate::shared::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Weibo endpoints, rooted at a replaceable API host.
#[derive(Debug, Clone)]
pub struct WeiboApi {
    base: String,
}

impl WeiboApi {
    pub const BASE_API: &'static str = "https://api.weibo.com";

    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn oauth_api(&self) -> String {
        format!("{}/oauth2", self.base)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.oauth_api())
    }

    pub fn access_token_url(&self) -> String {
        format!("{}/access_token", self.oauth_api())
    }

    pub fn user_info_url(&self) -> String {
        format!("{}/2/users/show.json", self.base)
    }
}

impl Default for WeiboApi {
    fn default() -> Self {
        Self::new(Self::BASE_API)
    }
}

pub struct WeiboProvider {
    config: ProviderConfig,
    api: WeiboApi,
    client: Client,
}

impl WeiboProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let api = config
            .api_base
            .as_deref()
            .map(WeiboApi::new)
            .unwrap_or_default();

        Self {
            config,
            api,
            client: Client::new(),
        }
    }

    /// Display name from the profile.
    pub fn username(&self, cache: &RequestCache) -> AppResult<String> {
        required(cache, self.name(), "name")
    }

    /// Large avatar from the profile, if the account has one.
    pub fn avatar(&self, cache: &RequestCache) -> Option<String> {
        cache.get_str(self.name(), "avatar_hd")
    }
}

#[async_trait]
impl OAuthProvider for WeiboProvider {
    fn source(&self) -> SocialProvider {
        SocialProvider::Weibo
    }

    fn get_authorization_url(&self, state: Option<&str>) -> AppResult<String> {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("response_type", self.config.response_type.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        if !self.config.scope.is_empty() {
            params.push(("scope", self.config.scope.as_str()));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }

        let url = Url::parse_with_params(&self.api.authorize_url(), &params).map_err(|e| {
            AppError::InternalServerError(format!("Invalid Weibo authorize url: {}", e))
        })?;
        Ok(url.into())
    }

    async fn exchange_code(&self, cache: &RequestCache, code: &str) -> AppResult<TokenGrant> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", self.config.grant_type.as_str()),
            ("code", code),
        ];

        tracing::debug!("Exchanging Weibo authorization code");
        let response = self
            .client
            .post(self.api.access_token_url())
            .query(&params)
            .send()
            .await?;
        let body = read_json(response).await?;

        let fields = parse_fields(&body, "access_token", &["access_token", "expires_in", "uid"])?;
        cache.merge(self.name(), fields);

        Ok(TokenGrant {
            access_token: self.token(cache)?,
            expires_in: self.expires_in(cache),
            uid: self.uid(cache)?,
        })
    }

    async fn fetch_profile(
        &self,
        cache: &RequestCache,
        access_token: &str,
        uid: &str,
    ) -> AppResult<ProfileInfo> {
        tracing::debug!("Fetching Weibo profile for uid {}", uid);
        let response = self
            .client
            .get(self.api.user_info_url())
            .query(&[("access_token", access_token), ("uid", uid)])
            .send()
            .await?;
        let body = read_json(response).await?;

        let fields = parse_fields(&body, "id", &["name", "avatar_hd"])?;
        let id = body
            .get("id")
            .and_then(value_as_string)
            .ok_or_else(|| AppError::MalformedResponse("Weibo id is not a scalar".to_string()))?;
        cache.merge(self.name(), fields);

        Ok(ProfileInfo {
            id,
            name: cache.get_str(self.name(), "name"),
            avatar: self.avatar(cache),
            raw: body,
        })
    }

    fn linked_account(&self, cache: &RequestCache) -> AppResult<LinkedAccountInfo> {
        Ok(LinkedAccountInfo {
            source: self.source(),
            username: self.uid(cache)?,
            realname: self.username(cache)?,
            access_token: self.token(cache)?,
            avatar: self.avatar(cache),
            expires_in: self.expires_in(cache),
        })
    }
}
