use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::providers::OAuthProvider;
use crate::modules::accounts::entities::linked_account;
use crate::modules::accounts::repository::LinkedAccountRepository;
use crate::shared::cache::RequestCache;
use crate::shared::config::Config;
use crate::shared::error::{AppError, AppResult};

const SESSION_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Linked account id
    pub provider: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct LinkService;

impl LinkService {
    /// Runs the callback chain: code for token, token for profile, profile
    /// into the linked-account table.
    pub async fn link_account(
        provider: &dyn OAuthProvider,
        cache: &RequestCache,
        repo: &dyn LinkedAccountRepository,
        code: &str,
    ) -> AppResult<linked_account::Model> {
        let grant = provider.exchange_code(cache, code).await?;
        provider
            .fetch_profile(cache, &grant.access_token, &grant.uid)
            .await?;

        let info = provider.linked_account(cache)?;
        let link = repo.upsert(info, Utc::now().naive_utc()).await?;

        tracing::info!("Linked {} account {} as {}", provider.name(), link.username, link.id);
        Ok(link)
    }

    pub fn issue_session(config: &Config, link: &linked_account::Model) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(SESSION_HOURS))
            .ok_or_else(|| AppError::InternalServerError("Session expiry overflow".to_string()))?;

        let claims = Claims {
            sub: link.id.to_string(),
            provider: link.source.as_str().to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(format!("JWT generation failed: {}", e)))
    }

    pub fn verify_session(config: &Config, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
