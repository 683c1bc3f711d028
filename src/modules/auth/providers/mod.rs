use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::modules::accounts::dtos::LinkedAccountInfo;
use crate::modules::accounts::entities::enums::SocialProvider;
use crate::shared::cache::{RequestCache, value_as_i64, value_as_string};
use crate::shared::error::{AppError, AppResult};

pub mod weibo;

/// Result of trading an authorization code for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
    pub uid: String,
}

#[derive(Debug, Clone)]
pub struct ProfileInfo {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    /// The provider's response, untouched.
    pub raw: Value,
}

/// One OAuth2 identity provider.
///
/// Every call that talks to the provider also records the fields it
/// extracted in the [`RequestCache`] under [`OAuthProvider::name`], so later
/// steps of the same request can read them back.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn source(&self) -> SocialProvider;

    fn name(&self) -> &'static str {
        self.source().as_str()
    }

    fn get_authorization_url(&self, state: Option<&str>) -> AppResult<String>;

    async fn exchange_code(&self, cache: &RequestCache, code: &str) -> AppResult<TokenGrant>;

    async fn fetch_profile(
        &self,
        cache: &RequestCache,
        access_token: &str,
        uid: &str,
    ) -> AppResult<ProfileInfo>;

    /// Maps the cached fields to the row that gets persisted.
    fn linked_account(&self, cache: &RequestCache) -> AppResult<LinkedAccountInfo>;

    async fn fetch_current_profile(&self, cache: &RequestCache) -> AppResult<ProfileInfo> {
        let token = self.token(cache)?;
        let uid = self.uid(cache)?;
        self.fetch_profile(cache, &token, &uid).await
    }

    fn token(&self, cache: &RequestCache) -> AppResult<String> {
        required(cache, self.name(), "access_token")
    }

    fn uid(&self, cache: &RequestCache) -> AppResult<String> {
        required(cache, self.name(), "uid")
    }

    /// Seconds until the token expires; zero when the provider did not say.
    fn expires_in(&self, cache: &RequestCache) -> i64 {
        cache.get_i64(self.name(), "expires_in").unwrap_or(0)
    }
}

pub(crate) fn required(cache: &RequestCache, provider: &str, key: &str) -> AppResult<String> {
    cache
        .get_str(provider, key)
        .ok_or_else(|| AppError::MissingField(key.to_string()))
}

/// Reads a provider response body as JSON, whatever the HTTP status.
///
/// Providers report failures with an error object and a 4xx status, so the
/// status alone does not tell success from failure.
pub(crate) async fn read_json(response: reqwest::Response) -> AppResult<Value> {
    let status = response.status();
    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedResponse(format!("HTTP {}: {}", status.as_u16(), e)))
}

/// Checks that `body` carries `required` and copies out the listed fields.
///
/// Absent optional fields are skipped. When `required` is absent the
/// provider's own error object is reported if there is one.
pub(crate) fn parse_fields(
    body: &Value,
    required: &str,
    fields: &[&str],
) -> AppResult<Map<String, Value>> {
    let object = body
        .as_object()
        .ok_or_else(|| AppError::MalformedResponse("expected a JSON object".to_string()))?;

    if !object.contains_key(required) {
        return Err(provider_error(object)
            .unwrap_or_else(|| AppError::MissingField(required.to_string())));
    }

    Ok(fields
        .iter()
        .filter_map(|field| {
            object
                .get(*field)
                .filter(|v| !v.is_null())
                .map(|v| (field.to_string(), v.clone()))
        })
        .collect())
}

fn provider_error(object: &Map<String, Value>) -> Option<AppError> {
    let message = object
        .get("error_description")
        .or_else(|| object.get("error"))
        .and_then(value_as_string)?;
    let code = object
        .get("error_code")
        .and_then(value_as_i64)
        .unwrap_or_default();

    Some(AppError::ProviderError { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fields_extracts_listed_keys() {
        let body = json!({
            "access_token": "2.00abc",
            "expires_in": 157679999,
            "remind_in": "157679999",
            "uid": "1404376560"
        });

        let fields = parse_fields(&body, "access_token", &["access_token", "expires_in", "uid"])
            .unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["uid"], json!("1404376560"));
        assert!(!fields.contains_key("remind_in"));
    }

    #[test]
    fn test_parse_fields_skips_absent_optionals() {
        let body = json!({"id": 1, "name": null});
        let fields = parse_fields(&body, "id", &["name", "avatar_hd"]).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_parse_fields_reports_provider_error() {
        let body = json!({
            "error": "expired_token",
            "error_code": 21327,
            "request": "/2/users/show.json"
        });

        match parse_fields(&body, "id", &["name"]) {
            Err(AppError::ProviderError { code, message }) => {
                assert_eq!(code, 21327);
                assert_eq!(message, "expired_token");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_fields_error_code_as_string() {
        let body = json!({"error": "invalid_grant", "error_code": "21325"});
        assert!(matches!(
            parse_fields(&body, "access_token", &[]),
            Err(AppError::ProviderError { code: 21325, .. })
        ));
    }

    #[test]
    fn test_parse_fields_missing_required() {
        let body = json!({"uid": "1"});
        assert!(matches!(
            parse_fields(&body, "access_token", &["uid"]),
            Err(AppError::MissingField(field)) if field == "access_token"
        ));
    }

    #[test]
    fn test_parse_fields_rejects_non_object() {
        assert!(matches!(
            parse_fields(&json!([1, 2]), "id", &[]),
            Err(AppError::MalformedResponse(_))
        ));
    }
}
