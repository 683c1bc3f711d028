use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::modules::{accounts, auth};
use crate::shared::{middleware::request_cache, state::AppState};

pub fn init_router(state: AppState) -> Router {
    let oauth = auth::router::router().merge(accounts::router::router());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/oauth", oauth)
        .layer(middleware::from_fn(request_cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::accounts::dtos::LinkedAccountInfo;
    use crate::modules::accounts::entities::enums::SocialProvider;
    use crate::modules::accounts::infra::persistence::InMemoryLinkedAccountRepository;
    use crate::modules::accounts::repository::LinkedAccountRepository;
    use crate::modules::auth::providers::weibo::WeiboProvider;
    use crate::modules::auth::registry::OAuthProviderRegistry;
    use crate::modules::auth::service::LinkService;
    use crate::shared::config::{Config, ProviderConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use mockito::{Matcher, Server};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(api_base: Option<String>) -> (AppState, InMemoryLinkedAccountRepository) {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("router_secret".to_string()),
            "LINKS_WEIBO_CLIENT_ID" => Some("123456".to_string()),
            "LINKS_WEIBO_REDIRECT_URI" => Some("https://example.com/cb".to_string()),
            _ => None,
        })
        .unwrap();
        let weibo = ProviderConfig {
            api_base,
            ..config.weibo.clone()
        };
        let repo = InMemoryLinkedAccountRepository::default();

        let state = AppState {
            config: Arc::new(config),
            auth_registry: OAuthProviderRegistry::new().register(WeiboProvider::new(weibo)),
            account_repo: Arc::new(repo.clone()),
        };
        (state, repo)
    }

    async fn send_get(
        app: Router,
        uri: &str,
        bearer: Option<&str>,
    ) -> (StatusCode, Value, Option<String>) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body, location)
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state(None);
        let (status, _, _) = send_get(init_router(state), "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_redirects_to_weibo() {
        let (state, _) = test_state(None);
        let (status, _, location) =
            send_get(init_router(state), "/oauth/weibo/login?state=abc", None).await;

        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        let location = location.unwrap();
        assert!(location.starts_with("https://api.weibo.com/oauth2/authorize?"));
        assert!(location.contains("client_id=123456"));
        assert!(location.contains("state=abc"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_not_found() {
        let (state, _) = test_state(None);
        let (status, body, _) = send_get(init_router(state), "/oauth/kakao/login", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], json!(404));
    }

    #[tokio::test]
    async fn test_callback_without_code() {
        let (state, _) = test_state(None);
        let (status, _, _) = send_get(init_router(state), "/oauth/weibo/callback", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_callback_denied() {
        let (state, _) = test_state(None);
        let (status, body, _) = send_get(
            init_router(state),
            "/oauth/weibo/callback?error=access_denied&error_code=21330",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], json!("access_denied"));
    }

    #[tokio::test]
    async fn test_callback_links_account() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/oauth2/access_token")
            .match_query(Matcher::UrlEncoded("code".into(), "good-code".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": "2.00abc", "expires_in": 3600, "uid": "99"}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/2/users/show.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 99, "name": "zaku", "avatar_hd": "https://tva.example/z.jpg"}).to_string())
            .create_async()
            .await;

        let (state, repo) = test_state(Some(server.url()));
        let (status, body, _) = send_get(
            init_router(state),
            "/oauth/weibo/callback?code=good-code",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], json!("Bearer"));
        assert_eq!(body["account"]["username"], json!("99"));
        assert_eq!(body["account"]["provider"], json!("WEIBO"));
        assert!(body["account"].get("access_token").is_none());

        let stored = repo.find_by_source(SocialProvider::Weibo, "99").await.unwrap();
        assert_eq!(stored.map(|l| l.access_token), Some("2.00abc".to_string()));
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let (state, _) = test_state(None);
        let (status, _, _) = send_get(init_router(state), "/oauth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_linked_account() {
        let (state, repo) = test_state(None);
        let link = repo
            .upsert(
                LinkedAccountInfo {
                    source: SocialProvider::Weibo,
                    username: "99".to_string(),
                    realname: "zaku".to_string(),
                    access_token: "2.00abc".to_string(),
                    avatar: None,
                    expires_in: 3600,
                },
                chrono::Utc::now().naive_utc(),
            )
            .await
            .unwrap();
        let token = LinkService::issue_session(&state.config, &link).unwrap();

        let (status, body, _) = send_get(init_router(state), "/oauth/me", Some(&token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(link.id));
        assert_eq!(body["realname"], json!("zaku"));
    }
}
