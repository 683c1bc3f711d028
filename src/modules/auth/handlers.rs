use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use super::callback::CallbackParams;
use super::service::LinkService;
use crate::modules::accounts::handlers::LinkedAccountResponse;
use crate::shared::{cache::RequestCache, error::AppResult, state::AppState};

#[derive(Deserialize)]
pub struct LoginParams {
    state: Option<String>,
}

#[derive(Serialize)]
pub struct LinkResponse {
    pub token: String,
    pub token_type: &'static str,
    pub account: LinkedAccountResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<LoginParams>,
) -> AppResult<Redirect> {
    let provider = state.auth_registry.resolve(&provider)?;
    let auth_url = provider.get_authorization_url(params.state.as_deref())?;
    Ok(Redirect::temporary(&auth_url))
}

pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    cache: RequestCache,
    Query(params): Query<CallbackParams>,
) -> AppResult<Json<LinkResponse>> {
    let provider = state.auth_registry.resolve(&provider)?;
    let code = params.extract_code()?;

    let link = LinkService::link_account(
        provider.as_ref(),
        &cache,
        state.account_repo.as_ref(),
        code,
    )
    .await?;
    let token = LinkService::issue_session(&state.config, &link)?;

    Ok(Json(LinkResponse {
        token,
        token_type: "Bearer",
        account: link.into(),
    }))
}
