use axum::{Json, extract::State};
use serde::Serialize;

use crate::modules::accounts::entities::{enums::SocialProvider, linked_account};
use crate::modules::auth::service::Claims;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Serialize, Debug)]
pub struct LinkedAccountResponse {
    pub id: i32,
    pub provider: SocialProvider,
    pub username: String,
    pub realname: String,
    pub avatar: Option<String>,
    pub expires: chrono::NaiveDateTime,
    pub linked_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<linked_account::Model> for LinkedAccountResponse {
    fn from(link: linked_account::Model) -> Self {
        Self {
            id: link.id,
            provider: link.source,
            username: link.username,
            realname: link.realname,
            avatar: link.avatar,
            expires: link.expires,
            linked_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

pub async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> AppResult<Json<LinkedAccountResponse>> {
    let id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let link = state
        .account_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(link.into()))
}
