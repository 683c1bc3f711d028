pub mod database;
pub mod repositories;
pub mod services;

use crate::shared::{config::Config, state::AppState};
use sea_orm::DbErr;
use std::sync::Arc;

pub async fn create_app_state(config: &Config) -> Result<AppState, DbErr> {
    let db = if config.is_dev() {
        None
    } else {
        let db = database::connect_postgres(config).await?;
        tracing::info!("Connected to database");
        Some(db)
    };

    Ok(AppState {
        config: Arc::new(config.clone()),
        auth_registry: services::init_auth_registry(config),
        account_repo: repositories::init_account_repo(db),
    })
}
