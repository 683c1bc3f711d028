use crate::modules::accounts::infra::persistence::{
    InMemoryLinkedAccountRepository, PostgresLinkedAccountRepository,
};
use crate::modules::accounts::repository::LinkedAccountRepository;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub fn init_account_repo(db: Option<DatabaseConnection>) -> Arc<dyn LinkedAccountRepository> {
    match db {
        Some(db) => {
            tracing::info!("Using PostgreSQL linked account repository");
            Arc::new(PostgresLinkedAccountRepository::new(Arc::new(db)))
        }
        None => {
            tracing::warn!("Using InMemory linked account repository for Dev Env");
            Arc::new(InMemoryLinkedAccountRepository::default())
        }
    }
}
