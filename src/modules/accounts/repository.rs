use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::dtos::LinkedAccountInfo;
use super::entities::{enums::SocialProvider, linked_account};
use crate::shared::error::AppResult;

#[async_trait]
pub trait LinkedAccountRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<linked_account::Model>>;

    async fn find_by_source(
        &self,
        source: SocialProvider,
        username: &str,
    ) -> AppResult<Option<linked_account::Model>>;

    /// Inserts the link, or refreshes token, expiry and avatar of an
    /// existing one. The stored real name is never overwritten.
    async fn upsert(
        &self,
        info: LinkedAccountInfo,
        now: NaiveDateTime,
    ) -> AppResult<linked_account::Model>;
}
