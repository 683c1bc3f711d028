use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::modules::accounts::dtos::LinkedAccountInfo;
use crate::modules::accounts::entities::{enums::SocialProvider, linked_account};
use crate::modules::accounts::repository::LinkedAccountRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::SeaOrmRepository;

fn expires_at(now: NaiveDateTime, expires_in: i64) -> NaiveDateTime {
    Duration::try_seconds(expires_in.max(0))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(now)
}

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresLinkedAccountRepository = SeaOrmRepository<linked_account::Entity>;

#[async_trait]
impl LinkedAccountRepository for PostgresLinkedAccountRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<linked_account::Model>> {
        linked_account::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(AppError::DbError)
    }

    async fn find_by_source(
        &self,
        source: SocialProvider,
        username: &str,
    ) -> AppResult<Option<linked_account::Model>> {
        Self::find_by_source_internal(self.connection(), source, username).await
    }

    async fn upsert(
        &self,
        info: LinkedAccountInfo,
        now: NaiveDateTime,
    ) -> AppResult<linked_account::Model> {
        let txn = self.begin().await?;
        let result = Self::upsert_internal(&txn, info, now).await;
        Self::finish(txn, result).await
    }
}

impl SeaOrmRepository<linked_account::Entity> {
    async fn find_by_source_internal<C>(
        db: &C,
        source: SocialProvider,
        username: &str,
    ) -> AppResult<Option<linked_account::Model>>
    where
        C: ConnectionTrait,
    {
        linked_account::Entity::find()
            .filter(linked_account::Column::Source.eq(source))
            .filter(linked_account::Column::Username.eq(username))
            .one(db)
            .await
            .map_err(AppError::DbError)
    }

    async fn upsert_internal<C>(
        db: &C,
        info: LinkedAccountInfo,
        now: NaiveDateTime,
    ) -> AppResult<linked_account::Model>
    where
        C: ConnectionTrait,
    {
        let expires = expires_at(now, info.expires_in);

        match Self::find_by_source_internal(db, info.source, &info.username).await? {
            Some(existing) => {
                tracing::debug!("Refreshing {} link {}", info.source.as_str(), existing.id);
                let mut link: linked_account::ActiveModel = existing.into();
                link.access_token = Set(info.access_token);
                link.expires = Set(expires);
                link.avatar = Set(info.avatar);
                link.updated_at = Set(now);
                link.update(db).await.map_err(AppError::DbError)
            }
            None => {
                tracing::debug!("Creating {} link for {}", info.source.as_str(), info.username);
                let link = linked_account::ActiveModel {
                    username: Set(info.username),
                    realname: Set(info.realname),
                    source: Set(info.source),
                    access_token: Set(info.access_token),
                    avatar: Set(info.avatar),
                    expires: Set(expires),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };

                // A concurrent callback may have inserted the same link since the lookup
                linked_account::Entity::insert(link)
                    .on_conflict(
                        OnConflict::columns([
                            linked_account::Column::Source,
                            linked_account::Column::Username,
                        ])
                        .update_columns([
                            linked_account::Column::AccessToken,
                            linked_account::Column::Avatar,
                            linked_account::Column::Expires,
                            linked_account::Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec_with_returning(db)
                    .await
                    .map_err(AppError::DbError)
            }
        }
    }
}

// =========================================================================
// InMemory Implementation
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryLinkedAccountRepository {
    links: Arc<Mutex<Vec<linked_account::Model>>>,
}

impl InMemoryLinkedAccountRepository {
    fn links(&self) -> AppResult<MutexGuard<'_, Vec<linked_account::Model>>> {
        self.links
            .lock()
            .map_err(|_| AppError::InternalServerError("Link store poisoned".to_string()))
    }
}

#[async_trait]
impl LinkedAccountRepository for InMemoryLinkedAccountRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<linked_account::Model>> {
        Ok(self.links()?.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_source(
        &self,
        source: SocialProvider,
        username: &str,
    ) -> AppResult<Option<linked_account::Model>> {
        Ok(self
            .links()?
            .iter()
            .find(|l| l.source == source && l.username == username)
            .cloned())
    }

    async fn upsert(
        &self,
        info: LinkedAccountInfo,
        now: NaiveDateTime,
    ) -> AppResult<linked_account::Model> {
        let mut links = self.links()?;
        let expires = expires_at(now, info.expires_in);

        if let Some(existing) = links
            .iter_mut()
            .find(|l| l.source == info.source && l.username == info.username)
        {
            existing.access_token = info.access_token;
            existing.expires = expires;
            existing.avatar = info.avatar;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = links.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let link = linked_account::Model {
            id,
            username: info.username,
            realname: info.realname,
            source: info.source,
            access_token: info.access_token,
            avatar: info.avatar,
            expires,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());
        Ok(link)
    }
}
