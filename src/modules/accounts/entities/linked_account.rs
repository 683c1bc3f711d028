use super::enums::SocialProvider;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A provider account linked to this service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "oauth_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The provider's user id.
    #[sea_orm(index)]
    pub username: String,
    pub realname: String,
    pub source: SocialProvider,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub avatar: Option<String>,
    pub expires: DateTime,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
