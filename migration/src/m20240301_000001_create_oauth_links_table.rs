use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OauthLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OauthLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OauthLinks::Username).string().not_null())
                    .col(ColumnDef::new(OauthLinks::Realname).string().not_null())
                    .col(ColumnDef::new(OauthLinks::Source).string().not_null())
                    .col(ColumnDef::new(OauthLinks::AccessToken).string().not_null())
                    .col(ColumnDef::new(OauthLinks::Avatar).string())
                    .col(ColumnDef::new(OauthLinks::Expires).timestamp().not_null())
                    .col(
                        ColumnDef::new(OauthLinks::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OauthLinks::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One link per provider account
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_oauth_links_source_username")
                    .table(OauthLinks::Table)
                    .col(OauthLinks::Source)
                    .col(OauthLinks::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OauthLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OauthLinks {
    Table,
    Id,
    Username,
    Realname,
    Source,
    AccessToken,
    Avatar,
    Expires,
    CreatedAt,
    UpdatedAt,
}
