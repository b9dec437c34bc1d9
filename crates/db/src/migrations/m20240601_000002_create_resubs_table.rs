//! Create resubs table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resubs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resubs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resubs::Name).string_len(32).not_null())
                    .col(ColumnDef::new(Resubs::Description).text())
                    .col(ColumnDef::new(Resubs::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Resubs::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Resubs::Edited).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resubs_owner")
                            .from(Resubs::Table, Resubs::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_resubs_name")
                    .table(Resubs::Table)
                    .col(Resubs::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_resubs_created")
                    .table(Resubs::Table)
                    .col(Resubs::Created)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resubs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resubs {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    Created,
    Edited,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
