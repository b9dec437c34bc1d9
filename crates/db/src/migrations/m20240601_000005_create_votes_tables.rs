//! Create posts_votes and comments_votes tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostsVotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostsVotes::PostId).integer().not_null())
                    .col(ColumnDef::new(PostsVotes::AuthorId).integer().not_null())
                    .col(ColumnDef::new(PostsVotes::Vote).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostsVotes::PostId)
                            .col(PostsVotes::AuthorId),
                    )
                    .check(Expr::col(PostsVotes::Vote).is_in([-1, 1]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_votes_post")
                            .from(PostsVotes::Table, PostsVotes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_votes_author")
                            .from(PostsVotes::Table, PostsVotes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommentsVotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CommentsVotes::CommentId).integer().not_null())
                    .col(ColumnDef::new(CommentsVotes::AuthorId).integer().not_null())
                    .col(ColumnDef::new(CommentsVotes::Vote).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CommentsVotes::CommentId)
                            .col(CommentsVotes::AuthorId),
                    )
                    .check(Expr::col(CommentsVotes::Vote).is_in([-1, 1]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_votes_comment")
                            .from(CommentsVotes::Table, CommentsVotes::CommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_votes_author")
                            .from(CommentsVotes::Table, CommentsVotes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentsVotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostsVotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostsVotes {
    Table,
    PostId,
    AuthorId,
    Vote,
}

#[derive(Iden)]
enum CommentsVotes {
    Table,
    CommentId,
    AuthorId,
    Vote,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
}
