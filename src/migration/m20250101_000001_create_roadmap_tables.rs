//! Create `posts`, `roadmap_columns` and `roadmap_post_assignments`.
//!
//! Every table carries `tenant_id`; lookups are always tenant-scoped.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posts::TenantId).integer().not_null())
                    .col(ColumnDef::new(Posts::Number).integer().not_null())
                    .col(ColumnDef::new(Posts::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Posts::Slug).string_len(200).not_null())
                    .col(ColumnDef::new(Posts::Description).text().not_null())
                    .col(
                        ColumnDef::new(Posts::Status)
                            .string_len(32)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Posts::VotesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Posts::CommentsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_posts_tenant_number")
                    .table(Posts::Table)
                    .col(Posts::TenantId)
                    .col(Posts::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoadmapColumns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoadmapColumns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoadmapColumns::TenantId).integer().not_null())
                    .col(ColumnDef::new(RoadmapColumns::Name).string_len(100).not_null())
                    .col(ColumnDef::new(RoadmapColumns::Slug).string_len(100).not_null())
                    .col(ColumnDef::new(RoadmapColumns::Position).integer().not_null())
                    .col(
                        ColumnDef::new(RoadmapColumns::IsVisibleToPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RoadmapColumns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapColumns::CreatedById)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_roadmap_columns_tenant_position")
                    .table(RoadmapColumns::Table)
                    .col(RoadmapColumns::TenantId)
                    .col(RoadmapColumns::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoadmapPostAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::PostId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::ColumnId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoadmapPostAssignments::AssignedById)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roadmap_assignment_column")
                            .from(RoadmapPostAssignments::Table, RoadmapPostAssignments::ColumnId)
                            .to(RoadmapColumns::Table, RoadmapColumns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roadmap_assignment_post")
                            .from(RoadmapPostAssignments::Table, RoadmapPostAssignments::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One assignment per post and tenant; a racing second assign fails here.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_roadmap_assignment_tenant_post")
                    .table(RoadmapPostAssignments::Table)
                    .col(RoadmapPostAssignments::TenantId)
                    .col(RoadmapPostAssignments::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_roadmap_assignment_column_position")
                    .table(RoadmapPostAssignments::Table)
                    .col(RoadmapPostAssignments::ColumnId)
                    .col(RoadmapPostAssignments::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoadmapPostAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoadmapColumns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    TenantId,
    Number,
    Title,
    Slug,
    Description,
    Status,
    VotesCount,
    CommentsCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RoadmapColumns {
    Table,
    Id,
    TenantId,
    Name,
    Slug,
    Position,
    IsVisibleToPublic,
    CreatedAt,
    CreatedById,
}

#[derive(DeriveIden)]
enum RoadmapPostAssignments {
    Table,
    Id,
    PostId,
    ColumnId,
    TenantId,
    Position,
    AssignedAt,
    AssignedById,
}
