// entities/roadmap_assignment.rs
use sea_orm::entity::prelude::*;

/// Placement of one post in one roadmap column.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roadmap_post_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub post_id: i32,
    pub column_id: i32,
    pub tenant_id: i32,
    pub position: i32,
    pub assigned_at: DateTimeUtc,
    pub assigned_by_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roadmap_column::Entity",
        from = "Column::ColumnId",
        to = "super::roadmap_column::Column::Id",
        on_delete = "Cascade"
    )]
    RoadmapColumn,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::roadmap_column::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoadmapColumn.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
