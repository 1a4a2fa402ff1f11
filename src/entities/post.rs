// entities/post.rs
use sea_orm::entity::prelude::*;

/// Feedback post. Owned by the wider application; the roadmap only reads it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub number: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub status: String,
    pub votes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::roadmap_assignment::Entity")]
    RoadmapAssignment,
}

impl Related<super::roadmap_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoadmapAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
