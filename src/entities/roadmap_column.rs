// entities/roadmap_column.rs
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roadmap_columns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_visible_to_public: bool,
    pub created_at: DateTimeUtc,
    pub created_by_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roadmap_assignment::Entity")]
    RoadmapAssignment,
}

impl Related<super::roadmap_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoadmapAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
