//! Wire types returned by the roadmap API.

use chrono::{DateTime, Utc};
use poem_openapi::Object;

use crate::entities::{post, roadmap_assignment, roadmap_column};

/// The subset of a post shown on roadmap cards.
#[derive(Debug, Clone, PartialEq, Eq, Object)]
#[oai(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i32,
    pub number: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub status: String,
    pub votes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<post::Model> for PostSummary {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id,
            number: m.number,
            title: m.title,
            slug: m.slug,
            description: m.description,
            status: m.status,
            votes_count: m.votes_count,
            comments_count: m.comments_count,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
#[oai(rename_all = "camelCase")]
pub struct RoadmapColumn {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_visible_to_public: bool,
    pub created_at: DateTime<Utc>,
    pub created_by_id: i32,
    /// Only populated by roadmap data queries; never persisted on the column.
    pub posts: Vec<PostSummary>,
}

impl From<roadmap_column::Model> for RoadmapColumn {
    fn from(m: roadmap_column::Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            name: m.name,
            slug: m.slug,
            position: m.position,
            is_visible_to_public: m.is_visible_to_public,
            created_at: m.created_at,
            created_by_id: m.created_by_id,
            posts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
#[oai(rename_all = "camelCase")]
pub struct RoadmapAssignment {
    pub id: i32,
    pub post_id: i32,
    pub column_id: i32,
    pub tenant_id: i32,
    pub position: i32,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by_id: i32,
}

impl From<roadmap_assignment::Model> for RoadmapAssignment {
    fn from(m: roadmap_assignment::Model) -> Self {
        Self {
            id: m.id,
            post_id: m.post_id,
            column_id: m.column_id,
            tenant_id: m.tenant_id,
            position: m.position,
            assigned_at: m.assigned_at,
            assigned_by_id: m.assigned_by_id,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct RoadmapData {
    pub columns: Vec<RoadmapColumn>,
}

/// Assignment lookup result; `null` when the post is not on the roadmap.
#[derive(Debug, Clone, Object)]
pub struct PostAssignment {
    pub assignment: Option<RoadmapAssignment>,
}

#[derive(Debug, Clone, Object)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
