//! Relational persistence for roadmap columns and post assignments.
//!
//! [`RoadmapStore`] is built once at startup and shared by every handler.
//! Each public method is one use case and runs inside a single transaction;
//! returning early with an error drops the transaction, which rolls it back.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{post, roadmap_assignment, roadmap_column};
use crate::error::{RoadmapError, RoadmapResult};
use crate::models::{PostSummary, RoadmapAssignment, RoadmapColumn};
use crate::actions::MAX_COLUMN_NAME_CHARS;
use crate::slug::slugify;

#[derive(Clone)]
pub struct RoadmapStore {
    db: DatabaseConnection,
}

impl RoadmapStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Columns of a tenant ordered by position, optionally public-only.
    #[tracing::instrument(skip(self))]
    pub async fn get_roadmap_columns(
        &self,
        tenant_id: i32,
        include_private: bool,
    ) -> RoadmapResult<Vec<RoadmapColumn>> {
        let txn = self.db.begin().await?;
        let columns = find_columns(&txn, tenant_id, include_private).await?;
        txn.commit().await?;
        Ok(columns.into_iter().map(RoadmapColumn::from).collect())
    }

    /// Columns with their posts attached, each list ordered by assignment
    /// position. Columns without posts carry an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn get_roadmap_data(
        &self,
        tenant_id: i32,
        include_private: bool,
    ) -> RoadmapResult<Vec<RoadmapColumn>> {
        let txn = self.db.begin().await?;
        let mut columns: Vec<RoadmapColumn> = find_columns(&txn, tenant_id, include_private)
            .await?
            .into_iter()
            .map(RoadmapColumn::from)
            .collect();

        if !columns.is_empty() {
            let column_ids: Vec<i32> = columns.iter().map(|c| c.id).collect();
            let rows = roadmap_assignment::Entity::find()
                .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
                .filter(roadmap_assignment::Column::ColumnId.is_in(column_ids))
                .order_by_asc(roadmap_assignment::Column::Position)
                .order_by_asc(roadmap_assignment::Column::Id)
                .find_also_related(post::Entity)
                .all(&txn)
                .await?;

            let mut posts_by_column: HashMap<i32, Vec<PostSummary>> = HashMap::new();
            for (assignment, post) in rows {
                // Assignment rows can outlive a post removed elsewhere.
                let Some(post) = post else { continue };
                posts_by_column
                    .entry(assignment.column_id)
                    .or_default()
                    .push(post.into());
            }
            for column in &mut columns {
                column.posts = posts_by_column.remove(&column.id).unwrap_or_default();
            }
        }

        txn.commit().await?;
        Ok(columns)
    }

    /// The post's assignment, or `None` when it is not on the roadmap.
    #[tracing::instrument(skip(self))]
    pub async fn get_post_assignment(
        &self,
        tenant_id: i32,
        post_id: i32,
    ) -> RoadmapResult<Option<RoadmapAssignment>> {
        let txn = self.db.begin().await?;
        let assignment = roadmap_assignment::Entity::find()
            .filter(roadmap_assignment::Column::PostId.eq(post_id))
            .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(assignment.map(RoadmapAssignment::from))
    }

    /// Highest column position of the tenant, 0 when it has no columns.
    pub async fn max_column_position(&self, tenant_id: i32) -> RoadmapResult<i32> {
        let txn = self.db.begin().await?;
        let max = max_position(&txn, tenant_id).await?;
        txn.commit().await?;
        Ok(max)
    }

    pub async fn find_post_by_number(
        &self,
        tenant_id: i32,
        number: i32,
    ) -> RoadmapResult<Option<PostSummary>> {
        let txn = self.db.begin().await?;
        let post = post::Entity::find()
            .filter(post::Column::TenantId.eq(tenant_id))
            .filter(post::Column::Number.eq(number))
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(post.map(PostSummary::from))
    }

    /// Place a post in a column, replacing any earlier assignment of it.
    ///
    /// Sibling positions are left alone; a colliding position is stored as given.
    #[tracing::instrument(skip(self))]
    pub async fn assign_post_to_column(
        &self,
        tenant_id: i32,
        actor_id: i32,
        post_id: i32,
        column_id: i32,
        position: i32,
    ) -> RoadmapResult<RoadmapAssignment> {
        let txn = self.db.begin().await?;

        if find_column(&txn, tenant_id, column_id).await?.is_none() {
            return Err(RoadmapError::NotFound("column"));
        }
        let post = post::Entity::find_by_id(post_id)
            .filter(post::Column::TenantId.eq(tenant_id))
            .one(&txn)
            .await?;
        if post.is_none() {
            return Err(RoadmapError::NotFound("post"));
        }

        let removed = roadmap_assignment::Entity::delete_many()
            .filter(roadmap_assignment::Column::PostId.eq(post_id))
            .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;

        let assignment = roadmap_assignment::ActiveModel {
            post_id: Set(post_id),
            column_id: Set(column_id),
            tenant_id: Set(tenant_id),
            position: Set(position),
            assigned_at: Set(Utc::now()),
            assigned_by_id: Set(actor_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(
            assignment_id = assignment.id,
            replaced = removed.rows_affected > 0,
            "post assigned to roadmap column"
        );
        Ok(assignment.into())
    }

    /// Drop the post's assignment. Missing assignments are not an error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_post_from_roadmap(&self, tenant_id: i32, post_id: i32) -> RoadmapResult<()> {
        let txn = self.db.begin().await?;
        let result = roadmap_assignment::Entity::delete_many()
            .filter(roadmap_assignment::Column::PostId.eq(post_id))
            .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        tracing::info!(removed = result.rows_affected, "post removed from roadmap");
        Ok(())
    }

    /// Overwrite the post's position within its column. No range check, no
    /// adjustment of the other posts in the column.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_post_in_column(
        &self,
        tenant_id: i32,
        post_id: i32,
        new_position: i32,
    ) -> RoadmapResult<()> {
        let txn = self.db.begin().await?;
        let result = roadmap_assignment::Entity::update_many()
            .col_expr(roadmap_assignment::Column::Position, Expr::value(new_position))
            .filter(roadmap_assignment::Column::PostId.eq(post_id))
            .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        tracing::info!(updated = result.rows_affected, "post reordered");
        Ok(())
    }

    /// Append a column after the current highest position.
    #[tracing::instrument(skip(self))]
    pub async fn create_column(
        &self,
        tenant_id: i32,
        actor_id: i32,
        name: &str,
        is_visible_to_public: bool,
    ) -> RoadmapResult<RoadmapColumn> {
        let txn = self.db.begin().await?;
        let position = max_position(&txn, tenant_id).await? + 1;

        let column = roadmap_column::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(name.to_string()),
            slug: Set(slugify(name, MAX_COLUMN_NAME_CHARS)),
            position: Set(position),
            is_visible_to_public: Set(is_visible_to_public),
            created_at: Set(Utc::now()),
            created_by_id: Set(actor_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(column_id = column.id, position, "roadmap column created");
        Ok(column.into())
    }

    /// Rename a column and/or change its visibility. Slug and position stay.
    #[tracing::instrument(skip(self))]
    pub async fn update_column(
        &self,
        tenant_id: i32,
        column_id: i32,
        name: &str,
        is_visible_to_public: bool,
    ) -> RoadmapResult<RoadmapColumn> {
        let txn = self.db.begin().await?;
        let Some(existing) = find_column(&txn, tenant_id, column_id).await? else {
            return Err(RoadmapError::NotFound("column"));
        };

        let mut column: roadmap_column::ActiveModel = existing.into();
        column.name = Set(name.to_string());
        column.is_visible_to_public = Set(is_visible_to_public);
        let updated = column.update(&txn).await?;

        txn.commit().await?;
        tracing::info!("roadmap column updated");
        Ok(updated.into())
    }

    /// Delete a column and every assignment in it. Absent columns are a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn delete_column(&self, tenant_id: i32, column_id: i32) -> RoadmapResult<()> {
        let txn = self.db.begin().await?;
        let assignments = roadmap_assignment::Entity::delete_many()
            .filter(roadmap_assignment::Column::ColumnId.eq(column_id))
            .filter(roadmap_assignment::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;
        let columns = roadmap_column::Entity::delete_many()
            .filter(roadmap_column::Column::Id.eq(column_id))
            .filter(roadmap_column::Column::TenantId.eq(tenant_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        tracing::info!(
            deleted = columns.rows_affected,
            assignments = assignments.rows_affected,
            "roadmap column deleted"
        );
        Ok(())
    }

    /// Set each listed column's position to its index in `column_ids`.
    ///
    /// Columns missing from the list keep their old position.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_columns(&self, tenant_id: i32, column_ids: &[i32]) -> RoadmapResult<()> {
        let txn = self.db.begin().await?;
        for (index, column_id) in column_ids.iter().enumerate() {
            roadmap_column::Entity::update_many()
                .col_expr(roadmap_column::Column::Position, Expr::value(index as i32))
                .filter(roadmap_column::Column::Id.eq(*column_id))
                .filter(roadmap_column::Column::TenantId.eq(tenant_id))
                .exec(&txn)
                .await?;
        }

        let uncovered = roadmap_column::Entity::find()
            .filter(roadmap_column::Column::TenantId.eq(tenant_id))
            .filter(roadmap_column::Column::Id.is_not_in(column_ids.iter().copied()))
            .count(&txn)
            .await?;
        txn.commit().await?;

        if uncovered > 0 {
            tracing::warn!(uncovered, "column reorder did not list every column; their positions are stale");
        }
        tracing::info!(count = column_ids.len(), "roadmap columns reordered");
        Ok(())
    }
}

async fn find_columns<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    include_private: bool,
) -> Result<Vec<roadmap_column::Model>, DbErr> {
    let mut query =
        roadmap_column::Entity::find().filter(roadmap_column::Column::TenantId.eq(tenant_id));
    if !include_private {
        query = query.filter(roadmap_column::Column::IsVisibleToPublic.eq(true));
    }
    query
        .order_by_asc(roadmap_column::Column::Position)
        .order_by_asc(roadmap_column::Column::Id)
        .all(conn)
        .await
}

async fn find_column<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    column_id: i32,
) -> Result<Option<roadmap_column::Model>, DbErr> {
    roadmap_column::Entity::find_by_id(column_id)
        .filter(roadmap_column::Column::TenantId.eq(tenant_id))
        .one(conn)
        .await
}

async fn max_position<C: ConnectionTrait>(conn: &C, tenant_id: i32) -> Result<i32, DbErr> {
    let max: Option<Option<i32>> = roadmap_column::Entity::find()
        .select_only()
        .column_as(Expr::col(roadmap_column::Column::Position).max(), "max_position")
        .filter(roadmap_column::Column::TenantId.eq(tenant_id))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(max.flatten().unwrap_or(0))
}
