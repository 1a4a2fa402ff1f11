// api.rs
use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::actions::{
    Action, AssignPostToRoadmap, CreateRoadmapColumn, DeleteRoadmapColumn,
    GetPostRoadmapAssignment, RemovePostFromRoadmap, ReorderPostInRoadmap, ReorderRoadmapColumns,
    UpdateRoadmapColumn,
};
use crate::auth::{CurrentUser, Session};
use crate::error::{RoadmapError, RoadmapResult};
use crate::models::{
    PostAssignment, RoadmapAssignment, RoadmapColumn, RoadmapData, SuccessResponse,
};
use crate::store::RoadmapStore;

pub struct AppState {
    pub store: RoadmapStore,
}

#[derive(Tags)]
enum ApiTags {
    /// Public roadmap and post triage
    Roadmap,
    /// Column management (administrators)
    RoadmapColumns,
}

pub struct RoadmapApi {
    state: Arc<AppState>,
}

impl RoadmapApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// `postId` wins; otherwise a positive `postNumber` is looked up.
    async fn resolve_post_id(
        &self,
        tenant_id: i32,
        post_id: i32,
        post_number: Option<i32>,
    ) -> RoadmapResult<i32> {
        if post_id > 0 {
            return Ok(post_id);
        }
        match post_number.filter(|n| *n > 0) {
            Some(number) => self.post_id_by_number(tenant_id, number).await,
            None => Ok(post_id),
        }
    }

    async fn post_id_by_number(&self, tenant_id: i32, number: i32) -> RoadmapResult<i32> {
        self.state
            .store
            .find_post_by_number(tenant_id, number)
            .await?
            .map(|post| post.id)
            .ok_or(RoadmapError::NotFound("post"))
    }
}

#[OpenApi]
impl RoadmapApi {
    /// Roadmap columns with their posts; private columns only for collaborators
    #[oai(path = "/roadmap", method = "get", tag = "ApiTags::Roadmap")]
    async fn get_roadmap(&self, session: Session) -> poem::Result<Json<RoadmapData>> {
        let tenant_id = session.tenant_id()?;
        let columns = self
            .state
            .store
            .get_roadmap_data(tenant_id, session.is_collaborator())
            .await?;
        Ok(Json(RoadmapData { columns }))
    }

    /// Assign a post to a column, replacing its previous assignment
    #[oai(path = "/roadmap/assign", method = "post", tag = "ApiTags::Roadmap")]
    async fn assign_post(
        &self,
        session: Session,
        Json(mut action): Json<AssignPostToRoadmap>,
    ) -> poem::Result<Json<RoadmapAssignment>> {
        let user = action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.post_id = self
            .resolve_post_id(tenant_id, action.post_id, action.post_number)
            .await?;
        action.ensure_valid()?;

        let assignment = self
            .state
            .store
            .assign_post_to_column(
                tenant_id,
                user.id,
                action.post_id,
                action.column_id,
                action.position,
            )
            .await?;
        Ok(Json(assignment))
    }

    /// Change a post's position within its column
    #[oai(path = "/roadmap/reorder", method = "post", tag = "ApiTags::Roadmap")]
    async fn reorder_post(
        &self,
        session: Session,
        Json(mut action): Json<ReorderPostInRoadmap>,
    ) -> poem::Result<Json<SuccessResponse>> {
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.post_id = self
            .resolve_post_id(tenant_id, action.post_id, action.post_number)
            .await?;
        action.ensure_valid()?;

        self.state
            .store
            .reorder_post_in_column(tenant_id, action.post_id, action.new_position)
            .await?;
        Ok(Json(SuccessResponse::ok()))
    }

    /// Current roadmap assignment of a post, `null` when unassigned
    #[oai(path = "/roadmap/posts/:number", method = "get", tag = "ApiTags::Roadmap")]
    async fn get_post_assignment(
        &self,
        session: Session,
        Path(number): Path<i32>,
    ) -> poem::Result<Json<PostAssignment>> {
        let mut action = GetPostRoadmapAssignment::default();
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.post_id = self.resolve_post_id(tenant_id, 0, Some(number)).await?;
        action.ensure_valid()?;

        let assignment = self
            .state
            .store
            .get_post_assignment(tenant_id, action.post_id)
            .await?;
        Ok(Json(PostAssignment { assignment }))
    }

    /// Take a post off the roadmap
    #[oai(path = "/roadmap/posts/:number", method = "delete", tag = "ApiTags::Roadmap")]
    async fn remove_post(
        &self,
        session: Session,
        Path(number): Path<i32>,
    ) -> poem::Result<Json<SuccessResponse>> {
        let mut action = RemovePostFromRoadmap::default();
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.post_id = self.resolve_post_id(tenant_id, 0, Some(number)).await?;
        action.ensure_valid()?;

        self.state
            .store
            .remove_post_from_roadmap(tenant_id, action.post_id)
            .await?;
        Ok(Json(SuccessResponse::ok()))
    }

    /// All columns, private ones included
    #[oai(path = "/roadmap/columns", method = "get", tag = "ApiTags::RoadmapColumns")]
    async fn list_columns(&self, session: Session) -> poem::Result<Json<Vec<RoadmapColumn>>> {
        session.require(CurrentUser::is_administrator)?;
        let tenant_id = session.tenant_id()?;
        let columns = self.state.store.get_roadmap_columns(tenant_id, true).await?;
        Ok(Json(columns))
    }

    /// Create a column at the end of the roadmap
    #[oai(path = "/roadmap/columns", method = "post", tag = "ApiTags::RoadmapColumns")]
    async fn create_column(
        &self,
        session: Session,
        Json(action): Json<CreateRoadmapColumn>,
    ) -> poem::Result<Json<RoadmapColumn>> {
        let user = action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.ensure_valid()?;

        let column = self
            .state
            .store
            .create_column(tenant_id, user.id, &action.name, action.is_visible_to_public)
            .await?;
        Ok(Json(column))
    }

    /// Rename a column or change its visibility
    #[oai(path = "/roadmap/columns/:id", method = "put", tag = "ApiTags::RoadmapColumns")]
    async fn update_column(
        &self,
        session: Session,
        Path(id): Path<i32>,
        Json(mut action): Json<UpdateRoadmapColumn>,
    ) -> poem::Result<Json<RoadmapColumn>> {
        action.column_id = id;
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.ensure_valid()?;

        let column = self
            .state
            .store
            .update_column(tenant_id, action.column_id, &action.name, action.is_visible_to_public)
            .await?;
        Ok(Json(column))
    }

    /// Delete a column and every assignment in it
    #[oai(path = "/roadmap/columns/:id", method = "delete", tag = "ApiTags::RoadmapColumns")]
    async fn delete_column(
        &self,
        session: Session,
        Path(id): Path<i32>,
    ) -> poem::Result<Json<SuccessResponse>> {
        let action = DeleteRoadmapColumn { column_id: id };
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.ensure_valid()?;

        self.state.store.delete_column(tenant_id, action.column_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }

    /// Rewrite column positions from the given id order
    #[oai(path = "/roadmap/columns/reorder", method = "post", tag = "ApiTags::RoadmapColumns")]
    async fn reorder_columns(
        &self,
        session: Session,
        Json(action): Json<ReorderRoadmapColumns>,
    ) -> poem::Result<Json<SuccessResponse>> {
        action.authorize(&session)?;
        let tenant_id = session.tenant_id()?;
        action.ensure_valid()?;

        self.state
            .store
            .reorder_columns(tenant_id, &action.column_ids)
            .await?;
        Ok(Json(SuccessResponse::ok()))
    }
}
