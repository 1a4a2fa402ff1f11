//! User-submitted roadmap actions.
//!
//! Every action is bound from the request, then checked in two steps before
//! anything is written: [`Action::authorize`] against the session user, then
//! [`Action::ensure_valid`], which reports every invalid field at once.

use poem_openapi::Object;
use validator::{Validate, ValidationError};

use crate::auth::{CurrentUser, Session};
use crate::error::{RoadmapError, RoadmapResult};
use crate::validate::ValidationResult;

pub const MAX_COLUMN_NAME_CHARS: usize = 100;

pub trait Action: Validate {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool;

    fn validation(&self) -> ValidationResult {
        match self.validate() {
            Ok(()) => ValidationResult::success(),
            Err(errors) => errors.into(),
        }
    }

    /// The acting user, or 401 without one and 403 with the wrong role.
    fn authorize(&self, session: &Session) -> RoadmapResult<CurrentUser> {
        session.require(|user| self.is_authorized(Some(user)))
    }

    fn ensure_valid(&self) -> RoadmapResult<()> {
        let result = self.validation();
        if result.is_ok() {
            Ok(())
        } else {
            Err(RoadmapError::Validation(result))
        }
    }
}

fn is_collaborator(user: Option<&CurrentUser>) -> bool {
    user.is_some_and(|u| u.is_collaborator())
}

fn is_administrator(user: Option<&CurrentUser>) -> bool {
    user.is_some_and(|u| u.is_administrator())
}

fn validate_column_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Name is required".into()));
    }
    if name.chars().count() > MAX_COLUMN_NAME_CHARS {
        return Err(ValidationError::new("length")
            .with_message("Name must be less than 100 characters".into()));
    }
    Ok(())
}

/// Put a post into a roadmap column.
#[derive(Debug, Clone, Default, Object, Validate)]
#[oai(rename_all = "camelCase")]
pub struct AssignPostToRoadmap {
    #[oai(default)]
    #[validate(range(min = 1, message = "Post ID is required"))]
    pub post_id: i32,
    /// May be sent instead of `postId`.
    pub post_number: Option<i32>,
    #[oai(default)]
    #[validate(range(min = 1, message = "Column ID is required"))]
    pub column_id: i32,
    #[oai(default)]
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: i32,
}

impl Action for AssignPostToRoadmap {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_collaborator(user)
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RemovePostFromRoadmap {
    #[validate(range(min = 1, message = "Post ID is required"))]
    pub post_id: i32,
}

impl Action for RemovePostFromRoadmap {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_collaborator(user)
    }
}

/// Look up where a post sits on the roadmap.
#[derive(Debug, Clone, Default, Validate)]
pub struct GetPostRoadmapAssignment {
    #[validate(range(min = 1, message = "Post ID is required"))]
    pub post_id: i32,
}

impl Action for GetPostRoadmapAssignment {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_collaborator(user)
    }
}

/// Move a post within its column.
#[derive(Debug, Clone, Default, Object, Validate)]
#[oai(rename_all = "camelCase")]
pub struct ReorderPostInRoadmap {
    #[oai(default)]
    #[validate(range(min = 1, message = "Post ID is required"))]
    pub post_id: i32,
    /// May be sent instead of `postId`.
    pub post_number: Option<i32>,
    #[oai(default)]
    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub new_position: i32,
}

impl Action for ReorderPostInRoadmap {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_collaborator(user)
    }
}

#[derive(Debug, Clone, Default, Object, Validate)]
#[oai(rename_all = "camelCase")]
pub struct CreateRoadmapColumn {
    #[oai(default)]
    #[validate(custom(function = "validate_column_name"))]
    pub name: String,
    #[oai(default)]
    pub is_visible_to_public: bool,
}

impl Action for CreateRoadmapColumn {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_administrator(user)
    }
}

#[derive(Debug, Clone, Default, Object, Validate)]
#[oai(rename_all = "camelCase")]
pub struct UpdateRoadmapColumn {
    /// Taken from the request path.
    #[oai(default)]
    #[validate(range(min = 1, message = "Column ID is required"))]
    pub column_id: i32,
    #[oai(default)]
    #[validate(custom(function = "validate_column_name"))]
    pub name: String,
    #[oai(default)]
    pub is_visible_to_public: bool,
}

impl Action for UpdateRoadmapColumn {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_administrator(user)
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct DeleteRoadmapColumn {
    #[validate(range(min = 1, message = "Column ID is required"))]
    pub column_id: i32,
}

impl Action for DeleteRoadmapColumn {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_administrator(user)
    }
}

/// The complete, ordered list of a tenant's column ids.
#[derive(Debug, Clone, Default, Object, Validate)]
#[oai(rename_all = "camelCase")]
pub struct ReorderRoadmapColumns {
    #[oai(default)]
    #[validate(length(min = 1, message = "At least one column ID is required"))]
    pub column_ids: Vec<i32>,
}

impl Action for ReorderRoadmapColumns {
    fn is_authorized(&self, user: Option<&CurrentUser>) -> bool {
        is_administrator(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn user(role: Role) -> Session {
        Session::new(1, Some(CurrentUser { id: 10, role }))
    }

    fn anonymous() -> Session {
        Session::anonymous(Some(1))
    }

    #[test]
    fn test_assign_collects_every_field_failure() {
        let action = AssignPostToRoadmap {
            post_id: 0,
            post_number: None,
            column_id: -1,
            position: -5,
        };
        let result = action.validation();
        assert!(!result.is_ok());
        assert_eq!(result.failures().len(), 3);
        assert_eq!(result.failure_for("postId"), Some("Post ID is required"));
        assert_eq!(result.failure_for("columnId"), Some("Column ID is required"));
        assert_eq!(result.failure_for("position"), Some("Position must be non-negative"));
    }

    #[test]
    fn test_assign_valid() {
        let action = AssignPostToRoadmap {
            post_id: 3,
            post_number: None,
            column_id: 2,
            position: 0,
        };
        assert!(action.validation().is_ok());
        assert!(action.ensure_valid().is_ok());
    }

    #[test]
    fn test_reorder_post_validation() {
        let action = ReorderPostInRoadmap {
            post_id: 0,
            post_number: None,
            new_position: -1,
        };
        let result = action.validation();
        assert_eq!(result.failures().len(), 2);
        assert_eq!(result.failure_for("newPosition"), Some("Position must be non-negative"));
    }

    #[test]
    fn test_remove_requires_post() {
        let result = RemovePostFromRoadmap { post_id: 0 }.validation();
        assert_eq!(result.failure_for("postId"), Some("Post ID is required"));
        assert!(RemovePostFromRoadmap { post_id: 1 }.validation().is_ok());
    }

    #[test]
    fn test_assignment_lookup_is_collaborator_only() {
        let action = GetPostRoadmapAssignment { post_id: 1 };
        assert!(matches!(action.authorize(&user(Role::Visitor)), Err(RoadmapError::Forbidden)));
        assert!(action.authorize(&user(Role::Collaborator)).is_ok());
        assert!(GetPostRoadmapAssignment { post_id: 0 }.ensure_valid().is_err());
    }

    #[test]
    fn test_column_name_rules() {
        let empty = CreateRoadmapColumn {
            name: "   ".into(),
            is_visible_to_public: true,
        };
        assert_eq!(empty.validation().failure_for("name"), Some("Name is required"));

        let long = CreateRoadmapColumn {
            name: "x".repeat(101),
            is_visible_to_public: true,
        };
        let result = long.validation();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(
            result.failure_for("name"),
            Some("Name must be less than 100 characters")
        );

        let exact = CreateRoadmapColumn {
            name: "é".repeat(100),
            is_visible_to_public: false,
        };
        assert!(exact.validation().is_ok());
    }

    #[test]
    fn test_update_column_validation() {
        let action = UpdateRoadmapColumn {
            column_id: 0,
            name: String::new(),
            is_visible_to_public: false,
        };
        let result = action.validation();
        assert_eq!(result.failures().len(), 2);
        assert_eq!(result.failure_for("columnId"), Some("Column ID is required"));
        assert_eq!(result.failure_for("name"), Some("Name is required"));
    }

    #[test]
    fn test_delete_and_reorder_columns_validation() {
        assert_eq!(
            DeleteRoadmapColumn { column_id: 0 }.validation().failure_for("columnId"),
            Some("Column ID is required")
        );
        assert_eq!(
            ReorderRoadmapColumns { column_ids: vec![] }
                .validation()
                .failure_for("columnIds"),
            Some("At least one column ID is required")
        );
        assert!(ReorderRoadmapColumns { column_ids: vec![3, 1, 2] }.validation().is_ok());
    }

    #[test]
    fn test_validation_is_independent_of_authorization() {
        let action = CreateRoadmapColumn::default();
        let before = action.validation();
        assert!(!action.is_authorized(None));
        assert!(!action.is_authorized(user(Role::Collaborator).user()));
        assert_eq!(action.validation(), before);
    }

    #[test]
    fn test_collaborator_actions_authorization() {
        let action = AssignPostToRoadmap::default();
        assert!(matches!(action.authorize(&anonymous()), Err(RoadmapError::Unauthenticated)));
        assert!(matches!(action.authorize(&user(Role::Visitor)), Err(RoadmapError::Forbidden)));
        assert!(action.authorize(&user(Role::Collaborator)).is_ok());
        assert!(action.authorize(&user(Role::Administrator)).is_ok());
    }

    #[test]
    fn test_admin_actions_authorization() {
        let action = ReorderRoadmapColumns::default();
        assert!(matches!(action.authorize(&anonymous()), Err(RoadmapError::Unauthenticated)));
        assert!(matches!(
            action.authorize(&user(Role::Collaborator)),
            Err(RoadmapError::Forbidden)
        ));
        let admin = action.authorize(&user(Role::Administrator));
        assert_eq!(admin.ok().map(|u| u.id), Some(10));
    }
}
