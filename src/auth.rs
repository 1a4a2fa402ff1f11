//! Request identity: bearer-token verification and the [`Session`] extractor.
//!
//! Tokens are minted by the surrounding application; this service only
//! verifies them. An authenticated session takes its tenant from the token.
//! The user is optional so the public roadmap can be served to anonymous
//! visitors, who name their tenant with the `X-Tenant-ID` header instead.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use poem::{
    http::{header, HeaderMap, StatusCode},
    FromRequest, Request, RequestBody,
};
use serde::{Deserialize, Serialize};

use crate::error::{RoadmapError, RoadmapResult};

pub const TENANT_HEADER: &str = "x-tenant-id";

/// User role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Visitor,
    Collaborator,
    Administrator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id
    pub sub: String,
    pub tenant_id: i32,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: Role,
}

impl CurrentUser {
    /// Collaborators and administrators may triage posts.
    pub fn is_collaborator(&self) -> bool {
        self.role >= Role::Collaborator
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }
}

/// Tenant and (optional) user of the current request.
///
/// Anonymous requests may lack a tenant; that only fails once a handler
/// asks for it, so mutations still answer 401 rather than a tenant error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    tenant: Option<i32>,
    pub user: Option<CurrentUser>,
}

impl Session {
    pub fn new(tenant_id: i32, user: Option<CurrentUser>) -> Self {
        Self {
            tenant: Some(tenant_id),
            user,
        }
    }

    pub fn anonymous(tenant: Option<i32>) -> Self {
        Self { tenant, user: None }
    }

    pub fn tenant_id(&self) -> RoadmapResult<i32> {
        self.tenant.ok_or(RoadmapError::MissingTenant)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_collaborator(&self) -> bool {
        self.user.is_some_and(|u| u.is_collaborator())
    }

    /// The user, if `allowed`; 401 without a user, 403 otherwise.
    pub fn require(&self, allowed: impl FnOnce(&CurrentUser) -> bool) -> RoadmapResult<CurrentUser> {
        match self.user {
            Some(user) if allowed(&user) => Ok(user),
            Some(_) => Err(RoadmapError::Forbidden),
            None => Err(RoadmapError::Unauthenticated),
        }
    }
}

/// Verifies (and, for tooling and tests, issues) HS256 bearer tokens.
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(
        &self,
        user_id: i32,
        tenant_id: i32,
        role: Role,
        ttl_secs: i64,
    ) -> RoadmapResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id,
            role,
            exp: Utc::now().timestamp() + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| RoadmapError::InvalidToken(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> RoadmapResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| RoadmapError::InvalidToken(e.to_string()))
    }

    /// Resolve the session from request headers.
    ///
    /// A present but invalid token is rejected even on public routes.
    pub fn session(&self, headers: &HeaderMap) -> RoadmapResult<Session> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.strip_prefix("Bearer ")
                    .ok_or_else(|| RoadmapError::InvalidToken("expected bearer scheme".into()))
            })
            .transpose()?;

        if let Some(token) = bearer {
            let claims = self.verify(token.trim())?;
            let id = claims
                .sub
                .parse::<i32>()
                .map_err(|_| RoadmapError::InvalidToken("subject is not a user id".into()))?;
            return Ok(Session::new(
                claims.tenant_id,
                Some(CurrentUser {
                    id,
                    role: claims.role,
                }),
            ));
        }

        let tenant = headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|id| *id > 0);

        Ok(Session::anonymous(tenant))
    }
}

impl<'a> FromRequest<'a> for Session {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> poem::Result<Self> {
        let auth = req.data::<Arc<Authenticator>>().ok_or_else(|| {
            poem::Error::from_string(
                "authenticator not configured",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        })?;
        Ok(auth.session(req.headers())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_role_ordering() {
        let admin = CurrentUser { id: 1, role: Role::Administrator };
        let collab = CurrentUser { id: 2, role: Role::Collaborator };
        let visitor = CurrentUser { id: 3, role: Role::Visitor };

        assert!(admin.is_collaborator() && admin.is_administrator());
        assert!(collab.is_collaborator() && !collab.is_administrator());
        assert!(!visitor.is_collaborator());
    }

    #[test]
    fn test_token_roundtrip_session() -> RoadmapResult<()> {
        let auth = Authenticator::new("test_secret");
        let token = auth.issue(42, 7, Role::Collaborator, 3600)?;

        let session = auth.session(&bearer(&token))?;
        assert_eq!(session.tenant_id()?, 7);
        assert_eq!(
            session.user,
            Some(CurrentUser { id: 42, role: Role::Collaborator })
        );
        Ok(())
    }

    #[test]
    fn test_wrong_secret_rejected() -> RoadmapResult<()> {
        let token = Authenticator::new("one").issue(1, 1, Role::Administrator, 3600)?;
        let result = Authenticator::new("two").session(&bearer(&token));
        assert!(matches!(result, Err(RoadmapError::InvalidToken(_))));
        Ok(())
    }

    #[test]
    fn test_expired_token_rejected() -> RoadmapResult<()> {
        let auth = Authenticator::new("test_secret");
        let token = auth.issue(1, 1, Role::Administrator, -3600)?;
        assert!(matches!(
            auth.session(&bearer(&token)),
            Err(RoadmapError::InvalidToken(_))
        ));
        Ok(())
    }

    #[test]
    fn test_anonymous_session_uses_tenant_header() -> RoadmapResult<()> {
        let auth = Authenticator::new("test_secret");
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_HEADER, HeaderValue::from_static("3"));

        let session = auth.session(&headers)?;
        assert_eq!(session.tenant_id()?, 3);
        assert!(session.user.is_none());
        assert!(!session.is_collaborator());
        Ok(())
    }

    #[test]
    fn test_anonymous_without_tenant() -> RoadmapResult<()> {
        let auth = Authenticator::new("test_secret");
        let session = auth.session(&HeaderMap::new())?;
        assert!(session.user().is_none());
        assert!(matches!(session.tenant_id(), Err(RoadmapError::MissingTenant)));
        Ok(())
    }
}
