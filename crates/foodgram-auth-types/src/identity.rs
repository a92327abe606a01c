//! Gateway-injected identity headers extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use foodgram_domain::user::UserRole;

/// Header carrying the authenticated user's id (UUID).
pub const USER_ID_HEADER: &str = "x-foodgram-user-id";

/// Header carrying the authenticated user's role (`u8` wire value).
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and `x-foodgram-user-role`.
///
/// Returns 401 if either header is absent or malformed.
/// Object permissions (author or staff) are checked by usecases after extraction.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

/// Identity of a request that may be anonymous.
///
/// `None` when the gateway injected no user id. A present but malformed
/// identity is still rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct OptionalIdentity(pub Option<IdentityHeaders>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.map(|identity| identity.user_id)
    }
}

/// Raw header lookup. `Ok(None)` means no identity was sent at all.
fn parse_identity(parts: &Parts) -> Result<Option<IdentityHeaders>, StatusCode> {
    let Some(raw_id) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    let user_id = raw_id
        .to_str()
        .ok()
        .and_then(|s| s.parse::<Uuid>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_role = parts
        .headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u8>().ok())
        .and_then(UserRole::from_u8)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Some(IdentityHeaders { user_id, user_role }))
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { identity?.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parse_identity(parts);
        async move { identity.map(OptionalIdentity) }
    }
}
