//! Authentication extractors and the permission step.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::sync::Arc;

use blog_core::domain::Author;
use blog_core::permissions::{self, Access, Owned, Permission};
use blog_core::ports::{TokenClaims, TokenService};

use super::error::{AppError, AppResult};

/// The caller behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl Identity {
    /// The author reference for posts this caller creates.
    pub fn as_author(&self) -> Author {
        Author {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Resolve the `Authorization` header into an identity.
///
/// Only the `Bearer` scheme is ours. Any other scheme, or a header that is
/// not valid text, leaves the caller anonymous.
fn authenticate(req: &HttpRequest) -> AppResult<Option<Identity>> {
    let Some(value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return Ok(None);
    };

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return Ok(None),
    }

    let token = parts.next().ok_or_else(|| {
        AppError::Unauthorized("Invalid token header. No credentials provided.".to_string())
    })?;
    if parts.next().is_some() {
        return Err(AppError::Unauthorized(
            "Invalid token header. Token string should not contain spaces.".to_string(),
        ));
    }

    let token_service = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| AppError::Internal("TokenService not found in app data".to_string()))?;

    let claims = token_service.validate_token(token)?;
    Ok(Some(Identity::from(claims)))
}

/// The caller of a request: who they are, if anyone, and whether the
/// request method reads or writes.
///
/// Handlers take this and let their permission policy decide whether an
/// anonymous caller is acceptable:
/// ```ignore
/// async fn protected_route(caller: Caller) -> AppResult<HttpResponse> {
///     caller.authorize(&IsAuthenticated)?;
///     Ok(HttpResponse::Ok().body(caller.required()?.username.clone()))
/// }
/// ```
///
/// No `Authorization` header, or one using a scheme other than `Bearer`,
/// means an anonymous caller. A `Bearer` header that does not hold a valid
/// token is rejected with 401.
#[derive(Debug, Clone)]
pub struct Caller {
    identity: Option<Identity>,
    access: Access,
}

impl Caller {
    pub fn user_id(&self) -> Option<i64> {
        self.identity.as_ref().map(|identity| identity.user_id)
    }

    /// The identity, once a policy has established that one is present.
    pub fn required(&self) -> AppResult<&Identity> {
        self.identity.as_ref().ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided.".to_string())
        })
    }

    /// Run the request-level check of `policy`.
    pub fn authorize(&self, policy: &dyn Permission) -> AppResult<()> {
        permissions::check(policy, self.access, self.user_id()).map_err(AppError::from)
    }

    /// Run the record-level check of `policy` against a loaded record.
    pub fn authorize_object(&self, policy: &dyn Permission, object: &dyn Owned) -> AppResult<()> {
        permissions::check_object(policy, self.access, self.user_id(), object)
            .map_err(AppError::from)
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let access = Access::from_method(req.method().as_str());
        ready(authenticate(req).map(|identity| Caller { identity, access }))
    }
}
