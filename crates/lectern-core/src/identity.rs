//! Gateway-injected identity headers extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;

/// Header carrying the verified Firebase uid of the caller.
pub const FIREBASE_UID_HEADER: &str = "x-lectern-firebase-uid";
/// Header carrying the verified email of the caller, when the provider has one.
pub const EMAIL_HEADER: &str = "x-lectern-email";

/// Caller identity injected by the gateway after it verified the Firebase ID token.
///
/// Rejects with 401 if `x-lectern-firebase-uid` is absent or blank.
/// Role enforcement (403) is done after the user record is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub firebase_uid: String,
    pub email: Option<String>,
}

impl IdentityHeaders {
    fn from_parts(parts: &Parts) -> Option<Self> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let firebase_uid = header(FIREBASE_UID_HEADER)?;
        Some(Self {
            firebase_uid,
            email: header(EMAIL_HEADER),
        })
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Extract synchronously and return a 'static future; an `async fn` here
    // would capture the `parts` lifetime.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        async move { identity.ok_or(AppError::Unauthorized) }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        async move { Ok(identity) }
    }
}
