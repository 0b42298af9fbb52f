//! Caller identity shared between the HTTP layer and business modules.
//!
//! Modules do NOT validate tokens. The server binary's middleware decodes
//! the JWT and stores [`Claims`] in request extensions; handlers extract
//! [`CurrentStudent`] from there. Modules stay free of any JWT dependency.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// JWT claims payload carried through request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the student id, as a string.
    pub sub: String,
    /// Display name, if the student record has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// The authenticated student's id, extracted from validated [`Claims`].
///
/// Rejects with 401 when the middleware did not run for this route or the
/// subject claim is not an integer id.
#[derive(Debug, Clone, Copy)]
pub struct CurrentStudent(pub i64);

impl<S> FromRequestParts<S> for CurrentStudent
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| ServiceError::Unauthorized("missing credentials".into()))?;
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ServiceError::Unauthorized("invalid subject claim".into()))?;
        Ok(CurrentStudent(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(claims: Option<Claims>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/votes");
        if let Some(c) = claims {
            builder = builder.extension(c);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_student_id_from_claims() {
        let mut parts = parts_with(Some(Claims {
            sub: "42".into(),
            name: Some("Alice".into()),
            iat: 0,
            exp: i64::MAX,
        }));
        let CurrentStudent(id) = CurrentStudent::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn rejects_missing_claims() {
        let mut parts = parts_with(None);
        let err = CurrentStudent::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_non_integer_subject() {
        let mut parts = parts_with(Some(Claims {
            sub: "root".into(),
            name: None,
            iat: 0,
            exp: i64::MAX,
        }));
        let err = CurrentStudent::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
