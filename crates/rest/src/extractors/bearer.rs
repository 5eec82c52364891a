//! Bearer credential extractor.
//!
//! Reads `Authorization: Bearer <token>` without rejecting the request; the
//! handler decides what a missing credential means.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use fhirbridge_store::{AccessToken, AuthError};

/// The caller's bearer token, if one was presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCredentials(Option<AccessToken>);

impl BearerCredentials {
    /// Extracts the credential from request headers.
    ///
    /// The scheme is matched case-insensitively; an empty token counts as
    /// absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| {
                let (scheme, token) = value.trim().split_once(' ')?;
                scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
            })
            .filter(|token| !token.is_empty())
            .map(AccessToken::new);
        Self(token)
    }

    /// The token, if present.
    pub fn token(&self) -> Option<&AccessToken> {
        self.0.as_ref()
    }

    /// The token, or [`AuthError::MissingCredentials`].
    pub fn require(&self) -> Result<&AccessToken, AuthError> {
        self.0.as_ref().ok_or(AuthError::MissingCredentials)
    }
}

impl<S> FromRequestParts<S> for BearerCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        let credentials = BearerCredentials::from_headers(&headers("Bearer abc.def.ghi"));
        assert_eq!(credentials.token(), Some(&AccessToken::new("abc.def.ghi")));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let credentials = BearerCredentials::from_headers(&headers("bearer tok"));
        assert_eq!(credentials.token().map(AccessToken::as_str), Some("tok"));
    }

    #[test]
    fn test_missing_header() {
        let credentials = BearerCredentials::from_headers(&HeaderMap::new());
        assert_eq!(credentials.token(), None);
        assert_eq!(credentials.require(), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_rejects_other_schemes_and_empty_tokens() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer    ", "token-only"] {
            assert_eq!(BearerCredentials::from_headers(&headers(value)).token(), None);
        }
    }
}
