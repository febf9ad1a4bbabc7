use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, StatusCode};

/// Identity of the caller, already verified by the fronting authentication
/// proxy. This service never inspects tokens itself; it trusts the headers
/// the proxy injects after verification.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

fn header(headers: &HeaderMap, key: &str) -> Option<String> {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(&parts.headers, "x-user-id");
        let email = header(&parts.headers, "x-user-email");

        match (id, email) {
            (Some(id), Some(email)) => {
                let name = header(&parts.headers, "x-user-name")
                    .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
                Ok(AuthUser { id, email, name })
            }
            _ => Err((StatusCode::UNAUTHORIZED, "Unauthorized")),
        }
    }
}
