use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

/// Bearer-токен из заголовка Authorization
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Claims запроса или 401
fn authenticate(req: &Request<Body>) -> Result<TokenClaims, StatusCode> {
    let token = bearer_token(req).ok_or(StatusCode::UNAUTHORIZED)?;

    super::jwt::validate_token(token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {:#}", e);
        StatusCode::UNAUTHORIZED
    })
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = authenticate(&req)?;

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::jwt::generate_access_token;

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/u501/import/town");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        assert_eq!(
            authenticate(&request(None)).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert_eq!(
            authenticate(&request(Some("Bearer not-a-token"))).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_token_without_bearer_prefix_is_unauthorized() {
        let token = generate_access_token("user-1", false, &["import"]).unwrap();
        assert_eq!(
            authenticate(&request(Some(&token))).unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let token = generate_access_token("user-1", false, &["import"]).unwrap();
        let claims = authenticate(&request(Some(&format!("Bearer {}", token)))).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.can_import());
    }
}
