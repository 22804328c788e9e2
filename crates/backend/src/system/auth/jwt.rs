use anyhow::{Context, Result};
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, DecodingKey, Validation};
use once_cell::sync::OnceCell;

/// Секрет для локальной разработки, если не задан ни в config.toml, ни в JWT_SECRET
const DEV_JWT_SECRET: &str = "dev-only-import-service-secret";

static JWT_SECRET: OnceCell<String> = OnceCell::new();

/// Установить секрет проверки токенов (вызывается один раз при старте)
pub fn init_jwt_secret(configured: Option<String>) {
    let secret = match configured {
        Some(secret) => secret,
        None => {
            tracing::warn!(
                "No JWT secret configured ([auth] jwt_secret or JWT_SECRET), using development secret"
            );
            DEV_JWT_SECRET.to_string()
        }
    };
    if JWT_SECRET.set(secret).is_err() {
        tracing::warn!("JWT secret already initialized, keeping the existing one");
    }
}

fn jwt_secret() -> &'static str {
    JWT_SECRET.get().map(String::as_str).unwrap_or(DEV_JWT_SECRET)
}

/// Validate JWT token and extract claims
pub fn validate_token(token: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// Выпуск токена (только для тестов: выдача токенов вне этого сервиса)
#[cfg(test)]
pub fn generate_access_token(
    user_id: &str,
    is_admin: bool,
    permissions: &[&str],
) -> Result<String> {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        username: user_id.to_string(),
        is_admin,
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .context("Failed to encode JWT token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = generate_access_token("user-1", false, &["import"]).unwrap();
        let claims = validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.can_import());
        assert!(!claims.can_view_all_imports());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(validate_token("not-a-token").is_err());
    }
}
