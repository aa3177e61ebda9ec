use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};

use collab_types::api::Claims;

use crate::auth::{AppState, SESSION_COOKIE};
use crate::error::ApiError;

/// Extract and validate the JWT from the session cookie.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(ApiError::Unauthorized)?;

    let claims = decode_token(&state.jwt_secret, &token).ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_token;
    use uuid::Uuid;

    #[test]
    fn test_token_roundtrip_requires_same_secret() {
        let user_id = Uuid::new_v4();
        let token = create_token("secret-a", user_id, "a@example.com").unwrap();

        let claims = decode_token("secret-a", &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");

        assert!(decode_token("secret-b", &token).is_none());
        assert!(decode_token("secret-a", "not-a-jwt").is_none());
    }
}
