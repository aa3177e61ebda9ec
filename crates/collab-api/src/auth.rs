use std::path::PathBuf;
use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use collab_db::Store;
use collab_types::api::{AuthResponse, Claims, LoginRequest, MeResponse, OkResponse, RegisterRequest};
use collab_types::models::{CONSENT_VERSION, Consent, ConsentType, Profile, User};

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::views::own_profile;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    pub jwt_secret: String,
    /// Mark the session cookie `Secure` (production, behind TLS).
    pub secure_cookies: bool,
    pub uploads_dir: PathBuf,
}

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "collab_token";
const SESSION_DAYS: i64 = 7;
const MIN_PASSWORD_LEN: usize = 6;

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password), Some(display_name)) = (
        non_empty(req.email),
        req.password.filter(|p| !p.is_empty()),
        non_empty(req.display_name),
    ) else {
        return Err(ApiError::missing_fields());
    };
    if !req.accept_privacy {
        return Err(ApiError::BadRequest("PRIVACY_REQUIRED"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest("WEAK_PASSWORD"));
    }
    let email = email.to_lowercase();

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing password: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();
    let now = Utc::now();

    state.store.with_doc_mut(|doc| {
        if doc.user_by_email(&email).is_some() {
            return Err(ApiError::Conflict("EMAIL_EXISTS"));
        }
        doc.users.push(User {
            id: user_id,
            email: email.clone(),
            password_hash,
            created_at: now,
        });
        doc.profiles.push(Profile::new(user_id, display_name, now));
        doc.consents.push(Consent {
            id: Uuid::new_v4(),
            user_id,
            kind: ConsentType::Privacy,
            version: CONSENT_VERSION.to_string(),
            created_at: now,
        });
        Ok(())
    })?;

    info!("Registered user {} <{}>", user_id, email);

    let token = create_token(&state.jwt_secret, user_id, &email)?;
    Ok((
        jar.add(session_cookie(token, state.secure_cookies)),
        Json(AuthResponse { user_id, email }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password)) = (non_empty(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(ApiError::missing_fields());
    };

    let user = state
        .store
        .with_doc(|doc| doc.user_by_email(&email).cloned())?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| anyhow::anyhow!("stored hash for {} is malformed: {}", user.id, e))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            warn!("Failed login for {}", user.email);
            ApiError::InvalidCredentials
        })?;

    let token = create_token(&state.jwt_secret, user.id, &user.email)?;
    Ok((
        jar.add(session_cookie(token, state.secure_cookies)),
        Json(AuthResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(OkResponse::ok()),
    )
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MeResponse>, ApiError> {
    let profile = state
        .store
        .with_doc(|doc| doc.profile(claims.sub).map(own_profile))?;

    Ok(Json(MeResponse {
        user_id: claims.sub,
        email: claims.email,
        profile,
    }))
}

pub fn create_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}
