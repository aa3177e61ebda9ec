use axum::{Extension, Json, extract::State};
use chrono::Utc;
use uuid::Uuid;

use collab_types::api::{Claims, ConsentRequest, HealthResponse, OkResponse, PrivacyResponse};
use collab_types::models::{CONSENT_VERSION, Consent, ConsentType};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::AppJson;

const COOKIES_NOTICE: &str = "Мы используем только технические cookie для авторизации и работы сервиса. \
Мы не собираем аналитику и не передаем данные третьим лицам в рамках MVP.";

const PERSONAL_DATA_NOTICE: &str = "Данные профиля используются для поиска партнёров. \
Приватные реквизиты раскрываются только после взаимного согласия (match).";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: Utc::now(),
    })
}

pub async fn privacy() -> Json<PrivacyResponse> {
    Json(PrivacyResponse {
        cookies: COOKIES_NOTICE,
        personal_data: PERSONAL_DATA_NOTICE,
    })
}

pub async fn record_consent(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<ConsentRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let kind = req
        .kind
        .as_deref()
        .and_then(ConsentType::parse)
        .ok_or(ApiError::BadRequest("INVALID_TYPE"))?;

    state.store.with_doc_mut(|doc| {
        doc.consents.push(Consent {
            id: Uuid::new_v4(),
            user_id: claims.sub,
            kind,
            version: CONSENT_VERSION.to_string(),
            created_at: Utc::now(),
        });
        Ok::<_, ApiError>(())
    })?;
    Ok(Json(OkResponse::ok()))
}
