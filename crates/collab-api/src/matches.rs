use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::info;

use collab_core::DomainError;
use collab_core::lifecycle::terminate_match;
use collab_types::api::{Claims, MatchDetail, MatchListItem, OkResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::listings::parse_id;
use crate::views::{match_detail, owner_summary};

pub async fn list_matches(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<MatchListItem>>, ApiError> {
    let items = state.store.with_doc(|doc| {
        doc.matches_of(claims.sub)
            .into_iter()
            .map(|m| MatchListItem::new(m, owner_summary(doc, m.counterpart(claims.sub))))
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

pub async fn get_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MatchDetail>, ApiError> {
    let id = parse_id(&id)?;
    let detail = state.store.with_doc(|doc| {
        let m = doc.match_by_id(id).ok_or_else(ApiError::not_found)?;
        if !m.involves(claims.sub) {
            return Err(ApiError::from(DomainError::Forbidden));
        }
        Ok(match_detail(doc, m, claims.sub))
    })??;
    Ok(Json(detail))
}

/// Either participant may end the match. Contacts are hidden from then on.
pub async fn end_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id)?;
    let now = Utc::now();
    state.store.with_doc_mut(|doc| {
        let m = doc.match_mut(id).ok_or_else(ApiError::not_found)?;
        terminate_match(m, claims.sub, now)?;
        Ok::<_, ApiError>(())
    })?;

    info!("Match {} ended by {}", id, claims.sub);
    Ok(Json(OkResponse::ok()))
}
