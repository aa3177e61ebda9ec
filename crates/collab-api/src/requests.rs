use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use collab_core::RequestAction;
use collab_core::lifecycle::{MatchResolution, apply_request_action, check_new_request, resolve_match};
use collab_types::api::{Claims, ConfirmResponse, CreateMatchRequest, MatchRequestView};
use collab_types::models::{MatchRequest, RequestStatus};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::listings::parse_id;
use crate::projects::insert_project;
use crate::views::request_view;

pub async fn incoming_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<MatchRequestView>>, ApiError> {
    let items = state.store.with_doc(|doc| {
        doc.incoming_requests(claims.sub)
            .into_iter()
            .map(|r| request_view(doc, r))
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

pub async fn outgoing_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<MatchRequestView>>, ApiError> {
    let items = state.store.with_doc(|doc| {
        doc.outgoing_requests(claims.sub)
            .into_iter()
            .map(|r| request_view(doc, r))
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

/// POST /api/match-requests: open a pending request against a published listing.
///
/// The project is either an existing one owned by the caller (`project_id`) or
/// created on the spot from `project_create`.
pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(body): AppJson<CreateMatchRequest>,
) -> Result<Json<MatchRequestView>, ApiError> {
    let caller = claims.sub;
    let listing_id = body.listing_id.as_deref().and_then(|s| s.parse::<Uuid>().ok());
    let now = Utc::now();

    let view = state.store.with_doc_mut(|doc| {
        let listing = listing_id
            .and_then(|id| doc.listing(id))
            .cloned()
            .ok_or(ApiError::NotFound("LISTING_NOT_FOUND"))?;
        check_new_request(&listing, caller, &doc.match_requests)?;

        let project_ref = body.project_id.filter(|s| !s.trim().is_empty());
        let project_id = match (project_ref, body.project_create) {
            (Some(raw), _) => raw
                .parse::<Uuid>()
                .map_err(|_| ApiError::BadRequest("INVALID_PROJECT"))?,
            (None, Some(input)) => {
                insert_project(doc, caller, input, "PROJECT_MISSING_FIELDS", now)?.id
            }
            (None, None) => return Err(ApiError::BadRequest("PROJECT_REQUIRED")),
        };
        if !doc.project(project_id).is_some_and(|p| p.owner_user_id == caller) {
            return Err(ApiError::BadRequest("INVALID_PROJECT"));
        }

        let request = MatchRequest {
            id: Uuid::new_v4(),
            from_user_id: caller,
            to_user_id: listing.owner_user_id,
            listing_id: listing.id,
            project_id,
            pitch: body.pitch.unwrap_or_default(),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        doc.match_requests.push(request.clone());
        Ok(request_view(doc, &request))
    })?;

    info!(
        "Match request {} opened by {} for listing {}",
        view.request.id, caller, view.request.listing_id
    );
    Ok(Json(view))
}

/// Apply a status transition that has no side effects beyond the request itself.
fn transition(
    state: &AppState,
    caller: Uuid,
    id: &str,
    action: RequestAction,
) -> Result<Json<MatchRequestView>, ApiError> {
    let id = parse_id(id)?;
    let now = Utc::now();
    let view = state.store.with_doc_mut(|doc| {
        let req = doc.request_mut(id).ok_or_else(ApiError::not_found)?;
        apply_request_action(req, caller, action, now)?;
        let req = req.clone();
        Ok::<_, ApiError>(request_view(doc, &req))
    })?;

    info!(
        "Match request {} -> {} by {}",
        id, view.request.status, caller
    );
    Ok(Json(view))
}

/// Step one of the handshake: the listing owner accepts. Contacts stay hidden.
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MatchRequestView>, ApiError> {
    transition(&state, claims.sub, &id, RequestAction::Accept)
}

pub async fn reject_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MatchRequestView>, ApiError> {
    transition(&state, claims.sub, &id, RequestAction::Reject)
}

pub async fn cancel_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MatchRequestView>, ApiError> {
    transition(&state, claims.sub, &id, RequestAction::Cancel)
}

/// Step two: the requester confirms, which opens (or reuses) the pair's match.
pub async fn confirm_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let id = parse_id(&id)?;
    let now = Utc::now();

    let (resolution, view) = state.store.with_doc_mut(|doc| {
        let req = doc.request_mut(id).ok_or_else(ApiError::not_found)?;
        apply_request_action(req, claims.sub, RequestAction::Confirm, now)?;
        let req = req.clone();

        let resolution = resolve_match(&req, &doc.matches, now);
        if let MatchResolution::Created(m) = &resolution {
            doc.matches.push(m.clone());
        }
        Ok::<_, ApiError>((resolution, request_view(doc, &req)))
    })?;

    let match_id = resolution.match_id();
    match resolution {
        MatchResolution::Created(_) => info!("Match {} created from request {}", match_id, id),
        MatchResolution::Existing(_) => info!("Request {} attached to existing match {}", id, match_id),
    }

    Ok(Json(ConfirmResponse {
        ok: true,
        match_id,
        request: view,
    }))
}
