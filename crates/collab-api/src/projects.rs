use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use collab_core::DomainError;
use collab_core::lifecycle::check_project_quota;
use collab_db::Document;
use collab_types::api::{Claims, OkResponse, ProjectInput};
use collab_types::models::Project;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::listings::parse_id;

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let items = state.store.with_doc(|doc| {
        doc.projects_of(claims.sub)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

/// Create a project for `owner` inside an open mutation. Shared with inline
/// creation from a match request, which reports missing fields under its own code.
pub(crate) fn insert_project(
    doc: &mut Document,
    owner: Uuid,
    input: ProjectInput,
    missing_code: &'static str,
    now: DateTime<Utc>,
) -> Result<Project, ApiError> {
    check_project_quota(doc.project_count(owner))?;

    let title = input.title.filter(|s| !s.trim().is_empty());
    let idea = input.idea.filter(|s| !s.trim().is_empty());
    let (Some(title), Some(idea)) = (title, idea) else {
        return Err(ApiError::BadRequest(missing_code));
    };

    let project = Project {
        id: Uuid::new_v4(),
        owner_user_id: owner,
        title,
        idea,
        goals: input.goals,
        investments: input.investments,
        responsibilities: input.responsibilities,
        created_at: now,
        updated_at: now,
    };
    doc.projects.push(project.clone());
    Ok(project)
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(input): AppJson<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    let now = Utc::now();
    let project = state
        .store
        .with_doc_mut(|doc| insert_project(doc, claims.sub, input, "MISSING_FIELDS", now))?;

    info!("Project {} created by {}", project.id, claims.sub);
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    AppJson(input): AppJson<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&id)?;
    let project = state.store.with_doc_mut(|doc| {
        let p = doc
            .owned_project_mut(id, claims.sub)
            .ok_or_else(ApiError::not_found)?;
        if let Some(v) = input.title {
            p.title = v;
        }
        if let Some(v) = input.idea {
            p.idea = v;
        }
        if let Some(v) = input.goals {
            p.goals = Some(v);
        }
        if let Some(v) = input.investments {
            p.investments = Some(v);
        }
        if let Some(v) = input.responsibilities {
            p.responsibilities = Some(v);
        }
        p.updated_at = Utc::now();
        Ok::<_, ApiError>(p.clone())
    })?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.store.with_doc_mut(|doc| {
        if doc.project_in_use(id, claims.sub) {
            return Err(DomainError::ProjectInUse.into());
        }
        doc.remove_owned_project(id, claims.sub)
            .map(|_| ())
            .ok_or_else(ApiError::not_found)
    })?;

    info!("Project {} deleted by {}", id, claims.sub);
    Ok(Json(OkResponse::ok()))
}
