use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use collab_core::{DomainError, digits_only, is_valid_inn, normalize_phone_ru};
use collab_types::api::{Claims, OwnProfile, PublicProfileResponse, UpdateProfileRequest};
use collab_types::models::Profile;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::views::{listing_view, own_profile, public_profile};

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<OwnProfile>, ApiError> {
    state
        .store
        .with_doc(|doc| doc.profile(claims.sub).map(own_profile))?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<OwnProfile>, ApiError> {
    let now = Utc::now();
    let view = state.store.with_doc_mut(|doc| {
        let profile = doc.profile_mut(claims.sub).ok_or_else(ApiError::not_found)?;
        apply_profile_update(profile, req)?;
        profile.updated_at = Some(now);
        Ok::<_, ApiError>(own_profile(profile))
    })?;

    info!("Profile of {} updated, trust {}", claims.sub, view.trust.trust_score);
    Ok(Json(view))
}

/// Merge `req` into `profile` and validate the private block.
/// Leaves `profile` partially updated on error; the store rolls it back.
pub fn apply_profile_update(profile: &mut Profile, req: UpdateProfileRequest) -> Result<(), DomainError> {
    // public
    if let Some(v) = req.display_name {
        profile.display_name = Some(v);
    }
    if let Some(v) = req.brand_name {
        profile.brand_name = Some(v);
    }
    if let Some(v) = req.marketplaces {
        profile.marketplaces = v;
    }
    if let Some(v) = req.categories {
        profile.categories = v;
    }
    if let Some(v) = req.region {
        profile.region = Some(v);
    }
    if let Some(v) = req.about {
        profile.about = Some(v);
    }
    if let Some(v) = req.biz_type {
        profile.biz_type = Some(v);
    }
    if let Some(n) = req.sales_monthly_rub.as_ref().and_then(parse_number) {
        profile.sales_monthly_rub = Some(n);
    }

    // private
    if let Some(v) = req.legal_name {
        profile.legal_name = v;
    }
    if let Some(v) = req.inn {
        profile.inn = Some(v.as_deref().map(digits_only).unwrap_or_default());
    }
    if let Some(v) = req.phone {
        let normalized = v
            .as_deref()
            .and_then(normalize_phone_ru)
            .ok_or(DomainError::InvalidPhone)?;
        profile.phone = Some(normalized);
    }
    if let Some(v) = req.contact_email {
        profile.contact_email = v;
    }
    if let Some(v) = req.contact_telegram {
        profile.contact_telegram = v;
    }

    if profile.phone.as_deref().is_none_or(str::is_empty) {
        return Err(DomainError::PhoneRequired);
    }
    if let Some(inn) = profile.inn.as_deref().filter(|s| !s.is_empty()) {
        if !is_valid_inn(inn) {
            return Err(DomainError::InvalidInn);
        }
    }
    Ok(())
}

fn parse_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

pub async fn get_public_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicProfileResponse>, ApiError> {
    let user_id: Uuid = user_id.parse().map_err(|_| ApiError::not_found())?;

    state
        .store
        .with_doc(|doc| {
            let profile = doc.profile(user_id)?;
            let listings = doc
                .listings_of(user_id)
                .into_iter()
                .filter(|l| l.visible_to(claims.sub))
                .map(|l| listing_view(doc, l))
                .collect();
            Some(PublicProfileResponse {
                profile: public_profile(profile),
                listings,
            })
        })?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(body: Value) -> UpdateProfileRequest {
        serde_json::from_value(body).unwrap()
    }

    fn with_phone() -> Profile {
        Profile {
            phone: Some("+79990000000".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_phone_is_required() {
        let mut p = Profile::default();
        let err = apply_profile_update(&mut p, update(json!({ "brand_name": "B" }))).unwrap_err();
        assert_eq!(err, DomainError::PhoneRequired);
    }

    #[test]
    fn test_phone_is_normalized() {
        let mut p = Profile::default();
        apply_profile_update(&mut p, update(json!({ "phone": "8 999 111-22-33" }))).unwrap();
        assert_eq!(p.phone.as_deref(), Some("+79991112233"));
    }

    #[test]
    fn test_invalid_phone_rejected() {
        let mut p = with_phone();
        let err = apply_profile_update(&mut p, update(json!({ "phone": "123" }))).unwrap_err();
        assert_eq!(err, DomainError::InvalidPhone);

        let err = apply_profile_update(&mut p, update(json!({ "phone": null }))).unwrap_err();
        assert_eq!(err, DomainError::InvalidPhone);
    }

    #[test]
    fn test_inn_is_stripped_and_checked() {
        let mut p = with_phone();
        apply_profile_update(&mut p, update(json!({ "inn": "7812-001-002" }))).unwrap();
        assert_eq!(p.inn.as_deref(), Some("7812001002"));

        let err = apply_profile_update(&mut p, update(json!({ "inn": "12345" }))).unwrap_err();
        assert_eq!(err, DomainError::InvalidInn);

        // clearing is allowed
        apply_profile_update(&mut p, update(json!({ "inn": null }))).unwrap();
        assert_eq!(p.inn.as_deref(), Some(""));
    }

    #[test]
    fn test_null_public_field_keeps_value_but_private_clears() {
        let mut p = with_phone();
        p.brand_name = Some("Brand".into());
        p.legal_name = Some("LLC".into());
        apply_profile_update(&mut p, update(json!({ "brand_name": null, "legal_name": null }))).unwrap();
        assert_eq!(p.brand_name.as_deref(), Some("Brand"));
        assert_eq!(p.legal_name, None);
    }

    #[test]
    fn test_sales_accepts_numeric_strings() {
        let mut p = with_phone();
        apply_profile_update(&mut p, update(json!({ "sales_monthly_rub": "250000" }))).unwrap();
        assert_eq!(p.sales_monthly_rub, Some(250_000.0));

        apply_profile_update(&mut p, update(json!({ "sales_monthly_rub": "lots" }))).unwrap();
        assert_eq!(p.sales_monthly_rub, Some(250_000.0));
    }
}
