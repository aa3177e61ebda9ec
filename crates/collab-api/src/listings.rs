use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use collab_core::DomainError;
use collab_db::Document;
use collab_types::api::{
    Claims, CreateListingRequest, ListingQuery, ListingView, OkResponse, UpdateListingRequest,
};
use collab_types::models::{Listing, ListingKind};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::{AppJson, AppQuery};
use crate::views::listing_view;

/// Search filters after trimming; empty strings are dropped.
#[derive(Debug, Default)]
struct ListingFilter {
    q: Option<String>,
    kind: Option<ListingKind>,
    region: Option<String>,
    marketplace: Option<String>,
    category: Option<String>,
    biz_type: Option<String>,
    sales_from: Option<f64>,
    sales_to: Option<f64>,
}

fn lowered(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

impl From<ListingQuery> for ListingFilter {
    fn from(q: ListingQuery) -> Self {
        Self {
            q: lowered(q.q),
            // an unknown kind is ignored rather than matching nothing
            kind: q.kind.as_deref().map(str::trim).and_then(ListingKind::parse),
            region: lowered(q.region),
            marketplace: lowered(q.marketplace),
            category: lowered(q.category),
            biz_type: q.biz_type.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            sales_from: number(q.sales_from),
            sales_to: number(q.sales_to),
        }
    }
}

fn number(v: Option<String>) -> Option<f64> {
    v.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn contains_ci(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.to_lowercase() == needle)
}

impl ListingFilter {
    fn matches(&self, doc: &Document, l: &Listing) -> bool {
        if let Some(q) = &self.q {
            if !l.title.to_lowercase().contains(q) && !l.description.to_lowercase().contains(q) {
                return false;
            }
        }
        if self.kind.is_some_and(|k| k != l.kind) {
            return false;
        }
        if let Some(region) = &self.region {
            let own = l.region.as_deref().unwrap_or_default().to_lowercase();
            if !own.contains(region) {
                return false;
            }
        }
        if let Some(m) = &self.marketplace {
            if !contains_ci(&l.marketplaces, m) {
                return false;
            }
        }
        if let Some(c) = &self.category {
            if !contains_ci(&l.categories, c) {
                return false;
            }
        }

        // owner profile filters
        if self.biz_type.is_none() && self.sales_from.is_none() && self.sales_to.is_none() {
            return true;
        }
        let Some(p) = doc.profile(l.owner_user_id) else {
            return false;
        };
        if let Some(bt) = &self.biz_type {
            if p.biz_type.as_deref() != Some(bt.as_str()) {
                return false;
            }
        }
        let sales = p.sales_monthly_rub.unwrap_or(0.0);
        if self.sales_from.is_some_and(|from| sales < from) {
            return false;
        }
        if self.sales_to.is_some_and(|to| sales > to) {
            return false;
        }
        true
    }
}

pub async fn search_listings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppQuery(query): AppQuery<ListingQuery>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let filter = ListingFilter::from(query);
    let items = state.store.with_doc(|doc| {
        doc.visible_listings(claims.sub)
            .into_iter()
            .filter(|l| filter.matches(doc, l))
            .map(|l| listing_view(doc, l))
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

pub async fn my_listings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let items = state.store.with_doc(|doc| {
        doc.listings_of(claims.sub)
            .into_iter()
            .map(|l| listing_view(doc, l))
            .collect::<Vec<_>>()
    })?;
    Ok(Json(items))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ListingView>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .with_doc(|doc| {
            doc.listing(id)
                .filter(|l| l.visible_to(claims.sub))
                .map(|l| listing_view(doc, l))
        })?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

fn required(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

pub async fn create_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<CreateListingRequest>,
) -> Result<Json<Listing>, ApiError> {
    let kind = req
        .kind
        .as_deref()
        .and_then(ListingKind::parse)
        .ok_or(DomainError::InvalidKind)?;
    let (Some(title), Some(description)) = (required(req.title), required(req.description)) else {
        return Err(ApiError::missing_fields());
    };

    let now = Utc::now();
    let listing = Listing {
        id: Uuid::new_v4(),
        owner_user_id: claims.sub,
        kind,
        title,
        description,
        region: req.region,
        marketplaces: req.marketplaces.unwrap_or_default(),
        categories: req.categories.unwrap_or_default(),
        tags: req.tags.unwrap_or_default(),
        published: req.published != Some(false),
        created_at: now,
        updated_at: now,
    };

    state.store.with_doc_mut(|doc| {
        doc.listings.push(listing.clone());
        Ok::<_, ApiError>(())
    })?;

    info!("Listing {} ({:?}) created by {}", listing.id, listing.kind, claims.sub);
    Ok(Json(listing))
}

/// Run `f` on a listing the caller owns, persist, and return the enriched view.
fn mutate_own_listing<F>(state: &AppState, caller: Uuid, id: Uuid, f: F) -> Result<ListingView, ApiError>
where
    F: FnOnce(&mut Listing) -> Result<(), ApiError>,
{
    state.store.with_doc_mut(|doc| {
        let listing = doc.listing_mut(id).ok_or_else(ApiError::not_found)?;
        if listing.owner_user_id != caller {
            return Err(DomainError::Forbidden.into());
        }
        f(listing)?;
        listing.updated_at = Utc::now();
        let listing = listing.clone();
        Ok(listing_view(doc, &listing))
    })
}

pub async fn update_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateListingRequest>,
) -> Result<Json<ListingView>, ApiError> {
    let id = parse_id(&id)?;
    let view = mutate_own_listing(&state, claims.sub, id, |l| {
        if let Some(kind) = req.kind.as_deref().filter(|k| !k.is_empty()) {
            l.kind = ListingKind::parse(kind).ok_or(DomainError::InvalidKind)?;
        }
        if let Some(v) = req.title {
            l.title = v;
        }
        if let Some(v) = req.description {
            l.description = v;
        }
        if let Some(v) = req.region {
            l.region = v;
        }
        if let Some(v) = req.marketplaces {
            l.marketplaces = v.unwrap_or_default();
        }
        if let Some(v) = req.categories {
            l.categories = v.unwrap_or_default();
        }
        if let Some(v) = req.tags {
            l.tags = v.unwrap_or_default();
        }
        if let Some(v) = req.published {
            l.published = v;
        }
        Ok(())
    })?;
    Ok(Json(view))
}

pub async fn publish_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ListingView>, ApiError> {
    set_published(&state, claims.sub, &id, true)
}

pub async fn unpublish_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ListingView>, ApiError> {
    set_published(&state, claims.sub, &id, false)
}

fn set_published(
    state: &AppState,
    caller: Uuid,
    id: &str,
    published: bool,
) -> Result<Json<ListingView>, ApiError> {
    let id = parse_id(id)?;
    let view = mutate_own_listing(state, caller, id, |l| {
        l.published = published;
        Ok(())
    })?;
    info!("Listing {} published={} by {}", id, published, caller);
    Ok(Json(view))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.store.with_doc_mut(|doc| {
        let listing = doc.listing(id).ok_or_else(ApiError::not_found)?;
        if listing.owner_user_id != claims.sub {
            return Err(DomainError::Forbidden.into());
        }
        if doc.listing_in_use(id) {
            return Err(DomainError::ListingInUse.into());
        }
        doc.remove_listing(id);
        Ok::<_, ApiError>(())
    })?;

    info!("Listing {} deleted by {}", id, claims.sub);
    Ok(Json(OkResponse::ok()))
}

/// Ids in paths are UUIDs; anything else cannot name an existing record.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}
