use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{
    Listing, ListingKind, Match, MatchRequest, MatchStatus, Profile, Project, RequestStatus,
    Trust, TrustLevel,
};

// -- JWT Claims --

/// Session token claims, carried in the `collab_token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// -- System --

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PrivacyResponse {
    pub cookies: &'static str,
    pub personal_data: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ConsentRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub accept_privacy: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub profile: Option<OwnProfile>,
}

// -- Profiles --

/// The owner's own view: every field, private ones included.
#[derive(Debug, Serialize)]
pub struct OwnProfile {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub trust: Trust,
}

/// Profile with private fields stripped.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub brand_name: Option<String>,
    pub marketplaces: Vec<String>,
    pub categories: Vec<String>,
    pub region: Option<String>,
    pub about: Option<String>,
    pub biz_type: Option<String>,
    pub sales_monthly_rub: Option<f64>,
    pub logo_path: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for PublicProfile {
    fn from(p: &Profile) -> Self {
        Self {
            user_id: p.user_id,
            display_name: p.display_name.clone(),
            brand_name: p.brand_name.clone(),
            marketplaces: p.marketplaces.clone(),
            categories: p.categories.clone(),
            region: p.region.clone(),
            about: p.about.clone(),
            biz_type: p.biz_type.clone(),
            sales_monthly_rub: p.sales_monthly_rub,
            logo_path: p.logo_path.clone(),
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicProfileView {
    #[serde(flatten)]
    pub profile: PublicProfile,
    #[serde(flatten)]
    pub trust: Trust,
}

#[derive(Debug, Serialize)]
pub struct PublicProfileResponse {
    pub profile: PublicProfileView,
    pub listings: Vec<ListingView>,
}

/// Partial profile update. Public fields keep their value when absent or null;
/// private text fields can be cleared with an explicit null.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub brand_name: Option<String>,
    pub marketplaces: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub region: Option<String>,
    pub about: Option<String>,
    pub biz_type: Option<String>,
    /// Number or numeric string; anything else is ignored.
    pub sales_monthly_rub: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "explicit_null")]
    pub legal_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub inn: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub contact_telegram: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct LogoResponse {
    pub logo_path: String,
    #[serde(flatten)]
    pub trust: Trust,
}

/// Compact owner/counterpart card shown next to listings and matches.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub brand_name: Option<String>,
    pub logo_path: Option<String>,
    pub region: Option<String>,
    pub trust_level: TrustLevel,
    pub trust_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub brand_name: Option<String>,
    pub logo_path: Option<String>,
}

impl From<&Profile> for UserRef {
    fn from(p: &Profile) -> Self {
        Self {
            user_id: p.user_id,
            display_name: p.display_name.clone(),
            brand_name: p.brand_name.clone(),
            logo_path: p.logo_path.clone(),
        }
    }
}

// -- Listings --

#[derive(Debug, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub owner: Option<OwnerSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingRef {
    pub id: Uuid,
    pub title: String,
    pub kind: ListingKind,
}

impl From<&Listing> for ListingRef {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id,
            title: l.title.clone(),
            kind: l.kind,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateListingRequest {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub marketplaces: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateListingRequest {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub region: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub marketplaces: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub categories: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub tags: Option<Option<Vec<String>>>,
    pub published: Option<bool>,
}

/// Search filters for `GET /api/listings`. Empty strings mean "no filter".
/// Sales bounds stay raw; a value that is not a number filters nothing.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub region: Option<String>,
    pub marketplace: Option<String>,
    pub category: Option<String>,
    pub biz_type: Option<String>,
    pub sales_from: Option<String>,
    pub sales_to: Option<String>,
}

// -- Projects --

/// Body for project create/update and for inline creation inside a match request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub idea: Option<String>,
    pub goals: Option<String>,
    pub investments: Option<String>,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub idea: String,
    pub goals: Option<String>,
    pub investments: Option<String>,
    pub responsibilities: Option<String>,
}

impl From<&Project> for ProjectDetail {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            idea: p.idea.clone(),
            goals: p.goals.clone(),
            investments: p.investments.clone(),
            responsibilities: p.responsibilities.clone(),
        }
    }
}

// -- Match requests --

#[derive(Debug, Default, Deserialize)]
pub struct CreateMatchRequest {
    pub listing_id: Option<String>,
    pub project_id: Option<String>,
    pub project_create: Option<ProjectInput>,
    pub pitch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchRequestView {
    #[serde(flatten)]
    pub request: MatchRequest,
    pub match_id: Option<Uuid>,
    pub listing: Option<ListingRef>,
    pub project: Option<ProjectRef>,
    pub from: Option<UserRef>,
    pub to: Option<UserRef>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub ok: bool,
    pub match_id: Uuid,
    pub request: MatchRequestView,
}

// -- Matches --

#[derive(Debug, Serialize)]
pub struct MatchListItem {
    pub id: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub other: Option<OwnerSummary>,
}

impl MatchListItem {
    pub fn new(m: &Match, other: Option<OwnerSummary>) -> Self {
        Self {
            id: m.id,
            status: m.status,
            created_at: m.created_at,
            ended_at: m.ended_at,
            other,
        }
    }
}

/// Private contact block. Every field is null unless the match is active.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrivateContacts {
    pub legal_name: Option<String>,
    pub inn: Option<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub contact_telegram: Option<String>,
}

impl PrivateContacts {
    pub fn hidden() -> Self {
        Self::default()
    }
}

impl From<&Profile> for PrivateContacts {
    fn from(p: &Profile) -> Self {
        Self {
            legal_name: p.legal_name.clone(),
            inn: p.inn.clone(),
            phone: p.phone.clone(),
            contact_email: p.contact_email.clone(),
            contact_telegram: p.contact_telegram.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchCounterpart {
    #[serde(flatten)]
    pub profile: PublicProfile,
    #[serde(flatten)]
    pub trust: Trust,
    #[serde(flatten)]
    pub contacts: PrivateContacts,
}

#[derive(Debug, Serialize)]
pub struct RequestRef {
    pub id: Uuid,
    pub status: RequestStatus,
    pub pitch: String,
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    pub id: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub ended_by: Option<Uuid>,
    pub other: Option<MatchCounterpart>,
    pub request: Option<RequestRef>,
    pub listing: Option<ListingRef>,
    pub project: Option<ProjectDetail>,
}
