use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records persisted in the JSON document. Field names are the on-disk names.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,

    // -- public --
    pub display_name: Option<String>,
    pub brand_name: Option<String>,
    #[serde(default)]
    pub marketplaces: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub region: Option<String>,
    pub about: Option<String>,
    pub biz_type: Option<String>,
    pub sales_monthly_rub: Option<f64>,
    pub logo_path: Option<String>,

    // -- private: owner, or counterpart of an active match --
    pub legal_name: Option<String>,
    pub inn: Option<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub contact_telegram: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Fresh profile created at registration.
    pub fn new(user_id: Uuid, display_name: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: Some(display_name),
            sales_monthly_rub: Some(0.0),
            updated_at: Some(now),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Collab,
    Service,
    Supplier,
}

impl ListingKind {
    /// Parse a client-supplied kind. `partner` is the legacy name for `collab`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "collab" | "partner" => Some(Self::Collab),
            "service" => Some(Self::Service),
            "supplier" => Some(Self::Supplier),
            _ => None,
        }
    }
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub kind: ListingKind,
    pub title: String,
    pub description: String,
    pub region: Option<String>,
    #[serde(default)]
    pub marketplaces: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Published listings are visible to everyone; drafts only to their owner.
    pub fn visible_to(&self, user_id: Uuid) -> bool {
        self.published || self.owner_user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub title: String,
    pub idea: String,
    pub goals: Option<String>,
    pub investments: Option<String>,
    pub responsibilities: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Confirmed,
    Rejected,
    Canceled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Confirmed,
        Self::Rejected,
        Self::Canceled,
    ];

    /// Active requests block duplicates and keep their listing/project in use.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted | Self::Confirmed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub listing_id: Uuid,
    pub project_id: Uuid,
    #[serde(default)]
    pub pitch: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub request_id: Option<Uuid>,
    #[serde(default)]
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_by: Option<Uuid>,
}

impl Match {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// True when this match joins `a` and `b`, in either order.
    pub fn joins(&self, a: Uuid, b: Uuid) -> bool {
        (self.user_a == a && self.user_b == b) || (self.user_a == b && self.user_b == a)
    }

    /// The other participant, seen from `user_id`.
    pub fn counterpart(&self, user_id: Uuid) -> Uuid {
        if self.user_a == user_id {
            self.user_b
        } else {
            self.user_a
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentType {
    Privacy,
    Cookies,
}

impl ConsentType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "privacy" => Some(Self::Privacy),
            "cookies" => Some(Self::Cookies),
            _ => None,
        }
    }
}

pub const CONSENT_VERSION: &str = "mvp-1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consent {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ConsentType,
    pub version: String,
    pub created_at: DateTime<Utc>,
}

// -- Trust --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Low,
    Mid,
    High,
}

/// Profile completeness summary. Flattened into profile responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trust {
    pub trust_score: u8,
    pub trust_level: TrustLevel,
    pub trust_missing: Vec<&'static str>,
}
