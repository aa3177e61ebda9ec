use collab_types::models::RequestStatus;
use thiserror::Error;

/// Rule violations raised by the domain layer. Each maps to one machine code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("caller is not allowed to perform this action")]
    Forbidden,

    #[error("cannot {action} a request in status {from}")]
    InvalidRequestStatus {
        action: &'static str,
        from: RequestStatus,
    },

    #[error("match is not active")]
    MatchNotActive,

    #[error("an active request for this listing already exists")]
    DuplicateActive,

    #[error("cannot send a request to your own listing")]
    CannotRequestSelf,

    #[error("listing is not published")]
    ListingNotPublished,

    #[error("project limit of {0} reached")]
    ProjectLimit(usize),

    #[error("listing is referenced by an active request")]
    ListingInUse,

    #[error("project is referenced by an active request")]
    ProjectInUse,

    #[error("phone number is not a valid RU number")]
    InvalidPhone,

    #[error("phone number is required")]
    PhoneRequired,

    #[error("INN must be 10 or 12 digits")]
    InvalidInn,

    #[error("unknown listing kind")]
    InvalidKind,
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidRequestStatus { .. } | Self::MatchNotActive => "INVALID_STATUS",
            Self::DuplicateActive => "DUPLICATE_ACTIVE",
            Self::CannotRequestSelf => "CANNOT_REQUEST_SELF",
            Self::ListingNotPublished => "LISTING_NOT_PUBLISHED",
            Self::ProjectLimit(_) => "PROJECT_LIMIT",
            Self::ListingInUse => "LISTING_IN_USE",
            Self::ProjectInUse => "PROJECT_IN_USE",
            Self::InvalidPhone => "INVALID_PHONE_RU",
            Self::PhoneRequired => "PHONE_REQUIRED",
            Self::InvalidInn => "INVALID_INN",
            Self::InvalidKind => "INVALID_KIND",
        }
    }
}
