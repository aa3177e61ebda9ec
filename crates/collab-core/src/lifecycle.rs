use chrono::{DateTime, Utc};
use uuid::Uuid;

use collab_types::models::{Listing, Match, MatchRequest, MatchStatus, RequestStatus};

use crate::error::DomainError;

/// Projects a single user may own at once.
pub const MAX_PROJECTS_PER_OWNER: usize = 3;

/// Transitions applied to an existing match request.
///
/// ```text
///   pending ──accept──▶ accepted ──confirm──▶ confirmed
///      │                   │
///      ├──reject──▶ rejected
///      └──cancel──┴──────▶ canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Reject,
    Confirm,
    Cancel,
}

impl RequestAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
        }
    }

    /// Accept/reject belong to the listing owner; confirm/cancel to the requester.
    fn permitted_caller(self, req: &MatchRequest) -> Uuid {
        match self {
            Self::Accept | Self::Reject => req.to_user_id,
            Self::Confirm | Self::Cancel => req.from_user_id,
        }
    }

    fn next_status(self, from: RequestStatus) -> Option<RequestStatus> {
        use RequestStatus::*;
        match (self, from) {
            (Self::Accept, Pending) => Some(Accepted),
            (Self::Reject, Pending) => Some(Rejected),
            (Self::Confirm, Accepted) => Some(Confirmed),
            (Self::Cancel, Pending | Accepted) => Some(Canceled),
            _ => None,
        }
    }
}

/// Check who is calling, then where the request currently is.
/// Returns the status the request moves to; the caller applies it.
pub fn next_request_status(
    req: &MatchRequest,
    caller: Uuid,
    action: RequestAction,
) -> Result<RequestStatus, DomainError> {
    if action.permitted_caller(req) != caller {
        return Err(DomainError::Forbidden);
    }
    action
        .next_status(req.status)
        .ok_or(DomainError::InvalidRequestStatus {
            action: action.as_str(),
            from: req.status,
        })
}

/// Apply `action` to `req` in place, bumping `updated_at`.
pub fn apply_request_action(
    req: &mut MatchRequest,
    caller: Uuid,
    action: RequestAction,
    now: DateTime<Utc>,
) -> Result<RequestStatus, DomainError> {
    let next = next_request_status(req, caller, action)?;
    req.status = next;
    req.updated_at = now;
    Ok(next)
}

/// Guards for opening a new request against `listing`.
pub fn check_new_request(
    listing: &Listing,
    requester: Uuid,
    existing: &[MatchRequest],
) -> Result<(), DomainError> {
    if listing.owner_user_id == requester {
        return Err(DomainError::CannotRequestSelf);
    }
    if !listing.published {
        return Err(DomainError::ListingNotPublished);
    }
    let duplicate = existing.iter().any(|r| {
        r.from_user_id == requester
            && r.to_user_id == listing.owner_user_id
            && r.listing_id == listing.id
            && r.status.is_active()
    });
    if duplicate {
        return Err(DomainError::DuplicateActive);
    }
    Ok(())
}

pub fn check_project_quota(owned: usize) -> Result<(), DomainError> {
    if owned >= MAX_PROJECTS_PER_OWNER {
        return Err(DomainError::ProjectLimit(MAX_PROJECTS_PER_OWNER));
    }
    Ok(())
}

pub fn find_active_match_between(matches: &[Match], a: Uuid, b: Uuid) -> Option<&Match> {
    matches.iter().find(|m| m.is_active() && m.joins(a, b))
}

/// Outcome of confirming a request: which match the pair now shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResolution {
    /// A match already points at this request, or the pair already has an active one.
    Existing(Uuid),
    /// No usable match exists; this one must be stored.
    Created(Match),
}

impl MatchResolution {
    pub fn match_id(&self) -> Uuid {
        match self {
            Self::Existing(id) => *id,
            Self::Created(m) => m.id,
        }
    }
}

/// Pick the match a confirmed request should point to. Reuses the match already
/// bound to the request, then any active match between the same pair, and only
/// otherwise creates a new one. Keeps at most one active match per pair.
pub fn resolve_match(req: &MatchRequest, matches: &[Match], now: DateTime<Utc>) -> MatchResolution {
    if let Some(bound) = matches.iter().find(|m| m.request_id == Some(req.id)) {
        return MatchResolution::Existing(bound.id);
    }
    if let Some(active) = find_active_match_between(matches, req.from_user_id, req.to_user_id) {
        return MatchResolution::Existing(active.id);
    }
    MatchResolution::Created(Match {
        id: Uuid::new_v4(),
        user_a: req.from_user_id,
        user_b: req.to_user_id,
        request_id: Some(req.id),
        status: MatchStatus::Active,
        created_at: now,
        ended_at: None,
        ended_by: None,
    })
}

/// End a match on behalf of one of its participants. Ended matches stay ended.
pub fn terminate_match(m: &mut Match, caller: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
    if !m.involves(caller) {
        return Err(DomainError::Forbidden);
    }
    if !m.is_active() {
        return Err(DomainError::MatchNotActive);
    }
    m.status = MatchStatus::Ended;
    m.ended_at = Some(now);
    m.ended_by = Some(caller);
    Ok(())
}

/// Whether `viewer` may see the counterpart's private contacts in `m`.
pub fn reveals_contacts(m: &Match, viewer: Uuid) -> bool {
    m.is_active() && m.involves(viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_types::models::ListingKind;

    struct Fixture {
        requester: Uuid,
        owner: Uuid,
        listing: Listing,
    }

    fn fixture() -> Fixture {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        Fixture {
            requester: Uuid::new_v4(),
            owner,
            listing: Listing {
                id: Uuid::new_v4(),
                owner_user_id: owner,
                kind: ListingKind::Service,
                title: "Fulfillment".into(),
                description: "Warehouse and packing".into(),
                region: None,
                marketplaces: vec![],
                categories: vec![],
                tags: vec![],
                published: true,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn request(f: &Fixture, status: RequestStatus) -> MatchRequest {
        let now = Utc::now();
        MatchRequest {
            id: Uuid::new_v4(),
            from_user_id: f.requester,
            to_user_id: f.owner,
            listing_id: f.listing.id,
            project_id: Uuid::new_v4(),
            pitch: String::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_happy_path() {
        let f = fixture();
        let mut req = request(&f, RequestStatus::Pending);
        let now = Utc::now();

        assert_eq!(
            apply_request_action(&mut req, f.owner, RequestAction::Accept, now),
            Ok(RequestStatus::Accepted)
        );
        assert_eq!(
            apply_request_action(&mut req, f.requester, RequestAction::Confirm, now),
            Ok(RequestStatus::Confirmed)
        );
        assert_eq!(req.status, RequestStatus::Confirmed);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let f = fixture();
        let actions = [
            RequestAction::Accept,
            RequestAction::Reject,
            RequestAction::Confirm,
            RequestAction::Cancel,
        ];
        for status in [RequestStatus::Confirmed, RequestStatus::Rejected, RequestStatus::Canceled] {
            let req = request(&f, status);
            for action in actions {
                let caller = match action {
                    RequestAction::Accept | RequestAction::Reject => f.owner,
                    _ => f.requester,
                };
                let err = next_request_status(&req, caller, action).unwrap_err();
                assert_eq!(err.code(), "INVALID_STATUS", "{action:?} from {status}");
            }
        }
    }

    #[test]
    fn test_only_owner_accepts_or_rejects() {
        let f = fixture();
        let req = request(&f, RequestStatus::Pending);
        let stranger = Uuid::new_v4();

        for caller in [f.requester, stranger] {
            assert_eq!(
                next_request_status(&req, caller, RequestAction::Accept),
                Err(DomainError::Forbidden)
            );
            assert_eq!(
                next_request_status(&req, caller, RequestAction::Reject),
                Err(DomainError::Forbidden)
            );
        }
    }

    #[test]
    fn test_only_requester_confirms_or_cancels() {
        let f = fixture();
        let req = request(&f, RequestStatus::Accepted);

        assert_eq!(
            next_request_status(&req, f.owner, RequestAction::Confirm),
            Err(DomainError::Forbidden)
        );
        assert_eq!(
            next_request_status(&req, f.owner, RequestAction::Cancel),
            Err(DomainError::Forbidden)
        );
        assert_eq!(
            next_request_status(&req, f.requester, RequestAction::Cancel),
            Ok(RequestStatus::Canceled)
        );
    }

    #[test]
    fn test_confirm_requires_accepted() {
        let f = fixture();
        let req = request(&f, RequestStatus::Pending);
        assert!(matches!(
            next_request_status(&req, f.requester, RequestAction::Confirm),
            Err(DomainError::InvalidRequestStatus { action: "confirm", from: RequestStatus::Pending })
        ));
    }

    #[test]
    fn test_new_request_guards() {
        let f = fixture();

        assert_eq!(
            check_new_request(&f.listing, f.owner, &[]),
            Err(DomainError::CannotRequestSelf)
        );

        let mut draft = f.listing.clone();
        draft.published = false;
        assert_eq!(
            check_new_request(&draft, f.requester, &[]),
            Err(DomainError::ListingNotPublished)
        );

        let active = request(&f, RequestStatus::Accepted);
        assert_eq!(
            check_new_request(&f.listing, f.requester, &[active]),
            Err(DomainError::DuplicateActive)
        );

        let closed = request(&f, RequestStatus::Rejected);
        assert_eq!(check_new_request(&f.listing, f.requester, &[closed]), Ok(()));
    }

    #[test]
    fn test_resolve_match_reuses_active_pair() {
        let f = fixture();
        let now = Utc::now();
        let first = request(&f, RequestStatus::Accepted);

        let created = match resolve_match(&first, &[], now) {
            MatchResolution::Created(m) => m,
            other => panic!("expected a new match, got {other:?}"),
        };
        assert_eq!(created.request_id, Some(first.id));

        // A second request between the same pair attaches to the same match,
        // even when the roles are reversed.
        let mut second = request(&f, RequestStatus::Accepted);
        std::mem::swap(&mut second.from_user_id, &mut second.to_user_id);
        let matches = vec![created.clone()];
        assert_eq!(
            resolve_match(&second, &matches, now),
            MatchResolution::Existing(created.id)
        );
    }

    #[test]
    fn test_resolve_match_after_end_creates_new() {
        let f = fixture();
        let now = Utc::now();
        let first = request(&f, RequestStatus::Accepted);
        let MatchResolution::Created(mut ended) = resolve_match(&first, &[], now) else {
            panic!("expected a new match");
        };
        terminate_match(&mut ended, f.owner, now).unwrap();

        let second = request(&f, RequestStatus::Accepted);
        let resolution = resolve_match(&second, &[ended.clone()], now);
        assert!(matches!(resolution, MatchResolution::Created(_)));
        assert_ne!(resolution.match_id(), ended.id);
    }

    #[test]
    fn test_terminate_match() {
        let f = fixture();
        let now = Utc::now();
        let req = request(&f, RequestStatus::Accepted);
        let MatchResolution::Created(mut m) = resolve_match(&req, &[], now) else {
            panic!("expected a new match");
        };

        assert_eq!(terminate_match(&mut m, Uuid::new_v4(), now), Err(DomainError::Forbidden));
        assert!(reveals_contacts(&m, f.requester));

        terminate_match(&mut m, f.owner, now).unwrap();
        assert_eq!(m.status, MatchStatus::Ended);
        assert_eq!(m.ended_by, Some(f.owner));
        assert!(!reveals_contacts(&m, f.requester));
        assert!(!reveals_contacts(&m, f.owner));

        assert_eq!(terminate_match(&mut m, f.requester, now), Err(DomainError::MatchNotActive));
    }

    #[test]
    fn test_project_quota() {
        assert_eq!(check_project_quota(2), Ok(()));
        assert_eq!(check_project_quota(3), Err(DomainError::ProjectLimit(3)));
    }
}
