//! Response projections built from the document: owner cards, enriched
//! listings and requests, and the privacy-gated match detail.

use uuid::Uuid;

use collab_core::compute_trust;
use collab_core::lifecycle::reveals_contacts;
use collab_db::Document;
use collab_types::api::{
    ListingRef, ListingView, MatchCounterpart, MatchDetail, MatchRequestView, OwnProfile,
    OwnerSummary, PrivateContacts, ProjectDetail, ProjectRef, PublicProfile, PublicProfileView,
    RequestRef, UserRef,
};
use collab_types::models::{Listing, Match, MatchRequest, Profile};

pub fn own_profile(profile: &Profile) -> OwnProfile {
    OwnProfile {
        profile: profile.clone(),
        trust: compute_trust(Some(profile)),
    }
}

pub fn public_profile(profile: &Profile) -> PublicProfileView {
    PublicProfileView {
        profile: PublicProfile::from(profile),
        trust: compute_trust(Some(profile)),
    }
}

pub fn owner_summary(doc: &Document, user_id: Uuid) -> Option<OwnerSummary> {
    let p = doc.profile(user_id)?;
    let trust = compute_trust(Some(p));
    Some(OwnerSummary {
        user_id: p.user_id,
        display_name: p.display_name.clone(),
        brand_name: p.brand_name.clone(),
        logo_path: p.logo_path.clone(),
        region: p.region.clone(),
        trust_level: trust.trust_level,
        trust_score: trust.trust_score,
    })
}

pub fn listing_view(doc: &Document, listing: &Listing) -> ListingView {
    ListingView {
        listing: listing.clone(),
        owner: owner_summary(doc, listing.owner_user_id),
    }
}

pub fn request_view(doc: &Document, req: &MatchRequest) -> MatchRequestView {
    MatchRequestView {
        request: req.clone(),
        match_id: doc.match_for_request(req.id).map(|m| m.id),
        listing: doc.listing(req.listing_id).map(ListingRef::from),
        project: doc.project(req.project_id).map(|p| ProjectRef {
            id: p.id,
            title: p.title.clone(),
        }),
        from: doc.profile(req.from_user_id).map(UserRef::from),
        to: doc.profile(req.to_user_id).map(UserRef::from),
    }
}

/// Match as seen by `viewer`. Contacts are filled only while the match is active.
pub fn match_detail(doc: &Document, m: &Match, viewer: Uuid) -> MatchDetail {
    let other = doc.profile(m.counterpart(viewer)).map(|p| MatchCounterpart {
        profile: PublicProfile::from(p),
        trust: compute_trust(Some(p)),
        contacts: if reveals_contacts(m, viewer) {
            PrivateContacts::from(p)
        } else {
            PrivateContacts::hidden()
        },
    });

    let req = m.request_id.and_then(|id| doc.request(id));

    MatchDetail {
        id: m.id,
        status: m.status,
        created_at: m.created_at,
        ended_at: m.ended_at,
        ended_by: m.ended_by,
        other,
        request: req.map(|r| RequestRef {
            id: r.id,
            status: r.status,
            pitch: r.pitch.clone(),
        }),
        listing: req
            .and_then(|r| doc.listing(r.listing_id))
            .map(ListingRef::from),
        project: req
            .and_then(|r| doc.project(r.project_id))
            .map(ProjectDetail::from),
    }
}
