use std::cmp::Reverse;

use uuid::Uuid;

use collab_types::models::{Listing, Match, MatchRequest, Profile, Project, User};

use crate::models::Document;

impl Document {
    // -- Users --

    /// Case-insensitive lookup; emails are stored lower-cased.
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    // -- Profiles --

    pub fn profile(&self, user_id: Uuid) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.user_id == user_id)
    }

    pub fn profile_mut(&mut self, user_id: Uuid) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.user_id == user_id)
    }

    // -- Listings --

    pub fn listing(&self, id: Uuid) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn listing_mut(&mut self, id: Uuid) -> Option<&mut Listing> {
        self.listings.iter_mut().find(|l| l.id == id)
    }

    /// Listings `viewer` may see, most recently updated first.
    pub fn visible_listings(&self, viewer: Uuid) -> Vec<&Listing> {
        let mut items: Vec<&Listing> = self.listings.iter().filter(|l| l.visible_to(viewer)).collect();
        items.sort_by_key(|l| Reverse(l.updated_at));
        items
    }

    /// All listings owned by `owner`, drafts included, most recently updated first.
    pub fn listings_of(&self, owner: Uuid) -> Vec<&Listing> {
        let mut items: Vec<&Listing> = self
            .listings
            .iter()
            .filter(|l| l.owner_user_id == owner)
            .collect();
        items.sort_by_key(|l| Reverse(l.updated_at));
        items
    }

    /// A listing stays in use while any active request points at it.
    pub fn listing_in_use(&self, id: Uuid) -> bool {
        self.match_requests
            .iter()
            .any(|r| r.listing_id == id && r.status.is_active())
    }

    pub fn remove_listing(&mut self, id: Uuid) -> Option<Listing> {
        let idx = self.listings.iter().position(|l| l.id == id)?;
        Some(self.listings.remove(idx))
    }

    // -- Projects --

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn owned_project_mut(&mut self, id: Uuid, owner: Uuid) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id && p.owner_user_id == owner)
    }

    pub fn project_count(&self, owner: Uuid) -> usize {
        self.projects.iter().filter(|p| p.owner_user_id == owner).count()
    }

    /// Projects owned by `owner`, newest first.
    pub fn projects_of(&self, owner: Uuid) -> Vec<&Project> {
        let mut items: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| p.owner_user_id == owner)
            .collect();
        items.sort_by_key(|p| Reverse(p.created_at));
        items
    }

    /// Whether one of `owner`'s own active requests still carries this project.
    pub fn project_in_use(&self, id: Uuid, owner: Uuid) -> bool {
        self.match_requests
            .iter()
            .any(|r| r.project_id == id && r.from_user_id == owner && r.status.is_active())
    }

    pub fn remove_owned_project(&mut self, id: Uuid, owner: Uuid) -> Option<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id && p.owner_user_id == owner)?;
        Some(self.projects.remove(idx))
    }

    // -- Match requests --

    pub fn request(&self, id: Uuid) -> Option<&MatchRequest> {
        self.match_requests.iter().find(|r| r.id == id)
    }

    pub fn request_mut(&mut self, id: Uuid) -> Option<&mut MatchRequest> {
        self.match_requests.iter_mut().find(|r| r.id == id)
    }

    /// Requests addressed to `user_id`, newest first.
    pub fn incoming_requests(&self, user_id: Uuid) -> Vec<&MatchRequest> {
        self.requests_where(|r| r.to_user_id == user_id)
    }

    /// Requests sent by `user_id`, newest first.
    pub fn outgoing_requests(&self, user_id: Uuid) -> Vec<&MatchRequest> {
        self.requests_where(|r| r.from_user_id == user_id)
    }

    fn requests_where(&self, pred: impl Fn(&MatchRequest) -> bool) -> Vec<&MatchRequest> {
        let mut items: Vec<&MatchRequest> = self.match_requests.iter().filter(|r| pred(r)).collect();
        items.sort_by_key(|r| Reverse(r.created_at));
        items
    }

    // -- Matches --

    pub fn match_by_id(&self, id: Uuid) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_mut(&mut self, id: Uuid) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn match_for_request(&self, request_id: Uuid) -> Option<&Match> {
        self.matches.iter().find(|m| m.request_id == Some(request_id))
    }

    /// Matches `user_id` takes part in, newest first.
    pub fn matches_of(&self, user_id: Uuid) -> Vec<&Match> {
        let mut items: Vec<&Match> = self.matches.iter().filter(|m| m.involves(user_id)).collect();
        items.sort_by_key(|m| Reverse(m.created_at));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use collab_types::models::{ListingKind, RequestStatus};

    fn listing(owner: Uuid, published: bool, age_mins: i64) -> Listing {
        let ts = Utc::now() - Duration::minutes(age_mins);
        Listing {
            id: Uuid::new_v4(),
            owner_user_id: owner,
            kind: ListingKind::Collab,
            title: "Capsule collection".into(),
            description: "Joint release".into(),
            region: None,
            marketplaces: vec![],
            categories: vec![],
            tags: vec![],
            published,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_visible_listings_hide_foreign_drafts() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let doc = Document {
            listings: vec![
                listing(other, true, 30),
                listing(other, false, 20),
                listing(me, false, 10),
            ],
            ..Default::default()
        };

        let visible = doc.visible_listings(me);
        assert_eq!(visible.len(), 2);
        // newest first
        assert_eq!(visible[0].owner_user_id, me);
        assert_eq!(visible[1].owner_user_id, other);
        assert!(visible[1].published);
    }

    #[test]
    fn test_listing_in_use_only_for_active_requests() {
        let owner = Uuid::new_v4();
        let l = listing(owner, true, 0);
        let now = Utc::now();
        let mut req = MatchRequest {
            id: Uuid::new_v4(),
            from_user_id: Uuid::new_v4(),
            to_user_id: owner,
            listing_id: l.id,
            project_id: Uuid::new_v4(),
            pitch: String::new(),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let lid = l.id;

        let mut doc = Document {
            listings: vec![l],
            match_requests: vec![req.clone()],
            ..Default::default()
        };
        assert!(doc.listing_in_use(lid));

        req.status = RequestStatus::Canceled;
        doc.match_requests = vec![req];
        assert!(!doc.listing_in_use(lid));
        assert!(doc.remove_listing(lid).is_some());
        assert!(doc.listing(lid).is_none());
    }

    #[test]
    fn test_user_by_email_ignores_case() {
        let doc = Document {
            users: vec![User {
                id: Uuid::new_v4(),
                email: "anna@example.com".into(),
                password_hash: String::new(),
                created_at: Utc::now(),
            }],
            ..Default::default()
        };
        assert!(doc.user_by_email("Anna@Example.COM").is_some());
        assert!(doc.user_by_email("bob@example.com").is_none());
    }
}
