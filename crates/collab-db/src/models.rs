use serde::{Deserialize, Serialize};

use collab_types::models::{Consent, Listing, Match, MatchRequest, Profile, Project, User};

/// On-disk shape of `db.json`. Every collection is a plain array kept in
/// insertion order; lookups are linear scans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub users: Vec<User>,
    pub profiles: Vec<Profile>,
    pub listings: Vec<Listing>,
    pub projects: Vec<Project>,
    pub match_requests: Vec<MatchRequest>,
    pub matches: Vec<Match>,
    pub consents: Vec<Consent>,
}
