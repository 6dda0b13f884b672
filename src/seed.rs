//! Seed fixtures: the external input the store's initial state is built from.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Campus, Creator, Notification, Popup, Post, Report, Review, Rsvp, Rumor, User,
};
use crate::error::SeedError;
use crate::state::AppState;

/// Bundled campus fixture used by demos and tests.
const DEMO_SEED: &str = include_str!("../seed/demo.json");

/// Fixture collections conforming to the entity shapes.
///
/// Notifications, posts, and rumors are optional in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub campuses: Vec<Campus>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub popups: Vec<Popup>,
    #[serde(default)]
    pub rsvps: Vec<Rsvp>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub rumors: Vec<Rumor>,
}

impl Seed {
    /// Parse a seed document.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Parse`] if the JSON is malformed or a record does
    /// not match its entity shape.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, or
    /// [`SeedError::Parse`] if its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let seed = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            campuses = seed.campuses.len(),
            popups = seed.popups.len(),
            "seed loaded"
        );
        Ok(seed)
    }

    /// The bundled demo fixture.
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_json_str(DEMO_SEED)
    }
}

impl AppState {
    /// Initial state: the seed collections, nobody signed in.
    ///
    /// Follow edges present on only one side are mirrored onto the other;
    /// edges pointing at missing records are dropped. Repeated RSVPs for
    /// the same user and popup collapse to the last one.
    pub fn from_seed(seed: Seed) -> Self {
        let mut state = AppState {
            campuses: seed.campuses,
            users: seed.users,
            creators: seed.creators,
            popups: seed.popups,
            rsvps: seed.rsvps,
            reviews: seed.reviews,
            reports: seed.reports,
            notifications: seed.notifications,
            posts: seed.posts,
            rumors: seed.rumors,
            current_user_id: None,
            has_launched: false,
        };
        state.reconcile_follows();
        state.reconcile_rsvps();
        state
    }

    fn reconcile_rsvps(&mut self) {
        let before = self.rsvps.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<Rsvp> = std::mem::take(&mut self.rsvps)
            .into_iter()
            .rev()
            .filter(|r| seen.insert((r.user_id.clone(), r.popup_id.clone())))
            .collect();
        kept.reverse();
        self.rsvps = kept;

        let dropped = before - self.rsvps.len();
        if dropped > 0 {
            tracing::warn!(dropped, "seed rsvps repeated; kept the latest");
        }
    }

    fn reconcile_follows(&mut self) {
        let creator_ids: Vec<String> = self.creators.iter().map(|c| c.id.clone()).collect();
        let user_ids: Vec<String> = self.users.iter().map(|u| u.id.clone()).collect();
        let mut repaired = 0usize;

        for user in &mut self.users {
            let before = user.following.len();
            user.following.retain(|c| creator_ids.contains(c));
            repaired += before - user.following.len();
        }
        for creator in &mut self.creators {
            let before = creator.followers.len();
            creator.followers.retain(|u| user_ids.contains(u));
            repaired += before - creator.followers.len();
        }

        // Mirror user -> creator edges.
        let edges: Vec<(String, String)> = self
            .users
            .iter()
            .flat_map(|u| u.following.iter().map(|c| (u.id.clone(), c.clone())))
            .collect();
        for (user_id, creator_id) in &edges {
            if let Some(creator) = self.creators.iter_mut().find(|c| &c.id == creator_id)
                && !creator.followers.contains(user_id)
            {
                creator.followers.push(user_id.clone());
                repaired += 1;
            }
        }

        // Mirror creator -> user edges.
        let edges: Vec<(String, String)> = self
            .creators
            .iter()
            .flat_map(|c| c.followers.iter().map(|u| (u.clone(), c.id.clone())))
            .collect();
        for (user_id, creator_id) in &edges {
            if let Some(user) = self.users.iter_mut().find(|u| &u.id == user_id)
                && !user.following.contains(creator_id)
            {
                user.following.push(creator_id.clone());
                repaired += 1;
            }
        }

        if repaired > 0 {
            tracing::warn!(repaired, "seed follow graph was inconsistent; repaired");
        }
    }
}
