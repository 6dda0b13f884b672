//! Derived lookups over [`AppState`].
//!
//! Every query is a pure function of the current snapshot and is recomputed
//! on demand. Lookup misses return `None` or an empty list.

use crate::domain::{Campus, Creator, Notification, Popup, Review, Rsvp, User};
use crate::state::AppState;

impl AppState {
    pub fn current_user(&self) -> Option<&User> {
        let id = self.current_user_id.as_deref()?;
        self.user(id)
    }

    /// The creator profile paired with the signed-in user, if any.
    pub fn current_creator(&self) -> Option<&Creator> {
        let id = self.current_user()?.creator_id.as_deref()?;
        self.creator(id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn creator(&self, id: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.id == id)
    }

    pub fn campus(&self, id: &str) -> Option<&Campus> {
        self.campuses.iter().find(|c| c.id == id)
    }

    pub fn popup(&self, id: &str) -> Option<&Popup> {
        self.popups.iter().find(|p| p.id == id)
    }

    pub fn popup_rsvps(&self, popup_id: &str) -> Vec<&Rsvp> {
        self.rsvps.iter().filter(|r| r.popup_id == popup_id).collect()
    }

    pub fn popup_reviews(&self, popup_id: &str) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|r| r.popup_id == popup_id)
            .collect()
    }

    /// The signed-in user's RSVP for a popup.
    pub fn user_rsvp(&self, popup_id: &str) -> Option<&Rsvp> {
        let user_id = self.current_user_id.as_deref()?;
        self.rsvps
            .iter()
            .find(|r| r.user_id == user_id && r.popup_id == popup_id)
    }

    /// Number of RSVP records for a popup, counting both going and interested.
    pub fn rsvp_count(&self, popup_id: &str) -> usize {
        self.rsvps.iter().filter(|r| r.popup_id == popup_id).count()
    }

    /// Mean review rating, or exactly `0.0` when there are no reviews.
    pub fn avg_rating(&self, popup_id: &str) -> f64 {
        let (sum, count) = self
            .reviews
            .iter()
            .filter(|r| r.popup_id == popup_id)
            .fold((0u32, 0u32), |(sum, n), r| (sum + u32::from(r.rating), n + 1));
        if count == 0 {
            return 0.0;
        }
        f64::from(sum) / f64::from(count)
    }

    /// Ranking heuristic: `rsvps * max(attendance, 1) * max(avg_rating, 1)`.
    pub fn trending_score(&self, popup: &Popup) -> f64 {
        let rsvps = self.rsvp_count(&popup.id) as f64;
        let attendance = f64::from(popup.attendance.max(1));
        rsvps * attendance * self.avg_rating(&popup.id).max(1.0)
    }

    /// Popups by descending trending score. Equal scores keep insertion order.
    pub fn trending(&self) -> Vec<&Popup> {
        let mut scored: Vec<(f64, &Popup)> = self
            .popups
            .iter()
            .map(|p| (self.trending_score(p), p))
            .collect();
        // `sort_by` is stable.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, p)| p).collect()
    }

    pub fn campus_popups(&self, campus_id: &str) -> Vec<&Popup> {
        self.popups
            .iter()
            .filter(|p| p.campus_id == campus_id)
            .collect()
    }

    pub fn creator_popups(&self, creator_id: &str) -> Vec<&Popup> {
        self.popups
            .iter()
            .filter(|p| p.creator_id == creator_id)
            .collect()
    }

    /// Whether the signed-in user follows a creator.
    pub fn is_following(&self, creator_id: &str) -> bool {
        self.current_user()
            .is_some_and(|u| u.following.iter().any(|c| c == creator_id))
    }

    /// Popups from creators the signed-in user follows.
    pub fn following_popups(&self) -> Vec<&Popup> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        self.popups
            .iter()
            .filter(|p| user.following.contains(&p.creator_id))
            .collect()
    }

    /// The signed-in user's notifications, newest first.
    pub fn user_notifications(&self) -> Vec<&Notification> {
        let Some(user_id) = self.current_user_id.as_deref() else {
            return Vec::new();
        };
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.user_notifications()
            .into_iter()
            .filter(|n| !n.read)
            .count()
    }
}
