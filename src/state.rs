//! The RUSH application state and its command handling.
//!
//! [`AppState`] is the single aggregate behind the store. It holds every
//! collection plus the session, so commands that touch two records (a follow
//! updates both the user and the creator) decide and apply as one unit.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::aggregate::Aggregate;
use crate::command::{Command, CommandContext};
use crate::domain::{
    Campus, Creator, NewPopup, NewPost, NewReport, NewReview, NewRumor, Notification,
    NotificationKind, Popup, PopupStatus, Post, Report, Review, Role, Rsvp, RsvpStatus, Rumor,
    User, new_id,
};
use crate::error::{StoreError, ValidationError};
use crate::event::Event;

/// All entity collections plus the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub campuses: Vec<Campus>,
    pub users: Vec<User>,
    pub creators: Vec<Creator>,
    pub popups: Vec<Popup>,
    pub rsvps: Vec<Rsvp>,
    pub reviews: Vec<Review>,
    pub reports: Vec<Report>,
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// Newest first.
    pub posts: Vec<Post>,
    /// Newest first.
    pub rumors: Vec<Rumor>,
    pub current_user_id: Option<String>,
    /// UI bootstrap flag gating the splash screen. Not a domain entity.
    pub has_launched: bool,
}

fn credentials_match(stored: &str, given: &str) -> bool {
    stored.as_bytes().ct_eq(given.as_bytes()).into()
}

/// Display name for a new account: the email's local part.
fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

impl AppState {
    /// The signed-in user, or [`StoreError::Unauthenticated`].
    fn require_user(&self) -> Result<&User, StoreError> {
        self.current_user().ok_or(StoreError::Unauthenticated)
    }

    fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    fn creator_mut(&mut self, id: &str) -> Option<&mut Creator> {
        self.creators.iter_mut().find(|c| c.id == id)
    }

    fn decide_login(
        &self,
        email: String,
        password: String,
        role: Role,
    ) -> Result<Vec<Event>, StoreError> {
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let mut known_email = false;
        for user in self.users.iter().filter(|u| u.email == email) {
            if credentials_match(&user.password, &password) {
                return Ok(vec![Event::SignedIn {
                    user_id: user.id.clone(),
                }]);
            }
            known_email = true;
        }
        if known_email {
            return Err(StoreError::InvalidCredentials);
        }

        let user_id = new_id("user");
        let name = name_from_email(&email);
        let creator = (role == Role::Creator).then(|| Creator {
            id: new_id("creator"),
            user_id: user_id.clone(),
            name: name.clone(),
            email: Some(email.clone()),
            ..Default::default()
        });
        let user = User {
            id: user_id.clone(),
            email,
            password,
            role,
            name,
            creator_id: creator.as_ref().map(|c| c.id.clone()),
            ..Default::default()
        };
        Ok(vec![
            Event::AccountCreated { user, creator },
            Event::SignedIn { user_id },
        ])
    }

    /// Only the creator's own account may act for it.
    fn require_creator(&self, creator_id: &str) -> Result<(), StoreError> {
        self.require_user()?;
        match self.current_creator() {
            Some(creator) if creator.id == creator_id => Ok(()),
            _ => Err(StoreError::NotCreatorOwner(creator_id.to_string())),
        }
    }

    fn decide_create_popup(&self, new: NewPopup) -> Result<Vec<Event>, StoreError> {
        self.require_user()?;
        if new.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if new.location_name.trim().is_empty() {
            return Err(ValidationError::EmptyLocation.into());
        }
        if new.ends_at.is_some_and(|end| end < new.starts_at) {
            return Err(ValidationError::EndsBeforeStart.into());
        }
        self.require_creator(&new.creator_id)?;
        Ok(vec![Event::PopupCreated {
            popup: new.publish(new_id("popup")),
        }])
    }

    fn decide_rsvp(&self, popup_id: String, status: RsvpStatus) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if self.popup(&popup_id).is_none() {
            tracing::debug!(%popup_id, "rsvp for unknown popup ignored");
            return Ok(vec![]);
        }
        match self.user_rsvp(&popup_id) {
            Some(existing) if existing.status == status => Ok(vec![]),
            Some(existing) => Ok(vec![Event::RsvpStatusChanged {
                rsvp_id: existing.id.clone(),
                status,
            }]),
            None => Ok(vec![Event::RsvpPlaced {
                rsvp: Rsvp {
                    id: new_id("rsvp"),
                    user_id: user.id.clone(),
                    popup_id,
                    status,
                    reminder: false,
                },
            }]),
        }
    }

    fn decide_review(&self, new: NewReview) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if !(1..=5).contains(&new.rating) {
            return Err(ValidationError::RatingOutOfRange(new.rating).into());
        }
        if self.popup(&new.popup_id).is_none() {
            tracing::debug!(popup_id = %new.popup_id, "review for unknown popup ignored");
            return Ok(vec![]);
        }
        Ok(vec![Event::ReviewAdded {
            review: Review {
                id: new_id("review"),
                popup_id: new.popup_id,
                user_id: user.id.clone(),
                rating: new.rating,
                text: new.text,
            },
        }])
    }

    fn decide_report(&self, new: NewReport) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if new.reason.trim().is_empty() {
            return Err(ValidationError::EmptyReason.into());
        }
        if self.popup(&new.popup_id).is_none() {
            tracing::debug!(popup_id = %new.popup_id, "report for unknown popup ignored");
            return Ok(vec![]);
        }
        Ok(vec![Event::ReportFiled {
            report: Report {
                id: new_id("report"),
                popup_id: new.popup_id,
                user_id: user.id.clone(),
                reason: new.reason,
            },
        }])
    }

    fn decide_follow(&self, creator_id: String) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if self.creator(&creator_id).is_none() {
            tracing::debug!(%creator_id, "follow of unknown creator ignored");
            return Ok(vec![]);
        }
        let user_id = user.id.clone();
        if user.following.contains(&creator_id) {
            Ok(vec![Event::CreatorUnfollowed {
                user_id,
                creator_id,
            }])
        } else {
            Ok(vec![Event::CreatorFollowed {
                user_id,
                creator_id,
            }])
        }
    }

    fn decide_attendance(&self, popup_id: String, count: i64) -> Result<Vec<Event>, StoreError> {
        self.require_user()?;
        let count =
            u32::try_from(count).map_err(|_| ValidationError::AttendanceOutOfRange(count))?;
        let Some(popup) = self.popup(&popup_id) else {
            tracing::debug!(%popup_id, "attendance for unknown popup ignored");
            return Ok(vec![]);
        };
        self.require_creator(&popup.creator_id)?;
        if popup.status.is_terminal() {
            return Err(StoreError::AttendanceAlreadyRecorded(popup_id));
        }
        Ok(vec![Event::AttendanceRecorded { popup_id, count }])
    }

    fn decide_post(&self, new: NewPost, ctx: &CommandContext) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if new.image.trim().is_empty() {
            return Err(ValidationError::EmptyImage.into());
        }
        Ok(vec![Event::PostCreated {
            post: Post {
                id: new_id("post"),
                user_id: user.id.clone(),
                image: new.image,
                caption: new.caption,
                created_at: ctx.issued_at(),
            },
        }])
    }

    fn decide_rumor(&self, new: NewRumor, ctx: &CommandContext) -> Result<Vec<Event>, StoreError> {
        let user = self.require_user()?;
        if new.content.trim().is_empty() {
            return Err(ValidationError::EmptyRumor.into());
        }
        let at = ctx.issued_at();
        let rumor = Rumor {
            id: new_id("rumor"),
            user_id: user.id.clone(),
            content: new.content,
            timeframe: new.timeframe,
            created_at: at,
        };
        // Addressed to the author until followers can be targeted.
        let notification = Notification {
            id: new_id("notification"),
            user_id: user.id.clone(),
            kind: NotificationKind::EventFollow,
            title: "New rumor".to_string(),
            message: format!("{} ({})", rumor.content, rumor.timeframe),
            created_at: at,
            read: false,
            payload: Some(rumor.id.clone()),
        };
        Ok(vec![
            Event::RumorStarted { rumor },
            Event::NotificationSent { notification },
        ])
    }
}

impl Aggregate for AppState {
    const AGGREGATE_TYPE: &'static str = "rush";
    type Command = Command;
    type DomainEvent = Event;
    type Error = StoreError;

    fn handle(&self, cmd: Command, ctx: &CommandContext) -> Result<Vec<Event>, StoreError> {
        match cmd {
            Command::Login {
                email,
                password,
                role,
            } => self.decide_login(email, password, role),
            Command::Logout => match self.current_user_id {
                Some(_) => Ok(vec![Event::SignedOut]),
                None => Ok(vec![]),
            },
            Command::SelectCampus { campus_id } => {
                let user = self.require_user()?;
                if self.campus(&campus_id).is_none() {
                    tracing::warn!(%campus_id, "selected campus is not in the seed");
                }
                Ok(vec![Event::CampusSelected {
                    user_id: user.id.clone(),
                    campus_id,
                }])
            }
            Command::CreatePopup(new) => self.decide_create_popup(new),
            Command::Rsvp { popup_id, status } => self.decide_rsvp(popup_id, status),
            Command::ToggleReminder { rsvp_id } => {
                Ok(match self.rsvps.iter().find(|r| r.id == rsvp_id) {
                    Some(rsvp) => vec![Event::ReminderToggled {
                        rsvp_id,
                        reminder: !rsvp.reminder,
                    }],
                    None => vec![],
                })
            }
            Command::CancelRsvp { popup_id } => {
                self.require_user()?;
                Ok(match self.user_rsvp(&popup_id) {
                    Some(rsvp) => vec![Event::RsvpCancelled {
                        rsvp_id: rsvp.id.clone(),
                    }],
                    None => vec![],
                })
            }
            Command::AddReview(new) => self.decide_review(new),
            Command::AddReport(new) => self.decide_report(new),
            Command::FollowCreator { creator_id } => self.decide_follow(creator_id),
            Command::SetAttendance { popup_id, count } => self.decide_attendance(popup_id, count),
            Command::UpdateProfile(patch) => {
                let user = self.require_user()?;
                if patch.is_empty() {
                    return Ok(vec![]);
                }
                Ok(vec![Event::ProfileUpdated {
                    user_id: user.id.clone(),
                    patch,
                }])
            }
            Command::CreatePost(new) => self.decide_post(new, ctx),
            Command::StartRumor(new) => self.decide_rumor(new, ctx),
            Command::MarkNotificationRead { notification_id } => Ok(
                match self.notifications.iter().find(|n| n.id == notification_id) {
                    Some(n) if !n.read => vec![Event::NotificationRead { notification_id }],
                    _ => vec![],
                },
            ),
            Command::SetHasLaunched { has_launched } => {
                if self.has_launched == has_launched {
                    return Ok(vec![]);
                }
                Ok(vec![Event::LaunchFlagSet { has_launched }])
            }
        }
    }

    fn apply(mut self, event: &Event) -> Self {
        match event {
            Event::AccountCreated { user, creator } => {
                self.users.push(user.clone());
                if let Some(creator) = creator {
                    self.creators.push(creator.clone());
                }
            }
            Event::SignedIn { user_id } => {
                self.current_user_id = Some(user_id.clone());
            }
            Event::SignedOut => {
                self.current_user_id = None;
            }
            Event::CampusSelected { user_id, campus_id } => {
                if let Some(user) = self.user_mut(user_id) {
                    user.campus_id = Some(campus_id.clone());
                }
            }
            Event::PopupCreated { popup } => {
                self.popups.push(popup.clone());
            }
            Event::RsvpPlaced { rsvp } => {
                self.rsvps.push(rsvp.clone());
            }
            Event::RsvpStatusChanged { rsvp_id, status } => {
                if let Some(rsvp) = self.rsvps.iter_mut().find(|r| &r.id == rsvp_id) {
                    rsvp.status = *status;
                }
            }
            Event::ReminderToggled { rsvp_id, reminder } => {
                if let Some(rsvp) = self.rsvps.iter_mut().find(|r| &r.id == rsvp_id) {
                    rsvp.reminder = *reminder;
                }
            }
            Event::RsvpCancelled { rsvp_id } => {
                self.rsvps.retain(|r| &r.id != rsvp_id);
            }
            Event::ReviewAdded { review } => {
                self.reviews.push(review.clone());
            }
            Event::ReportFiled { report } => {
                self.reports.push(report.clone());
            }
            Event::CreatorFollowed {
                user_id,
                creator_id,
            } => {
                // Both sides or neither.
                if self.creator(creator_id).is_none() || self.user(user_id).is_none() {
                    return self;
                }
                if let Some(user) = self.user_mut(user_id)
                    && !user.following.contains(creator_id)
                {
                    user.following.push(creator_id.clone());
                }
                if let Some(creator) = self.creator_mut(creator_id)
                    && !creator.followers.contains(user_id)
                {
                    creator.followers.push(user_id.clone());
                }
            }
            Event::CreatorUnfollowed {
                user_id,
                creator_id,
            } => {
                if let Some(user) = self.user_mut(user_id) {
                    user.following.retain(|c| c != creator_id);
                }
                if let Some(creator) = self.creator_mut(creator_id) {
                    creator.followers.retain(|u| u != user_id);
                }
            }
            Event::AttendanceRecorded { popup_id, count } => {
                if let Some(popup) = self.popups.iter_mut().find(|p| &p.id == popup_id) {
                    popup.attendance = *count;
                    popup.status = PopupStatus::Past;
                }
            }
            Event::ProfileUpdated { user_id, patch } => {
                let creator_id = self.user_mut(user_id).and_then(|user| {
                    patch.merge_into_user(user);
                    user.creator_id.clone()
                });
                if let Some(creator) = creator_id.and_then(|id| self.creator_mut(&id)) {
                    patch.merge_into_creator(creator);
                }
            }
            Event::PostCreated { post } => {
                self.posts.insert(0, post.clone());
            }
            Event::RumorStarted { rumor } => {
                self.rumors.insert(0, rumor.clone());
            }
            Event::NotificationSent { notification } => {
                self.notifications.insert(0, notification.clone());
            }
            Event::NotificationRead { notification_id } => {
                if let Some(n) = self
                    .notifications
                    .iter_mut()
                    .find(|n| &n.id == notification_id)
                {
                    n.read = true;
                }
            }
            Event::LaunchFlagSet { has_launched } => {
                self.has_launched = *has_launched;
            }
        }
        self
    }
}
