//! Command context and the command set accepted by [`AppState`](crate::AppState).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    NewPopup, NewPost, NewReport, NewReview, NewRumor, ProfilePatch, Role, RsvpStatus,
};

/// Cross-cutting metadata passed alongside a command.
///
/// Carries audit trail, correlation, and the clock reading for the command
/// without polluting the `Command` or `Event` types. Fields are copied onto
/// each [`StoredEvent`](crate::StoredEvent) in the journal.
///
/// # Examples
///
/// ```
/// use rush_store::CommandContext;
/// use serde_json::json;
///
/// let ctx = CommandContext::default()
///     .with_actor("user-42")
///     .with_correlation_id("tap-abc-123")
///     .with_metadata(json!({"screen": "map"}));
///
/// assert_eq!(ctx.actor.as_deref(), Some("user-42"));
/// assert_eq!(ctx.correlation_id.as_deref(), Some("tap-abc-123"));
/// assert!(ctx.metadata.is_some());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandContext {
    /// Identity of the actor issuing the command (e.g. a user ID).
    pub actor: Option<String>,
    /// Correlation ID for tracing one UI interaction across commands.
    pub correlation_id: Option<String>,
    /// Arbitrary metadata forwarded to the journal.
    pub metadata: Option<Value>,
    /// Clock reading used for every timestamp the command produces.
    ///
    /// Left empty, the store stamps it with the current time before the
    /// command is handled.
    pub issued_at: Option<DateTime<Utc>>,
}

impl CommandContext {
    /// Set the actor identity.
    ///
    /// # Arguments
    ///
    /// * `actor` - Id of the user whose tap issued the command. Copied onto
    ///   every journal entry the command produces.
    ///
    /// # Returns
    ///
    /// The updated `CommandContext` with the actor set.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the correlation ID.
    ///
    /// # Arguments
    ///
    /// * `id` - Ties together the commands issued by one UI interaction,
    ///   such as a signup that also selects a campus.
    ///
    /// # Returns
    ///
    /// The updated `CommandContext` with the correlation ID set.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Set arbitrary metadata.
    ///
    /// # Arguments
    ///
    /// * `meta` - A `serde_json::Value` forwarded verbatim into
    ///   [`StoredEvent::metadata`](crate::StoredEvent::metadata).
    ///
    /// # Returns
    ///
    /// The updated `CommandContext` with the metadata set.
    pub fn with_metadata(mut self, meta: Value) -> Self {
        self.metadata = Some(meta);
        self
    }

    /// Pin the clock reading for this command.
    ///
    /// # Arguments
    ///
    /// * `at` - Timestamp stamped on posts, rumors, notifications and the
    ///   journal entries the command produces.
    ///
    /// # Returns
    ///
    /// The updated `CommandContext` with `issued_at` set.
    pub fn with_issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }

    /// Fill `issued_at` with the current time if unset.
    pub(crate) fn stamped(mut self) -> Self {
        if self.issued_at.is_none() {
            self.issued_at = Some(Utc::now());
        }
        self
    }

    /// The clock reading for this command.
    ///
    /// Falls back to the current time for contexts that were never stamped.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at.unwrap_or_else(Utc::now)
    }
}

/// Every mutation the UI can request.
///
/// Implements `Deserialize` so a presentation layer can forward commands as
/// JSON (`{"type": "Rsvp", "data": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    /// Sign in, or create the account on first sight of an email.
    Login {
        email: String,
        password: String,
        role: Role,
    },
    Logout,
    SelectCampus { campus_id: String },
    CreatePopup(NewPopup),
    /// Upsert the current user's RSVP for a popup.
    Rsvp {
        popup_id: String,
        status: RsvpStatus,
    },
    ToggleReminder { rsvp_id: String },
    CancelRsvp { popup_id: String },
    AddReview(NewReview),
    AddReport(NewReport),
    /// Follow the creator, or unfollow if already following.
    FollowCreator { creator_id: String },
    /// Record final attendance; moves the popup to `past`.
    SetAttendance { popup_id: String, count: i64 },
    UpdateProfile(ProfilePatch),
    CreatePost(NewPost),
    StartRumor(NewRumor),
    MarkNotificationRead { notification_id: String },
    SetHasLaunched { has_launched: bool },
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::SelectCampus { .. } => "select_campus",
            Self::CreatePopup(_) => "create_popup",
            Self::Rsvp { .. } => "rsvp",
            Self::ToggleReminder { .. } => "toggle_reminder",
            Self::CancelRsvp { .. } => "cancel_rsvp",
            Self::AddReview(_) => "add_review",
            Self::AddReport(_) => "add_report",
            Self::FollowCreator { .. } => "follow_creator",
            Self::SetAttendance { .. } => "set_attendance",
            Self::UpdateProfile(_) => "update_profile",
            Self::CreatePost(_) => "create_post",
            Self::StartRumor(_) => "start_rumor",
            Self::MarkNotificationRead { .. } => "mark_notification_read",
            Self::SetHasLaunched { .. } => "set_has_launched",
        }
    }
}
