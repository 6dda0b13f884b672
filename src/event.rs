//! Domain events and the journal record they are stored as.
//!
//! [`Event`] is what [`AppState::handle`](crate::Aggregate::handle) decides
//! and [`AppState::apply`](crate::Aggregate::apply) folds. [`StoredEvent`] is
//! the self-describing journal form consumed by projections and replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::command::CommandContext;
use crate::domain::{
    Creator, Notification, Popup, Post, ProfilePatch, Report, Review, Rsvp, RsvpStatus, Rumor,
    User,
};

/// Facts recorded by the RUSH store.
///
/// Uses adjacently tagged serialization (`"type"` + `"data"`), the
/// convention every journaled event in this crate follows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A first-time login created an account (and its creator profile).
    AccountCreated {
        user: User,
        creator: Option<Creator>,
    },
    SignedIn { user_id: String },
    SignedOut,
    CampusSelected { user_id: String, campus_id: String },
    PopupCreated { popup: Popup },
    RsvpPlaced { rsvp: Rsvp },
    RsvpStatusChanged { rsvp_id: String, status: RsvpStatus },
    ReminderToggled { rsvp_id: String, reminder: bool },
    RsvpCancelled { rsvp_id: String },
    ReviewAdded { review: Review },
    ReportFiled { report: Report },
    CreatorFollowed { user_id: String, creator_id: String },
    CreatorUnfollowed { user_id: String, creator_id: String },
    AttendanceRecorded { popup_id: String, count: u32 },
    ProfileUpdated { user_id: String, patch: ProfilePatch },
    PostCreated { post: Post },
    RumorStarted { rumor: Rumor },
    NotificationSent { notification: Notification },
    NotificationRead { notification_id: String },
    LaunchFlagSet { has_launched: bool },
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// 1-based position in the journal.
    pub sequence: u64,
    /// Aggregate type that produced the event (e.g. `"rush"`).
    pub aggregate_type: String,
    /// Event type tag extracted from the adjacently-tagged domain event.
    pub event_type: String,
    /// JSON payload (the `"data"` portion); `null` for unit variants.
    pub data: serde_json::Value,
    /// Actor identity from the command context, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Correlation ID from the command context, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Extra metadata from the command context, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub recorded_at: DateTime<Utc>,
}

/// Encode a domain event and its command context into a [`StoredEvent`].
///
/// Serializes the adjacently-tagged domain event, splitting it into the
/// `"type"` tag and `"data"` payload.
///
/// # Errors
///
/// Returns `serde_json::Error` if the event cannot be serialized or does not
/// serialize to a tagged object.
pub fn encode_event<A: Aggregate>(
    event: &A::DomainEvent,
    ctx: &CommandContext,
    sequence: u64,
) -> serde_json::Result<StoredEvent> {
    // Serializing yields `{"type": "SignedOut"}` for unit variants and
    // `{"type": "SignedIn", "data": {...}}` otherwise.
    let value = serde_json::to_value(event)?;
    let event_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            <serde_json::Error as serde::ser::Error>::custom(
                "domain event must serialize to an adjacently tagged object",
            )
        })?
        .to_string();
    let data = value.get("data").cloned().unwrap_or(serde_json::Value::Null);

    Ok(StoredEvent {
        sequence,
        aggregate_type: A::AGGREGATE_TYPE.to_string(),
        event_type,
        data,
        actor: ctx.actor.clone(),
        correlation_id: ctx.correlation_id.clone(),
        metadata: ctx.metadata.clone(),
        recorded_at: ctx.issued_at(),
    })
}

/// Decode a journal entry back into a domain event.
///
/// Returns `None` for unknown or malformed event types.
pub fn decode_event<A: Aggregate>(stored: &StoredEvent) -> Option<A::DomainEvent> {
    let tagged = if stored.data.is_null() {
        serde_json::json!({ "type": stored.event_type })
    } else {
        serde_json::json!({ "type": stored.event_type, "data": stored.data })
    };
    serde_json::from_value(tagged).ok()
}
