//! Read models fed from the store's journal.
//!
//! A projection sees every [`StoredEvent`] the store appends, in order.
//! Projections are registered on the [`StoreBuilder`](crate::StoreBuilder)
//! and queried through [`Store::projection`](crate::Store::projection).

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::event::StoredEvent;

/// A read model derived from the journal.
///
/// # Contract
///
/// - [`apply`](Projection::apply) must be deterministic: given the same
///   sequence of events, it must produce the same state.
/// - Unknown event types should be silently ignored. Filtering by
///   `event.event_type` is done in the method body.
pub trait Projection:
    Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable name, used to look the projection up.
    const NAME: &'static str;

    /// Apply a single journal entry.
    fn apply(&mut self, event: &StoredEvent);
}

/// Object-safe wrapper so the store can hold heterogeneous projections.
pub(crate) trait ProjectionSlot: Send + Sync {
    fn slot_name(&self) -> &'static str;
    fn feed(&mut self, event: &StoredEvent);
    fn as_any(&self) -> &dyn Any;
}

impl<P: Projection> ProjectionSlot for P {
    fn slot_name(&self) -> &'static str {
        P::NAME
    }

    fn feed(&mut self, event: &StoredEvent) {
        self.apply(event);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// ActivityFeed
// ---------------------------------------------------------------------------

/// A single entry in the activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub sequence: u64,
    /// The event type name (e.g. "RsvpPlaced", "RumorStarted").
    pub event_type: String,
    pub actor: Option<String>,
    /// Related popup, when the event concerns one.
    pub popup_id: Option<String>,
    pub at: DateTime<Utc>,
}

/// Recent session activity across every entity type.
///
/// Maintains a reverse-chronological feed capped at 200 entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFeed {
    /// Activity entries, most recent first.
    pub entries: Vec<ActivityEntry>,
}

/// Maximum number of entries retained in the feed.
const FEED_CAP: usize = 200;

/// Pull a popup id out of an event payload, wherever the event keeps it.
fn popup_ref(data: &serde_json::Value) -> Option<String> {
    let nested = ["rsvp", "review", "report"]
        .iter()
        .find_map(|key| data.get(key).and_then(|v| v.get("popup_id")));
    data.get("popup_id")
        .or(nested)
        .or_else(|| data.get("popup").and_then(|p| p.get("id")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

impl Projection for ActivityFeed {
    const NAME: &'static str = "activity-feed";

    fn apply(&mut self, event: &StoredEvent) {
        // Session bookkeeping is not activity.
        if matches!(
            event.event_type.as_str(),
            "SignedIn" | "SignedOut" | "LaunchFlagSet" | "NotificationRead"
        ) {
            return;
        }
        let entry = ActivityEntry {
            sequence: event.sequence,
            event_type: event.event_type.clone(),
            actor: event.actor.clone(),
            popup_id: popup_ref(&event.data),
            at: event.recorded_at,
        };
        self.entries.insert(0, entry);
        self.entries.truncate(FEED_CAP);
    }
}
