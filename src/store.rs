//! Top-level entry point: the [`Store`] owns the state snapshot, the event
//! journal, and the registered projections.
//!
//! The store is built via [`StoreBuilder`] and is constructed once per
//! session (or per test). There are no module-level singletons; callers pass
//! the store by reference to whatever needs it.

use std::sync::Arc;

use crate::aggregate::{Aggregate, replay};
use crate::command::{Command, CommandContext};
use crate::domain::{
    NewPopup, NewPost, NewReport, NewReview, NewRumor, ProfilePatch, Role, RsvpStatus,
};
use crate::error::{ExecuteError, StoreError};
use crate::event::{StoredEvent, encode_event};
use crate::projection::{Projection, ProjectionSlot};
use crate::seed::Seed;
use crate::state::AppState;

/// Outcome of a typed RUSH command.
pub type CommandResult = Result<(), ExecuteError<StoreError>>;

/// The RUSH store.
pub type RushStore = Store<AppState>;

/// Single owner and mutator of an aggregate's state.
///
/// Every command runs to completion before the next one starts (`&mut self`).
/// A command either replaces the snapshot with the fold of all its events or,
/// when rejected, leaves it untouched.
pub struct Store<A: Aggregate> {
    state: Arc<A>,
    initial: Arc<A>,
    journal: Vec<StoredEvent>,
    projections: Vec<Box<dyn ProjectionSlot>>,
}

// Manual `Debug` because projection slots are trait objects.
impl<A: Aggregate + std::fmt::Debug> std::fmt::Debug for Store<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("aggregate_type", &A::AGGREGATE_TYPE)
            .field("journal_len", &self.journal.len())
            .finish()
    }
}

/// Builder for [`Store`].
pub struct StoreBuilder<A: Aggregate> {
    initial: A,
    projections: Vec<Box<dyn ProjectionSlot>>,
}

impl<A: Aggregate> StoreBuilder<A> {
    /// Register a projection fed by every appended event.
    ///
    /// Registering the same projection type twice is ignored.
    pub fn projection<P: Projection>(mut self) -> Self {
        if self.projections.iter().any(|p| p.slot_name() == P::NAME) {
            tracing::warn!(projection = P::NAME, "projection already registered");
            return self;
        }
        self.projections.push(Box::new(P::default()));
        self
    }

    pub fn build(self) -> Store<A> {
        let initial = Arc::new(self.initial);
        Store {
            state: Arc::clone(&initial),
            initial,
            journal: Vec::new(),
            projections: self.projections,
        }
    }
}

impl<A: Aggregate> Store<A> {
    /// Start building a store whose state begins at `initial`.
    pub fn builder(initial: A) -> StoreBuilder<A> {
        StoreBuilder {
            initial,
            projections: Vec::new(),
        }
    }

    /// Current state. Cheap to clone and never mutated in place.
    pub fn snapshot(&self) -> Arc<A> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &A {
        &self.state
    }

    /// Every event applied since the store was built, oldest first.
    pub fn journal(&self) -> &[StoredEvent] {
        &self.journal
    }

    /// Look up a registered projection by type.
    pub fn projection<P: Projection>(&self) -> Option<&P> {
        self.projections
            .iter()
            .find_map(|p| p.as_any().downcast_ref::<P>())
    }

    /// Rebuild the current state from the initial state and the journal.
    pub fn rebuild(&self) -> A {
        replay((*self.initial).clone(), &self.journal)
    }

    /// Handle a command and apply the resulting events.
    ///
    /// # Returns
    ///
    /// The events that were applied; empty when the command was a no-op.
    ///
    /// # Errors
    ///
    /// [`ExecuteError::Domain`] when the aggregate rejects the command,
    /// [`ExecuteError::Encode`] when an event cannot be journaled. The
    /// snapshot is unchanged in both cases.
    pub fn execute(
        &mut self,
        cmd: A::Command,
        ctx: CommandContext,
    ) -> Result<Vec<A::DomainEvent>, ExecuteError<A::Error>> {
        let _span = tracing::info_span!("execute", aggregate_type = A::AGGREGATE_TYPE).entered();
        let ctx = ctx.stamped();

        let events = self.state.handle(cmd, &ctx).map_err(|e| {
            tracing::debug!(error = %e, "command rejected");
            ExecuteError::Domain(e)
        })?;
        if events.is_empty() {
            return Ok(events);
        }

        // Encode before folding so a failure leaves nothing half-applied.
        let base = self.journal.len() as u64;
        let stored = events
            .iter()
            .enumerate()
            .map(|(i, e)| encode_event::<A>(e, &ctx, base + i as u64 + 1))
            .collect::<serde_json::Result<Vec<_>>>()?;

        let next = events
            .iter()
            .fold((*self.state).clone(), |state, event| state.apply(event));
        self.state = Arc::new(next);

        for entry in &stored {
            for projection in &mut self.projections {
                projection.feed(entry);
            }
        }
        self.journal.extend(stored);

        tracing::info!(count = events.len(), "events applied");
        Ok(events)
    }
}

impl Store<AppState> {
    /// A store seeded from fixtures, with the activity feed registered.
    pub fn from_seed(seed: Seed) -> Self {
        Store::builder(AppState::from_seed(seed))
            .projection::<crate::projection::ActivityFeed>()
            .build()
    }

    /// Context for a UI-issued command: the actor is the signed-in user.
    fn ctx(&self) -> CommandContext {
        match &self.state.current_user_id {
            Some(id) => CommandContext::default().with_actor(id.clone()),
            None => CommandContext::default(),
        }
    }

    /// Run a command with the default UI context.
    pub fn dispatch(&mut self, cmd: Command) -> CommandResult {
        let ctx = self.ctx();
        tracing::debug!(command = cmd.name(), "dispatch");
        self.execute(cmd, ctx).map(|_| ())
    }

    pub fn login(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> CommandResult {
        self.dispatch(Command::Login {
            email: email.into(),
            password: password.into(),
            role,
        })
    }

    pub fn logout(&mut self) -> CommandResult {
        self.dispatch(Command::Logout)
    }

    pub fn select_campus(&mut self, campus_id: impl Into<String>) -> CommandResult {
        self.dispatch(Command::SelectCampus {
            campus_id: campus_id.into(),
        })
    }

    pub fn create_popup(&mut self, popup: NewPopup) -> CommandResult {
        self.dispatch(Command::CreatePopup(popup))
    }

    pub fn rsvp(&mut self, popup_id: impl Into<String>, status: RsvpStatus) -> CommandResult {
        self.dispatch(Command::Rsvp {
            popup_id: popup_id.into(),
            status,
        })
    }

    pub fn toggle_reminder(&mut self, rsvp_id: impl Into<String>) -> CommandResult {
        self.dispatch(Command::ToggleReminder {
            rsvp_id: rsvp_id.into(),
        })
    }

    pub fn cancel_rsvp(&mut self, popup_id: impl Into<String>) -> CommandResult {
        self.dispatch(Command::CancelRsvp {
            popup_id: popup_id.into(),
        })
    }

    pub fn add_review(&mut self, review: NewReview) -> CommandResult {
        self.dispatch(Command::AddReview(review))
    }

    pub fn add_report(&mut self, report: NewReport) -> CommandResult {
        self.dispatch(Command::AddReport(report))
    }

    /// Follow, or unfollow when already following.
    pub fn follow_creator(&mut self, creator_id: impl Into<String>) -> CommandResult {
        self.dispatch(Command::FollowCreator {
            creator_id: creator_id.into(),
        })
    }

    pub fn set_attendance(&mut self, popup_id: impl Into<String>, count: i64) -> CommandResult {
        self.dispatch(Command::SetAttendance {
            popup_id: popup_id.into(),
            count,
        })
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) -> CommandResult {
        self.dispatch(Command::UpdateProfile(patch))
    }

    pub fn create_post(&mut self, post: NewPost) -> CommandResult {
        self.dispatch(Command::CreatePost(post))
    }

    pub fn start_rumor(&mut self, rumor: NewRumor) -> CommandResult {
        self.dispatch(Command::StartRumor(rumor))
    }

    pub fn mark_notification_read(&mut self, notification_id: impl Into<String>) -> CommandResult {
        self.dispatch(Command::MarkNotificationRead {
            notification_id: notification_id.into(),
        })
    }

    pub fn set_has_launched(&mut self, has_launched: bool) -> CommandResult {
        self.dispatch(Command::SetHasLaunched { has_launched })
    }
}
