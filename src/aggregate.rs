//! Aggregate trait and journal reducer.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::command::CommandContext;
use crate::event::{StoredEvent, decode_event};

/// State that changes only by folding its own events.
///
/// The implementing type is the state. A command is first decided by
/// [`handle`](Aggregate::handle), which reads the state and returns events;
/// each event is then folded in by [`apply`](Aggregate::apply).
///
/// `handle` does no I/O. Anything time-dependent reads the
/// [`CommandContext`]. `apply` is total: an event naming a record that does
/// not exist leaves the state as it was.
pub trait Aggregate:
    Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Stamped on every journal entry, e.g. `"rush"`.
    const AGGREGATE_TYPE: &'static str;

    type Command: Send + 'static;
    type DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decide which events a command produces.
    ///
    /// An empty vector means the command changes nothing.
    fn handle(
        &self,
        cmd: Self::Command,
        ctx: &CommandContext,
    ) -> Result<Vec<Self::DomainEvent>, Self::Error>;

    /// Fold one event into the state.
    fn apply(self, event: &Self::DomainEvent) -> Self;
}

/// Folds one journal entry into state.
pub type ReduceFn<A> = fn(A, &StoredEvent) -> A;

fn reduce<A: Aggregate>(state: A, entry: &StoredEvent) -> A {
    match decode_event::<A>(entry) {
        Some(event) => state.apply(&event),
        None => {
            tracing::debug!(
                sequence = entry.sequence,
                event_type = %entry.event_type,
                "skipping undecodable journal entry"
            );
            state
        }
    }
}

/// A [`ReduceFn`] that decodes each entry and hands it to `A::apply`.
///
/// Entries that do not decode as `A::DomainEvent` are skipped.
pub fn reducer<A: Aggregate>() -> ReduceFn<A> {
    reduce::<A>
}

/// Rebuild state by folding a journal on top of an initial state.
pub fn replay<A: Aggregate>(initial: A, journal: &[StoredEvent]) -> A {
    journal.iter().fold(initial, reducer::<A>())
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use serde::{Deserialize, Serialize};

    use super::Aggregate;
    use crate::command::CommandContext;

    /// People currently standing at a popup.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub(crate) struct Headcount {
        pub present: u32,
    }

    pub(crate) enum HeadcountCommand {
        Arrive,
        Leave,
        Group(u32),
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "type", content = "data")]
    pub(crate) enum HeadcountEvent {
        Arrived,
        Left,
        GroupArrived { size: u32 },
    }

    #[derive(Debug, thiserror::Error)]
    pub(crate) enum HeadcountError {
        #[error("nobody is here to leave")]
        Empty,
    }

    impl Aggregate for Headcount {
        const AGGREGATE_TYPE: &'static str = "headcount";

        type Command = HeadcountCommand;
        type DomainEvent = HeadcountEvent;
        type Error = HeadcountError;

        fn handle(
            &self,
            cmd: HeadcountCommand,
            _ctx: &CommandContext,
        ) -> Result<Vec<HeadcountEvent>, HeadcountError> {
            Ok(match cmd {
                HeadcountCommand::Arrive => vec![HeadcountEvent::Arrived],
                HeadcountCommand::Leave if self.present == 0 => {
                    return Err(HeadcountError::Empty);
                }
                HeadcountCommand::Leave => vec![HeadcountEvent::Left],
                HeadcountCommand::Group(0) => vec![],
                HeadcountCommand::Group(size) => vec![HeadcountEvent::GroupArrived { size }],
            })
        }

        fn apply(self, event: &HeadcountEvent) -> Self {
            let present = match event {
                HeadcountEvent::Arrived => self.present + 1,
                HeadcountEvent::Left => self.present.saturating_sub(1),
                HeadcountEvent::GroupArrived { size } => self.present + size,
            };
            Self { present }
        }
    }
}
