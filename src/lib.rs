//! Application state store for RUSH, a campus pop-up food discovery app.
//!
//! All state lives in one in-process [`AppState`] seeded from fixtures and
//! changed only through [`Command`]s executed by a [`Store`]. Queries are
//! pure methods on the state snapshot.

mod aggregate;
pub use aggregate::{Aggregate, ReduceFn, reducer, replay};
mod command;
pub mod config;
pub mod domain;
mod error;
mod event;
pub mod geocode;
mod projection;
mod seed;
mod selectors;
mod state;
mod store;
pub mod telemetry;

pub use command::{Command, CommandContext};
pub use config::{Config, ConfigError};
pub use error::{ExecuteError, SeedError, StoreError, ValidationError};
pub use event::{Event, StoredEvent, decode_event, encode_event};
pub use projection::{ActivityEntry, ActivityFeed, Projection};
pub use seed::Seed;
pub use state::AppState;
pub use store::{CommandResult, RushStore, Store, StoreBuilder};
