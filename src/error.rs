//! Crate-level error types for command execution, seeding and I/O edges.

/// Error returned by [`Store::execute`](crate::Store::execute).
///
/// Generic over `E`, the domain-specific error type that the aggregate's
/// command handler may produce (e.g. "not signed in").
///
/// # Type Parameters
///
/// * `E` - Domain error type, must implement `Error + Send + Sync + 'static`
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError<E: std::error::Error + Send + Sync + 'static> {
    /// Command rejected by aggregate logic.
    ///
    /// Wraps the domain-specific error returned from the aggregate's
    /// command handler, forwarding its `Display` and `Error` impls.
    #[error(transparent)]
    Domain(E),

    /// A produced event could not be encoded into the journal.
    ///
    /// The state snapshot is left untouched when this happens.
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync + 'static> ExecuteError<E> {
    /// Borrow the domain error, if this is a command rejection.
    pub fn domain(&self) -> Option<&E> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Encode(_) => None,
        }
    }
}

/// Rejections produced by the RUSH state store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The command needs a signed-in user and none is set.
    #[error("no user is signed in")]
    Unauthenticated,

    /// The email exists but the password does not match.
    #[error("email and password do not match")]
    InvalidCredentials,

    /// The signed-in user does not run the creator the command acts for.
    #[error("signed-in user does not run creator {0}")]
    NotCreatorOwner(String),

    /// Attendance was already recorded; a popup moves to `past` only once.
    #[error("attendance already recorded for popup {0}")]
    AttendanceAlreadyRecorded(String),

    /// Input failed a store-enforced invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Field-level validation failures.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("popup title must not be empty")]
    EmptyTitle,
    #[error("popup location must not be empty")]
    EmptyLocation,
    #[error("popup ends before it starts")]
    EndsBeforeStart,
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("attendance must be a non-negative count, got {0}")]
    AttendanceOutOfRange(i64),
    #[error("report reason must not be empty")]
    EmptyReason,
    #[error("post needs an image")]
    EmptyImage,
    #[error("rumor content must not be empty")]
    EmptyRumor,
}

/// Errors raised while loading seed fixtures.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed document is not valid JSON or does not match the entity shapes.
    #[error("invalid seed document: {0}")]
    Parse(#[from] serde_json::Error),
}
