use siteentry_core::{CoreError, GeoError};
use thiserror::Error;

use crate::Status;

/// A transition the session refused. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("You must check in before checking out.")]
    CheckOutBeforeCheckIn,

    #[error("You have already checked in.")]
    AlreadyCheckedIn,

    #[error("You have already checked out.")]
    AlreadyCheckedOut,

    #[error("A submission is already in progress.")]
    SubmitInFlight,

    #[error("no submission is in flight for this session")]
    NoSubmissionInFlight,

    #[error("cannot {action} while {status}")]
    InvalidState { action: &'static str, status: Status },

    #[error("check-in and check-out are only available on the daily log")]
    NotDailyLog,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Geolocation(#[from] GeoError),

    #[error(transparent)]
    Field(#[from] CoreError),
}
