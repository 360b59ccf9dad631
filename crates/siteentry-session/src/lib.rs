//! Form sessions: field editing, submission state machine, daily-log
//! check-in/out with geolocation, user notices, and document export.

mod daily;
mod error;
pub mod export;
pub mod geolocation;
mod notice;
mod session;

#[cfg(test)]
mod testing;

pub use error::{SequenceError, SessionError};
pub use export::{DocumentTarget, Snapshot, TextFileTarget};
pub use geolocation::{FixedLocator, GeolocationService, Locator};
pub use notice::{Notice, NoticeLevel};
pub use session::{
    FIX_FIELDS_MESSAGE, FormSession, Status, SubmitStart, Submission, TransitionRecord,
};
