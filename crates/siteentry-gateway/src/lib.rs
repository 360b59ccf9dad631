//! Submission gateway: turns validated form values into a transport payload
//! and hands it to an external sink exactly once.

mod gateway;
mod outcome;
mod sink;

#[cfg(feature = "http")]
pub mod http;

pub use gateway::{Gateway, GatewayError};
pub use outcome::{OutcomeStatus, SubmissionOutcome};
pub use sink::{LogSink, Sink, SinkError};

#[cfg(feature = "http")]
pub use http::HttpSink;
