//! Daily log check-in and check-out.
//!
//! Both capture a location and fill their pair of derived fields. Check-out
//! requires a check-in from the same session and submits the log on success;
//! it is the only submission not started by the operator.

use siteentry_core::schema::{CHECK_IN_LOCATION, CHECK_IN_TIME, CHECK_OUT_LOCATION, CHECK_OUT_TIME};
use siteentry_core::{FormKind, GeoCapture};
use siteentry_gateway::{Gateway, SubmissionOutcome};
use tracing::{info, warn};

use crate::{FormSession, GeolocationService, Notice, SequenceError, SessionError};

impl FormSession {
    pub async fn check_in(&mut self, geo: &GeolocationService) -> Result<GeoCapture, SessionError> {
        self.require_daily_log()?;
        self.require_editable("check in")?;
        if self.check_in.is_some() {
            return Err(self.refuse(SequenceError::AlreadyCheckedIn));
        }

        let capture = self.capture(geo).await?;
        self.set_derived(CHECK_IN_TIME, capture.timestamp_iso());
        self.set_derived(CHECK_IN_LOCATION, capture.location());
        self.check_in = Some(capture.clone());
        info!(location = %capture.location(), "checked in");
        Ok(capture)
    }

    /// Capture the check-out location, then submit the daily log.
    pub async fn check_out(
        &mut self,
        geo: &GeolocationService,
        gateway: &Gateway,
    ) -> Result<SubmissionOutcome, SessionError> {
        self.require_daily_log()?;
        self.require_editable("check out")?;
        if self.check_in.is_none() {
            return Err(self.refuse(SequenceError::CheckOutBeforeCheckIn));
        }
        if self.check_out.is_some() {
            return Err(self.refuse(SequenceError::AlreadyCheckedOut));
        }

        let capture = self.capture(geo).await?;
        self.set_derived(CHECK_OUT_TIME, capture.timestamp_iso());
        self.set_derived(CHECK_OUT_LOCATION, capture.location());
        info!(location = %capture.location(), "checked out");
        self.check_out = Some(capture);

        Ok(self.request_submit(gateway).await?)
    }

    fn require_daily_log(&self) -> Result<(), SequenceError> {
        if self.kind() == FormKind::DailyLog {
            Ok(())
        } else {
            Err(SequenceError::NotDailyLog)
        }
    }

    async fn capture(&mut self, geo: &GeolocationService) -> Result<GeoCapture, SessionError> {
        geo.capture().await.map_err(|e| {
            self.push_notice(Notice::geolocation(e.to_string()));
            SessionError::from(e)
        })
    }

    fn refuse(&mut self, err: SequenceError) -> SessionError {
        warn!(form = %self.kind(), error = %err, "transition refused");
        self.push_notice(Notice::error(err.to_string()));
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use siteentry_core::{FormValues, GeoError, Position};

    use crate::testing::CountingSink;
    use crate::{Locator, NoticeLevel, Status};

    fn site() -> GeolocationService {
        GeolocationService::fixed(Position::new(37.7749, -122.4194))
    }

    struct Denied;

    #[async_trait]
    impl Locator for Denied {
        async fn current_position(&self) -> Result<Position, GeoError> {
            Err(GeoError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn check_in_then_out_submits_and_clears() {
        let (sink, gateway) = CountingSink::gateway();
        let mut session = FormSession::new(FormKind::DailyLog);

        let capture = session.check_in(&site()).await.unwrap();
        assert_eq!(
            session.values().get(CHECK_IN_LOCATION).and_then(|v| v.as_text()),
            Some("37.77490, -122.41940")
        );
        assert_eq!(
            session.values().get(CHECK_IN_TIME).and_then(|v| v.as_text()),
            Some(capture.timestamp_iso().as_str())
        );
        assert_eq!(session.status(), Status::Editing);

        let outcome = session.check_out(&site(), &gateway).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.message, "Daily log submitted successfully.");
        assert_eq!(sink.calls(), 1);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.values(), &FormValues::new());
        assert!(session.checked_in().is_none());
        assert!(session.checked_out().is_none());
    }

    #[tokio::test]
    async fn check_out_before_check_in_is_refused() {
        let (sink, gateway) = CountingSink::gateway();
        let mut session = FormSession::new(FormKind::DailyLog);

        let err = session.check_out(&site(), &gateway).await.unwrap_err();
        assert_eq!(err, SessionError::Sequence(SequenceError::CheckOutBeforeCheckIn));
        assert_eq!(session.status(), Status::Idle);
        assert!(session.values().is_empty());
        assert!(session.transitions().is_empty());
        assert_eq!(sink.calls(), 0);

        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].description, "You must check in before checking out.");
        assert_eq!(notices[0].level, NoticeLevel::Destructive);
    }

    #[tokio::test]
    async fn double_check_in_is_refused() {
        let mut session = FormSession::new(FormKind::DailyLog);
        session.check_in(&site()).await.unwrap();
        let before = session.values().clone();

        let err = session.check_in(&site()).await.unwrap_err();
        assert_eq!(err, SessionError::Sequence(SequenceError::AlreadyCheckedIn));
        assert_eq!(session.values(), &before);
    }

    #[tokio::test]
    async fn geolocation_failure_leaves_values_untouched() {
        let mut session = FormSession::new(FormKind::DailyLog);
        let denied = GeolocationService::new(Arc::new(Denied));

        let err = session.check_in(&denied).await.unwrap_err();
        assert_eq!(err, SessionError::Geolocation(GeoError::PermissionDenied));
        assert!(session.values().is_empty());
        assert!(session.checked_in().is_none());
        assert_eq!(session.take_notices()[0].title, "Geolocation Error");

        // The user can simply try again.
        session.check_in(&site()).await.unwrap();
        assert!(session.checked_in().is_some());
    }

    #[tokio::test]
    async fn unsupported_platform_on_check_out_keeps_check_in() {
        let (sink, gateway) = CountingSink::gateway();
        let mut session = FormSession::new(FormKind::DailyLog);
        session.check_in(&site()).await.unwrap();

        let err = session
            .check_out(&GeolocationService::unsupported(), &gateway)
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Geolocation(GeoError::Unsupported));
        assert!(session.checked_in().is_some());
        assert!(session.values().get(CHECK_OUT_TIME).is_none());
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn failed_auto_submit_can_be_retried() {
        let (sink, gateway) = CountingSink::failing_first(1);
        let mut session = FormSession::new(FormKind::DailyLog);
        session.check_in(&site()).await.unwrap();

        let first = session.check_out(&site(), &gateway).await.unwrap();
        assert_eq!(first.message, "Failed to submit daily log.");
        assert_eq!(session.status(), Status::Editing);
        assert_eq!(session.values().len(), 4);

        let again = session.check_out(&site(), &gateway).await.unwrap_err();
        assert_eq!(again, SessionError::Sequence(SequenceError::AlreadyCheckedOut));

        let retry = session.request_submit(&gateway).await.unwrap();
        assert!(retry.is_success());
        assert_eq!(sink.calls(), 2);
    }

    #[tokio::test]
    async fn check_in_only_on_daily_log() {
        let mut session = FormSession::new(FormKind::Induction);
        let err = session.check_in(&site()).await.unwrap_err();
        assert_eq!(err, SessionError::Sequence(SequenceError::NotDailyLog));
        assert_eq!(session.status(), Status::Idle);
    }
}
