//! Booking-creation workflow: collect a time range, validate it locally,
//! submit exactly one request, and interpret the outcome.

use chrono::NaiveDateTime;

use crate::api::{ApiError, BookingRequest};
use crate::models::{BookingSummary, Session};

/// The shape `datetime-local` inputs produce and the backend expects.
/// No timezone offset is transmitted; the backend reads the string as
/// its own local time.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Pause before the post-booking redirect, long enough to read the
/// confirmation.
pub const REDIRECT_DELAY_MS: u32 = 1_500;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// Times may be edited freely; nothing touches the network.
    Collecting,
    /// Exactly one create request is outstanding.
    Submitting,
    /// The server accepted; holds the returned summary.
    Succeeded(BookingSummary),
    /// The server rejected; resubmitting is allowed.
    Failed(String),
}

/// Precondition violations, reported synchronously before any request
/// is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select both start and end times before booking.")]
    MissingTimes,
    #[error("Times must be complete date-and-time values.")]
    InvalidTime,
    #[error("End time must be after start time.")]
    EndNotAfterStart,
    #[error("You must be logged in to book a parking spot.")]
    NotLoggedIn,
    #[error("A booking request is already in progress.")]
    AlreadySubmitting,
}

/// The single downstream action scheduled by a successful booking:
/// wait `delay_ms`, signal a bookings refresh, navigate to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationWorkflow {
    lot_id: i64,
    start_time: String,
    end_time: String,
    state: WorkflowState,
}

impl ReservationWorkflow {
    pub fn new(lot_id: i64) -> Self {
        Self {
            lot_id,
            start_time: String::new(),
            end_time: String::new(),
            state: WorkflowState::Collecting,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn is_submitting(&self) -> bool {
        self.state == WorkflowState::Submitting
    }

    /// Time edits are ignored while a request is outstanding.
    pub fn set_start_time(&mut self, value: &str) {
        if !self.is_submitting() {
            self.start_time = value.to_string();
        }
    }

    pub fn set_end_time(&mut self, value: &str) {
        if !self.is_submitting() {
            self.end_time = value.to_string();
        }
    }

    /// Validates the collected range and, when every precondition holds,
    /// transitions to `Submitting` and yields the payload for the single
    /// create request. On any violation the workflow stays where it was
    /// and nothing is sent.
    pub fn begin_submit(
        &mut self,
        session: Option<&Session>,
    ) -> Result<BookingRequest, ValidationError> {
        if self.is_submitting() {
            return Err(ValidationError::AlreadySubmitting);
        }
        if self.start_time.is_empty() || self.end_time.is_empty() {
            return Err(ValidationError::MissingTimes);
        }
        let start = NaiveDateTime::parse_from_str(&self.start_time, TIME_FORMAT)
            .map_err(|_| ValidationError::InvalidTime)?;
        let end = NaiveDateTime::parse_from_str(&self.end_time, TIME_FORMAT)
            .map_err(|_| ValidationError::InvalidTime)?;
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }
        let user_id = session.map(|s| s.user_id).ok_or(ValidationError::NotLoggedIn)?;

        self.state = WorkflowState::Submitting;
        Ok(BookingRequest {
            user_id,
            lot_id: self.lot_id,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        })
    }

    /// Applies the server outcome. An outcome arriving in any state other
    /// than `Submitting` is stale (the user already moved on) and is
    /// discarded without effect.
    pub fn resolve(&mut self, outcome: Result<BookingSummary, ApiError>) -> Option<FollowUp> {
        if !self.is_submitting() {
            log::warn!("discarding stale booking outcome for lot {}", self.lot_id);
            return None;
        }
        match outcome {
            Ok(summary) => {
                self.state = WorkflowState::Succeeded(summary);
                Some(FollowUp {
                    delay_ms: REDIRECT_DELAY_MS,
                })
            }
            Err(err) => {
                self.state = WorkflowState::Failed(
                    err.detail_or("Booking failed. Please try again.").to_string(),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn driver() -> Session {
        Session {
            user_id: 42,
            name: "Asha".to_string(),
            role: Role::Driver,
        }
    }

    fn summary() -> BookingSummary {
        BookingSummary {
            lot_name: Some("Lot 1".to_string()),
            start_time: "2024-06-01T10:00".to_string(),
            end_time: "2024-06-01T12:00".to_string(),
            total_cost: 150.0,
        }
    }

    #[test]
    fn missing_times_never_reach_the_network() {
        let mut wf = ReservationWorkflow::new(1);
        assert_eq!(
            wf.begin_submit(Some(&driver())),
            Err(ValidationError::MissingTimes)
        );
        assert_eq!(*wf.state(), WorkflowState::Collecting);
    }

    #[test]
    fn end_before_start_is_rejected_locally() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T09:00");
        assert_eq!(
            wf.begin_submit(Some(&driver())),
            Err(ValidationError::EndNotAfterStart)
        );
        assert_eq!(*wf.state(), WorkflowState::Collecting);
    }

    #[test]
    fn equal_bounds_are_rejected() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T10:00");
        assert_eq!(
            wf.begin_submit(Some(&driver())),
            Err(ValidationError::EndNotAfterStart)
        );
    }

    #[test]
    fn garbage_times_are_rejected() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("tomorrow-ish");
        wf.set_end_time("2024-06-01T12:00");
        assert_eq!(
            wf.begin_submit(Some(&driver())),
            Err(ValidationError::InvalidTime)
        );
    }

    #[test]
    fn missing_session_is_rejected() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        assert_eq!(wf.begin_submit(None), Err(ValidationError::NotLoggedIn));
    }

    #[test]
    fn valid_range_transitions_to_submitting_with_payload() {
        let mut wf = ReservationWorkflow::new(5);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        let request = wf.begin_submit(Some(&driver())).unwrap();
        assert_eq!(request.user_id, 42);
        assert_eq!(request.lot_id, 5);
        assert_eq!(request.start_time, "2024-06-01T10:00");
        assert_eq!(request.end_time, "2024-06-01T12:00");
        assert!(wf.is_submitting());
    }

    #[test]
    fn duplicate_submission_is_blocked_while_outstanding() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();
        assert_eq!(
            wf.begin_submit(Some(&driver())),
            Err(ValidationError::AlreadySubmitting)
        );
    }

    #[test]
    fn edits_are_ignored_while_submitting() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();
        wf.set_end_time("2024-06-01T18:00");
        assert_eq!(wf.end_time(), "2024-06-01T12:00");
    }

    #[test]
    fn success_yields_exactly_one_follow_up() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();

        let follow_up = wf.resolve(Ok(summary()));
        assert_eq!(
            follow_up,
            Some(FollowUp {
                delay_ms: REDIRECT_DELAY_MS
            })
        );
        match wf.state() {
            WorkflowState::Succeeded(s) => assert_eq!(s.total_cost, 150.0),
            other => panic!("expected Succeeded, got {other:?}"),
        }

        // A second outcome for the same submission is stale.
        assert_eq!(wf.resolve(Ok(summary())), None);
    }

    #[test]
    fn failure_surfaces_the_backend_detail_and_schedules_nothing() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();

        let outcome = Err(ApiError::Api {
            status: 400,
            detail: "No available spots in this lot".to_string(),
        });
        assert_eq!(wf.resolve(outcome), None);
        assert_eq!(
            *wf.state(),
            WorkflowState::Failed("No available spots in this lot".to_string())
        );
    }

    #[test]
    fn failure_without_detail_uses_the_generic_fallback() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();

        wf.resolve(Err(ApiError::Network("timeout".to_string())));
        assert_eq!(
            *wf.state(),
            WorkflowState::Failed("Booking failed. Please try again.".to_string())
        );
    }

    #[test]
    fn resubmission_is_allowed_after_failure() {
        let mut wf = ReservationWorkflow::new(1);
        wf.set_start_time("2024-06-01T10:00");
        wf.set_end_time("2024-06-01T12:00");
        wf.begin_submit(Some(&driver())).unwrap();
        wf.resolve(Err(ApiError::Network("timeout".to_string())));

        assert!(wf.begin_submit(Some(&driver())).is_ok());
        assert!(wf.is_submitting());
    }

    #[test]
    fn outcome_in_collecting_state_is_discarded() {
        let mut wf = ReservationWorkflow::new(1);
        assert_eq!(wf.resolve(Ok(summary())), None);
        assert_eq!(*wf.state(), WorkflowState::Collecting);
    }
}
