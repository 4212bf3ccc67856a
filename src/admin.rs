//! Admin mutations, all following the same shape: confirm if destructive,
//! issue a single request, and let the caller re-run the dashboard
//! aggregation on success. Nothing is patched optimistically.

use crate::api::{ApiClient, CreateLotRequest, CreateUserRequest, UpdateLotRequest};
use crate::models::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    CreateLot(CreateLotRequest),
    UpdateLot {
        lot_id: i64,
        update: UpdateLotRequest,
    },
    DeleteLot {
        lot_id: i64,
    },
    CreateUser(CreateUserRequest),
    DeleteUser {
        user_id: i64,
    },
    DeleteBooking {
        reservation_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutationError {
    #[error("You cannot delete your own account.")]
    SelfDelete,
    /// Backend rejection, carrying its message (or a per-action fallback).
    #[error("{0}")]
    Rejected(String),
}

impl AdminAction {
    /// Confirmation text for destructive actions; `None` means the action
    /// may be issued without asking. Deleting a user cascades to their
    /// bookings on the backend, hence the warning.
    pub fn confirm_prompt(&self) -> Option<&'static str> {
        match self {
            AdminAction::DeleteLot { .. } => Some(
                "Are you sure you want to delete this parking lot? This action cannot be undone.",
            ),
            AdminAction::DeleteBooking { .. } => {
                Some("Are you sure you want to delete this booking?")
            }
            AdminAction::DeleteUser { .. } => Some(
                "Are you sure you want to delete this user? All their bookings will also be deleted.",
            ),
            _ => None,
        }
    }

    /// Local guard run before any request leaves the client.
    pub fn authorize(&self, session: &Session) -> Result<(), MutationError> {
        match self {
            AdminAction::DeleteUser { user_id } if *user_id == session.user_id => {
                Err(MutationError::SelfDelete)
            }
            _ => Ok(()),
        }
    }

    fn fallback_message(&self) -> &'static str {
        match self {
            AdminAction::CreateLot(_) => "Failed to create lot",
            AdminAction::UpdateLot { .. } => "Failed to update lot",
            AdminAction::DeleteLot { .. } => "Failed to delete lot",
            AdminAction::CreateUser(_) => "Failed to create user",
            AdminAction::DeleteUser { .. } => "Failed to delete user",
            AdminAction::DeleteBooking { .. } => "Failed to delete booking",
        }
    }
}

/// Issues the single request behind `action`. On success the caller must
/// invalidate and re-run the dashboard aggregation; on failure displayed
/// state is left untouched and only the message is surfaced.
pub async fn execute(
    api: &ApiClient,
    session: &Session,
    action: AdminAction,
) -> Result<(), MutationError> {
    action.authorize(session)?;
    let fallback = action.fallback_message();
    let result = match &action {
        AdminAction::CreateLot(request) => api.create_lot(request).await,
        AdminAction::UpdateLot { lot_id, update } => api.update_lot(*lot_id, update).await,
        AdminAction::DeleteLot { lot_id } => api.delete_lot(*lot_id).await,
        AdminAction::CreateUser(request) => api.create_user(request).await,
        AdminAction::DeleteUser { user_id } => api.delete_user(*user_id).await,
        AdminAction::DeleteBooking { reservation_id } => {
            api.delete_booking(*reservation_id).await
        }
    };
    result.map_err(|err| MutationError::Rejected(err.detail_or(fallback).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn admin(user_id: i64) -> Session {
        Session {
            user_id,
            name: "Admin".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn deleting_your_own_account_is_rejected_before_any_request() {
        let action = AdminAction::DeleteUser { user_id: 7 };
        assert_eq!(
            action.authorize(&admin(7)),
            Err(MutationError::SelfDelete)
        );
    }

    #[test]
    fn deleting_another_user_is_allowed() {
        let action = AdminAction::DeleteUser { user_id: 8 };
        assert_eq!(action.authorize(&admin(7)), Ok(()));
    }

    #[test]
    fn destructive_actions_require_confirmation() {
        assert!(AdminAction::DeleteLot { lot_id: 1 }.confirm_prompt().is_some());
        assert!(AdminAction::DeleteUser { user_id: 1 }.confirm_prompt().is_some());
        assert!(AdminAction::DeleteBooking { reservation_id: 1 }
            .confirm_prompt()
            .is_some());
    }

    #[test]
    fn creates_and_updates_do_not_prompt() {
        let create = AdminAction::CreateUser(CreateUserRequest {
            name: "New".to_string(),
            email: "new@example.com".to_string(),
            password: "secret".to_string(),
            role: "driver".to_string(),
        });
        assert!(create.confirm_prompt().is_none());

        let update = AdminAction::UpdateLot {
            lot_id: 1,
            update: UpdateLotRequest::default(),
        };
        assert!(update.confirm_prompt().is_none());
    }

    #[test]
    fn user_deletion_prompt_mentions_the_booking_cascade() {
        let prompt = AdminAction::DeleteUser { user_id: 1 }
            .confirm_prompt()
            .unwrap();
        assert!(prompt.contains("bookings will also be deleted"));
    }

    #[test]
    fn each_action_has_a_generic_fallback() {
        assert_eq!(
            AdminAction::DeleteLot { lot_id: 1 }.fallback_message(),
            "Failed to delete lot"
        );
        assert_eq!(
            AdminAction::DeleteBooking { reservation_id: 1 }.fallback_message(),
            "Failed to delete booking"
        );
    }
}
