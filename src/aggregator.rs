//! Dashboard aggregation: fan out the independent fetches a view needs,
//! settle every one of them regardless of individual failures, and merge
//! the outcomes into a single view model with a criticality verdict.

use crate::api::{ApiClient, ApiError};
use crate::models::{AdminStats, Analytics, Booking, ParkingLot, UserAccount};

/// Outcome of one independently fetched dashboard resource.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchState::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    fn settle(resource: &'static str, result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => FetchState::Loaded(data),
            Err(err) => {
                log::error!("failed to load {resource}: {err}");
                FetchState::Failed(err.to_string())
            }
        }
    }
}

/// Everything the driver view renders. Lots are critical; personal
/// bookings degrade to an unavailable section.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverDashboard {
    pub lots: FetchState<Vec<ParkingLot>>,
    pub bookings: FetchState<Vec<Booking>>,
    pub has_critical_failure: bool,
}

impl DriverDashboard {
    pub fn loading() -> Self {
        Self {
            lots: FetchState::Loading,
            bookings: FetchState::Loading,
            has_critical_failure: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lots.is_loading()
    }

    /// Pure merge of the settled sub-requests. Produces a complete
    /// replacement for the previous dashboard value.
    pub fn assemble(
        lots: Result<Vec<ParkingLot>, ApiError>,
        bookings: Result<Vec<Booking>, ApiError>,
    ) -> Self {
        let lots = FetchState::settle("parking lots", lots);
        let bookings = FetchState::settle("bookings", bookings);
        let has_critical_failure = lots.is_failed();
        Self {
            lots,
            bookings,
            has_critical_failure,
        }
    }

    /// Issues both requests concurrently; a slow or failing one never
    /// starves the other.
    pub async fn load(api: &ApiClient, user_id: i64) -> Self {
        let (lots, bookings) = futures::join!(api.list_lots(), api.my_bookings(user_id));
        Self::assemble(lots, bookings)
    }
}

/// Everything the admin view renders. Stats, lots, bookings and users are
/// critical; analytics is best-effort and never blocks the view.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub stats: FetchState<AdminStats>,
    pub lots: FetchState<Vec<ParkingLot>>,
    pub bookings: FetchState<Vec<Booking>>,
    pub users: FetchState<Vec<UserAccount>>,
    pub analytics: FetchState<Analytics>,
    pub has_critical_failure: bool,
}

impl AdminDashboard {
    pub fn loading() -> Self {
        Self {
            stats: FetchState::Loading,
            lots: FetchState::Loading,
            bookings: FetchState::Loading,
            users: FetchState::Loading,
            analytics: FetchState::Loading,
            has_critical_failure: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.stats.is_loading()
    }

    pub fn assemble(
        stats: Result<AdminStats, ApiError>,
        lots: Result<Vec<ParkingLot>, ApiError>,
        bookings: Result<Vec<Booking>, ApiError>,
        users: Result<Vec<UserAccount>, ApiError>,
        analytics: Result<Analytics, ApiError>,
    ) -> Self {
        let stats = FetchState::settle("admin stats", stats);
        let lots = FetchState::settle("managed lots", lots);
        let bookings = FetchState::settle("all bookings", bookings);
        let users = FetchState::settle("users", users);
        let analytics = FetchState::settle("analytics", analytics);
        let has_critical_failure =
            stats.is_failed() || lots.is_failed() || bookings.is_failed() || users.is_failed();
        Self {
            stats,
            lots,
            bookings,
            users,
            analytics,
            has_critical_failure,
        }
    }

    pub async fn load(api: &ApiClient) -> Self {
        let (stats, lots, bookings, users, analytics) = futures::join!(
            api.admin_stats(),
            api.admin_lots(),
            api.admin_bookings(),
            api.admin_users(),
            api.admin_analytics(),
        );
        Self::assemble(stats, lots, bookings, users, analytics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, LotStatus};

    fn lot(lot_id: i64) -> ParkingLot {
        ParkingLot {
            lot_id,
            lot_name: format!("Lot {lot_id}"),
            location: "Downtown".to_string(),
            total_spots: 50,
            available_spots: 12,
            hourly_rate: 30.0,
            status: LotStatus::Open,
        }
    }

    fn booking(reservation_id: i64) -> Booking {
        Booking {
            reservation_id,
            user_id: 7,
            user_name: None,
            lot_id: 1,
            lot_name: Some("Lot 1".to_string()),
            location: Some("Downtown".to_string()),
            start_time: "2024-06-01T10:00".to_string(),
            end_time: "2024-06-01T12:00".to_string(),
            total_cost: 60.0,
            status: BookingStatus::Active,
            created_at: None,
        }
    }

    fn user(user_id: i64) -> UserAccount {
        UserAccount {
            user_id,
            name: format!("User {user_id}"),
            email: format!("user{user_id}@example.com"),
            role: Default::default(),
            created_at: None,
        }
    }

    fn stats() -> AdminStats {
        AdminStats {
            total_lots: 3,
            total_spots: 150,
            available_spots: 90,
            occupied_spots: 60,
            total_users: 40,
            total_bookings: 210,
            total_revenue: 12_500.0,
            occupancy_rate: 40.0,
        }
    }

    fn failed() -> ApiError {
        ApiError::Api {
            status: 500,
            detail: "database connection failed".to_string(),
        }
    }

    #[test]
    fn driver_view_with_all_fetches_ok() {
        let dashboard = DriverDashboard::assemble(Ok(vec![lot(1), lot(2)]), Ok(vec![booking(9)]));
        assert!(!dashboard.has_critical_failure);
        assert_eq!(dashboard.lots.data().map(Vec::len), Some(2));
        assert_eq!(dashboard.bookings.data().map(Vec::len), Some(1));
    }

    #[test]
    fn driver_view_blocks_when_lots_fail() {
        // Lots are critical: bookings alone cannot render the view.
        let dashboard = DriverDashboard::assemble(Err(failed()), Ok(vec![booking(9)]));
        assert!(dashboard.has_critical_failure);
        assert!(dashboard.lots.is_failed());
        assert_eq!(dashboard.bookings.data().map(Vec::len), Some(1));
    }

    #[test]
    fn driver_view_tolerates_bookings_failure() {
        let dashboard = DriverDashboard::assemble(Ok(vec![lot(1)]), Err(failed()));
        assert!(!dashboard.has_critical_failure);
        assert!(dashboard.bookings.is_failed());
        assert_eq!(dashboard.lots.data().map(Vec::len), Some(1));
    }

    #[test]
    fn admin_view_tolerates_analytics_failure() {
        // Analytics is best-effort: the rest of the view renders fully.
        let dashboard = AdminDashboard::assemble(
            Ok(stats()),
            Ok(vec![lot(1)]),
            Ok(vec![booking(9)]),
            Ok(vec![user(3)]),
            Err(failed()),
        );
        assert!(!dashboard.has_critical_failure);
        assert!(dashboard.analytics.is_failed());
        assert!(dashboard.stats.data().is_some());
        assert_eq!(dashboard.users.data().map(Vec::len), Some(1));
    }

    #[test]
    fn admin_view_flags_any_critical_failure() {
        let dashboard = AdminDashboard::assemble(
            Ok(stats()),
            Ok(vec![lot(1)]),
            Err(failed()),
            Ok(vec![user(3)]),
            Ok(Analytics::default()),
        );
        assert!(dashboard.has_critical_failure);
        // The other resources still settled; nothing short-circuited.
        assert!(dashboard.stats.data().is_some());
        assert!(dashboard.lots.data().is_some());
        assert!(dashboard.users.data().is_some());
        assert!(dashboard.analytics.data().is_some());
    }

    #[test]
    fn failed_resources_keep_the_backend_message() {
        let dashboard = DriverDashboard::assemble(Err(failed()), Ok(vec![]));
        assert_eq!(
            dashboard.lots,
            FetchState::Failed("database connection failed".to_string())
        );
    }

    #[test]
    fn assembly_is_deterministic_for_stable_inputs() {
        // Re-running the aggregation with no intervening mutation yields
        // an equal view for every stable resource.
        let first = DriverDashboard::assemble(Ok(vec![lot(1)]), Ok(vec![booking(9)]));
        let second = DriverDashboard::assemble(Ok(vec![lot(1)]), Ok(vec![booking(9)]));
        assert_eq!(first, second);
    }

    #[test]
    fn fan_out_settles_every_branch() {
        // Drive the join the way `load` does, with one failing branch in
        // the middle; the later branch must still settle.
        let dashboard = futures::executor::block_on(async {
            let lots = async { Err::<Vec<ParkingLot>, _>(failed()) };
            let bookings = async { Ok(vec![booking(1), booking(2)]) };
            let (lots, bookings) = futures::join!(lots, bookings);
            DriverDashboard::assemble(lots, bookings)
        });
        assert!(dashboard.has_critical_failure);
        assert_eq!(dashboard.bookings.data().map(Vec::len), Some(2));
    }
}
