use serde::{Deserialize, Serialize};

// Data owned by the backend. The client keeps read-only copies per view
// and refetches after every mutation; `available_spots` and `total_cost`
// in particular are always displayed exactly as the server returned them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Driver,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }
}

/// Authenticated identity, held from login until logout. The login
/// endpoint may omit `role` for legacy driver accounts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    #[default]
    Open,
    Closed,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Open => "open",
            LotStatus::Closed => "closed",
        }
    }
}

/// A parking facility. The public listing omits `hourly_rate`/`status`;
/// the admin management listing includes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    pub lot_id: i64,
    pub lot_name: String,
    pub location: String,
    pub total_spots: u32,
    pub available_spots: u32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub status: LotStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A reserved time window at a lot. Admin listings join in `user_name`;
/// driver listings need not carry it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    pub reservation_id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub lot_id: i64,
    #[serde(default)]
    pub lot_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Confirmation returned by a successful booking creation. The cost is
/// computed server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookingSummary {
    #[serde(default)]
    pub lot_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserAccount {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Aggregate snapshot for the admin overview, entirely server-computed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminStats {
    pub total_lots: u32,
    pub total_spots: u32,
    pub available_spots: u32,
    pub occupied_spots: u32,
    pub total_users: u32,
    pub total_bookings: u32,
    pub total_revenue: f64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DayRevenue {
    pub date: String,
    #[serde(default)]
    pub bookings_count: u32,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LotRevenue {
    pub lot_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BookingStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub active: u32,
    #[serde(default)]
    pub completed: u32,
}

/// Best-effort analytics block. The backend fills missing sections with
/// empty fallbacks, so every field tolerates absence.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub revenue_by_day: Vec<DayRevenue>,
    #[serde(default)]
    pub top_parking_lots: Vec<LotRevenue>,
    #[serde(default)]
    pub booking_stats: BookingStats,
    #[serde(default)]
    pub above_avg_lots: Vec<LotRevenue>,
}
