use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::API_BASE_URL;
use crate::models::{
    AdminStats, Analytics, Booking, BookingSummary, ParkingLot, Session, UserAccount,
};

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx status. `detail` carries the message from the backend's
    /// `{"detail": ...}` error body when one was present.
    #[error("{detail}")]
    Api { status: u16, detail: String },
    /// 2xx response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The backend-supplied message, or `fallback` when the failure
    /// carried no usable detail (network and decode errors).
    pub fn detail_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Api { detail, .. } if !detail.is_empty() => detail,
            _ => fallback,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(api_error(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// For mutations where only the status matters; the body is discarded.
async fn accept(response: Response) -> Result<(), ApiError> {
    if response.ok() {
        Ok(())
    } else {
        Err(api_error(response).await)
    }
}

async fn api_error(response: Response) -> ApiError {
    let status = response.status();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) if !body.detail.is_empty() => body.detail,
        _ => format!("HTTP {} {}", status, response.status_text()),
    };
    ApiError::Api { status, detail }
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

// -- Request payloads --

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Payload for booking creation, produced by a validated
/// `ReservationWorkflow`. Times are local `YYYY-MM-DDTHH:MM` strings
/// with no offset; the backend reads them as its own local time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub user_id: i64,
    pub lot_id: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateLotRequest {
    pub lot_name: String,
    pub location: String,
    pub total_spots: u32,
    pub hourly_rate: f64,
    pub status: String,
}

/// Partial lot update; `None` fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateLotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spots: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

// -- Response envelopes --

#[derive(Deserialize)]
struct LotsEnvelope {
    parking_lots: Vec<ParkingLot>,
}

#[derive(Deserialize)]
struct LotEnvelope {
    parking_lot: ParkingLot,
}

#[derive(Deserialize)]
struct ManagedLotsEnvelope {
    lots: Vec<ParkingLot>,
}

#[derive(Deserialize)]
struct BookingsEnvelope {
    bookings: Vec<Booking>,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<UserAccount>,
}

#[derive(Deserialize)]
struct BookingSummaryEnvelope {
    booking_summary: BookingSummary,
}

/// Stateless HTTP client for the parking backend. Cheap to construct;
/// pages create one per request batch.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -- Auth --

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = Request::post(&self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }

    // -- Driver reads --

    pub async fn list_lots(&self) -> Result<Vec<ParkingLot>, ApiError> {
        let response = Request::get(&self.url("/parking/lots"))
            .send()
            .await
            .map_err(network)?;
        decode::<LotsEnvelope>(response).await.map(|e| e.parking_lots)
    }

    pub async fn get_lot(&self, lot_id: i64) -> Result<ParkingLot, ApiError> {
        let response = Request::get(&self.url(&format!("/parking/lots/{lot_id}")))
            .send()
            .await
            .map_err(network)?;
        decode::<LotEnvelope>(response).await.map(|e| e.parking_lot)
    }

    pub async fn my_bookings(&self, user_id: i64) -> Result<Vec<Booking>, ApiError> {
        let response = Request::get(&self.url(&format!("/parking/bookings/{user_id}")))
            .send()
            .await
            .map_err(network)?;
        decode::<BookingsEnvelope>(response).await.map(|e| e.bookings)
    }

    // -- Driver mutations --

    pub async fn create_booking(&self, request: &BookingRequest) -> Result<BookingSummary, ApiError> {
        let response = Request::post(&self.url("/parking/book"))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode::<BookingSummaryEnvelope>(response)
            .await
            .map(|e| e.booking_summary)
    }

    pub async fn cancel_booking(&self, reservation_id: i64) -> Result<(), ApiError> {
        let response = Request::put(&self.url(&format!("/parking/bookings/{reservation_id}/cancel")))
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    // -- Admin reads --

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let response = Request::get(&self.url("/admin/stats"))
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }

    pub async fn admin_lots(&self) -> Result<Vec<ParkingLot>, ApiError> {
        let response = Request::get(&self.url("/admin/lots/manage"))
            .send()
            .await
            .map_err(network)?;
        decode::<ManagedLotsEnvelope>(response).await.map(|e| e.lots)
    }

    pub async fn admin_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let response = Request::get(&self.url("/admin/bookings"))
            .send()
            .await
            .map_err(network)?;
        decode::<BookingsEnvelope>(response).await.map(|e| e.bookings)
    }

    pub async fn admin_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        let response = Request::get(&self.url("/admin/users"))
            .send()
            .await
            .map_err(network)?;
        decode::<UsersEnvelope>(response).await.map(|e| e.users)
    }

    pub async fn admin_analytics(&self) -> Result<Analytics, ApiError> {
        let response = Request::get(&self.url("/admin/analytics"))
            .send()
            .await
            .map_err(network)?;
        decode(response).await
    }

    // -- Admin mutations --

    pub async fn create_lot(&self, request: &CreateLotRequest) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/admin/lots"))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    pub async fn update_lot(&self, lot_id: i64, update: &UpdateLotRequest) -> Result<(), ApiError> {
        let response = Request::put(&self.url(&format!("/admin/lots/{lot_id}")))
            .json(update)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    pub async fn delete_lot(&self, lot_id: i64) -> Result<(), ApiError> {
        let response = Request::delete(&self.url(&format!("/admin/lots/{lot_id}")))
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/admin/users"))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        let response = Request::delete(&self.url(&format!("/admin/users/{user_id}")))
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }

    pub async fn delete_booking(&self, reservation_id: i64) -> Result<(), ApiError> {
        let response = Request::delete(&self.url(&format!("/admin/bookings/{reservation_id}")))
            .send()
            .await
            .map_err(network)?;
        accept(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let api = ApiClient::with_base_url("http://localhost:9999");
        assert_eq!(api.url("/parking/lots"), "http://localhost:9999/parking/lots");
    }

    #[test]
    fn backend_detail_is_surfaced_verbatim() {
        let err = ApiError::Api {
            status: 400,
            detail: "Cannot delete lot with 3 active bookings".to_string(),
        };
        assert_eq!(
            err.detail_or("Failed to delete lot"),
            "Cannot delete lot with 3 active bookings"
        );
        assert_eq!(err.to_string(), "Cannot delete lot with 3 active bookings");
    }

    #[test]
    fn transport_errors_fall_back_to_generic_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.detail_or("Failed to delete lot"), "Failed to delete lot");
    }
}
