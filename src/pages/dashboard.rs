use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::aggregator::{DriverDashboard, FetchState};
use crate::api::ApiClient;
use crate::components::lot_card::LotCard;
use crate::models::{Booking, BookingStatus};
use crate::refresh::use_refresh_bus;
use crate::session::use_session;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let bus = use_refresh_bus();
    let navigate = use_navigate();

    let (dashboard, set_dashboard) = signal(DriverDashboard::loading());
    let (cancel_error, set_cancel_error) = signal::<Option<String>>(None);
    // Reservation id of the cancel request currently in flight, if any.
    let (cancelling, set_cancelling) = signal::<Option<i64>>(None);

    // Session gate: unauthenticated visitors go to the login page.
    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if session.get().is_none() {
                navigate("/login", Default::default());
            }
        });
    }

    // Aggregate on mount and on every refresh tick (mutations committed
    // elsewhere, tab visibility, window focus). Each run replaces the
    // whole dashboard value.
    Effect::new(move |_| {
        bus.track();
        let Some(user) = session.get() else {
            return;
        };
        set_dashboard.set(DriverDashboard::loading());
        spawn_local(async move {
            let api = ApiClient::new();
            let fresh = DriverDashboard::load(&api, user.user_id).await;
            // try_set: the user may have navigated away mid-flight.
            let _ = set_dashboard.try_set(fresh);
        });
    });

    let book_lot = {
        let navigate = navigate.clone();
        move |lot_id: i64| {
            navigate(&format!("/book/{lot_id}"), Default::default());
        }
    };

    let cancel_booking = move |reservation_id: i64| {
        if cancelling.get_untracked().is_some() {
            return;
        }
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message("Are you sure you want to cancel this booking?")
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        set_cancel_error.set(None);
        set_cancelling.set(Some(reservation_id));
        spawn_local(async move {
            let api = ApiClient::new();
            match api.cancel_booking(reservation_id).await {
                // Full refetch; the backend owns the spot accounting.
                Ok(()) => bus.notify(),
                Err(err) => {
                    let _ = set_cancel_error
                        .try_set(Some(err.detail_or("Failed to cancel booking").to_string()));
                }
            }
            let _ = set_cancelling.try_set(None);
        });
    };

    let booking_row = move |b: Booking| {
        let id = b.reservation_id;
        let active = b.status == BookingStatus::Active;
        let cancel_booking = cancel_booking.clone();
        view! {
            <tr>
                <td>{b.lot_name.clone().unwrap_or_else(|| "N/A".to_string())}</td>
                <td>{b.start_time.clone()}</td>
                <td>{b.end_time.clone()}</td>
                <td class="cost-cell">{format!("₹{:.2}", b.total_cost)}</td>
                <td>
                    <span class=format!("badge badge-{}", b.status.as_str())>
                        {b.status.as_str()}
                    </span>
                </td>
                <td>
                    {active.then(|| view! {
                        <button
                            class="btn btn-small btn-danger"
                            disabled=move || cancelling.get() == Some(id)
                            on:click=move |_| cancel_booking(id)
                        >
                            {move || if cancelling.get() == Some(id) { "Cancelling..." } else { "Cancel" }}
                        </button>
                    })}
                </td>
            </tr>
        }
    };

    view! {
        <div class="page dashboard-page">
            <style>{include_str!("dashboard.css")}</style>

            <h2 class="welcome-header">
                {move || {
                    let name = session.get().map(|s| s.name).unwrap_or_else(|| "User".to_string());
                    format!("Welcome {name} 👋")
                }}
            </h2>

            {move || {
                let d = dashboard.get();
                if d.is_loading() {
                    return view! {
                        <div class="loading-spinner">
                            <div class="spinner"></div>
                            <span>"Loading parking lots..."</span>
                        </div>
                    }
                    .into_any();
                }
                if d.has_critical_failure {
                    return view! {
                        <div class="alert alert-error">
                            <strong>"Failed to load parking lots. "</strong>
                            "Please try again later."
                        </div>
                    }
                    .into_any();
                }

                let book_lot = book_lot.clone();
                let lot_cards = d
                    .lots
                    .data()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|lot| {
                        let on_book = book_lot.clone();
                        view! { <LotCard lot=lot on_book=on_book /> }
                    })
                    .collect_view();

                let booking_row = booking_row.clone();
                let bookings_section = match &d.bookings {
                    FetchState::Failed(_) => view! {
                        <div class="alert alert-info">
                            "Your bookings are unavailable right now."
                        </div>
                    }
                    .into_any(),
                    state => {
                        let bookings = state.data().cloned().unwrap_or_default();
                        if bookings.is_empty() {
                            view! { <p class="empty-note">"No bookings yet."</p> }.into_any()
                        } else {
                            let rows = bookings.into_iter().map(booking_row).collect_view();
                            view! {
                                <table class="data-table">
                                    <thead>
                                        <tr>
                                            <th>"Lot"</th>
                                            <th>"Start"</th>
                                            <th>"End"</th>
                                            <th>"Cost"</th>
                                            <th>"Status"</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>{rows}</tbody>
                                </table>
                            }
                            .into_any()
                        }
                    }
                };

                view! {
                    <div class="lot-grid">{lot_cards}</div>

                    <section class="bookings-section">
                        <h3>"My Bookings"</h3>
                        {move || {
                            cancel_error.get().map(|e| view! {
                                <div class="alert alert-error">{e}</div>
                            })
                        }}
                        {bookings_section}
                    </section>
                }
                .into_any()
            }}
        </div>
    }
}
