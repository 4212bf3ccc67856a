use leptos::prelude::*;

use crate::models::{LotStatus, ParkingLot};

#[component]
pub fn LotCard(lot: ParkingLot, #[prop(into)] on_book: Callback<i64>) -> impl IntoView {
    let lot_id = lot.lot_id;
    let closed = lot.status == LotStatus::Closed;
    let full = lot.available_spots == 0;

    let availability_class = if lot.available_spots > 10 {
        "lot-availability availability-high"
    } else if lot.available_spots > 0 {
        "lot-availability availability-low"
    } else {
        "lot-availability availability-none"
    };

    let rate = if lot.hourly_rate > 0.0 {
        format!("₹{:.2} per hour", lot.hourly_rate)
    } else {
        String::new()
    };

    let button_label = if closed {
        "Closed"
    } else if full {
        "Full"
    } else {
        "Book Now"
    };

    view! {
        <div class="lot-card">
            <h4 class="lot-name">{lot.lot_name.clone()}</h4>
            <p class="lot-location">{lot.location.clone()}</p>
            <p>
                "Available Spots: "
                <strong class=availability_class>{lot.available_spots}</strong>
                " / "
                {lot.total_spots}
            </p>
            {(!rate.is_empty()).then(|| view! { <p class="lot-rate">{rate.clone()}</p> })}
            <button
                class="btn btn-success"
                disabled=closed || full
                on:click=move |_| on_book.run(lot_id)
            >
                {button_label}
            </button>
        </div>
    }
}
