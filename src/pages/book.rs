use chrono::Local;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::models::ParkingLot;
use crate::refresh::use_refresh_bus;
use crate::session::use_session;
use crate::workflow::{ReservationWorkflow, WorkflowState, TIME_FORMAT};

/// Lower bound for the pickers, re-evaluated at render time. Keeping the
/// not-in-the-past rule here (rather than in the workflow) means "now"
/// reflects when the user is choosing, and the backend stays the
/// authority on actually rejectable ranges.
fn datetime_local_now() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

#[component]
pub fn BookPage() -> impl IntoView {
    let session = use_session();
    let bus = use_refresh_bus();
    let navigate = use_navigate();
    let params = use_params_map();

    let lot_id = Memo::new(move |_| {
        params.with(|p| p.get("lot_id").and_then(|v| v.parse::<i64>().ok()))
    });

    let (lot, set_lot) = signal::<Option<ParkingLot>>(None);
    let (lot_error, set_lot_error) = signal::<Option<String>>(None);
    let workflow = RwSignal::new(ReservationWorkflow::new(0));
    let (validation, set_validation) = signal::<Option<String>>(None);

    // Session gate.
    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if session.get().is_none() {
                navigate("/login", Default::default());
            }
        });
    }

    // The lot must load before the form renders; its failure blocks the
    // whole page.
    Effect::new(move |_| {
        let Some(id) = lot_id.get() else {
            set_lot_error.set(Some("Unknown parking lot".to_string()));
            return;
        };
        workflow.set(ReservationWorkflow::new(id));
        set_lot.set(None);
        set_lot_error.set(None);
        set_validation.set(None);
        spawn_local(async move {
            let api = ApiClient::new();
            match api.get_lot(id).await {
                Ok(fetched) => {
                    let _ = set_lot.try_set(Some(fetched));
                }
                Err(err) => {
                    let _ = set_lot_error.try_set(Some(
                        err.detail_or("Failed to load parking lot details").to_string(),
                    ));
                }
            }
        });
    });

    let submit = {
        let navigate = navigate.clone();
        move |_| {
            set_validation.set(None);
            let current = session.get_untracked();
            let Some(attempt) = workflow.try_update(|wf| wf.begin_submit(current.as_ref()))
            else {
                return;
            };
            let request = match attempt {
                Ok(request) => request,
                Err(violation) => {
                    // Local validation failure: nothing was sent.
                    set_validation.set(Some(violation.to_string()));
                    return;
                }
            };

            let navigate = navigate.clone();
            spawn_local(async move {
                let api = ApiClient::new();
                let outcome = api.create_booking(&request).await;
                // try_update both applies the outcome and drops it when
                // the page is already gone.
                let follow_up = workflow.try_update(|wf| wf.resolve(outcome)).flatten();
                if let Some(follow_up) = follow_up {
                    TimeoutFuture::new(follow_up.delay_ms).await;
                    bus.notify();
                    navigate("/dashboard", Default::default());
                }
            });
        }
    };

    let back = {
        let navigate = navigate.clone();
        move |_| navigate("/dashboard", Default::default())
    };

    view! {
        <div class="page book-page">
            <style>{include_str!("book.css")}</style>

            {move || {
                if let Some(error) = lot_error.get() {
                    return view! {
                        <div class="alert alert-error">{error}</div>
                    }
                    .into_any();
                }
                let Some(current_lot) = lot.get() else {
                    return view! {
                        <div class="loading-spinner">
                            <div class="spinner"></div>
                            <span>"Loading lot details..."</span>
                        </div>
                    }
                    .into_any();
                };

                let submit = submit.clone();
                let back = back.clone();
                view! {
                    <div class="book-card">
                        <h3>{current_lot.lot_name.clone()}</h3>
                        <p class="lot-location">{current_lot.location.clone()}</p>
                        <p>
                            "Available Spots: "
                            {current_lot.available_spots}
                            " / "
                            {current_lot.total_spots}
                        </p>
                        <p>{format!("Rate: ₹{:.2} per hour", current_lot.hourly_rate)}</p>

                        <div class="form-group">
                            <label>"Start Time"</label>
                            <input
                                type="datetime-local"
                                class="form-control"
                                min=datetime_local_now()
                                prop:value=move || workflow.with(|wf| wf.start_time().to_string())
                                on:input=move |ev| {
                                    workflow.update(|wf| wf.set_start_time(&event_target_value(&ev)))
                                }
                            />
                        </div>
                        <div class="form-group">
                            <label>"End Time"</label>
                            <input
                                type="datetime-local"
                                class="form-control"
                                min=datetime_local_now()
                                prop:value=move || workflow.with(|wf| wf.end_time().to_string())
                                on:input=move |ev| {
                                    workflow.update(|wf| wf.set_end_time(&event_target_value(&ev)))
                                }
                            />
                        </div>

                        <div class="book-actions">
                            <button
                                class="btn btn-success"
                                disabled=move || workflow.with(|wf| wf.is_submitting())
                                on:click=submit
                            >
                                "Confirm Booking"
                            </button>
                            <button class="btn btn-secondary" on:click=back>
                                "Cancel"
                            </button>
                        </div>

                        {move || {
                            validation.get().map(|v| view! {
                                <div class="alert alert-warning">{v}</div>
                            })
                        }}

                        {move || {
                            let wf = workflow.get();
                            match wf.state() {
                                WorkflowState::Collecting => ().into_any(),
                                WorkflowState::Submitting => view! {
                                    <div class="loading-spinner">
                                        <div class="spinner"></div>
                                        <span>"Booking..."</span>
                                    </div>
                                }
                                .into_any(),
                                WorkflowState::Succeeded(summary) => view! {
                                    <div class="alert alert-success">
                                        <strong>"Booking successful! "</strong>
                                        {format!(
                                            "{} to {} — total ₹{:.2}",
                                            summary.start_time, summary.end_time, summary.total_cost,
                                        )}
                                        <p class="redirect-note">"Returning to your dashboard..."</p>
                                    </div>
                                }
                                .into_any(),
                                WorkflowState::Failed(reason) => view! {
                                    <div class="alert alert-error">{reason.clone()}</div>
                                }
                                .into_any(),
                            }
                        }}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}
