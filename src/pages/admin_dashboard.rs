use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::admin::{self, AdminAction};
use crate::aggregator::{AdminDashboard, FetchState};
use crate::api::{ApiClient, CreateLotRequest, CreateUserRequest, UpdateLotRequest};
use crate::components::stat_card::StatCard;
use crate::models::Role;
use crate::refresh::use_refresh_bus;
use crate::session::use_session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Lots,
    Bookings,
    Users,
    Analytics,
}

impl Tab {
    const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Lots,
        Tab::Bookings,
        Tab::Users,
        Tab::Analytics,
    ];

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Lots => "Parking Lots",
            Tab::Bookings => "Bookings",
            Tab::Users => "Users",
            Tab::Analytics => "Analytics",
        }
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let session = use_session();
    let bus = use_refresh_bus();
    let navigate = use_navigate();

    let (dashboard, set_dashboard) = signal(AdminDashboard::loading());
    let (tab, set_tab) = signal(Tab::Overview);
    let (mutation_error, set_mutation_error) = signal::<Option<String>>(None);
    // One admin mutation at a time; the flag drops when its refetch is
    // already queued.
    let (mutating, set_mutating) = signal(false);

    // Lot form, shared between create and edit. `editing_lot` decides
    // which request the submit turns into.
    let lot_name = RwSignal::new(String::new());
    let lot_location = RwSignal::new(String::new());
    let lot_spots = RwSignal::new(String::new());
    let lot_rate = RwSignal::new(String::new());
    let lot_status = RwSignal::new("open".to_string());
    let editing_lot = RwSignal::new(None::<i64>);

    // User creation form.
    let user_name = RwSignal::new(String::new());
    let user_email = RwSignal::new(String::new());
    let user_password = RwSignal::new(String::new());
    let user_role = RwSignal::new("driver".to_string());

    // Gate: the page is admin-only.
    {
        let navigate = navigate.clone();
        Effect::new(move |_| match session.get() {
            None => navigate("/login", Default::default()),
            Some(user) if user.role != Role::Admin => navigate("/dashboard", Default::default()),
            Some(_) => {}
        });
    }

    // Aggregate on mount and on every refresh tick.
    Effect::new(move |_| {
        bus.track();
        if !session.is_admin() {
            return;
        }
        set_dashboard.set(AdminDashboard::loading());
        spawn_local(async move {
            let api = ApiClient::new();
            let fresh = AdminDashboard::load(&api).await;
            let _ = set_dashboard.try_set(fresh);
        });
    });

    let reset_lot_form = move || {
        lot_name.set(String::new());
        lot_location.set(String::new());
        lot_spots.set(String::new());
        lot_rate.set(String::new());
        lot_status.set("open".to_string());
        editing_lot.set(None);
    };

    // Confirm (when destructive), guard, dispatch, refetch on success.
    let run_action = move |action: AdminAction| {
        if mutating.get_untracked() {
            return;
        }
        let Some(user) = session.get() else {
            return;
        };
        if let Some(prompt) = action.confirm_prompt() {
            let confirmed = web_sys::window()
                .map(|w| w.confirm_with_message(prompt).unwrap_or(false))
                .unwrap_or(false);
            if !confirmed {
                return;
            }
        }
        set_mutation_error.set(None);
        set_mutating.set(true);
        spawn_local(async move {
            let api = ApiClient::new();
            match admin::execute(&api, &user, action).await {
                Ok(()) => bus.notify(),
                Err(err) => {
                    let _ = set_mutation_error.try_set(Some(err.to_string()));
                }
            }
            let _ = set_mutating.try_set(false);
        });
    };

    let submit_lot = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = lot_name.get_untracked().trim().to_string();
        let location = lot_location.get_untracked().trim().to_string();
        if name.is_empty() || location.is_empty() {
            set_mutation_error.set(Some("Lot name and location are required.".to_string()));
            return;
        }
        let Ok(total_spots) = lot_spots.get_untracked().trim().parse::<u32>() else {
            set_mutation_error.set(Some("Total spots must be a whole number.".to_string()));
            return;
        };
        let Ok(hourly_rate) = lot_rate.get_untracked().trim().parse::<f64>() else {
            set_mutation_error.set(Some("Hourly rate must be a number.".to_string()));
            return;
        };
        let status = lot_status.get_untracked();
        let action = match editing_lot.get_untracked() {
            Some(lot_id) => AdminAction::UpdateLot {
                lot_id,
                update: UpdateLotRequest {
                    lot_name: Some(name),
                    location: Some(location),
                    total_spots: Some(total_spots),
                    hourly_rate: Some(hourly_rate),
                    status: Some(status),
                },
            },
            None => AdminAction::CreateLot(CreateLotRequest {
                lot_name: name,
                location,
                total_spots,
                hourly_rate,
                status,
            }),
        };
        run_action(action);
        reset_lot_form();
    };

    let submit_user = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = user_name.get_untracked().trim().to_string();
        let email = user_email.get_untracked().trim().to_string();
        let password = user_password.get_untracked();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            set_mutation_error.set(Some("Name, email and password are required.".to_string()));
            return;
        }
        run_action(AdminAction::CreateUser(CreateUserRequest {
            name,
            email,
            password,
            role: user_role.get_untracked(),
        }));
        user_name.set(String::new());
        user_email.set(String::new());
        user_password.set(String::new());
        user_role.set("driver".to_string());
    };

    view! {
        <div class="page admin-page">
            <style>{include_str!("admin_dashboard.css")}</style>

            <h2>"Admin Dashboard"</h2>

            <nav class="tab-bar">
                {Tab::ALL
                    .into_iter()
                    .map(|t| {
                        view! {
                            <button
                                class=move || {
                                    if tab.get() == t { "tab-button active" } else { "tab-button" }
                                }
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>

            {move || {
                mutation_error.get().map(|e| view! {
                    <div class="alert alert-error">{e}</div>
                })
            }}

            {move || {
                let d = dashboard.get();
                if d.is_loading() {
                    return view! {
                        <div class="loading-spinner">
                            <div class="spinner"></div>
                            <span>"Loading dashboard..."</span>
                        </div>
                    }
                    .into_any();
                }
                if d.has_critical_failure {
                    return view! {
                        <div class="alert alert-error">
                            <strong>"Failed to load dashboard data. "</strong>
                            "Please try again later."
                        </div>
                    }
                    .into_any();
                }

                match tab.get() {
                    Tab::Overview => overview_tab(&d).into_any(),
                    Tab::Lots => lots_tab(
                        &d,
                        run_action,
                        submit_lot,
                        reset_lot_form,
                        mutating,
                        lot_name,
                        lot_location,
                        lot_spots,
                        lot_rate,
                        lot_status,
                        editing_lot,
                    )
                    .into_any(),
                    Tab::Bookings => bookings_tab(&d, run_action, mutating).into_any(),
                    Tab::Users => users_tab(
                        &d,
                        run_action,
                        submit_user,
                        mutating,
                        session.get().map(|s| s.user_id).unwrap_or(0),
                        user_name,
                        user_email,
                        user_password,
                        user_role,
                    )
                    .into_any(),
                    Tab::Analytics => analytics_tab(&d).into_any(),
                }
            }}
        </div>
    }
}

fn overview_tab(d: &AdminDashboard) -> impl IntoView {
    let stats = d.stats.data().cloned();
    view! {
        {stats.map(|s| view! {
            <div class="stat-grid">
                <StatCard icon="🅿️" label="Total Lots" value=s.total_lots.to_string() />
                <StatCard icon="🚗" label="Total Spots" value=s.total_spots.to_string() />
                <StatCard
                    icon="✅"
                    label="Available"
                    value=s.available_spots.to_string()
                    tone="tone-success"
                />
                <StatCard
                    icon="⛔"
                    label="Occupied"
                    value=s.occupied_spots.to_string()
                    tone="tone-warning"
                />
                <StatCard icon="👥" label="Users" value=s.total_users.to_string() />
                <StatCard icon="📋" label="Bookings" value=s.total_bookings.to_string() />
                <StatCard
                    icon="💰"
                    label="Revenue"
                    value=format!("₹{:.2}", s.total_revenue)
                    tone="tone-success"
                />
                <StatCard
                    icon="📊"
                    label="Occupancy"
                    value=format!("{:.1}%", s.occupancy_rate)
                />
            </div>
        })}
    }
}

#[allow(clippy::too_many_arguments)]
fn lots_tab(
    d: &AdminDashboard,
    run_action: impl Fn(AdminAction) + Clone + 'static,
    submit_lot: impl Fn(leptos::ev::SubmitEvent) + 'static,
    reset_lot_form: impl Fn() + Clone + Send + 'static,
    mutating: ReadSignal<bool>,
    lot_name: RwSignal<String>,
    lot_location: RwSignal<String>,
    lot_spots: RwSignal<String>,
    lot_rate: RwSignal<String>,
    lot_status: RwSignal<String>,
    editing_lot: RwSignal<Option<i64>>,
) -> impl IntoView {
    let rows = d
        .lots
        .data()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|lot| {
            let run_action = run_action.clone();
            let id = lot.lot_id;
            let edit_name = lot.lot_name.clone();
            let edit_location = lot.location.clone();
            let edit_spots = lot.total_spots;
            let edit_rate = lot.hourly_rate;
            let edit_status = lot.status;
            view! {
                <tr>
                    <td>{lot.lot_name.clone()}</td>
                    <td>{lot.location.clone()}</td>
                    <td>{format!("{} / {}", lot.available_spots, lot.total_spots)}</td>
                    <td>{format!("₹{:.2}", lot.hourly_rate)}</td>
                    <td>
                        <span class=format!("badge badge-{}", lot.status.as_str())>
                            {lot.status.as_str()}
                        </span>
                    </td>
                    <td class="actions-cell">
                        <button
                            class="btn btn-small btn-secondary"
                            on:click=move |_| {
                                lot_name.set(edit_name.clone());
                                lot_location.set(edit_location.clone());
                                lot_spots.set(edit_spots.to_string());
                                lot_rate.set(edit_rate.to_string());
                                lot_status.set(edit_status.as_str().to_string());
                                editing_lot.set(Some(id));
                            }
                        >
                            "Edit"
                        </button>
                        <button
                            class="btn btn-small btn-danger"
                            disabled=move || mutating.get()
                            on:click=move |_| run_action(AdminAction::DeleteLot { lot_id: id })
                        >
                            "Delete"
                        </button>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="tab-panel">
            <form class="admin-form" on:submit=submit_lot>
                <h3>
                    {move || if editing_lot.get().is_some() { "Edit Parking Lot" } else { "Add Parking Lot" }}
                </h3>
                <div class="form-row">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Lot name"
                        prop:value=move || lot_name.get()
                        on:input=move |ev| lot_name.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Location"
                        prop:value=move || lot_location.get()
                        on:input=move |ev| lot_location.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        class="form-control"
                        placeholder="Total spots"
                        min="1"
                        prop:value=move || lot_spots.get()
                        on:input=move |ev| lot_spots.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        class="form-control"
                        placeholder="Hourly rate"
                        min="0"
                        step="0.01"
                        prop:value=move || lot_rate.get()
                        on:input=move |ev| lot_rate.set(event_target_value(&ev))
                    />
                    <select
                        class="form-control"
                        prop:value=move || lot_status.get()
                        on:change=move |ev| lot_status.set(event_target_value(&ev))
                    >
                        <option value="open">"Open"</option>
                        <option value="closed">"Closed"</option>
                    </select>
                </div>
                <div class="form-actions">
                    <button class="btn btn-primary" type="submit" disabled=move || mutating.get()>
                        {move || if editing_lot.get().is_some() { "Update Lot" } else { "Create Lot" }}
                    </button>
                    {move || {
                        let reset_lot_form = reset_lot_form.clone();
                        editing_lot.get().is_some().then(|| {
                            view! {
                                <button
                                    class="btn btn-secondary"
                                    type="button"
                                    on:click=move |_| reset_lot_form()
                                >
                                    "Cancel Edit"
                                </button>
                            }
                        })
                    }}
                </div>
            </form>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Location"</th>
                        <th>"Spots"</th>
                        <th>"Rate"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
}

fn bookings_tab(
    d: &AdminDashboard,
    run_action: impl Fn(AdminAction) + Clone + 'static,
    mutating: ReadSignal<bool>,
) -> impl IntoView {
    let bookings = d.bookings.data().cloned().unwrap_or_default();
    if bookings.is_empty() {
        return view! { <p class="empty-note">"No bookings yet."</p> }.into_any();
    }
    let rows = bookings
        .into_iter()
        .map(|b| {
            let run_action = run_action.clone();
            let id = b.reservation_id;
            view! {
                <tr>
                    <td>{b.user_name.clone().unwrap_or_else(|| "N/A".to_string())}</td>
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
                        <button
                            class="btn btn-small btn-danger"
                            disabled=move || mutating.get()
                            on:click=move |_| {
                                run_action(AdminAction::DeleteBooking { reservation_id: id })
                            }
                        >
                            "Delete"
                        </button>
                    </td>
                </tr>
            }
        })
        .collect_view();
    view! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>"User"</th>
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

#[allow(clippy::too_many_arguments)]
fn users_tab(
    d: &AdminDashboard,
    run_action: impl Fn(AdminAction) + Clone + 'static,
    submit_user: impl Fn(leptos::ev::SubmitEvent) + 'static,
    mutating: ReadSignal<bool>,
    own_user_id: i64,
    user_name: RwSignal<String>,
    user_email: RwSignal<String>,
    user_password: RwSignal<String>,
    user_role: RwSignal<String>,
) -> impl IntoView {
    let rows = d
        .users
        .data()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|u| {
            let run_action = run_action.clone();
            let id = u.user_id;
            // The local self-delete guard also rejects this, but the
            // button is disabled so the action is never offered.
            let is_self = id == own_user_id;
            view! {
                <tr>
                    <td>{u.name.clone()}</td>
                    <td>{u.email.clone()}</td>
                    <td>
                        <span class=format!("badge badge-{}", u.role.as_str())>
                            {u.role.as_str()}
                        </span>
                    </td>
                    <td>
                        <button
                            class="btn btn-small btn-danger"
                            disabled=move || is_self || mutating.get()
                            title=move || if is_self { "You cannot delete your own account" } else { "" }
                            on:click=move |_| run_action(AdminAction::DeleteUser { user_id: id })
                        >
                            "Delete"
                        </button>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="tab-panel">
            <form class="admin-form" on:submit=submit_user>
                <h3>"Add User"</h3>
                <div class="form-row">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Name"
                        prop:value=move || user_name.get()
                        on:input=move |ev| user_name.set(event_target_value(&ev))
                    />
                    <input
                        type="email"
                        class="form-control"
                        placeholder="Email"
                        prop:value=move || user_email.get()
                        on:input=move |ev| user_email.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        class="form-control"
                        placeholder="Password"
                        prop:value=move || user_password.get()
                        on:input=move |ev| user_password.set(event_target_value(&ev))
                    />
                    <select
                        class="form-control"
                        prop:value=move || user_role.get()
                        on:change=move |ev| user_role.set(event_target_value(&ev))
                    >
                        <option value="driver">"Driver"</option>
                        <option value="admin">"Admin"</option>
                    </select>
                </div>
                <div class="form-actions">
                    <button class="btn btn-primary" type="submit" disabled=move || mutating.get()>
                        "Create User"
                    </button>
                </div>
            </form>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Role"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
}

fn analytics_tab(d: &AdminDashboard) -> impl IntoView {
    let analytics = match &d.analytics {
        FetchState::Failed(_) => {
            return view! {
                <div class="alert alert-info">"Analytics are unavailable right now."</div>
            }
            .into_any();
        }
        state => state.data().cloned().unwrap_or_default(),
    };

    let stats = analytics.booking_stats;
    let day_rows = analytics
        .revenue_by_day
        .into_iter()
        .map(|day| {
            view! {
                <tr>
                    <td>{day.date}</td>
                    <td>{day.bookings_count}</td>
                    <td class="cost-cell">{format!("₹{:.2}", day.revenue)}</td>
                </tr>
            }
        })
        .collect_view();
    let top_rows = analytics
        .top_parking_lots
        .into_iter()
        .map(|lot| {
            view! {
                <tr>
                    <td>{lot.lot_name}</td>
                    <td>{lot.location.unwrap_or_else(|| "N/A".to_string())}</td>
                    <td>{lot.total_bookings}</td>
                    <td class="cost-cell">{format!("₹{:.2}", lot.revenue)}</td>
                </tr>
            }
        })
        .collect_view();
    let above_avg = analytics
        .above_avg_lots
        .into_iter()
        .map(|lot| {
            view! {
                <li>
                    {lot.lot_name}
                    " — "
                    {format!("₹{:.2}", lot.revenue)}
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="tab-panel">
            <div class="stat-grid">
                <StatCard icon="📋" label="Total Bookings" value=stats.total.to_string() />
                <StatCard
                    icon="🟢"
                    label="Active"
                    value=stats.active.to_string()
                    tone="tone-success"
                />
                <StatCard icon="🏁" label="Completed" value=stats.completed.to_string() />
            </div>

            <section>
                <h3>"Revenue (last 7 days)"</h3>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Bookings"</th>
                            <th>"Revenue"</th>
                        </tr>
                    </thead>
                    <tbody>{day_rows}</tbody>
                </table>
            </section>

            <section>
                <h3>"Top Parking Lots"</h3>
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Lot"</th>
                            <th>"Location"</th>
                            <th>"Bookings"</th>
                            <th>"Revenue"</th>
                        </tr>
                    </thead>
                    <tbody>{top_rows}</tbody>
                </table>
            </section>

            <section>
                <h3>"Above-Average Earners"</h3>
                <ul class="above-avg-list">{above_avg}</ul>
            </section>
        </div>
    }
    .into_any()
}
