use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::models::Role;
use crate::session::use_session;

/// Pause between the success message and the role-based redirect.
const LOGIN_REDIRECT_DELAY_MS: u32 = 1_000;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (loading, set_loading) = signal(false);
    // (is_success, text)
    let (message, set_message) = signal::<Option<(bool, String)>>(None);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get() {
            return;
        }
        set_loading.set(true);
        set_message.set(None);

        let email = email.get_untracked();
        let password = password.get_untracked();
        let navigate = navigate.clone();
        spawn_local(async move {
            let api = ApiClient::new();
            match api.login(&email, &password).await {
                Ok(user) => {
                    let target = if user.role == Role::Admin {
                        "/admin"
                    } else {
                        "/dashboard"
                    };
                    let _ = set_message.try_set(Some((true, format!("Welcome {}!", user.name))));
                    session.log_in(user);
                    TimeoutFuture::new(LOGIN_REDIRECT_DELAY_MS).await;
                    navigate(target, Default::default());
                }
                Err(err) => {
                    // Session stays unset on failure.
                    let _ = set_message
                        .try_set(Some((false, err.detail_or("Login failed").to_string())));
                    let _ = set_loading.try_set(false);
                }
            }
        });
    };

    view! {
        <div class="page login-page">
            <style>{include_str!("login.css")}</style>

            <div class="login-card">
                <div class="login-icon">"🅿️"</div>
                <h3>"Smart Parking System"</h3>
                <p class="page-description">"Sign in to continue"</p>

                <form on:submit=submit>
                    <div class="form-group">
                        <label>"Email"</label>
                        <input
                            type="email"
                            class="form-control"
                            placeholder="Enter your email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-group">
                        <label>"Password"</label>
                        <input
                            type="password"
                            class="form-control"
                            placeholder="Enter your password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <button class="btn btn-primary btn-block" type="submit" disabled=move || loading.get()>
                        {move || if loading.get() { "Logging in..." } else { "Login" }}
                    </button>
                </form>

                {move || {
                    message.get().map(|(ok, text)| {
                        let class = if ok { "alert alert-success" } else { "alert alert-error" };
                        view! { <div class=class>{text}</div> }
                    })
                }}
            </div>
        </div>
    }
}
