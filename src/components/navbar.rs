use leptos::prelude::*;

use crate::models::Role;
use crate::session::use_session;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();

    view! {
        <header class="navbar">
            <span class="navbar-brand">"🅿️ Smart Parking"</span>
            {move || {
                session.get().map(|s| {
                    let role_class = if s.role == Role::Admin {
                        "navbar-role navbar-role-admin"
                    } else {
                        "navbar-role"
                    };
                    view! {
                        <div class="navbar-session">
                            <span class="navbar-user">{s.name.clone()}</span>
                            <span class=role_class>{s.role.as_str()}</span>
                            // Clearing the session is enough: the page's
                            // session gate redirects to /login.
                            <button class="btn btn-outline" on:click=move |_| session.log_out()>
                                "Logout"
                            </button>
                        </div>
                    }
                })
            }}
        </header>
    }
}
