use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::navbar::Navbar;
use crate::pages::admin_dashboard::AdminDashboardPage;
use crate::pages::book::BookPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::refresh::{listen_for_window_refresh, provide_refresh_bus};
use crate::session::provide_session;

#[component]
pub fn App() -> impl IntoView {
    provide_session();
    let bus = provide_refresh_bus();
    // Returning to the tab refetches whatever dashboard is mounted.
    listen_for_window_refresh(bus);

    view! {
        <Router>
            <div class="app-layout">
                <Navbar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=LoginPage />
                        <Route path=path!("/login") view=LoginPage />
                        <Route path=path!("/dashboard") view=DashboardPage />
                        <Route path=path!("/book/:lot_id") view=BookPage />
                        <Route path=path!("/admin") view=AdminDashboardPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
