use leptos::prelude::*;

#[component]
pub fn StatCard(
    icon: &'static str,
    label: &'static str,
    #[prop(into)] value: String,
    #[prop(default = "")] tone: &'static str,
) -> impl IntoView {
    view! {
        <div class=format!("stat-card {tone}")>
            <div class="stat-icon">{icon}</div>
            <h3 class="stat-value">{value}</h3>
            <p class="stat-label">{label}</p>
        </div>
    }
}
