use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Shared invalidation channel. Mutations, the post-booking hand-off and
/// window visibility/focus all call `notify`; dashboard pages re-run
/// their aggregation off `track`. The aggregation itself never knows
/// which source triggered it.
#[derive(Clone, Copy)]
pub struct RefreshBus {
    tick: RwSignal<u64>,
}

impl RefreshBus {
    fn new() -> Self {
        Self {
            tick: RwSignal::new(0),
        }
    }

    /// Invalidate every subscribed view.
    pub fn notify(&self) {
        self.tick.update(|t| *t = t.wrapping_add(1));
    }

    /// Subscribe the current reactive scope.
    pub fn track(&self) {
        self.tick.track();
    }
}

pub fn provide_refresh_bus() -> RefreshBus {
    let bus = RefreshBus::new();
    provide_context(bus);
    bus
}

pub fn use_refresh_bus() -> RefreshBus {
    expect_context::<RefreshBus>()
}

/// Refetch when the tab becomes visible again or the window regains
/// focus. Registered once at app startup, so the closures may leak.
pub fn listen_for_window_refresh(bus: RefreshBus) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_focus = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        bus.notify();
    });
    let _ = window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
    on_focus.forget();

    let on_visibility = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let visible = web_sys::window()
            .and_then(|w| w.document())
            .is_some_and(|d| d.visibility_state() == web_sys::VisibilityState::Visible);
        if visible {
            bus.notify();
        }
    });
    if let Some(document) = window.document() {
        let _ = document
            .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref());
    }
    on_visibility.forget();
}
