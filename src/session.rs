use leptos::prelude::*;

use crate::models::{Role, Session};

/// Process-wide authenticated identity.
///
/// Single writer by convention: the login page calls `log_in`, the navbar
/// calls `log_out`. Every view reads it to gate access and to fill
/// mutation payloads. Lives for the browser session only; there is no
/// cross-restart persistence.
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: RwSignal<Option<Session>>,
}

impl SessionContext {
    fn new() -> Self {
        Self {
            session: RwSignal::new(None),
        }
    }

    pub fn get(&self) -> Option<Session> {
        self.session.get()
    }

    pub fn get_untracked(&self) -> Option<Session> {
        self.session.get_untracked()
    }

    pub fn log_in(&self, session: Session) {
        log::info!("logged in as {} ({})", session.name, session.role.as_str());
        self.session.set(Some(session));
    }

    pub fn log_out(&self) {
        self.session.set(None);
    }

    pub fn is_admin(&self) -> bool {
        self.session
            .with(|s| s.as_ref().is_some_and(|s| s.role == Role::Admin))
    }
}

/// Install the session holder at the app root.
pub fn provide_session() -> SessionContext {
    let ctx = SessionContext::new();
    provide_context(ctx);
    ctx
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
