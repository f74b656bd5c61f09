//! Access-code login and logout.
//!
//! The submitted code is never logged or echoed back.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{info, warn};

use pitchdeck_core::session::View;

use crate::session::SessionHandle;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(open_login).post(login))
        .route("/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub code: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").finish_non_exhaustive()
    }
}

/// `GET /login`: show the login view.
async fn open_login(handle: SessionHandle) -> Redirect {
    handle.lock().await.navigate(View::Login);
    Redirect::to("/")
}

/// `POST /login`: check the access code.
///
/// Success lands on the tool view; failure stays on the login view with a
/// generic error. Attempts are not limited.
async fn login(
    State(state): State<Arc<AppState>>,
    handle: SessionHandle,
    Form(body): Form<LoginForm>,
) -> Redirect {
    let mut session = handle.lock().await;
    match session.login(&state.config.access_code, &body.code) {
        Ok(()) => info!(session = %handle.id, "access code accepted"),
        Err(_) => warn!(session = %handle.id, "access code rejected"),
    }
    Redirect::to("/")
}

/// `POST /logout`: back to the landing view, logged out.
async fn logout(handle: SessionHandle) -> Redirect {
    handle.lock().await.logout();
    info!(session = %handle.id, "logged out");
    Redirect::to("/")
}
