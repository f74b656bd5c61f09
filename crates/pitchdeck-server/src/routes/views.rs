//! View rendering and plain navigation.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Form, Router};
use maud::Markup;
use serde::Deserialize;
use tracing::debug;

use pitchdeck_core::render::render;
use pitchdeck_core::session::View;

use super::ui;
use crate::error::AppError;
use crate::session::SessionHandle;
use crate::state::AppState;

/// Build the view router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(current_view))
        .route("/tool", get(open_tool))
        .route("/navigate", post(navigate))
}

#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub view: String,
}

/// `GET /`: render whatever view the session is on.
async fn current_view(State(state): State<Arc<AppState>>, handle: SessionHandle) -> Markup {
    let page = render(&*handle.lock().await, &state.config);
    debug!(session = %handle.id, view = %page.view(), "render");
    ui::page(&page)
}

/// `GET /tool`: enter the tool view (lands on the landing page when logged out).
async fn open_tool(handle: SessionHandle) -> Redirect {
    let entered = handle.lock().await.navigate(View::Tool);
    debug!(session = %handle.id, view = %entered, "navigate");
    Redirect::to("/")
}

/// `POST /navigate`: switch to the named view.
async fn navigate(
    handle: SessionHandle,
    Form(body): Form<NavigateForm>,
) -> Result<Redirect, AppError> {
    let view: View = body.view.parse().map_err(AppError::UnknownView)?;
    let entered = handle.lock().await.navigate(view);
    debug!(session = %handle.id, requested = %view, view = %entered, "navigate");
    Ok(Redirect::to("/"))
}
