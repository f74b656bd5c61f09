//! Pitch kit generation: `POST /generate`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Form, Router};
use tracing::{info, warn};

use pitchdeck_core::pitch::PitchForm;
use pitchdeck_core::session::Submission;

use crate::session::SessionHandle;
use crate::state::AppState;

/// Upper bound on generation calls in flight across all sessions.
const MAX_CONCURRENT_GENERATIONS: usize = 16;

/// Build the tool router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(generate))
        .layer(tower::limit::ConcurrencyLimitLayer::new(
            MAX_CONCURRENT_GENERATIONS,
        ))
}

/// Validate the form and make one generation call.
///
/// The session stays locked until the model answers, so the user's next
/// request waits for the result. The outcome is stored in the session and
/// shown by `GET /`. A client that disconnects mid-call leaves the
/// submission marked as cancelled.
async fn generate(
    State(state): State<Arc<AppState>>,
    handle: SessionHandle,
    Form(form): Form<PitchForm>,
) -> Redirect {
    let mut session = handle.lock().await;
    let outcome = session.submit_pitch(form, state.generator.as_ref()).await;

    match outcome {
        Submission::NotAuthenticated => {
            warn!(session = %handle.id, "generate without login, sent to landing");
        }
        Submission::Rejected(reason) => {
            info!(session = %handle.id, reason = %reason, "pitch form rejected");
        }
        Submission::Generated => {
            let tool_state = session.tool().state().name();
            info!(session = %handle.id, tool_state, "pitch kit ready");
        }
        Submission::Failed => {
            let tool_state = session.tool().state().name();
            warn!(session = %handle.id, tool_state, "pitch kit generation failed");
        }
    }

    Redirect::to("/")
}
