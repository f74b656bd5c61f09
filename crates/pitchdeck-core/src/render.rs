//! View descriptions.
//!
//! [`render`] maps a session (plus the shared config) to a [`Page`]: plain
//! data describing what the user should see. Turning a `Page` into HTML is
//! the server's job. Call it after every state transition.

use crate::config::AppConfig;
use crate::pitch::{PitchForm, Tone};
use crate::session::{Session, View};
use crate::workflow::ToolState;

/// What to show for the tool view's result area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Idle,
    Generating,
    /// Generated text, exactly as the model returned it.
    Done { kit: String },
    /// Error text to display.
    Failed { message: String },
}

impl From<&ToolState> for ToolStatus {
    fn from(state: &ToolState) -> Self {
        match state {
            ToolState::Idle => Self::Idle,
            ToolState::Generating => Self::Generating,
            ToolState::Done { kit } => Self::Done { kit: kit.clone() },
            ToolState::Failed { message } => Self::Failed {
                message: message.clone(),
            },
        }
    }
}

/// A fully-resolved view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Landing {
        checkout_url: String,
    },
    Login {
        error: Option<String>,
    },
    Tool {
        /// Values to prefill the form with.
        form: PitchForm,
        tones: [Tone; 3],
        /// Validation message from a rejected submission.
        notice: Option<String>,
        status: ToolStatus,
    },
}

impl Page {
    /// Which view this page belongs to.
    #[must_use]
    pub fn view(&self) -> View {
        match self {
            Self::Landing { .. } => View::Landing,
            Self::Login { .. } => View::Login,
            Self::Tool { .. } => View::Tool,
        }
    }
}

/// Describe what `session` should currently see.
///
/// A session sitting on [`View::Tool`] without being logged in gets the
/// landing page; no tool content is ever produced for it.
#[must_use]
pub fn render(session: &Session, config: &AppConfig) -> Page {
    let landing = || Page::Landing {
        checkout_url: config.checkout_url.to_string(),
    };

    match session.current_view() {
        View::Landing => landing(),
        View::Login => Page::Login {
            error: session.login_error().map(ToString::to_string),
        },
        View::Tool if !session.is_authenticated() => landing(),
        View::Tool => {
            let tool = session.tool();
            Page::Tool {
                form: tool.form().clone(),
                tones: Tone::ALL,
                notice: tool.rejection().map(ToString::to_string),
                status: tool.state().into(),
            }
        }
    }
}
