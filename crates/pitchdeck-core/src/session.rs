//! Session and navigation controller.
//!
//! A [`Session`] is owned by whoever handles one user's connection; nothing
//! here is global. The only guard is on entering [`View::Tool`]: without a
//! successful login the session lands on [`View::Landing`] instead.
//!
//! Failed logins are neither counted nor throttled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AccessCode;
use crate::error::{FormError, LoginError};
use crate::generation::TextGenerator;
use crate::pitch::PitchForm;
use crate::workflow::{ToolState, ToolWorkflow};

/// The three views a session can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Landing,
    Login,
    Tool,
}

impl View {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landing" => Ok(Self::Landing),
            "login" => Ok(Self::Login),
            "tool" => Ok(Self::Tool),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// What happened to a tool-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The session was not logged in; it was sent to the landing view.
    NotAuthenticated,
    /// Validation failed; nothing was sent.
    Rejected(FormError),
    /// The model answered.
    Generated,
    /// The call failed; the error is shown in the tool view.
    Failed,
}

/// One user's session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    authenticated: bool,
    current_view: View,
    tool: ToolWorkflow,
    login_error: Option<LoginError>,
}

impl Session {
    /// A fresh session: not logged in, on the landing view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn current_view(&self) -> View {
        self.current_view
    }

    #[must_use]
    pub fn tool(&self) -> &ToolWorkflow {
        &self.tool
    }

    /// The error from the most recent login attempt, until the next action.
    #[must_use]
    pub fn login_error(&self) -> Option<&LoginError> {
        self.login_error.as_ref()
    }

    /// Switch views. Returns the view actually entered.
    pub fn navigate(&mut self, view: View) -> View {
        self.login_error = None;
        self.current_view = match view {
            View::Tool if !self.authenticated => View::Landing,
            other => other,
        };
        self.current_view
    }

    /// Compare `code` against the access code.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidCredential`] on mismatch; the session is
    /// otherwise left untouched.
    pub fn login(&mut self, access_code: &AccessCode, code: &str) -> Result<(), LoginError> {
        if access_code.matches(code) {
            self.authenticated = true;
            self.current_view = View::Tool;
            self.login_error = None;
            self.tool.reset();
            Ok(())
        } else {
            self.login_error = Some(LoginError::InvalidCredential);
            Err(LoginError::InvalidCredential)
        }
    }

    /// Forget the login and go back to the landing view.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.current_view = View::Landing;
        self.login_error = None;
        self.tool.reset();
    }

    /// Handle a tool-form submission, calling `generator` at most once.
    pub async fn submit_pitch(
        &mut self,
        form: PitchForm,
        generator: &dyn TextGenerator,
    ) -> Submission {
        if self.navigate(View::Tool) != View::Tool {
            return Submission::NotAuthenticated;
        }

        match self.tool.submit(form, generator).await {
            Ok(ToolState::Done { .. }) => Submission::Generated,
            Ok(_) => Submission::Failed,
            Err(err) => Submission::Rejected(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::GenerationError;

    const CODE: &str = "LAUNCH-2024";

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok("kit".to_owned())
        }
    }

    fn code() -> AccessCode {
        AccessCode::new(CODE)
    }

    fn logged_in() -> Session {
        let mut s = Session::new();
        s.login(&code(), CODE).unwrap();
        s
    }

    #[test]
    fn new_session_is_anonymous_on_landing() {
        let s = Session::new();
        assert!(!s.is_authenticated());
        assert_eq!(s.current_view(), View::Landing);
    }

    #[test]
    fn wrong_codes_leave_state_unchanged() {
        for attempt in ["", "launch-2024", "LAUNCH-2024 ", "LAUNCH", "LAUNCH-20245", "🚀"] {
            let mut s = Session::new();
            s.navigate(View::Login);
            assert_eq!(s.login(&code(), attempt), Err(LoginError::InvalidCredential));
            assert!(!s.is_authenticated());
            assert_eq!(s.current_view(), View::Login);
            assert_eq!(s.login_error(), Some(&LoginError::InvalidCredential));
        }
    }

    #[test]
    fn failed_attempts_are_unlimited() {
        let mut s = Session::new();
        for _ in 0..100 {
            assert!(s.login(&code(), "nope").is_err());
        }
        assert!(s.login(&code(), CODE).is_ok());
    }

    #[test]
    fn correct_code_opens_tool() {
        let s = logged_in();
        assert!(s.is_authenticated());
        assert_eq!(s.current_view(), View::Tool);
        assert!(s.login_error().is_none());
    }

    #[test]
    fn tool_requires_authentication() {
        let mut s = Session::new();
        assert_eq!(s.navigate(View::Tool), View::Landing);
        assert_eq!(s.current_view(), View::Landing);

        s.navigate(View::Login);
        assert_eq!(s.navigate(View::Tool), View::Landing);
    }

    #[test]
    fn logout_always_resets() {
        let mut anon = Session::new();
        anon.navigate(View::Login);
        anon.logout();
        assert!(!anon.is_authenticated());
        assert_eq!(anon.current_view(), View::Landing);

        let mut s = logged_in();
        s.logout();
        assert!(!s.is_authenticated());
        assert_eq!(s.current_view(), View::Landing);
        assert_eq!(s.navigate(View::Tool), View::Landing);
    }

    #[test]
    fn navigation_clears_login_error() {
        let mut s = Session::new();
        let _ = s.login(&code(), "bad");
        s.navigate(View::Landing);
        assert!(s.login_error().is_none());
    }

    #[test]
    fn view_parses_from_form_value() {
        assert_eq!("tool".parse::<View>().unwrap(), View::Tool);
        assert!("admin".parse::<View>().is_err());
    }

    #[tokio::test]
    async fn anonymous_submission_is_redirected() {
        let mut s = Session::new();
        let outcome = s.submit_pitch(PitchForm::default(), &Echo).await;
        assert_eq!(outcome, Submission::NotAuthenticated);
        assert_eq!(s.current_view(), View::Landing);
    }

    #[tokio::test]
    async fn authenticated_submission_generates() {
        let mut s = logged_in();
        let form = PitchForm {
            product_name: "SupaTask".to_owned(),
            key_features: "AI scheduling".to_owned(),
            ..PitchForm::default()
        };
        assert_eq!(s.submit_pitch(form, &Echo).await, Submission::Generated);
        assert_eq!(s.tool().state(), &ToolState::Done { kit: "kit".to_owned() });

        s.logout();
        assert_eq!(s.tool().state(), &ToolState::Idle);
    }
}
