//! Tool-view generation workflow.
//!
//! `Idle → Generating → Done | Failed`. A submission that fails validation
//! causes no transition at all. Any new submission, from any state, starts
//! over from the form.

use tracing::{info, warn};

use crate::error::{FormError, GenerationError};
use crate::generation::TextGenerator;
use crate::pitch::{PitchForm, build_prompt};

/// Where the tool view currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolState {
    /// Waiting for a submission.
    #[default]
    Idle,
    /// A prompt has been sent and the response is pending.
    Generating,
    /// The model answered; `kit` is its text, unmodified.
    Done { kit: String },
    /// The call failed; `message` is the error text shown to the user.
    Failed { message: String },
}

impl ToolState {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Per-session tool state plus the last submitted form, kept for redisplay.
#[derive(Debug, Clone, Default)]
pub struct ToolWorkflow {
    state: ToolState,
    form: PitchForm,
    rejection: Option<FormError>,
}

impl ToolWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// The most recently submitted form (empty before the first submission).
    #[must_use]
    pub fn form(&self) -> &PitchForm {
        &self.form
    }

    /// Why the last submission was rejected, if it was.
    #[must_use]
    pub fn rejection(&self) -> Option<&FormError> {
        self.rejection.as_ref()
    }

    /// Validate a submission and, if valid, move to `Generating`.
    ///
    /// Returns the prompt to send. On rejection the state is left exactly
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if a required field is empty or the tone is
    /// unknown.
    pub fn begin(&mut self, form: PitchForm) -> Result<String, FormError> {
        let validated = form.validate();
        self.form = form;

        match validated {
            Ok(request) => {
                self.rejection = None;
                self.state = ToolState::Generating;
                Ok(build_prompt(&request))
            }
            Err(err) => {
                self.rejection = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Record the outcome of the generation call.
    ///
    /// Ignored unless the workflow is `Generating`.
    pub fn finish(&mut self, outcome: Result<String, GenerationError>) {
        settle(&mut self.state, outcome);
    }

    /// Run one full submission: validate, call the generator once, record
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if the form is rejected. In that case the
    /// generator is not called.
    pub async fn submit(
        &mut self,
        form: PitchForm,
        generator: &dyn TextGenerator,
    ) -> Result<&ToolState, FormError> {
        let prompt = self.begin(form)?;

        // If this future is dropped mid-call the guard fails the workflow.
        let pending = InFlight {
            state: &mut self.state,
        };
        let outcome = generator.generate(&prompt).await;
        match &outcome {
            Ok(kit) => info!(kit_len = kit.len(), "pitch kit generated"),
            Err(e) => warn!(error = %e, "pitch kit generation failed"),
        }
        pending.complete(outcome);

        Ok(&self.state)
    }

    /// Back to an empty form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn settle(state: &mut ToolState, outcome: Result<String, GenerationError>) {
    if *state != ToolState::Generating {
        return;
    }
    *state = match outcome {
        Ok(kit) => ToolState::Done { kit },
        Err(err) => ToolState::Failed {
            message: err.to_string(),
        },
    };
}

/// A generation call in progress.
///
/// Dropped without [`InFlight::complete`], it records
/// [`GenerationError::Cancelled`] so the workflow never stays `Generating`.
struct InFlight<'a> {
    state: &'a mut ToolState,
}

impl InFlight<'_> {
    fn complete(self, outcome: Result<String, GenerationError>) {
        settle(&mut *self.state, outcome);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.state == ToolState::Generating {
            warn!("pitch kit generation cancelled");
            settle(&mut *self.state, Err(GenerationError::Cancelled));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    /// Returns a canned result and counts calls.
    struct Stub {
        reply: Result<&'static str, &'static str>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl Stub {
        fn ok(text: &'static str) -> Self {
            Self {
                reply: Ok(text),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                ..Self::ok("")
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for Stub {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_owned());
            self.reply.map(str::to_owned).map_err(|m| GenerationError::Api {
                status: 429,
                message: m.to_owned(),
            })
        }
    }

    fn supatask() -> PitchForm {
        PitchForm {
            product_name: "SupaTask".to_owned(),
            target_audience: "Remote PMs".to_owned(),
            key_features: "AI scheduling".to_owned(),
            tone: "Exciting & Startup-y".to_owned(),
        }
    }

    #[test]
    fn begin_moves_to_generating() {
        let mut wf = ToolWorkflow::new();
        assert_eq!(wf.state(), &ToolState::Idle);

        let prompt = wf.begin(supatask()).unwrap();
        assert_eq!(wf.state(), &ToolState::Generating);
        assert!(prompt.contains("SupaTask"));

        wf.finish(Ok("OK".to_owned()));
        assert_eq!(wf.state(), &ToolState::Done { kit: "OK".to_owned() });
    }

    #[test]
    fn rejected_form_causes_no_transition() {
        let mut wf = ToolWorkflow::new();
        let form = PitchForm {
            product_name: String::new(),
            ..supatask()
        };
        assert_eq!(wf.begin(form).unwrap_err(), FormError::MissingProductName);
        assert_eq!(wf.state(), &ToolState::Idle);
        assert_eq!(wf.rejection(), Some(&FormError::MissingProductName));
        // The rejected input is kept so the form can be redisplayed.
        assert_eq!(wf.form().key_features, "AI scheduling");
    }

    #[test]
    fn finish_outside_generating_is_ignored() {
        let mut wf = ToolWorkflow::new();
        wf.finish(Ok("stray".to_owned()));
        assert_eq!(wf.state(), &ToolState::Idle);
    }

    #[tokio::test]
    async fn submit_success_renders_text_exactly() {
        let stub = Stub::ok("OK");
        let mut wf = ToolWorkflow::new();

        let state = wf.submit(supatask(), &stub).await.unwrap();
        assert_eq!(state, &ToolState::Done { kit: "OK".to_owned() });
        assert_eq!(stub.calls(), 1);

        let prompt = stub.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Tone: Exciting & Startup-y"));
    }

    #[tokio::test]
    async fn submit_failure_keeps_error_text() {
        let stub = Stub::failing("quota exceeded");
        let mut wf = ToolWorkflow::new();

        let state = wf.submit(supatask(), &stub).await.unwrap();
        match state {
            ToolState::Failed { message } => assert!(message.contains("quota exceeded")),
            other => unreachable!("expected Failed, got {other:?}"),
        }
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn empty_product_name_never_calls_generator() {
        let stub = Stub::ok("OK");
        let mut wf = ToolWorkflow::new();
        let form = PitchForm {
            product_name: String::new(),
            ..supatask()
        };

        assert!(wf.submit(form, &stub).await.is_err());
        assert_eq!(stub.calls(), 0);
        assert_eq!(wf.state(), &ToolState::Idle);
    }

    #[tokio::test]
    async fn resubmit_after_failure_calls_again() {
        let failing = Stub::failing("quota exceeded");
        let ok = Stub::ok("second try");
        let mut wf = ToolWorkflow::new();

        wf.submit(supatask(), &failing).await.unwrap();
        let state = wf.submit(supatask(), &ok).await.unwrap();
        assert_eq!(state, &ToolState::Done { kit: "second try".to_owned() });
        assert_eq!(ok.calls(), 1);
    }

    /// Never answers.
    struct Hang;

    #[async_trait]
    impl TextGenerator for Hang {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn dropped_submission_does_not_stay_generating() {
        let mut wf = ToolWorkflow::new();

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), wf.submit(supatask(), &Hang)).await;
        assert!(abandoned.is_err());

        match wf.state() {
            ToolState::Failed { message } => assert!(message.contains("cancelled")),
            other => unreachable!("expected Failed, got {other:?}"),
        }

        // The next submission starts over normally.
        let state = wf.submit(supatask(), &Stub::ok("OK")).await.unwrap();
        assert_eq!(state, &ToolState::Done { kit: "OK".to_owned() });
    }

    #[tokio::test]
    async fn identical_submissions_are_not_cached() {
        let stub = Stub::ok("OK");
        let mut wf = ToolWorkflow::new();
        wf.submit(supatask(), &stub).await.unwrap();
        wf.submit(supatask(), &stub).await.unwrap();
        assert_eq!(stub.calls(), 2);
    }
}
