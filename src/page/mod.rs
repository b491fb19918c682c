//! Page controller holding the state of the text and image forms
//!
//! Each form moves through idle -> loading -> (success | error) -> idle on
//! its own. Claiming a form for a submission happens under the form's lock,
//! so a second submission while one is in flight is rejected as `Busy`.
//! Locks are never held across the network call.

pub mod image;
pub mod text;
pub mod view;

pub use image::ImageForm;
pub use text::TextForm;

use crate::backend::BackendService;
use crate::models::{ImageGenerationRequest, TextGenerationRequest, TextModel};
use std::sync::{Arc, Mutex, MutexGuard};

/// Prefix of every user-visible failure message.
pub const ERROR_PREFIX: &str = "Erro:";

/// Result of claiming a form for a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    /// Trimmed prompt was empty; nothing changed.
    Empty,
    /// The form already has a request in flight.
    Busy,
    Started(R),
}

/// How a submission ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Empty,
    Busy,
    Succeeded,
    Failed,
}

pub(crate) fn error_text(err: &crate::Error) -> String {
    format!("{} {}", ERROR_PREFIX, err.user_message())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared handle to both forms and the backend they submit to.
#[derive(Clone)]
pub struct Page {
    backend: Arc<dyn BackendService>,
    base_url: String,
    text: Arc<Mutex<TextForm>>,
    image: Arc<Mutex<ImageForm>>,
}

impl Page {
    pub fn new(backend: Arc<dyn BackendService>, base_url: &str, model: TextModel) -> Self {
        Self {
            backend,
            base_url: crate::models::normalize_base_url(base_url),
            text: Arc::new(Mutex::new(TextForm::new(model))),
            image: Arc::new(Mutex::new(ImageForm::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn backend(&self) -> &Arc<dyn BackendService> {
        &self.backend
    }

    /// Snapshot of the text form.
    pub fn text(&self) -> TextForm {
        lock(&self.text).clone()
    }

    /// Snapshot of the image form.
    pub fn image(&self) -> ImageForm {
        lock(&self.image).clone()
    }

    /// Returns false when the text form is loading and input is disabled.
    pub fn set_text_prompt(&self, prompt: &str) -> bool {
        lock(&self.text).set_prompt(prompt)
    }

    pub fn set_image_prompt(&self, prompt: &str) -> bool {
        lock(&self.image).set_prompt(prompt)
    }

    pub fn select_model(&self, model: TextModel) -> bool {
        lock(&self.text).select_model(model)
    }

    /// Seeds the session identifier, e.g. to resume a conversation.
    pub fn set_session_id(&self, session_id: Option<String>) {
        lock(&self.text).session_id = session_id;
    }

    /// Claims the text form for `prompt` without waiting on the backend.
    ///
    /// The returned request carries the model and session as they were at
    /// claim time; pass it to [`Page::complete_text`].
    pub fn claim_text(&self, prompt: &str) -> Submission<TextGenerationRequest> {
        lock(&self.text).claim(prompt)
    }

    pub fn claim_image(&self, prompt: &str) -> Submission<ImageGenerationRequest> {
        lock(&self.image).claim(prompt)
    }

    /// Sends a claimed text request and records the result on the form.
    pub async fn complete_text(&self, request: TextGenerationRequest) -> SubmitOutcome {
        tracing::info!("Submitting text prompt (model: {})", request.model);
        let result = self.backend.generate_text(&request).await;
        lock(&self.text).finish_submit(result)
    }

    pub async fn complete_image(&self, request: ImageGenerationRequest) -> SubmitOutcome {
        tracing::info!("Submitting image prompt");
        let result = self.backend.generate_image(&request).await;
        lock(&self.image).finish_submit(result, &self.base_url)
    }

    /// Submits whatever prompt is currently in the text form.
    pub async fn submit_text(&self) -> SubmitOutcome {
        let claim = lock(&self.text).begin_submit();
        match claim {
            Submission::Empty => SubmitOutcome::Empty,
            Submission::Busy => SubmitOutcome::Busy,
            Submission::Started(request) => self.complete_text(request).await,
        }
    }

    pub async fn submit_image(&self) -> SubmitOutcome {
        let claim = lock(&self.image).begin_submit();
        match claim {
            Submission::Empty => SubmitOutcome::Empty,
            Submission::Busy => SubmitOutcome::Busy,
            Submission::Started(request) => self.complete_image(request).await,
        }
    }
}
