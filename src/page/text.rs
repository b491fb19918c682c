use super::{error_text, SubmitOutcome, Submission};
use crate::models::{TextGenerationRequest, TextGenerationResponse, TextModel};
use crate::Result;

/// Shown before the first answer and after a failed one.
pub const IDLE_RESPONSE: &str = "...";
pub const LOADING_RESPONSE: &str = "Gerando resposta...";

#[derive(Debug, Clone, PartialEq)]
pub struct TextForm {
    pub prompt: String,
    pub model: TextModel,
    pub response: String,
    pub session_id: Option<String>,
    pub loading: bool,
    pub error: String,
}

impl TextForm {
    pub fn new(model: TextModel) -> Self {
        Self {
            prompt: String::new(),
            model,
            response: IDLE_RESPONSE.to_string(),
            session_id: None,
            loading: false,
            error: String::new(),
        }
    }

    pub fn set_prompt(&mut self, prompt: &str) -> bool {
        if self.loading {
            return false;
        }
        self.prompt = prompt.to_string();
        true
    }

    pub fn select_model(&mut self, model: TextModel) -> bool {
        if self.loading {
            return false;
        }
        self.model = model;
        true
    }

    /// Sets the prompt and enters loading in one step.
    ///
    /// An in-flight submission keeps its prompt; the new one is rejected.
    pub fn claim(&mut self, prompt: &str) -> Submission<TextGenerationRequest> {
        if prompt.trim().is_empty() {
            return Submission::Empty;
        }
        if self.loading {
            return Submission::Busy;
        }
        self.prompt = prompt.to_string();
        self.begin_submit()
    }

    pub fn begin_submit(&mut self) -> Submission<TextGenerationRequest> {
        if self.prompt.trim().is_empty() {
            return Submission::Empty;
        }
        if self.loading {
            return Submission::Busy;
        }

        self.loading = true;
        self.error.clear();
        self.response = LOADING_RESPONSE.to_string();

        Submission::Started(TextGenerationRequest {
            prompt: self.prompt.clone(),
            model: self.model,
            session_id: self.session_id.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<TextGenerationResponse>) -> SubmitOutcome {
        let outcome = match result {
            Ok(response) => {
                self.response = response.result;
                self.session_id = response.session_id;
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                tracing::error!("Text generation failed: {}", e);
                self.error = error_text(&e);
                self.response = IDLE_RESPONSE.to_string();
                SubmitOutcome::Failed
            }
        };

        self.loading = false;
        self.prompt.clear();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_API_ERROR;
    use crate::Error;

    fn form_with_prompt(prompt: &str) -> TextForm {
        let mut form = TextForm::new(TextModel::Gemini);
        form.set_prompt(prompt);
        form
    }

    #[test]
    fn test_begin_submit_enters_loading() {
        let mut form = form_with_prompt("Explique Rust");
        form.error = "Erro: antigo".to_string();

        let request = match form.begin_submit() {
            Submission::Started(request) => request,
            other => panic!("expected a started submission, got {other:?}"),
        };

        assert_eq!(request.prompt, "Explique Rust");
        assert_eq!(request.session_id, None);
        assert!(form.loading);
        assert_eq!(form.error, "");
        assert_eq!(form.response, LOADING_RESPONSE);
        assert_eq!(form.begin_submit(), Submission::Busy);
    }

    #[test]
    fn test_claim_while_loading_keeps_first_prompt() {
        let mut form = TextForm::new(TextModel::Gemini);
        assert!(matches!(form.claim("primeiro"), Submission::Started(_)));

        assert_eq!(form.claim("segundo"), Submission::Busy);
        assert_eq!(form.prompt, "primeiro");
        assert_eq!(form.claim("   "), Submission::Empty);
    }

    #[test]
    fn test_empty_prompt_leaves_state_unchanged() {
        let mut form = form_with_prompt("  \n");
        let before = form.clone();
        assert_eq!(form.begin_submit(), Submission::Empty);
        assert_eq!(form, before);
    }

    #[test]
    fn test_failure_with_detail() {
        let mut form = form_with_prompt("oi");
        form.begin_submit();

        let outcome = form.finish_submit(Err(Error::Api {
            status: 422,
            detail: Some("X".to_string()),
        }));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(form.error, "Erro: X");
        assert_eq!(form.response, IDLE_RESPONSE);
        assert!(!form.loading);
        assert_eq!(form.prompt, "");
    }

    #[test]
    fn test_failure_without_detail_uses_generic_message() {
        let mut form = form_with_prompt("oi");
        form.begin_submit();

        form.finish_submit(Err(Error::Api {
            status: 500,
            detail: None,
        }));

        assert_eq!(form.error, format!("Erro: {}", GENERIC_API_ERROR));
    }

    #[test]
    fn test_failure_with_empty_detail_uses_generic_message() {
        let mut form = form_with_prompt("oi");
        form.begin_submit();

        form.finish_submit(Err(Error::Api {
            status: 400,
            detail: Some(String::new()),
        }));

        assert_eq!(form.error, format!("Erro: {}", GENERIC_API_ERROR));
    }

    #[test]
    fn test_failure_keeps_previous_session() {
        let mut form = form_with_prompt("oi");
        form.session_id = Some("sess-9".to_string());
        form.begin_submit();

        form.finish_submit(Err(Error::Generic("timeout".to_string())));

        assert_eq!(form.session_id.as_deref(), Some("sess-9"));
        assert_eq!(form.error, "Erro: Generic error: timeout");
    }
}
