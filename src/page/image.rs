use super::{error_text, SubmitOutcome, Submission};
use crate::models::{ImageGenerationRequest, ImageGenerationResponse};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageForm {
    pub prompt: String,
    /// Absolute URL of the last generated image, empty when none.
    pub image_src: String,
    pub loading: bool,
    pub error: String,
}

impl ImageForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prompt(&mut self, prompt: &str) -> bool {
        if self.loading {
            return false;
        }
        self.prompt = prompt.to_string();
        true
    }

    /// Sets the prompt and enters loading in one step.
    ///
    /// An in-flight submission keeps its prompt; the new one is rejected.
    pub fn claim(&mut self, prompt: &str) -> Submission<ImageGenerationRequest> {
        if prompt.trim().is_empty() {
            return Submission::Empty;
        }
        if self.loading {
            return Submission::Busy;
        }
        self.prompt = prompt.to_string();
        self.begin_submit()
    }

    pub fn begin_submit(&mut self) -> Submission<ImageGenerationRequest> {
        if self.prompt.trim().is_empty() {
            return Submission::Empty;
        }
        if self.loading {
            return Submission::Busy;
        }

        self.loading = true;
        self.error.clear();
        self.image_src.clear();

        Submission::Started(ImageGenerationRequest {
            prompt: self.prompt.clone(),
        })
    }

    pub fn finish_submit(
        &mut self,
        result: Result<ImageGenerationResponse>,
        base_url: &str,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(response) => {
                self.image_src = format!("{}{}", base_url, response.image_path);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                tracing::error!("Image generation failed: {}", e);
                self.error = error_text(&e);
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
    use crate::Error;

    #[test]
    fn test_begin_submit_clears_previous_image() {
        let mut form = ImageForm {
            prompt: "um gato astronauta".to_string(),
            image_src: "http://localhost:8000/old.png".to_string(),
            ..ImageForm::default()
        };

        assert_eq!(
            form.begin_submit(),
            Submission::Started(ImageGenerationRequest {
                prompt: "um gato astronauta".to_string()
            })
        );
        assert!(form.loading);
        assert_eq!(form.image_src, "");
    }

    #[test]
    fn test_success_concatenates_base_url_and_path() {
        let mut form = ImageForm::new();
        form.set_prompt("pôr do sol");
        form.begin_submit();

        let outcome = form.finish_submit(
            Ok(ImageGenerationResponse {
                image_path: "/generated_images/image.png".to_string(),
            }),
            "http://localhost:8000",
        );

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert_eq!(form.image_src, "http://localhost:8000/generated_images/image.png");
        assert!(!form.loading);
        assert_eq!(form.prompt, "");
    }

    #[test]
    fn test_failure_sets_prefixed_error() {
        let mut form = ImageForm::new();
        form.set_prompt("pôr do sol");
        form.begin_submit();

        form.finish_submit(
            Err(Error::Api {
                status: 400,
                detail: Some("Conteúdo bloqueado".to_string()),
            }),
            "http://localhost:8000",
        );

        assert_eq!(form.error, "Erro: Conteúdo bloqueado");
        assert_eq!(form.image_src, "");
        assert!(!form.loading);
    }
}
