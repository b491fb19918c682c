use super::BackendService;
use crate::models::{
    ImageGenerationRequest, ImageGenerationResponse, TextGenerationRequest,
    TextGenerationResponse,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Canned reply for a mocked call: success payload or backend rejection.
enum Reply<T> {
    Ok(T),
    Api(u16, Option<String>),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Api(status, detail) => Err(Error::Api { status, detail }),
        }
    }
}

pub struct MockBackendClient {
    text_replies: Arc<Mutex<VecDeque<Reply<TextGenerationResponse>>>>,
    image_replies: Arc<Mutex<VecDeque<Reply<ImageGenerationResponse>>>>,
    text_requests: Arc<Mutex<Vec<TextGenerationRequest>>>,
    image_requests: Arc<Mutex<Vec<ImageGenerationRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self {
            text_replies: Arc::new(Mutex::new(VecDeque::new())),
            image_replies: Arc::new(Mutex::new(VecDeque::new())),
            text_requests: Arc::new(Mutex::new(Vec::new())),
            image_requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_text_response(self, result: &str, session_id: Option<&str>) -> Self {
        self.text_replies
            .lock()
            .unwrap()
            .push_back(Reply::Ok(TextGenerationResponse {
                result: result.to_string(),
                session_id: session_id.map(str::to_string),
            }));
        self
    }

    pub fn with_text_error(self, status: u16, detail: Option<&str>) -> Self {
        self.text_replies
            .lock()
            .unwrap()
            .push_back(Reply::Api(status, detail.map(str::to_string)));
        self
    }

    pub fn with_image_response(self, image_path: &str) -> Self {
        self.image_replies
            .lock()
            .unwrap()
            .push_back(Reply::Ok(ImageGenerationResponse {
                image_path: image_path.to_string(),
            }));
        self
    }

    pub fn with_image_error(self, status: u16, detail: Option<&str>) -> Self {
        self.image_replies
            .lock()
            .unwrap()
            .push_back(Reply::Api(status, detail.map(str::to_string)));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn text_requests(&self) -> Vec<TextGenerationRequest> {
        self.text_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<ImageGenerationRequest> {
        self.image_requests.lock().unwrap().clone()
    }
}

impl Default for MockBackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendService for MockBackendClient {
    async fn generate_text(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<TextGenerationResponse> {
        *self.call_count.lock().unwrap() += 1;
        self.text_requests.lock().unwrap().push(request.clone());

        match self.text_replies.lock().unwrap().pop_front() {
            Some(reply) => reply.into_result(),
            // Default mock response
            None => Ok(TextGenerationResponse {
                result: format!("Echo: {}", request.prompt),
                session_id: Some(
                    request
                        .session_id
                        .clone()
                        .unwrap_or_else(|| "mock-session".to_string()),
                ),
            }),
        }
    }

    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        *self.call_count.lock().unwrap() += 1;
        self.image_requests.lock().unwrap().push(request.clone());

        match self.image_replies.lock().unwrap().pop_front() {
            Some(reply) => reply.into_result(),
            None => Ok(ImageGenerationResponse {
                image_path: "/generated_images/mock.png".to_string(),
            }),
        }
    }

    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>> {
        *self.call_count.lock().unwrap() += 1;
        // PNG signature
        Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextModel;

    fn text_request(prompt: &str) -> TextGenerationRequest {
        TextGenerationRequest {
            prompt: prompt.to_string(),
            model: TextModel::Gemini,
            session_id: None,
        }
    }

    #[tokio::test]
    async fn test_mock_default_text_echoes_prompt() {
        let client = MockBackendClient::new();
        let response = client.generate_text(&text_request("olá")).await.unwrap();
        assert_eq!(response.result, "Echo: olá");
        assert_eq!(response.session_id.as_deref(), Some("mock-session"));
    }

    #[tokio::test]
    async fn test_mock_replies_are_consumed_in_order() {
        let client = MockBackendClient::new()
            .with_text_response("primeira", Some("s1"))
            .with_text_error(500, Some("falhou"));

        let first = client.generate_text(&text_request("a")).await.unwrap();
        assert_eq!(first.result, "primeira");

        let err = client.generate_text(&text_request("b")).await.unwrap_err();
        assert_eq!(err.user_message(), "falhou");

        assert_eq!(client.get_call_count(), 2);
        assert_eq!(client.text_requests().len(), 2);
    }
}
