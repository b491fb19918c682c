//! Application orchestration for the interactive session and one-shot commands.

use crate::backend::{BackendClient, BackendService};
use crate::models::{Config, TextModel};
use crate::page::view::{render_image_section, render_models, render_text_section, PAGE_TITLE};
use crate::page::{Page, SubmitOutcome, Submission, ERROR_PREFIX};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{info, warn};

pub const HELP: &str = "\
Comandos:
  <prompt>            envia um prompt de texto
  /text <prompt>      envia um prompt de texto
  /image <prompt>     gera uma imagem
  /model [modelo]     lista ou seleciona o modelo de texto
  /session            mostra o ID da sessão atual
  /help               mostra esta ajuda
  /quit               encerra";

const BUSY_TEXT: &str = "Aguarde: uma resposta de texto ainda está sendo gerada.";
const BUSY_IMAGE: &str = "Aguarde: uma imagem ainda está sendo gerada.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Text(String),
    Image(String),
    Model(Option<String>),
    Session,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Text(line.to_string());
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/text" => Command::Text(rest.to_string()),
            "/image" => Command::Image(rest.to_string()),
            "/model" if rest.is_empty() => Command::Model(None),
            "/model" => Command::Model(Some(rest.to_string())),
            "/session" => Command::Session,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Drives a [`Page`] from the terminal.
pub struct App {
    page: Page,
}

impl App {
    /// Build an app around any backend; used by tests to inject mocks.
    pub fn with_backend(backend: Arc<dyn BackendService>, base_url: &str, model: TextModel) -> Self {
        Self {
            page: Page::new(backend, base_url, model),
        }
    }

    pub fn new(config: &Config) -> Result<Self> {
        info!("Backend: {}", config.backend_url);
        let backend = BackendClient::from_config(config)?;
        Ok(Self::with_backend(
            Arc::new(backend),
            &config.backend_url,
            config.default_model,
        ))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Submits a single text prompt and returns the rendered text section.
    pub async fn run_text(
        &self,
        prompt: &str,
        model: Option<TextModel>,
        session_id: Option<String>,
    ) -> (SubmitOutcome, String) {
        if let Some(model) = model {
            self.page.select_model(model);
        }
        if session_id.is_some() {
            self.page.set_session_id(session_id);
        }
        self.page.set_text_prompt(prompt);

        let outcome = self.page.submit_text().await;
        (outcome, render_text_section(&self.page.text()))
    }

    /// Submits a single image prompt, optionally saving the result under `save_dir`.
    pub async fn run_image(
        &self,
        prompt: &str,
        save_dir: Option<&Path>,
    ) -> Result<(SubmitOutcome, String, Option<PathBuf>)> {
        self.page.set_image_prompt(prompt);
        let outcome = self.page.submit_image().await;
        let form = self.page.image();

        let saved = match save_dir {
            Some(dir) if outcome == SubmitOutcome::Succeeded => {
                Some(save_image(self.page.backend().as_ref(), &form.image_src, dir).await?)
            }
            _ => None,
        };

        Ok((outcome, render_image_section(&form), saved))
    }

    /// Reads commands until `/quit` or end of input, then waits for
    /// submissions still in flight.
    pub async fn run_interactive<R>(&self, input: R, out: UnboundedSender<String>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut in_flight = JoinSet::new();

        let _ = out.send(format!("{}\n{}", PAGE_TITLE, HELP));

        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Command::Empty => {}
                Command::Quit => break,
                Command::Help => {
                    let _ = out.send(HELP.to_string());
                }
                Command::Session => {
                    let message = match self.page.text().session_id {
                        Some(id) => format!("ID da Sessão: {}", id),
                        None => "Nenhuma sessão ativa.".to_string(),
                    };
                    let _ = out.send(message);
                }
                Command::Model(None) => {
                    let _ = out.send(render_models(self.page.text().model));
                }
                Command::Model(Some(token)) => {
                    let message = match token.parse::<TextModel>() {
                        Ok(model) if self.page.select_model(model) => {
                            format!("Modelo selecionado: {}", model.label())
                        }
                        Ok(_) => BUSY_TEXT.to_string(),
                        Err(e) => format!("{} {}", ERROR_PREFIX, e.user_message()),
                    };
                    let _ = out.send(message);
                }
                Command::Text(prompt) => match self.page.claim_text(&prompt) {
                    Submission::Empty => {}
                    Submission::Busy => {
                        let _ = out.send(BUSY_TEXT.to_string());
                    }
                    Submission::Started(request) => {
                        let page = self.page.clone();
                        let out = out.clone();
                        in_flight.spawn(async move {
                            page.complete_text(request).await;
                            let _ = out.send(render_text_section(&page.text()));
                        });
                    }
                },
                Command::Image(prompt) => match self.page.claim_image(&prompt) {
                    Submission::Empty => {}
                    Submission::Busy => {
                        let _ = out.send(BUSY_IMAGE.to_string());
                    }
                    Submission::Started(request) => {
                        let page = self.page.clone();
                        let out = out.clone();
                        in_flight.spawn(async move {
                            page.complete_image(request).await;
                            let _ = out.send(render_image_section(&page.image()));
                        });
                    }
                },
                Command::Unknown(name) => {
                    let _ = out.send(format!("Comando desconhecido: {} (use /help)", name));
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!("Submission task ended abnormally: {}", e);
            }
        }

        Ok(())
    }
}

/// File name for a generated image URL: its last path segment.
pub fn image_file_name(image_src: &str) -> String {
    image_src
        .rsplit('/')
        .next()
        .map(|name| name.split(['?', '#']).next().unwrap_or(name))
        .filter(|name| !name.is_empty())
        .unwrap_or("image.png")
        .to_string()
}

/// Downloads `image_src` into `dir`, returning the written path.
pub async fn save_image(
    backend: &dyn BackendService,
    image_src: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let bytes = backend.fetch_image(image_src).await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(image_file_name(image_src));
    tokio::fs::write(&path, &bytes).await?;
    info!("Saved image ({} bytes) to {}", bytes.len(), path.display());
    Ok(path)
}
