use ai_service_client::app::App;
use ai_service_client::models::{normalize_base_url, Config, TextModel};
use ai_service_client::page::SubmitOutcome;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ai-service-client")]
#[command(about = "Send text and image prompts to the AI generation backend")]
struct CliArgs {
    /// Backend base URL (overrides BACKEND_URL).
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// API key sent as X-API-KEY (overrides API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Text model: gemini, codellama or gemma:2b.
    #[arg(long, global = true, value_parser = parse_model_arg)]
    model: Option<TextModel>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate text from a single prompt.
    Text {
        prompt: String,
        /// Continue an existing conversation.
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Generate an image from a single prompt.
    Image {
        prompt: String,
        /// Download the generated image into this directory.
        #[arg(long, value_name = "DIR")]
        save_dir: Option<PathBuf>,
    },
}

fn parse_model_arg(input: &str) -> std::result::Result<TextModel, String> {
    input.parse().map_err(|_| {
        format!(
            "Invalid model '{}'. Expected one of: gemini, codellama, gemma:2b",
            input
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_service_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    if let Some(url) = args.backend_url {
        config.backend_url = normalize_base_url(&url);
    }
    if let Some(key) = args.api_key {
        config.api_key = key;
    }
    if let Some(model) = args.model {
        config.default_model = model;
    }

    let app = App::new(&config)?;

    match args.command {
        Some(CliCommand::Text { prompt, session_id }) => {
            let (outcome, rendered) = app.run_text(&prompt, None, session_id).await;
            print!("{}", rendered);
            if outcome == SubmitOutcome::Failed {
                std::process::exit(1);
            }
        }
        Some(CliCommand::Image { prompt, save_dir }) => {
            let (outcome, rendered, saved) = app.run_image(&prompt, save_dir.as_deref()).await?;
            print!("{}", rendered);
            if let Some(path) = saved {
                println!("Salvo em: {}", path.display());
            }
            if outcome == SubmitOutcome::Failed {
                std::process::exit(1);
            }
        }
        None => {
            info!("Starting interactive session");
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();
            let printer = tokio::spawn(async move {
                while let Some(message) = rx.recv().await {
                    println!("{}", message);
                }
            });

            let stdin = BufReader::new(tokio::io::stdin());
            app.run_interactive(stdin, tx).await?;
            printer.await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_arg_valid() {
        assert_eq!(parse_model_arg("gemma:2b").unwrap(), TextModel::Gemma);
    }

    #[test]
    fn test_parse_model_arg_invalid() {
        let err = parse_model_arg("llama3").unwrap_err();
        assert!(err.contains("codellama"));
    }

    #[test]
    fn test_cli_parses_image_subcommand() {
        let args = CliArgs::parse_from([
            "ai-service-client",
            "--backend-url",
            "http://ai:8000",
            "image",
            "um gato",
            "--save-dir",
            "out",
        ]);
        assert_eq!(args.backend_url.as_deref(), Some("http://ai:8000"));
        match args.command {
            Some(CliCommand::Image { prompt, save_dir }) => {
                assert_eq!(prompt, "um gato");
                assert_eq!(save_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
