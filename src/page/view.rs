//! Plain-text rendering of the page sections.

use super::{ImageForm, TextForm};
use crate::models::TextModel;

pub const PAGE_TITLE: &str = "AI Service Frontend";

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_text_section(form: &TextForm) -> String {
    let button = if form.loading { "Enviando..." } else { "Enviar" };

    let mut lines = vec![
        "== Geração de Texto ==".to_string(),
        format!("Modelo: {}", form.model.label()),
        format!("[{}]", button),
        "Resposta da IA:".to_string(),
        form.response.clone(),
    ];
    if let Some(session_id) = &form.session_id {
        lines.push(format!("ID da Sessão: {}", session_id));
    }
    if !form.error.is_empty() {
        lines.push(form.error.clone());
    }
    join_lines(lines)
}

pub fn render_image_section(form: &ImageForm) -> String {
    let button = if form.loading { "Gerando..." } else { "Gerar Imagem" };

    let mut lines = vec![
        "== Geração de Imagem ==".to_string(),
        format!("[{}]", button),
        "Imagem Gerada:".to_string(),
    ];
    if form.loading {
        lines.push("Gerando imagem...".to_string());
    } else if !form.image_src.is_empty() {
        lines.push(form.image_src.clone());
    }
    if !form.error.is_empty() {
        lines.push(form.error.clone());
    }
    join_lines(lines)
}

/// Model selector, marking the current choice with `*`.
pub fn render_models(selected: TextModel) -> String {
    let mut lines = vec!["Escolha o Modelo:".to_string()];
    lines.extend(TextModel::ALL.into_iter().map(|model| {
        let marker = if model == selected { '*' } else { ' ' };
        format!(" {} {:<10} {}", marker, model.as_str(), model.label())
    }));
    join_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_section_shows_session_and_error() {
        let mut form = TextForm::new(TextModel::CodeLlama);
        form.response = "fn main() {}".to_string();
        form.session_id = Some("s-42".to_string());
        form.error = "Erro: lento".to_string();

        assert_eq!(
            render_text_section(&form),
            "== Geração de Texto ==\n\
             Modelo: Ollama: Code Llama\n\
             [Enviar]\n\
             Resposta da IA:\n\
             fn main() {}\n\
             ID da Sessão: s-42\n\
             Erro: lento\n"
        );
    }

    #[test]
    fn test_text_section_hides_missing_session() {
        let form = TextForm::new(TextModel::Gemini);
        let rendered = render_text_section(&form);
        assert!(!rendered.contains("ID da Sessão"));
        assert!(rendered.contains("...\n"));
    }

    #[test]
    fn test_image_section_hides_url_while_loading() {
        let form = ImageForm {
            image_src: "http://localhost:8000/a.png".to_string(),
            loading: true,
            ..ImageForm::default()
        };

        let rendered = render_image_section(&form);
        assert!(rendered.contains("[Gerando...]"));
        assert!(rendered.contains("Gerando imagem..."));
        assert!(!rendered.contains("a.png"));
    }

    #[test]
    fn test_models_marks_selection() {
        let rendered = render_models(TextModel::Gemma);
        assert!(rendered.contains(" * gemma:2b"));
        assert!(rendered.contains("   gemini"));
    }
}
