//! Printable exam sheet generator.
//!
//! Produces a self-contained HTML page with all CSS inlined, laid out for
//! A4 printing.

use anyhow::{Context, Result};
use std::path::Path;

use jagdkurs_core::exam::GeneratedSet;
use jagdkurs_core::sampler::is_mc_style;

/// Blank answer lines printed below each open question.
const ANSWER_LINES: usize = 4;
const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Rendering options for [`generate_exam_html`].
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
    /// Append a solutions section after the questions.
    pub with_answer_key: bool,
}

impl SheetOptions {
    pub fn with_answer_key() -> Self {
        Self {
            with_answer_key: true,
        }
    }
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate a printable exam sheet for a generated set.
pub fn generate_exam_html(set: &GeneratedSet, options: &SheetOptions) -> String {
    let subject = html_escape(&set.subject);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>Jagdkurs - {subject}</title>\n"));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>Jagdkurs - {subject}</h1>\n"));
    html.push_str(
        "<p class=\"candidate\">Name: ______________________ &nbsp; Datum: ______________________</p>\n",
    );
    html.push_str(&format!(
        "<p class=\"meta\">{} Fragen | erstellt {}</p>\n",
        set.questions.len(),
        set.created_at.format("%d.%m.%Y %H:%M UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<ol class=\"questions\">\n");
    for q in &set.questions {
        html.push_str("<li class=\"question\">\n");
        html.push_str(&format!("<p class=\"stem\">{}</p>\n", html_escape(q.display_text())));

        if is_mc_style(q) {
            html.push_str("<ul class=\"options\">\n");
            for (label, option) in OPTION_LABELS.iter().zip(q.options()) {
                html.push_str(&format!(
                    "<li><span class=\"label\">{label})</span> {}</li>\n",
                    html_escape(option)
                ));
            }
            html.push_str("</ul>\n");
        } else {
            html.push_str("<div class=\"answer-lines\">\n");
            for _ in 0..ANSWER_LINES {
                html.push_str("<div class=\"line\"></div>\n");
            }
            html.push_str("</div>\n");
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ol>\n");

    if options.with_answer_key {
        html.push_str("<section class=\"answer-key\">\n");
        html.push_str(&format!("<h2>Jagdkurs - Lösungen - {subject}</h2>\n"));
        html.push_str("<ol>\n");
        for q in &set.questions {
            html.push_str(&format!(
                "<li><p>{}</p><p class=\"solution\">Lösung: {}</p></li>\n",
                html_escape(q.display_text()),
                html_escape(&q.answer)
            ));
        }
        html.push_str("</ol>\n</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

/// Write an exam sheet to a file.
pub fn write_exam_html(set: &GeneratedSet, options: &SheetOptions, path: &Path) -> Result<()> {
    let html = generate_exam_html(set, options);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write exam sheet to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
@page { size: A4; margin: 16mm 15mm; }
body { font-family: Helvetica, Arial, sans-serif; font-size: 10pt; color: #111; margin: 0; }
h1 { font-size: 14pt; margin: 0 0 0.5rem; }
h2 { font-size: 12pt; margin-top: 2rem; }
.candidate { margin: 0 0 0.25rem; }
.meta { color: #6b7280; font-size: 8pt; }
.questions { padding-left: 1.5rem; }
.question { margin-bottom: 0.9rem; break-inside: avoid; }
.stem { font-size: 11pt; margin: 0 0 0.3rem; }
.options { list-style: none; padding-left: 0.5rem; margin: 0; font-size: 9pt; }
.label { font-weight: bold; }
.answer-lines .line { border-bottom: 1px solid #444; height: 7mm; margin-left: 0.5rem; }
.answer-key { break-before: page; }
.solution { font-weight: bold; margin-left: 0.5rem; }
"#;
