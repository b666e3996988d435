//! Display renderer
//!
//! Server-side views for the lesson form, the generated article and the
//! print document. Provider output is untrusted and always goes through
//! [`sanitize_article`] before it reaches a template.

use crate::models::lesson::{AgeGroup, LessonForm, Presentation, DEFAULT_PAGES, WORDS_PER_PAGE};
use crate::services::cost::CostSummary;
use crate::services::orchestrator::Lesson;
use crate::utils::error::AppResult;
use ammonia::Builder;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use tera::{Context, Tera};

const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
const FORM_TEMPLATE: &str = include_str!("../../templates/form.html");
const OUTPUT_TEMPLATE: &str = include_str!("../../templates/output.html");
const PRINT_TEMPLATE: &str = include_str!("../../templates/print.html");

/// Tags an article may contain
const ARTICLE_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "ul", "ol", "li", "dl", "dt", "dd",
    "strong", "em", "b", "i", "u", "mark", "small", "sub", "sup", "code", "pre", "blockquote",
    "table", "caption", "thead", "tbody", "tfoot", "tr", "th", "td", "a", "span", "section",
    "figure", "figcaption", "abbr", "q", "cite",
];

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(ARTICLE_TAGS.iter().copied().collect::<HashSet<_>>())
        .link_rel(Some("noopener noreferrer"));
    builder
});

/// Strip everything outside the article allow-list
pub fn sanitize_article(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

#[derive(Debug, Serialize)]
struct AgeOption {
    key: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct FormView<'a> {
    topic: &'a str,
    pages: String,
    age_options: Vec<AgeOption>,
    words_per_page: u32,
    has_saved_key: bool,
    busy: bool,
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CostPanel {
    input_tokens: u64,
    output_tokens: u64,
    total_tokens: u64,
    total_cost: String,
}

#[derive(Debug, Serialize)]
struct OutputView<'a> {
    topic: &'a str,
    article: &'a str,
    presentation_class: &'static str,
    age_group: &'static str,
    pages: u32,
    cost: Option<CostPanel>,
}

#[derive(Debug, Serialize)]
struct PrintView<'a> {
    topic: &'a str,
    article: &'a str,
    presentation_class: &'static str,
}

/// State of the form page apart from the field values
#[derive(Debug, Clone, Copy, Default)]
pub struct FormStatus<'a> {
    pub has_saved_key: bool,
    pub busy: bool,
    pub error: Option<&'a str>,
}

impl From<&CostSummary> for CostPanel {
    fn from(cost: &CostSummary) -> Self {
        Self {
            input_tokens: cost.input_tokens,
            output_tokens: cost.output_tokens,
            total_tokens: cost.total_tokens,
            total_cost: cost.formatted_cost(),
        }
    }
}

/// Page renderer
#[derive(Debug, Clone)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("form.html", FORM_TEMPLATE),
            ("output.html", OUTPUT_TEMPLATE),
            ("print.html", PRINT_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    /// The input form, prefilled from `form`
    pub fn form_page(&self, form: &LessonForm, status: FormStatus<'_>) -> AppResult<String> {
        let selected = form.age_group.trim();
        let pages = form
            .page_count()
            .map(|p| p.to_string())
            .unwrap_or_else(|_| DEFAULT_PAGES.to_string());

        let view = FormView {
            topic: &form.topic,
            pages,
            age_options: AgeGroup::ALL
                .into_iter()
                .map(|group| AgeOption {
                    key: group.key(),
                    label: group.label(),
                    selected: group.key() == selected,
                })
                .collect(),
            words_per_page: WORDS_PER_PAGE,
            has_saved_key: status.has_saved_key,
            busy: status.busy,
            error: status.error,
        };

        self.render("form.html", &view)
    }

    /// The output view for a finished lesson
    pub fn output_page(&self, lesson: &Lesson) -> AppResult<String> {
        let view = OutputView {
            topic: &lesson.topic,
            article: &lesson.html,
            presentation_class: lesson.presentation.css_class(),
            age_group: lesson.age_group.key(),
            pages: lesson.pages,
            cost: lesson.cost.as_ref().map(CostPanel::from),
        };

        self.render("output.html", &view)
    }

    /// Self-contained print document; the article is sanitized again since it came back from the browser
    pub fn print_document(&self, topic: &str, article: &str, presentation: Presentation) -> AppResult<String> {
        let article = sanitize_article(article);
        let view = PrintView {
            topic,
            article: &article,
            presentation_class: presentation.css_class(),
        };

        self.render("print.html", &view)
    }

    fn render<T: Serialize>(&self, template: &str, view: &T) -> AppResult<String> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(template, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitizer_strips_scripts_and_handlers() {
        let dirty = r#"<h1 onclick="steal()">Title</h1><script>alert(1)</script><p>Safe <a href="javascript:alert(1)">link</a></p>"#;
        let clean = sanitize_article(dirty);

        assert!(clean.contains("<h1>Title</h1>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn test_sanitizer_keeps_tables_and_links() {
        let html = r#"<table><thead><tr><th>Planet</th></tr></thead><tbody><tr><td>Mars</td></tr></tbody></table><a href="https://nasa.gov">NASA</a>"#;
        let clean = sanitize_article(html);

        assert!(clean.contains("<th>Planet</th>"));
        assert!(clean.contains("<td>Mars</td>"));
        assert!(clean.contains(r#"href="https://nasa.gov""#));
        assert!(clean.contains("noopener noreferrer"));
    }

    #[test]
    fn test_form_page_selects_age_group() {
        let renderer = Renderer::new().unwrap();
        let form = LessonForm {
            age_group: "11-13".to_string(),
            ..Default::default()
        };
        let html = renderer.form_page(&form, FormStatus::default()).unwrap();

        assert!(html.contains(r#"<option value="11-13" selected>"#));
        assert!(html.contains(r#"<option value="5-7">"#));
    }

    #[test]
    fn test_form_page_escapes_error_and_topic() {
        let renderer = Renderer::new().unwrap();
        let form = LessonForm {
            topic: "<b>Bold</b>".to_string(),
            ..Default::default()
        };
        let status = FormStatus {
            error: Some("<script>x</script>"),
            ..Default::default()
        };
        let html = renderer.form_page(&form, status).unwrap();

        assert!(!html.contains("<script>x</script>"));
        assert!(!html.contains("<b>Bold</b>"));
        assert!(html.contains("&lt;b&gt;Bold"));
    }

    #[test]
    fn test_print_document_uses_load_event() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .print_document("Bees", "<h1>Bees</h1><script>x()</script>", Presentation::Young)
            .unwrap();

        assert!(html.contains(r#"addEventListener("load""#));
        assert!(!html.contains("setTimeout"));
        assert!(!html.contains("x()"));
        assert!(html.contains(r#"class="young""#));
    }
}
