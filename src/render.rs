use chrono::{DateTime, Utc};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Templates compiled into the binary. Keyed by the names the handlers use.
const TEMPLATES: &[(&str, &str)] = &[
    ("base", include_str!("../templates/base.html")),
    ("index", include_str!("../templates/index.html")),
    ("about", include_str!("../templates/about.html")),
    ("contact", include_str!("../templates/contact.html")),
    ("docs", include_str!("../templates/docs.html")),
    ("result", include_str!("../templates/result.html")),
    ("error", include_str!("../templates/error.html")),
];

// ============================================================================
// Render contexts
// ============================================================================

/// Context for the static pages (home, about, contact).
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub title: String,
    /// Which top-level nav item to highlight; empty for none.
    pub active_nav: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DocsContext {
    pub title: String,
    pub active_nav: &'static str,
    pub api_base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ResultContext {
    pub title: String,
    pub active_nav: &'static str,
    pub file_url: String,
    pub filename: String,
    pub original_filename: String,
    pub file_size: u64,
    pub upload_date: DateTime<Utc>,
    pub mimetype: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorContext {
    pub title: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

// ============================================================================
// Template registry
// ============================================================================

/// Compiled template registry. Rendering is a pure function of the context;
/// no HTTP types cross this boundary.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        // Template names carry no .html suffix, so escaping must be forced.
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: &C) -> Result<String, RenderError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }
}
