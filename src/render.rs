//! Template rendering
//!
//! Templates live in one directory as `<basename>.<ext>.hbs` and are
//! registered under `<basename>.<ext>`.

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{BuildError, BuildResult};

pub const TEMPLATE_EXTENSION: &str = "hbs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Html,
    Tex,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Html => "html",
            DocumentFormat::Tex => "tex",
        }
    }

    /// Registered template name for a document basename.
    pub fn template_name(&self, basename: &str) -> String {
        format!("{}.{}", basename, self.extension())
    }

    /// `<basename>_<language>.<ext>`
    pub fn file_name(&self, basename: &str, language: &str) -> String {
        format!("{}_{}.{}", basename, language, self.extension())
    }
}

/// Template collaborator: `render(template_name, bindings) -> text`.
pub trait TemplateRenderer {
    fn render(&self, template_name: &str, bindings: &Value) -> BuildResult<String>;
}

/// Handlebars templates, strict mode, no escaping (the bindings already
/// carry HTML or LaTeX markup).
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    pub fn load_from_dir(dir: &Path) -> BuildResult<Self> {
        let mut renderer = Self::new();
        let entries = fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| BuildError::io(dir, e))?.path();
            if path.extension().map_or(true, |e| e != TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|e| BuildError::io(&path, e))?;
            renderer.register(name, &source)?;
        }
        tracing::debug!(templates = renderer.registry.get_templates().len(), "loaded templates from {}", dir.display());
        Ok(renderer)
    }

    pub fn register(&mut self, name: &str, source: &str) -> BuildResult<()> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| BuildError::Template(format!("{}: {}", name, e)))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template_name: &str, bindings: &Value) -> BuildResult<String> {
        if !self.registry.has_template(template_name) {
            return Err(BuildError::Template(format!("template '{}' not found", template_name)));
        }
        self.registry
            .render(template_name, bindings)
            .map_err(|e| BuildError::Template(format!("{}: {}", template_name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_names_are_deterministic() {
        assert_eq!(DocumentFormat::Tex.file_name("documentation", "fr"), "documentation_fr.tex");
        assert_eq!(DocumentFormat::Html.template_name("documentation"), "documentation.html");
    }

    #[test]
    fn renders_without_escaping() {
        let mut renderer = HandlebarsRenderer::new();
        renderer
            .register("doc.html", "{{#each cards}}<h2>{{title}}</h2>{{more_info}}{{/each}}")
            .unwrap();
        let out = renderer
            .render("doc.html", &json!({"cards": [{"title": "A & B", "more_info": "<p>x</p>"}]}))
            .unwrap();
        assert_eq!(out, "<h2>A & B</h2><p>x</p>");
    }

    #[test]
    fn strict_mode_rejects_unknown_variables() {
        let mut renderer = HandlebarsRenderer::new();
        renderer.register("doc.tex", "{{missing}}").unwrap();
        assert!(matches!(renderer.render("doc.tex", &json!({})), Err(BuildError::Template(_))));
    }

    #[test]
    fn unknown_template_is_error() {
        let renderer = HandlebarsRenderer::new();
        assert!(renderer.render("nope.html", &json!({})).is_err());
    }

    #[test]
    fn loads_hbs_files_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("documentation.tex.hbs"), "{{language}}").unwrap();
        fs::write(dir.path().join("README.md"), "not a template").unwrap();

        let renderer = HandlebarsRenderer::load_from_dir(dir.path()).unwrap();
        assert!(renderer.has_template("documentation.tex"));
        assert_eq!(renderer.render("documentation.tex", &json!({"language": "fr"})).unwrap(), "fr");
    }
}
