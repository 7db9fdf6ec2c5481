//! Markdown rendering for excerpt derivation
//!
//! The published pages are rendered by the site's template engine; this
//! renderer only exists so the pipeline can pull the leading paragraphs out
//! of a post body. Syntax highlighting and the rest of the page plugin set
//! are deliberately absent.

use pulldown_cmark::{html, Options, Parser};

/// Markdown renderer
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is split off before rendering, so YAML metadata
        // blocks stay disabled here.
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }
}
