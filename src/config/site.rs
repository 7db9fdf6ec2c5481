//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    /// Directories copied into `public_dir` unchanged during generation
    #[serde(default)]
    pub passthrough: Vec<String>,

    // Writing
    pub render_drafts: bool,
    pub date_format: String,

    // Card pipeline
    #[serde(default)]
    pub og: OgConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Settings for the social preview image pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OgConfig {
    /// Directory the card images are written to, relative to the base dir
    pub output_dir: String,
    /// Directory holding the manifest and render scratch files
    pub cache_dir: String,
    /// Path of the slug → image path JSON consumed by page templates
    pub data_file: String,
    /// Root-relative prefix recorded in the data file for each image
    pub public_root: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Wordmark rendered in the card footer
    pub brand: String,
    /// How many rendered paragraphs feed the derived excerpt
    pub excerpt_paragraphs: usize,
    /// Fonts available to the layout engine
    #[serde(default)]
    pub fonts: Vec<FontSpec>,
    /// External rasterizer invocation
    #[serde(default)]
    pub rasterizer: RasterizerConfig,
}

/// A font file registered for card rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    /// Font file path relative to the base dir
    pub file: String,
}

/// External command that converts the vector image into a PNG
///
/// `{input}` and `{output}` in `args` are replaced with the scratch SVG
/// path and the destination PNG path. The default drives the `resvg` CLI;
/// `rsvg-convert -o {output} {input}` works as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Subspace".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            posts_dir: "posts".to_string(),
            public_dir: "_site".to_string(),
            passthrough: vec!["assets".to_string()],

            render_drafts: false,
            date_format: "%B %e, %Y".to_string(),

            og: OgConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            output_dir: "assets/og".to_string(),
            cache_dir: ".cache/og".to_string(),
            data_file: "_data/og_images.json".to_string(),
            public_root: "/assets/og".to_string(),
            width: 1200,
            height: 630,
            brand: "Subspace".to_string(),
            excerpt_paragraphs: 2,
            fonts: Vec::new(),
            rasterizer: RasterizerConfig::default(),
        }
    }
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            command: "resvg".to_string(),
            args: vec!["{input}".to_string(), "{output}".to_string()],
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "posts");
        assert_eq!(config.og.width, 1200);
        assert_eq!(config.og.height, 630);
        assert_eq!(config.og.public_root, "/assets/og");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
title: My Blog
og:
  brand: MYBLOG
  width: 1200
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.og.brand, "MYBLOG");
        // Unspecified og fields fall back to defaults
        assert_eq!(config.og.height, 630);
        assert_eq!(config.og.cache_dir, ".cache/og");
    }

    #[test]
    fn test_font_table() {
        let yaml = r#"
og:
  fonts:
    - family: Lexend
      weight: 700
      file: fonts/lexend-700.ttf
    - family: Inter
      weight: 400
      file: fonts/inter-400.ttf
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.og.fonts.len(), 2);
        assert_eq!(config.og.fonts[0].family, "Lexend");
        assert_eq!(config.og.fonts[0].weight, 700);
    }

    #[test]
    fn test_rasterizer_default() {
        let config = OgConfig::default();
        assert_eq!(config.rasterizer.command, "resvg");
        assert!(config.rasterizer.args.contains(&"{input}".to_string()));
    }
}
