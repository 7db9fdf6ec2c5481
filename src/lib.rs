//! ogcard: incremental social preview image generation for static blogs
//!
//! This crate renders a fixed-size Open Graph card (fitted title + excerpt
//! over decorative chrome) for every post in a blog, and caches the results
//! so unchanged posts are never re-rendered across builds. The slug → image
//! path map it maintains is consumed by the page-template layer as metadata.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod engine;
pub mod fit;
pub mod generator;
pub mod helpers;
pub mod template;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main ogcard application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts
    pub posts_dir: PathBuf,
    /// Directory the rendered card images are written to
    pub output_dir: PathBuf,
    /// Directory holding the manifest and render scratch files
    pub cache_dir: PathBuf,
    /// Path of the slug → image path data file
    pub data_path: PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let output_dir = base_dir.join(&config.og.output_dir);
        let cache_dir = base_dir.join(&config.og.cache_dir);
        let data_path = base_dir.join(&config.og.data_file);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            output_dir,
            cache_dir,
            data_path,
        })
    }

    /// Path of the persisted cache manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join("manifest.json")
    }

    /// Generate card images for every post
    pub fn generate(&self, force: bool) -> Result<()> {
        commands::generate::run(self, force)
    }

    /// Remove generated images, the cache, and the data file
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
