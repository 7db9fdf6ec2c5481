//! Rendering seams: layout engine, rasterizer, and font provider
//!
//! The pipeline itself never rasterizes anything. It hands a document tree
//! to a [`LayoutEngine`], the resulting vector image to a [`Rasterizer`],
//! and writes whatever bytes come back. The traits keep the generator
//! testable with recording fakes and let deployments swap the production
//! engines without touching the cache logic.

mod fonts;
mod raster;
mod svg;

pub use fonts::{DirFontProvider, FontFace};
pub use raster::CommandRasterizer;
pub use svg::SvgLayoutEngine;

use crate::template::Node;
use thiserror::Error;

/// Errors surfaced by the rendering seams
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("font error: {0}")]
    Font(String),
    #[error("layout failed: {0}")]
    Layout(String),
    #[error("rasterizer failed: {0}")]
    Rasterizer(String),
}

/// Converts a styled document tree into a vector image
pub trait LayoutEngine {
    fn layout(&self, tree: &Node) -> Result<Vec<u8>, EngineError>;
}

/// Converts a vector image into fixed-size PNG bytes
pub trait Rasterizer {
    fn rasterize(&self, vector: &[u8]) -> Result<Vec<u8>, EngineError>;
}

/// Resolves font byte data by family and weight
pub trait FontProvider {
    fn load(&self, family: &str, weight: u16) -> Result<FontFace, EngineError>;
}
