//! Font loading and horizontal metrics

use std::fs;
use std::path::{Path, PathBuf};

use super::{EngineError, FontProvider};
use crate::config::FontSpec;

/// A loaded font file
#[derive(Debug, Clone)]
pub struct FontFace {
    pub family: String,
    pub weight: u16,
    pub data: Vec<u8>,
}

impl FontFace {
    /// Measure the advance width of `text` at `size` pixels
    ///
    /// Uses the face's horizontal advances; glyphs the face lacks fall back
    /// to half an em, the same stand-in [`fallback_width`] uses throughout.
    pub fn measure(&self, text: &str, size: f32, letter_spacing: f32) -> f32 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return fallback_width(text, size, self.weight, letter_spacing);
        };
        let upem = face.units_per_em() as f32;

        let mut width = 0.0;
        let mut count = 0usize;
        for c in text.chars() {
            let advance = face
                .glyph_index(c)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map(|units| units as f32 / upem * size)
                .unwrap_or(size * 0.5);
            width += advance;
            count += 1;
        }
        width + letter_spacing * count.saturating_sub(1) as f32
    }

    /// Baseline offset from the top of an em box at `size` pixels
    pub fn ascent(&self, size: f32) -> f32 {
        match ttf_parser::Face::parse(&self.data, 0) {
            Ok(face) => {
                let upem = face.units_per_em() as f32;
                face.ascender() as f32 / upem * size
            }
            Err(_) => size * 0.8,
        }
    }
}

/// Width estimate used when no registered face matches
///
/// Average glyph width as a fraction of the em size; bold cuts wider.
pub fn fallback_width(text: &str, size: f32, weight: u16, letter_spacing: f32) -> f32 {
    let factor = if weight >= 600 { 0.56 } else { 0.52 };
    let count = text.chars().count();
    size * factor * count as f32 + letter_spacing * count.saturating_sub(1) as f32
}

/// Loads fonts from files listed in the site configuration
pub struct DirFontProvider {
    base_dir: PathBuf,
    specs: Vec<FontSpec>,
}

impl DirFontProvider {
    /// Create a provider over the configured font table
    pub fn new(base_dir: &Path, specs: &[FontSpec]) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            specs: specs.to_vec(),
        }
    }

    /// Load every configured face, skipping (with a warning) files that
    /// cannot be read so a missing font degrades measurement instead of
    /// failing the build
    pub fn load_all(&self) -> Vec<FontFace> {
        let mut faces = Vec::new();
        for spec in &self.specs {
            match self.load(&spec.family, spec.weight) {
                Ok(face) => faces.push(face),
                Err(e) => {
                    tracing::warn!("Skipping font {} {}: {}", spec.family, spec.weight, e);
                }
            }
        }
        faces
    }
}

impl FontProvider for DirFontProvider {
    fn load(&self, family: &str, weight: u16) -> Result<FontFace, EngineError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.family == family && s.weight == weight)
            .ok_or_else(|| {
                EngineError::Font(format!("no font registered for {} {}", family, weight))
            })?;

        let path = self.base_dir.join(&spec.file);
        let data = fs::read(&path)
            .map_err(|e| EngineError::Font(format!("{}: {}", path.display(), e)))?;

        Ok(FontFace {
            family: family.to_string(),
            weight,
            data,
        })
    }
}
