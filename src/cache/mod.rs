//! Fingerprints, the cache manifest, and the public slug → path map
//!
//! The manifest records the fingerprint of the fields that affect a post's
//! rendered card. A card is reusable when its recorded fingerprint matches
//! the current one and the image file is still on disk; the image bytes
//! themselves are never hashed. Fingerprints are SHA-256 based so they are
//! stable across processes and Rust releases.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use crate::content::PostCard;

/// Fingerprint length in hex characters
const FINGERPRINT_LEN: usize = 12;

/// Digest of a post's render-relevant fields
///
/// Field order is fixed (slug, title, excerpt, template version) and the
/// fields are NUL-separated, so semantically identical posts hash
/// identically on every run. The post date is deliberately absent: it does
/// not appear on the card.
pub fn fingerprint(post: &PostCard, template_version: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(post.slug.as_bytes());
    hasher.update(b"\0");
    hasher.update(post.title.as_bytes());
    hasher.update(b"\0");
    hasher.update(post.excerpt.as_bytes());
    hasher.update(b"\0");
    hasher.update(template_version.as_bytes());
    let digest = hasher.finalize();
    format!("{:x}", digest)[..FINGERPRINT_LEN].to_string()
}

/// A single cached card, keyed by slug in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub hash: String,
}

/// Durable record of each post's last-rendered fingerprint
///
/// Rebuilt from scratch every run, so entries for deleted posts drop out
/// without tombstone handling. `version` records the template version the
/// entries were rendered with; it is informational, since invalidation
/// happens through the fingerprints, which embed the version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub entries: IndexMap<String, ManifestEntry>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            entries: IndexMap::new(),
        }
    }

    /// Load the manifest from disk
    ///
    /// A missing file or unparsable JSON yields an empty manifest (the
    /// latter with a warning), and every post simply re-renders once. Any
    /// other read failure is a real error and surfaces.
    pub fn load(path: &Path, version: &str) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::new(version));
            }
            Err(e) => {
                return Err(e).context(format!("failed to read manifest {}", path.display()));
            }
        };

        match serde_json::from_str::<Manifest>(&raw) {
            Ok(manifest) => Ok(manifest),
            Err(e) => {
                tracing::warn!("Unable to parse manifest, starting fresh: {}", e);
                Ok(Self::new(version))
            }
        }
    }

    /// Write the manifest wholesale, pretty-printed with a trailing newline
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, format!("{}\n", payload))
            .context(format!("failed to write manifest {}", path.display()))?;
        Ok(())
    }
}

/// The slug → root-relative image path map consumed by page templates
pub type OgMap = IndexMap<String, String>;

/// Write the public map, pretty-printed with a trailing newline
pub fn write_og_map(path: &Path, map: &OgMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string_pretty(map)?;
    fs::write(path, format!("{}\n", payload))
        .context(format!("failed to write data file {}", path.display()))?;
    Ok(())
}
