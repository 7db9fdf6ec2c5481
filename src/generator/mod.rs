//! Artifact cache controller
//!
//! Drives the per-post decision: reuse the existing card image when the
//! recorded fingerprint matches and the file is still on disk, otherwise
//! render through the layout engine and rasterizer. The manifest and the
//! public map are rebuilt from the current post set on every run and only
//! persisted after the whole loop succeeds, so a failed render never leaves
//! them pointing at images that were not written.

use anyhow::Result;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::cache::{self, Manifest, ManifestEntry, OgMap};
use crate::content::PostCard;
use crate::engine::{LayoutEngine, Rasterizer};
use crate::template::CardTemplate;
use crate::Site;

/// Cache performance summary for one run
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    fn hit(&mut self) {
        self.hits += 1;
    }

    fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} rendered ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.misses)
        }
    }
}

/// Orchestrates card generation for a build run
pub struct OgGenerator<'a> {
    site: &'a Site,
    template: CardTemplate,
    layout: &'a dyn LayoutEngine,
    rasterizer: &'a dyn Rasterizer,
}

impl<'a> OgGenerator<'a> {
    /// Create a generator over the given engines
    pub fn new(
        site: &'a Site,
        template: CardTemplate,
        layout: &'a dyn LayoutEngine,
        rasterizer: &'a dyn Rasterizer,
    ) -> Self {
        Self {
            site,
            template,
            layout,
            rasterizer,
        }
    }

    /// Generate or reuse the card image for every post
    ///
    /// Returns the slug → public path map after persisting it and the
    /// manifest. Posts render sequentially; the layout and raster engines
    /// are the bottleneck resource, so the concurrency bound stays at one.
    pub fn run(&self, posts: &[PostCard], force: bool) -> Result<OgMap> {
        fs::create_dir_all(&self.site.output_dir)?;
        fs::create_dir_all(&self.site.cache_dir)?;

        let manifest_path = self.site.manifest_path();
        let previous = Manifest::load(&manifest_path, &self.template.version)?;

        let mut next = Manifest::new(&self.template.version);
        let mut map = OgMap::new();
        let mut stats = CacheStats::default();

        for post in posts {
            let hash = cache::fingerprint(post, &self.template.version);
            let filename = format!("{}.png", post.slug);
            let output_path = self.site.output_dir.join(&filename);
            let public_path = format!(
                "{}/{}",
                self.site.config.og.public_root.trim_end_matches('/'),
                filename
            );

            if !force {
                if let Some(entry) = previous.entries.get(&post.slug) {
                    if entry.hash == hash && artifact_exists(&output_path)? {
                        tracing::info!("✓ {} unchanged (hash {})", post.slug, hash);
                        next.entries.insert(post.slug.clone(), entry.clone());
                        map.insert(post.slug.clone(), public_path);
                        stats.hit();
                        continue;
                    }
                }
            }

            let tree = self.template.build(post);
            let vector = self.layout.layout(&tree)?;
            let png = self.rasterizer.rasterize(&vector)?;
            fs::write(&output_path, png)?;

            tracing::info!("★ generated {} (hash {})", post.slug, hash);
            next.entries
                .insert(post.slug.clone(), ManifestEntry { hash });
            map.insert(post.slug.clone(), public_path);
            stats.miss();
        }

        next.save(&manifest_path)?;
        cache::write_og_map(&self.site.data_path, &map)?;

        tracing::info!("Card images done: {}", stats);
        Ok(map)
    }
}

/// Check whether a previously rendered artifact is still on disk
///
/// "Not found" is the expected cache-miss signal; any other failure (a
/// permission problem, say) is surfaced rather than treated as a miss.
pub fn artifact_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::template::Node;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Layout engine that records invocations without doing real work
    struct MockLayout {
        calls: Cell<usize>,
        fail: bool,
    }

    impl MockLayout {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Cell::new(0),
                fail: true,
            }
        }
    }

    impl LayoutEngine for MockLayout {
        fn layout(&self, _tree: &Node) -> Result<Vec<u8>, EngineError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(EngineError::Layout("mock failure".to_string()));
            }
            Ok(b"<svg/>".to_vec())
        }
    }

    struct MockRasterizer {
        calls: Cell<usize>,
    }

    impl MockRasterizer {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl Rasterizer for MockRasterizer {
        fn rasterize(&self, _vector: &[u8]) -> Result<Vec<u8>, EngineError> {
            self.calls.set(self.calls.get() + 1);
            Ok(b"PNGBYTES".to_vec())
        }
    }

    fn site_in(dir: &std::path::Path) -> Site {
        Site::new(dir).unwrap()
    }

    fn template() -> CardTemplate {
        CardTemplate::new(1200, 630, "Subspace")
    }

    fn posts() -> Vec<PostCard> {
        vec![PostCard::new("a", "Hello World", "A short post.")]
    }

    #[test]
    fn test_fresh_build_renders_once() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let map = generator.run(&posts(), false).unwrap();

        assert_eq!(layout.calls.get(), 1);
        assert_eq!(raster.calls.get(), 1);
        assert_eq!(map["a"], "/assets/og/a.png");
        assert!(site.output_dir.join("a.png").exists());
        assert!(site.data_path.exists());

        let manifest = Manifest::load(&site.manifest_path(), "v3").unwrap();
        assert!(manifest.entries["a"].hash.len() >= 12);
    }

    #[test]
    fn test_second_run_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let first = generator.run(&posts(), false).unwrap();
        let manifest_before = fs::read_to_string(site.manifest_path()).unwrap();

        let second = generator.run(&posts(), false).unwrap();

        assert_eq!(layout.calls.get(), 1, "second run must not render");
        assert_eq!(raster.calls.get(), 1);
        assert_eq!(first, second);
        let manifest_after = fs::read_to_string(site.manifest_path()).unwrap();
        assert_eq!(manifest_before, manifest_after);
    }

    #[test]
    fn test_force_rerenders_everything() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let many = vec![
            PostCard::new("a", "First", "One."),
            PostCard::new("b", "Second", "Two."),
        ];
        generator.run(&many, false).unwrap();
        generator.run(&many, true).unwrap();

        assert_eq!(layout.calls.get(), 4);
    }

    #[test]
    fn test_changed_excerpt_rerenders_only_that_post() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let before = vec![
            PostCard::new("a", "First", "One."),
            PostCard::new("b", "Second", "Two."),
        ];
        generator.run(&before, false).unwrap();
        let old_hash = Manifest::load(&site.manifest_path(), "v3")
            .unwrap()
            .entries["a"]
            .hash
            .clone();

        let after = vec![
            PostCard::new("a", "First", "One, revised."),
            PostCard::new("b", "Second", "Two."),
        ];
        generator.run(&after, false).unwrap();

        assert_eq!(layout.calls.get(), 3, "only the changed post re-renders");
        let new_hash = Manifest::load(&site.manifest_path(), "v3")
            .unwrap()
            .entries["a"]
            .hash
            .clone();
        assert_ne!(old_hash, new_hash);
    }

    #[test]
    fn test_template_version_bump_invalidates() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();

        let generator = OgGenerator::new(&site, template(), &layout, &raster);
        generator.run(&posts(), false).unwrap();

        let mut bumped = template();
        bumped.version = "v4".to_string();
        let generator = OgGenerator::new(&site, bumped, &layout, &raster);
        generator.run(&posts(), false).unwrap();

        assert_eq!(layout.calls.get(), 2);
    }

    #[test]
    fn test_deleted_artifact_rerenders() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        generator.run(&posts(), false).unwrap();
        fs::remove_file(site.output_dir.join("a.png")).unwrap();
        generator.run(&posts(), false).unwrap();

        assert_eq!(layout.calls.get(), 2);
        assert!(site.output_dir.join("a.png").exists());
    }

    #[test]
    fn test_stale_entries_dropped() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let many = vec![
            PostCard::new("a", "First", "One."),
            PostCard::new("b", "Second", "Two."),
        ];
        generator.run(&many, false).unwrap();

        let fewer = vec![PostCard::new("a", "First", "One.")];
        let map = generator.run(&fewer, false).unwrap();

        assert!(!map.contains_key("b"));
        let manifest = Manifest::load(&site.manifest_path(), "v3").unwrap();
        assert!(!manifest.entries.contains_key("b"));
    }

    #[test]
    fn test_corrupt_manifest_recovers() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        fs::create_dir_all(&site.cache_dir).unwrap();
        fs::write(site.manifest_path(), "{definitely not json").unwrap();

        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);
        let map = generator.run(&posts(), false).unwrap();

        assert_eq!(layout.calls.get(), 1, "every post re-renders");
        assert_eq!(map.len(), 1);
        // The manifest heals on disk
        let manifest = Manifest::load(&site.manifest_path(), "v3").unwrap();
        assert!(manifest.entries.contains_key("a"));
    }

    #[test]
    fn test_render_failure_leaves_persisted_state_untouched() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();

        let generator = OgGenerator::new(&site, template(), &layout, &raster);
        generator.run(&posts(), false).unwrap();
        let manifest_before = fs::read_to_string(site.manifest_path()).unwrap();
        let map_before = fs::read_to_string(&site.data_path).unwrap();

        let failing = MockLayout::failing();
        let generator = OgGenerator::new(&site, template(), &failing, &raster);
        let changed = vec![PostCard::new("a", "First", "Edited.")];
        assert!(generator.run(&changed, false).is_err());

        assert_eq!(
            fs::read_to_string(site.manifest_path()).unwrap(),
            manifest_before
        );
        assert_eq!(fs::read_to_string(&site.data_path).unwrap(), map_before);
    }

    #[test]
    fn test_map_insertion_follows_post_order() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let layout = MockLayout::new();
        let raster = MockRasterizer::new();
        let generator = OgGenerator::new(&site, template(), &layout, &raster);

        let many = vec![
            PostCard::new("alpha", "A", "One."),
            PostCard::new("beta", "B", "Two."),
        ];
        let map = generator.run(&many, false).unwrap();
        let slugs: Vec<_> = map.keys().cloned().collect();
        assert_eq!(slugs, vec!["alpha", "beta"]);
    }
}
