//! Content loader - derives post cards from the posts directory

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, PostCard};
use crate::fit;
use crate::helpers::{excerpt_html, strip_html};
use crate::Site;

/// Excerpts derived from the body are bounded to this many characters
const EXCERPT_LIMIT: usize = 320;

/// Loads post cards from the posts directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts, sorted by slug
    pub fn load_posts(&self) -> Result<Vec<PostCard>> {
        if !self.site.posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.site.posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(path) {
                    Ok(Some(post)) => posts.push(post),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        // Directory iteration order is platform-dependent; sort so the
        // manifest and data file come out the same on every run
        posts.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(posts)
    }

    /// Load a single post; `None` when it is an unpublished draft
    fn load_post(&self, path: &Path) -> Result<Option<PostCard>> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content);

        if !fm.published && !self.site.config.render_drafts {
            return Ok(None);
        }

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let title = fm.title.clone().unwrap_or_else(|| slug.clone());

        let html = self.renderer.render(body);
        let excerpt_source = match &fm.excerpt {
            Some(e) => e.clone(),
            None => excerpt_html(&html, self.site.config.og.excerpt_paragraphs),
        };
        let plain = strip_html(&excerpt_source);
        let excerpt = fit::truncate(&plain, EXCERPT_LIMIT);

        Ok(Some(PostCard {
            slug,
            title,
            excerpt,
            date: fm.parse_date(),
        }))
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_in(dir: &Path) -> Site {
        Site::new(dir).unwrap()
    }

    fn write_post(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir.join("posts")).unwrap();
        fs::write(dir.join("posts").join(name), content).unwrap();
    }

    #[test]
    fn test_load_posts_basic() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello-world.md",
            "---\ntitle: Hello World\n---\n\nA short post.\n\nSecond paragraph.\n",
        );

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].title, "Hello World");
        assert!(posts[0].excerpt.contains("A short post."));
        assert!(posts[0].excerpt.contains("Second paragraph."));
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "untitled-note.md", "Just some text.\n");

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts[0].title, "untitled-note");
    }

    #[test]
    fn test_front_matter_excerpt_wins() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "a.md",
            "---\ntitle: A\nexcerpt: Hand-written summary.\n---\n\nBody paragraph.\n",
        );

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts[0].excerpt, "Hand-written summary.");
    }

    #[test]
    fn test_excerpt_takes_two_paragraphs_and_strips_markup() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "a.md",
            "First *styled* paragraph.\n\nSecond paragraph.\n\nThird paragraph.\n",
        );

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        let excerpt = &posts[0].excerpt;
        assert!(excerpt.contains("First styled paragraph."));
        assert!(excerpt.contains("Second paragraph."));
        assert!(!excerpt.contains("Third paragraph."));
        assert!(!excerpt.contains('<'));
    }

    #[test]
    fn test_excerpt_bounded() {
        let tmp = TempDir::new().unwrap();
        let long: String = "many words here ".repeat(60);
        write_post(tmp.path(), "long.md", &long);

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert!(posts[0].excerpt.chars().count() <= EXCERPT_LIMIT + 1);
        assert!(posts[0].excerpt.ends_with('…'));
    }

    #[test]
    fn test_drafts_skipped() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "draft.md",
            "---\ntitle: Draft\npublished: false\n---\n\nNot yet.\n",
        );
        write_post(tmp.path(), "live.md", "---\ntitle: Live\n---\n\nYes.\n");

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "live");
    }

    #[test]
    fn test_posts_sorted_by_slug() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "zebra.md", "Z post.\n");
        write_post(tmp.path(), "alpha.md", "A post.\n");

        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_missing_posts_dir() {
        let tmp = TempDir::new().unwrap();
        let site = site_in(tmp.path());
        let posts = ContentLoader::new(&site).load_posts().unwrap();
        assert!(posts.is_empty());
    }
}
