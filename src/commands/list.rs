//! List posts with their cache status

use anyhow::Result;

use crate::cache::{self, Manifest};
use crate::content::loader::ContentLoader;
use crate::generator;
use crate::helpers::machine_date;
use crate::template::TEMPLATE_VERSION;
use crate::Site;

/// Print each post with its date, slug, and card cache status
pub fn run(site: &Site) -> Result<()> {
    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;
    let manifest = Manifest::load(&site.manifest_path(), TEMPLATE_VERSION)?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let hash = cache::fingerprint(&post, TEMPLATE_VERSION);
        let image = site.output_dir.join(format!("{}.png", post.slug));
        let status = match manifest.entries.get(&post.slug) {
            Some(entry) => {
                if entry.hash == hash && generator::artifact_exists(&image)? {
                    "fresh"
                } else {
                    "stale"
                }
            }
            None => "missing",
        };

        let date = post
            .date
            .map(|d| machine_date(&d))
            .unwrap_or_else(|| "          ".to_string());
        println!("  {} - {} [{}] ({})", date, post.title, post.slug, status);
    }

    Ok(())
}
