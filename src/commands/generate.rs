//! Generate card images

use anyhow::Result;
use notify::Watcher;
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::engine::{CommandRasterizer, DirFontProvider, SvgLayoutEngine};
use crate::generator::OgGenerator;
use crate::template::CardTemplate;
use crate::Site;
use walkdir::WalkDir;

/// Generate card images for every post, reusing cached ones where possible
pub fn run(site: &Site, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site);
    let posts = loader.load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let og = &site.config.og;
    let provider = DirFontProvider::new(&site.base_dir, &og.fonts);
    let faces = provider.load_all();
    if faces.is_empty() && !og.fonts.is_empty() {
        tracing::warn!("No configured fonts could be loaded; using estimated text metrics");
    }

    let layout = SvgLayoutEngine::new(og.width, og.height, faces);
    let rasterizer = CommandRasterizer::new(&og.rasterizer, &site.cache_dir.join("scratch"));
    let template = CardTemplate::new(og.width, og.height, &og.brand);

    let generator = OgGenerator::new(site, template, &layout, &rasterizer);
    let map = generator.run(&posts, force)?;

    copy_passthrough(site)?;

    let duration = start.elapsed();
    tracing::info!(
        "Done in {:.2}s ({} entries written)",
        duration.as_secs_f64(),
        map.len()
    );

    Ok(())
}

/// Copy passthrough directories (static assets) into the public directory
fn copy_passthrough(site: &Site) -> Result<()> {
    if site.config.passthrough.is_empty() {
        return Ok(());
    }

    let public_dir = site.base_dir.join(&site.config.public_dir);
    for dir in &site.config.passthrough {
        let source = site.base_dir.join(dir);
        if !source.exists() {
            continue;
        }

        for entry in WalkDir::new(&source)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&site.base_dir).unwrap_or(path);
            let dest = public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }
        tracing::info!("Copied {} -> {:?}", dir, public_dir.join(dir));
    }

    Ok(())
}

/// Watch the posts directory and regenerate on change
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(site.posts_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("Posts changed, regenerating...");
                    if let Err(e) = run(site, false) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
