//! Clean generated images and cache state

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the card images, the cache directory, and the data file
pub fn run(site: &Site) -> Result<()> {
    if site.output_dir.exists() {
        fs::remove_dir_all(&site.output_dir)?;
        tracing::info!("Deleted: {:?}", site.output_dir);
    }

    if site.cache_dir.exists() {
        fs::remove_dir_all(&site.cache_dir)?;
        tracing::info!("Deleted: {:?}", site.cache_dir);
    }

    if site.data_path.exists() {
        fs::remove_file(&site.data_path)?;
        tracing::info!("Deleted: {:?}", site.data_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_everything() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        fs::create_dir_all(&site.output_dir).unwrap();
        fs::write(site.output_dir.join("a.png"), "png").unwrap();
        fs::create_dir_all(&site.cache_dir).unwrap();
        fs::write(site.manifest_path(), "{}").unwrap();
        fs::create_dir_all(site.data_path.parent().unwrap()).unwrap();
        fs::write(&site.data_path, "{}").unwrap();

        run(&site).unwrap();

        assert!(!site.output_dir.exists());
        assert!(!site.cache_dir.exists());
        assert!(!site.data_path.exists());
    }

    #[test]
    fn test_clean_on_pristine_site_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        run(&site).unwrap();
    }
}
