//! Configuration module

mod site;

pub use site::{FontSpec, OgConfig, RasterizerConfig, SiteConfig};
