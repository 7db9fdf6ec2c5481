//! External-process rasterization
//!
//! Rasterizing vector images well is a solved problem outside this crate;
//! the default configuration drives the `resvg` CLI. The scratch files live
//! under the cache directory and use fixed names, which is safe under the
//! pipeline's single-build-at-a-time assumption.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{EngineError, Rasterizer};
use crate::config::RasterizerConfig;

/// Rasterizer invoking a configured external command
pub struct CommandRasterizer {
    command: String,
    args: Vec<String>,
    scratch_dir: PathBuf,
}

impl CommandRasterizer {
    /// Create a rasterizer writing scratch files under `scratch_dir`
    pub fn new(config: &RasterizerConfig, scratch_dir: &Path) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            scratch_dir: scratch_dir.to_path_buf(),
        }
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, vector: &[u8]) -> Result<Vec<u8>, EngineError> {
        fs::create_dir_all(&self.scratch_dir)?;
        let input = self.scratch_dir.join("render.svg");
        let output = self.scratch_dir.join("render.png");
        fs::write(&input, vector)?;

        let input_arg = input.to_string_lossy();
        let output_arg = output.to_string_lossy();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input_arg)
                    .replace("{output}", &output_arg)
            })
            .collect();

        let status = Command::new(&self.command)
            .args(&args)
            .status()
            .map_err(|e| {
                EngineError::Rasterizer(format!("failed to run {}: {}", self.command, e))
            })?;
        if !status.success() {
            return Err(EngineError::Rasterizer(format!(
                "{} exited with {}",
                self.command, status
            )));
        }

        let png = fs::read(&output).map_err(|e| {
            EngineError::Rasterizer(format!("{} produced no output: {}", self.command, e))
        })?;

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
        Ok(png)
    }
}
