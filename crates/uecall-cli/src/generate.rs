//! # Generate Subcommand
//!
//! Write the TypeScript declarations for every endpoint, read them back,
//! and print them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use uecall_schema::{write_declarations, ShapeRegistry};

use crate::config::CliConfig;

/// Arguments for the generate subcommand.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Output file. Defaults to `<output_dir>/<types_file>` from the config.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the generate subcommand.
pub async fn run_generate(
    args: &GenerateArgs,
    config: &CliConfig,
    registry: &ShapeRegistry,
) -> Result<u8> {
    let path = args.out.clone().unwrap_or_else(|| config.types_path());
    let content = write_declarations(registry, &path)
        .await
        .with_context(|| format!("cannot generate {}", path.display()))?;
    println!("{content}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_to_configured_location() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::default().with_output_dir(Some(dir.path().join("dist")));
        let registry = ShapeRegistry::builtin().unwrap();

        let code = run_generate(&GenerateArgs::default(), &config, registry)
            .await
            .unwrap();
        assert_eq!(code, 0);
        let written = std::fs::read_to_string(config.types_path()).unwrap();
        assert!(written.contains("type POI_Add = {"));
    }

    #[tokio::test]
    async fn out_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("custom").join("api.d.ts");
        let args = GenerateArgs {
            out: Some(out.clone()),
        };
        let registry = ShapeRegistry::builtin().unwrap();

        run_generate(&args, &CliConfig::default(), registry)
            .await
            .unwrap();
        assert!(out.exists());
    }
}
