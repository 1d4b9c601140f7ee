//! # Demo Subcommand
//!
//! Walks the whole flow once, in order:
//!
//! 1. call `POI_Add` with `{}` and print the validation failure;
//! 2. call `POI.Add` through the typed call site with a complete payload;
//! 3. generate the type declarations, read them back, print them.

use anyhow::{Context, Result};

use uecall_dispatch::Dispatcher;
use uecall_schema::{write_declarations, Focus, PoiAdd, Rotator, Switch, Vector, Vector2D};

use crate::config::CliConfig;

const RULE: &str = "----------------";

/// The complete payload used by the demo's successful call.
pub fn sample_poi() -> PoiAdd {
    PoiAdd {
        tags: vec!["test".to_string()],
        location: Vector::default(),
        focus: Focus {
            focus: Vector::default(),
            rotator: Rotator::default(),
            arm_length: 100.0,
            can_focus: true,
        },
        display: true,
        switch: Switch {
            check_img: "test".to_string(),
            check_text: "test".to_string(),
            un_check_img: "test".to_string(),
            un_check_text: "test".to_string(),
            min_size: Vector2D::default(),
            font_size: 12.0,
        },
    }
}

/// Execute the demo.
pub async fn run_demo(config: &CliConfig, dispatcher: &Dispatcher<'_>) -> Result<u8> {
    println!("validating calls against shapes and generating types from them");

    match dispatcher.call("POI_Add", serde_json::json!({})).await {
        Ok(value) => {
            tracing::error!(%value, "empty payload was accepted");
            anyhow::bail!("POI_Add accepted an empty payload");
        }
        Err(e) => {
            tracing::info!(
                violations = e.violations().map_or(0, |v| v.len()),
                "empty payload rejected"
            );
            println!("{RULE}");
            println!("the shape rejected this call");
            println!("{RULE}");
            println!("{e}");
        }
    }

    let resolved = dispatcher
        .poi_add(&sample_poi())
        .await
        .context("complete POI.Add payload was rejected")?;
    println!("{RULE}");
    println!("complete call resolved");
    println!("{RULE}");
    println!("{}", serde_json::to_string_pretty(&resolved)?);

    let path = config.types_path();
    let content = write_declarations(dispatcher.registry(), &path)
        .await
        .with_context(|| format!("cannot generate {}", path.display()))?;
    println!("{RULE}");
    println!("generated types ({})", path.display());
    println!("{RULE}");
    println!("{content}");
    println!("{RULE}");

    println!("done");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::default().with_output_dir(Some(dir.path().join("dist")));
        let dispatcher = Dispatcher::builtin().unwrap();

        assert_eq!(run_demo(&config, &dispatcher).await.unwrap(), 0);
        assert!(config.types_path().exists());
    }

    #[tokio::test]
    async fn sample_payload_is_accepted() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let out = dispatcher.poi_add(&sample_poi()).await.unwrap();
        assert_eq!(out["Display"], true);
    }
}
