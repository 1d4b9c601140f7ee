//! # Call Subcommand
//!
//! Dispatch one payload through the validated router and print the
//! resolved value.
//!
//! ```bash
//! uecall call POI.Add --file poi.yaml
//! uecall call POI_Add '{"Tags": []}'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use uecall_core::DispatchKey;
use uecall_dispatch::{DispatchError, Dispatcher};
use uecall_schema::load_document;

/// Arguments for the call subcommand.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Dispatch key, dotted (`POI.Add`) or accessor form (`POI_Add`).
    pub key: String,

    /// Inline JSON payload. Defaults to `{}`.
    #[arg(conflicts_with = "file")]
    pub payload: Option<String>,

    /// Read the payload from a JSON or YAML file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Execute the call subcommand. Rejected calls exit with code 1.
pub async fn run_call(args: &CallArgs, dispatcher: &Dispatcher<'_>) -> Result<u8> {
    let payload = read_payload(args)?;

    let Ok(key) = DispatchKey::parse_lenient(&args.key) else {
        eprintln!(
            "{}",
            DispatchError::NotDefined {
                key: args.key.clone()
            }
        );
        return Ok(1);
    };

    match dispatcher.dispatch_key(&key, payload).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(0)
        }
        Err(e @ (DispatchError::Validation { .. } | DispatchError::NotDefined { .. })) => {
            eprintln!("{e}");
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("call to {key} failed")),
    }
}

fn read_payload(args: &CallArgs) -> Result<Value> {
    if let Some(path) = &args.file {
        return Ok(load_document(path)?);
    }
    match &args.payload {
        Some(raw) => serde_json::from_str(raw).context("payload is not valid JSON"),
        None => Ok(Value::Object(Default::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(key: &str, payload: Option<&str>) -> CallArgs {
        CallArgs {
            key: key.to_string(),
            payload: payload.map(str::to_string),
            file: None,
        }
    }

    #[test]
    fn payload_defaults_to_empty_object() {
        assert_eq!(read_payload(&args("POI.Add", None)).unwrap(), json!({}));
    }

    #[test]
    fn inline_payload_must_be_json() {
        assert!(read_payload(&args("POI.Add", Some("{not json"))).is_err());
    }

    #[test]
    fn file_payload_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        std::fs::write(&path, "Tags: [a]\n").unwrap();
        let mut a = args("POI.Add", None);
        a.file = Some(path);
        assert_eq!(read_payload(&a).unwrap(), json!({ "Tags": ["a"] }));
    }

    #[tokio::test]
    async fn rejected_call_exits_one() {
        let dispatcher = Dispatcher::builtin().unwrap();
        assert_eq!(run_call(&args("POI_Add", Some("{}")), &dispatcher).await.unwrap(), 1);
        assert_eq!(run_call(&args("Nope.Key", None), &dispatcher).await.unwrap(), 1);
        assert_eq!(run_call(&args("bad key", None), &dispatcher).await.unwrap(), 1);
    }
}
