use std::path::Path;

use anyhow::{bail, Context, Result};
use fishbowl_core::{ExecuteOptions, PollMode, PollOptions};
use fishbowl_domain::Record;
use fishbowl_infra::FishbowlConnector;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{PollArgs, RunArgs};

/// Log in once and report success.
pub async fn test_credentials(connector: &FishbowlConnector) -> Result<Value> {
    connector.test_credentials().await?;
    Ok(json!({"success": true}))
}

/// Run an action once per parameter item; Ctrl-C cancels the batch.
pub async fn run(connector: &FishbowlConnector, args: &RunArgs) -> Result<Value> {
    let items = parse_params(read_params(args)?.as_deref())?;
    let cancel = cancel_on_ctrl_c();

    let options = ExecuteOptions { continue_on_fail: args.continue_on_fail };
    let records = connector
        .execute_batch(&args.resource, &args.operation, &items, options, &cancel)
        .await?;

    info!(records = records.len(), "cli_run_completed");
    Ok(Value::Array(records.into_iter().map(Value::Object).collect()))
}

/// Poll one trigger event; `null` means nothing new.
pub async fn poll(connector: &FishbowlConnector, args: &PollArgs) -> Result<Value> {
    let options: PollOptions = match &args.options {
        Some(raw) => serde_json::from_str(raw).context("--options must be a JSON object")?,
        None => PollOptions::default(),
    };
    let mode = if args.manual { PollMode::Manual } else { PollMode::Automatic };

    let cancel = cancel_on_ctrl_c();

    let records = connector.poll(&args.event, &options, mode, &cancel).await?;
    Ok(records.map_or(Value::Null, |records| {
        Value::Array(records.into_iter().map(Value::Object).collect())
    }))
}

/// Token cancelled when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cli_interrupted");
            ctrl_c.cancel();
        }
    });
    cancel
}

fn read_params(args: &RunArgs) -> Result<Option<String>> {
    match (&args.params, &args.params_file) {
        (Some(raw), _) => Ok(Some(raw.clone())),
        (None, Some(path)) => read_file(path).map(Some),
        (None, None) => Ok(None),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// One object runs once; an array runs as a batch.
fn parse_params(raw: Option<&str>) -> Result<Vec<Record>> {
    let Some(raw) = raw else {
        return Ok(vec![Record::new()]);
    };

    match serde_json::from_str::<Value>(raw).context("parameters must be valid JSON")? {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => bail!("parameter item {index} is not a JSON object"),
            })
            .collect(),
        _ => bail!("parameters must be a JSON object or an array of objects"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_run_once_with_empty_record() {
        assert_eq!(parse_params(None).unwrap(), vec![Record::new()]);
    }

    #[test]
    fn array_params_become_a_batch() {
        let items = parse_params(Some(r#"[{"partId": 1}, {"partId": 2}]"#)).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["partId"], json!(2));
    }

    #[test]
    fn scalar_params_are_rejected() {
        assert!(parse_params(Some("42")).is_err());
        assert!(parse_params(Some(r#"[{"partId": 1}, 7]"#)).is_err());
        assert!(parse_params(Some("{not json")).is_err());
    }
}
