//! Action executor
//!
//! Resolves `(resource, operation, params)` through the resource mappers,
//! performs the call with the shared client and shapes the response into
//! output records.

use fishbowl_domain::utils::format_inventory_response;
use fishbowl_domain::{FishbowlError, Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::client::FishbowlClient;
use crate::envelope::extract_items;
use crate::resources::{self, ApiCall, Fetch, Output, Resource};

/// Batch behaviour for [`ActionExecutor::execute_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    /// Record per-item failures as `{error, item}` instead of aborting.
    pub continue_on_fail: bool,
}

/// Runs resource operations against a shared [`FishbowlClient`].
pub struct ActionExecutor {
    client: FishbowlClient,
}

impl ActionExecutor {
    /// Executor over `client`.
    pub fn new(client: FishbowlClient) -> Self {
        Self { client }
    }

    /// Client used for every call.
    pub fn client(&self) -> &FishbowlClient {
        &self.client
    }

    /// Run one action and return its output records.
    ///
    /// # Errors
    /// - `UnknownOperation` for an unknown resource or operation
    /// - `Validation` for missing or malformed parameters
    /// - `Cancelled` once `cancel` fires
    /// - any other error raised by the request client
    #[instrument(skip(self, params, cancel), fields(resource = resource, operation = operation))]
    pub async fn execute(
        &self,
        resource: &str,
        operation: &str,
        params: &Record,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>> {
        let client = self.client.with_cancellation(cancel.clone());
        run(&client, resource, operation, params).await
    }

    /// Run the same action once per parameter set, in order.
    ///
    /// Without `continue_on_fail` the first failure aborts the batch. With
    /// it, failures become `{error, item}` records. Cancellation always
    /// aborts.
    #[instrument(
        skip(self, items, cancel),
        fields(resource = resource, operation = operation, items = items.len())
    )]
    pub async fn execute_batch(
        &self,
        resource: &str,
        operation: &str,
        items: &[Record],
        options: ExecuteOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>> {
        let client = self.client.with_cancellation(cancel.clone());
        let mut output = Vec::new();

        for (index, params) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(item = index, "fishbowl_batch_cancelled");
                return Err(FishbowlError::Cancelled);
            }

            match run(&client, resource, operation, params).await {
                Ok(records) => output.extend(records),
                Err(FishbowlError::Cancelled) => return Err(FishbowlError::Cancelled),
                Err(err) if options.continue_on_fail => {
                    warn!(item = index, error = %err, "fishbowl_item_failed_continuing");
                    output.push(failure_record(&err, index));
                }
                Err(err) => return Err(err),
            }
        }

        info!(records = output.len(), "fishbowl_batch_completed");
        Ok(output)
    }
}

async fn run(
    client: &FishbowlClient,
    resource: &str,
    operation: &str,
    params: &Record,
) -> Result<Vec<Record>> {
    let resource: Resource = resource.parse()?;
    let call = resources::plan(resource, operation, params)?;
    let items = perform(client, call).await?;
    debug!(records = items.len(), "fishbowl_action_completed");
    Ok(items.into_iter().map(into_record).collect())
}

async fn perform(client: &FishbowlClient, call: ApiCall) -> Result<Vec<Value>> {
    let response = match &call.fetch {
        Fetch::Single => client.request(&call.request).await?,
        Fetch::AllPages { property } => {
            Value::Array(client.request_all_items(&call.request, property).await?)
        }
    };

    Ok(match call.output {
        Output::Response => vec![response],
        Output::Items(extract) => extract_items(&response, &extract),
        Output::LimitedItems { extract, limit } => {
            let mut items = extract_items(&response, &extract);
            items.truncate(limit);
            items
        }
        Output::InventorySummary(extract) => {
            vec![Value::Object(format_inventory_response(extract_items(&response, &extract)))]
        }
        Output::Confirmation(record) => vec![Value::Object(record)],
    })
}

/// Objects pass through, `null` becomes `{}` and anything else is wrapped
/// as `{"value": ..}`.
pub fn into_record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        Value::Null => Record::new(),
        other => {
            let mut record = Record::new();
            record.insert("value".into(), other);
            record
        }
    }
}

fn failure_record(err: &FishbowlError, index: usize) -> Record {
    let mut record = Record::new();
    record.insert("error".into(), Value::String(err.to_string()));
    record.insert("item".into(), Value::from(index));
    record
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fishbowl_domain::{Credential, HttpMethod};
    use serde_json::json;

    use super::*;
    use crate::auth::{Authenticator, TokenCache};
    use crate::ports::StaticCredentialProvider;
    use crate::testing::ScriptedTransport;
    use crate::time::MockClock;

    fn executor(transport: &Arc<ScriptedTransport>) -> ActionExecutor {
        transport.respond(HttpMethod::Post, "/api/login", 200, json!({"token": "tok"}));
        let cache = Arc::new(TokenCache::new(Arc::new(MockClock::new())));
        let authenticator = Arc::new(Authenticator::new(transport.clone(), cache));
        let credential = Credential::new("https://fb.test", "u", "p");
        ActionExecutor::new(FishbowlClient::new(
            transport.clone(),
            Arc::new(StaticCredentialProvider::new(credential)),
            authenticator,
        ))
    }

    fn params(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn non_object_values_are_wrapped() {
        assert_eq!(into_record(json!({"id": 1})), params(json!({"id": 1})));
        assert_eq!(into_record(Value::Null), Record::new());
        assert_eq!(into_record(json!("ok")), params(json!({"value": "ok"})));
        assert_eq!(into_record(json!(3)), params(json!({"value": 3})));
    }

    #[tokio::test]
    async fn get_returns_response_as_single_record() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/api/part/5", 200, json!({"id": 5, "num": "A100"}));
        let executor = executor(&transport);

        let records = executor
            .execute("part", "get", &params(json!({"partId": 5})), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records, vec![params(json!({"id": 5, "num": "A100"}))]);
    }

    #[tokio::test]
    async fn limited_listing_truncates_to_limit() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Get,
            "/api/vendor",
            200,
            json!({"vendors": [{"id": 1}, {"id": 2}, {"id": 3}]}),
        );
        let executor = executor(&transport);

        let records = executor
            .execute("vendor", "getAll", &params(json!({"limit": 2})), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn inventory_summary_totals_quantities() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Get,
            "/api/part/5/inventory",
            200,
            json!([{"qty": 3, "qtyAvailable": 2}, {"qty": 4, "qtyAvailable": "n/a"}]),
        );
        let executor = executor(&transport);

        let records = executor
            .execute(
                "part",
                "getInventory",
                &params(json!({"partId": 5})),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["totalQuantity"], json!(7));
        assert_eq!(records[0]["totalAvailable"], json!(2));
        assert_eq!(records[0]["locations"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn delete_emits_confirmation() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Delete, "/api/sales-order/9", 200, Value::Null);
        let executor = executor(&transport);

        let records = executor
            .execute("salesOrder", "delete", &params(json!({"soId": 9})), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(records, vec![params(json!({"success": true, "soId": 9}))]);
        assert_eq!(transport.count(HttpMethod::Delete, "/api/sales-order/9"), 1);
    }

    #[tokio::test]
    async fn unknown_resource_is_rejected_before_any_call() {
        let transport = Arc::new(ScriptedTransport::new());
        let executor = executor(&transport);

        let err = executor
            .execute("warehouse", "get", &Record::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, FishbowlError::UnknownOperation("Unknown resource: warehouse".into()));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn batch_continue_on_fail_records_errors_inline() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/api/part/1", 200, json!({"id": 1}));
        transport.respond(HttpMethod::Get, "/api/part/3", 200, json!({"id": 3}));
        let executor = executor(&transport);
        let items =
            vec![params(json!({"partId": 1})), params(json!({})), params(json!({"partId": 3}))];

        let records = executor
            .execute_batch(
                "part",
                "get",
                &items,
                ExecuteOptions { continue_on_fail: true },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![
                params(json!({"id": 1})),
                params(json!({
                    "error": "Validation error: Missing required parameter: partId",
                    "item": 1
                })),
                params(json!({"id": 3})),
            ]
        );
    }

    #[tokio::test]
    async fn batch_without_continue_on_fail_stops_at_first_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/api/part/1", 500, json!({"message": "down"}));
        let executor = executor(&transport);
        let items = vec![params(json!({"partId": 1})), params(json!({"partId": 2}))];

        let err = executor
            .execute_batch(
                "part",
                "get",
                &items,
                ExecuteOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, FishbowlError::upstream(500, "down"));
        assert_eq!(transport.count(HttpMethod::Get, "/api/part/2"), 0);
    }

    #[tokio::test]
    async fn cancelled_batch_is_not_swallowed_by_continue_on_fail() {
        let transport = Arc::new(ScriptedTransport::new());
        let executor = executor(&transport);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = executor
            .execute_batch(
                "part",
                "get",
                &[params(json!({"partId": 1}))],
                ExecuteOptions { continue_on_fail: true },
                &cancel,
            )
            .await
            .unwrap_err();

        assert_eq!(err, FishbowlError::Cancelled);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn cancelled_execute_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/api/part/5", 200, json!({"id": 5}));
        let executor = executor(&transport);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = executor
            .execute("part", "get", &params(json!({"partId": 5})), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err, FishbowlError::Cancelled);
        assert!(transport.requests().is_empty());
    }
}
