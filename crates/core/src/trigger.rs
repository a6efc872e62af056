//! Polling trigger
//!
//! Each poll asks Fishbowl for records modified since the stored
//! `lastPollTime` cursor and advances the cursor once the fetch succeeds.
//! "Created" events additionally drop records whose creation date predates
//! the cursor.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use fishbowl_domain::constants::DEFAULT_POLL_LOOKBACK;
use fishbowl_domain::utils::{is_truthy, parse_timestamp, to_iso_string};
use fishbowl_domain::{
    impl_wire_name_conversions, FishbowlError, Record, RequestDescriptor, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::actions::into_record;
use crate::client::FishbowlClient;
use crate::ports::PollStateStore;
use crate::time::Clock;

const CREATED_DATE_FIELDS: [&str; 3] = ["dateCreated", "createdDate", "dateEntered"];

/// Event a trigger listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollEvent {
    /// New sales orders, optionally narrowed by status.
    SalesOrderCreated,
    /// Modified sales orders, optionally narrowed by status.
    SalesOrderUpdated,
    /// Sales orders that reached `Shipped`.
    SalesOrderShipped,
    /// New purchase orders.
    PurchaseOrderCreated,
    /// Purchase orders fully or partially received.
    PurchaseOrderReceived,
    /// New manufacture orders.
    ManufactureOrderCreated,
    /// Manufacture orders fulfilled or closed.
    ManufactureOrderCompleted,
    /// New parts.
    PartCreated,
    /// Modified parts.
    PartUpdated,
    /// New customers.
    CustomerCreated,
    /// New vendors.
    VendorCreated,
    /// Inventory movements, optionally for one location group.
    InventoryChanged,
}

impl_wire_name_conversions!(PollEvent, "event type" {
    SalesOrderCreated => "salesOrderCreated",
    SalesOrderUpdated => "salesOrderUpdated",
    SalesOrderShipped => "salesOrderShipped",
    PurchaseOrderCreated => "purchaseOrderCreated",
    PurchaseOrderReceived => "purchaseOrderReceived",
    ManufactureOrderCreated => "manufactureOrderCreated",
    ManufactureOrderCompleted => "manufactureOrderCompleted",
    PartCreated => "partCreated",
    PartUpdated => "partUpdated",
    CustomerCreated => "customerCreated",
    VendorCreated => "vendorCreated",
    InventoryChanged => "inventoryChanged",
});

impl PollEvent {
    /// Listing endpoint polled for this event.
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::SalesOrderCreated | Self::SalesOrderUpdated | Self::SalesOrderShipped => {
                "/sales-orders"
            }
            Self::PurchaseOrderCreated | Self::PurchaseOrderReceived => "/purchase-orders",
            Self::ManufactureOrderCreated | Self::ManufactureOrderCompleted => {
                "/manufacture-orders"
            }
            Self::PartCreated | Self::PartUpdated => "/parts",
            Self::CustomerCreated => "/customers",
            Self::VendorCreated => "/vendors",
            Self::InventoryChanged => "/inventory",
        }
    }

    /// Whether results are narrowed to records created since the cursor.
    pub const fn is_created_event(self) -> bool {
        matches!(
            self,
            Self::SalesOrderCreated
                | Self::PurchaseOrderCreated
                | Self::ManufactureOrderCreated
                | Self::PartCreated
                | Self::CustomerCreated
                | Self::VendorCreated
        )
    }

    fn query(self, options: &PollOptions, since: &DateTime<Utc>) -> Record {
        let mut query = Record::new();
        query.insert("modifiedAfter".into(), Value::String(to_iso_string(since)));

        let status = match self {
            Self::SalesOrderShipped => Some("Shipped".to_string()),
            Self::PurchaseOrderReceived => Some("Received,PartiallyReceived".to_string()),
            Self::ManufactureOrderCompleted => Some("Fulfilled,Closed".to_string()),
            Self::SalesOrderCreated | Self::SalesOrderUpdated => {
                options.status_filter.clone().filter(|status| !status.is_empty())
            }
            _ => None,
        };
        if let Some(status) = status {
            query.insert("status".into(), Value::String(status));
        }

        if self == Self::InventoryChanged {
            if let Some(group) = options.location_group_id.as_ref().filter(|group| is_truthy(group))
            {
                query.insert("locationGroupId".into(), group.clone());
            }
        }

        query
    }
}

/// Per-trigger options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollOptions {
    /// Status for sales-order created/updated events; empty means all.
    pub status_filter: Option<String>,
    /// Location group for `inventoryChanged`.
    pub location_group_id: Option<Value>,
}

/// Whether the poll runs on a schedule or was started by a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PollMode {
    /// Errors are logged and the poll reports no new data.
    #[default]
    Automatic,
    /// Errors propagate to the caller.
    Manual,
}

/// Polls Fishbowl for changes since the last stored cursor.
pub struct Poller {
    client: FishbowlClient,
    store: Arc<dyn PollStateStore>,
    clock: Arc<dyn Clock>,
}

impl Poller {
    /// Poller storing cursors in `store`.
    pub fn new(
        client: FishbowlClient,
        store: Arc<dyn PollStateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { client, store, clock }
    }

    /// Poll for `event` by wire name.
    ///
    /// # Errors
    /// An unknown event name is always an `UnknownOperation` error; other
    /// failures follow [`PollMode`].
    pub async fn poll(
        &self,
        event: &str,
        options: &PollOptions,
        mode: PollMode,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Record>>> {
        let event: PollEvent = event.parse()?;
        self.poll_event(event, options, mode, cancel).await
    }

    /// Run one poll. `None` means nothing new.
    ///
    /// Cancellation is reported as `Cancelled` in both modes.
    #[instrument(skip_all, fields(event = %event, mode = ?mode))]
    pub async fn poll_event(
        &self,
        event: PollEvent,
        options: &PollOptions,
        mode: PollMode,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Record>>> {
        let client = self.client.with_cancellation(cancel.clone());
        match self.fetch_changes(&client, event, options).await {
            Ok(records) => Ok(records),
            Err(FishbowlError::Cancelled) => Err(FishbowlError::Cancelled),
            Err(err) if mode == PollMode::Automatic => {
                error!(error = %err, "fishbowl_poll_failed");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_changes(
        &self,
        client: &FishbowlClient,
        event: PollEvent,
        options: &PollOptions,
    ) -> Result<Option<Vec<Record>>> {
        let credential = client.credential().await?;
        let key = cursor_key(&credential.cache_key(), event, options);
        let now = self.clock.utc_now();
        let since = match self.store.last_poll_time(&key).await? {
            Some(last) => last,
            None => now - lookback(),
        };

        let request =
            RequestDescriptor::get(event.endpoint()).with_query(event.query(options, &since));
        let items = client.request_all_items(&request, "results").await?;

        self.store.set_last_poll_time(&key, now).await?;
        debug!(items = items.len(), since = %to_iso_string(&since), "fishbowl_poll_fetched");

        let items: Vec<Value> = if event.is_created_event() {
            items.into_iter().filter(|item| created_since(item, &since)).collect()
        } else {
            items
        };

        if items.is_empty() {
            return Ok(None);
        }

        info!(records = items.len(), "fishbowl_poll_emitted");
        Ok(Some(items.into_iter().map(into_record).collect()))
    }
}

/// Cursor key for one trigger: account, event and the options that shape
/// its query.
///
/// `https://fb.test:443:admin#inventoryChanged?locationGroupId=4`
pub fn cursor_key(account: &str, event: PollEvent, options: &PollOptions) -> String {
    let mut key = format!("{account}#{event}");
    let mut scope = Vec::new();
    if matches!(event, PollEvent::SalesOrderCreated | PollEvent::SalesOrderUpdated) {
        if let Some(status) = options.status_filter.as_deref().filter(|status| !status.is_empty()) {
            scope.push(format!("status={status}"));
        }
    }
    if event == PollEvent::InventoryChanged {
        if let Some(group) = options.location_group_id.as_ref().filter(|group| is_truthy(group)) {
            let group = group.as_str().map_or_else(|| group.to_string(), str::to_string);
            scope.push(format!("locationGroupId={group}"));
        }
    }
    if !scope.is_empty() {
        key.push('?');
        key.push_str(&scope.join("&"));
    }
    key
}

fn lookback() -> ChronoDuration {
    ChronoDuration::from_std(DEFAULT_POLL_LOOKBACK).unwrap_or_else(|_| ChronoDuration::seconds(60))
}

/// Items without a creation date are kept; unparsable dates are dropped.
fn created_since(item: &Value, since: &DateTime<Utc>) -> bool {
    let created = CREATED_DATE_FIELDS
        .iter()
        .find_map(|key| item.get(*key).filter(|value| is_truthy(value)));
    match created {
        None => true,
        Some(date) => parse_timestamp(date).is_ok_and(|created| created >= *since),
    }
}

/// Poll cursor kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryPollStateStore {
    cursors: DashMap<String, DateTime<Utc>>,
}

impl MemoryPollStateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStateStore for MemoryPollStateStore {
    async fn last_poll_time(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.cursors.get(key).map(|entry| *entry.value()))
    }

    async fn set_last_poll_time(&self, key: &str, at: DateTime<Utc>) -> Result<()> {
        self.cursors.insert(key.to_string(), at);
        Ok(())
    }
}
