//! Page-walking helper for list endpoints
//!
//! Starts at page 1 with 100 items per page and keeps going while the
//! response declares `totalPages` and the next page number is within it.
//! A response without `totalPages` ends the walk after the first page.

use fishbowl_domain::constants::PAGE_SIZE;
use fishbowl_domain::{Record, RequestDescriptor, Result};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::FishbowlClient;
use crate::envelope::{extract_items, Extract};

/// Position within a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: Option<u64>,
}

impl PageCursor {
    pub const fn first() -> Self {
        Self { page_number: 1, page_size: PAGE_SIZE, total_pages: None }
    }

    fn apply(&self, query: &mut Record) {
        query.insert("pageNumber".into(), Value::from(self.page_number));
        query.insert("pageSize".into(), Value::from(self.page_size));
    }

    /// Move to the next page; `false` once the listing is exhausted.
    fn advance(&mut self) -> bool {
        self.page_number += 1;
        matches!(self.total_pages, Some(total) if self.page_number <= total)
    }
}

impl FishbowlClient {
    /// Fetch every page of a listing and concatenate the items in page order.
    ///
    /// Items are taken from `results`, then `property`, then the whole
    /// response. Caller-supplied `pageNumber`/`pageSize` are overridden.
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint, property = property))]
    pub async fn request_all_items(
        &self,
        request: &RequestDescriptor,
        property: &str,
    ) -> Result<Vec<Value>> {
        let strategies = [Extract::field("results"), Extract::field(property), Extract::Whole];
        let mut cursor = PageCursor::first();
        let mut items = Vec::new();

        loop {
            let mut page_request = request.clone();
            cursor.apply(&mut page_request.query);

            let response = self.request(&page_request).await?;
            let page_items = extract_items(&response, &strategies);
            cursor.total_pages = total_pages(&response);

            debug!(
                page = cursor.page_number,
                page_items = page_items.len(),
                total_pages = ?cursor.total_pages,
                "fishbowl_page_fetched"
            );
            items.extend(page_items);

            if !cursor.advance() {
                break;
            }
        }

        Ok(items)
    }
}

/// `totalPages` when present and positive; numeric strings are accepted.
fn total_pages(response: &Value) -> Option<u64> {
    let total = match response.get("totalPages")? {
        Value::Number(number) => number.as_u64().or_else(|| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            number.as_f64().filter(|n| *n >= 1.0).map(|n| n.floor() as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (total > 0).then_some(total)
}
