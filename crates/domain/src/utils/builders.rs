//! Payload builders for Fishbowl entities
//!
//! Each builder picks the fields Fishbowl understands out of a loose
//! parameter map, nests id references the way the API expects them and
//! returns a cleaned object.

use serde_json::{Number, Value};

use super::dates::format_date;
use super::object::{clean_object, is_truthy, reference, truthy};
use crate::errors::{FishbowlError, Result};
use crate::types::Record;

const TRUTHY_FILTERS: [&str; 11] = [
    "number",
    "description",
    "locationId",
    "locationGroupId",
    "status",
    "customerId",
    "vendorId",
    "partId",
    "dateFrom",
    "dateTo",
    "modifiedAfter",
];

const PART_NUMERIC_FIELDS: [&str; 7] =
    ["cost", "weight", "stdCost", "avgCost", "len", "width", "height"];

/// Copy the list filters Fishbowl accepts. `active` is copied whenever it
/// is present so that `false` can be sent.
pub fn build_filter_query(filters: &Record) -> Record {
    let mut query = Record::new();

    for key in TRUTHY_FILTERS {
        copy_truthy(filters, &mut query, key);
    }
    if let Some(active) = filters.get("active") {
        query.insert("active".into(), active.clone());
    }

    query
}

/// Address object from flat params, empty fields dropped.
pub fn build_address(params: &Record) -> Record {
    let mut address = Record::new();
    for key in ["name", "address", "city", "state", "zip", "country"] {
        copy_truthy(params, &mut address, key);
    }
    address
}

/// Part body from flat params.
pub fn build_part_object(params: &Record) -> Record {
    let mut part = Record::new();

    for key in ["partNumber", "description", "partType", "abcCode"] {
        copy_truthy(params, &mut part, key);
    }

    if let Some(id) = truthy(params, "uomId") {
        part.insert("uom".into(), reference(id));
    } else if let Some(name) = truthy(params, "uomName") {
        part.insert("uom".into(), named("name", name));
    }

    if let Some(id) = truthy(params, "defaultLocationId") {
        part.insert("defaultLocation".into(), reference(id));
    } else if let Some(name) = truthy(params, "defaultLocationName") {
        part.insert("defaultLocation".into(), named("name", name));
    }

    if let Some(id) = truthy(params, "defaultVendorId") {
        part.insert("defaultVendor".into(), reference(id));
    }

    for key in PART_NUMERIC_FIELDS {
        copy_present(params, &mut part, key);
    }
    copy_present(params, &mut part, "trackingFlag");
    copy_present(params, &mut part, "active");

    copy_truthy(params, &mut part, "details");
    copy_truthy(params, &mut part, "alertNote");

    clean_object(&part)
}

/// Common order payload for sales, purchase and manufacture orders.
///
/// `order_type` is the number-field prefix: `so`, `po` or `mo`.
pub fn build_order_object(params: &Record, order_type: &str) -> Result<Record> {
    let mut order = Record::new();

    copy_truthy(params, &mut order, &format!("{order_type}Num"));
    copy_truthy(params, &mut order, "status");

    if let Some(id) = truthy(params, "customerId") {
        order.insert("customer".into(), reference(id));
    } else if let Some(name) = truthy(params, "customerName") {
        order.insert("customer".into(), named("name", name));
    }

    if let Some(id) = truthy(params, "vendorId") {
        order.insert("vendor".into(), reference(id));
    } else if let Some(name) = truthy(params, "vendorName") {
        order.insert("vendor".into(), named("name", name));
    }

    for key in ["dateScheduled", "dateExpired", "dateConfirmed"] {
        if let Some(date) = truthy(params, key) {
            order.insert(key.into(), Value::String(format_date(date)?));
        }
    }

    if let Some(id) = truthy(params, "carrierId") {
        order.insert("carrier".into(), reference(id));
    }

    copy_present(params, &mut order, "priorityId");
    copy_present(params, &mut order, "priority");
    copy_truthy(params, &mut order, "note");

    if let Some(items) = truthy(params, "orderItems") {
        let items = match items {
            Value::String(text) => Value::Array(parse_order_items(text)?),
            other => other.clone(),
        };
        order.insert("orderItems".into(), items);
    }

    Ok(clean_object(&order))
}

/// One order line item from flat params.
pub fn build_line_item(params: &Record) -> Record {
    let mut item = Record::new();

    if let Some(id) = truthy(params, "partId") {
        item.insert("part".into(), reference(id));
    } else if let Some(number) = truthy(params, "partNumber") {
        item.insert("part".into(), named("partNumber", number));
    }

    for key in ["qty", "qtyFulfilled", "unitPrice", "totalPrice", "discount"] {
        copy_present(params, &mut item, key);
    }
    copy_truthy(params, &mut item, "description");
    copy_present(params, &mut item, "taxable");
    copy_present(params, &mut item, "taxRate");

    if let Some(id) = truthy(params, "uomId") {
        item.insert("uom".into(), reference(id));
    }

    clean_object(&item)
}

/// Parse a JSON array of order items supplied as text.
pub fn parse_order_items(items_json: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(items_json) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(FishbowlError::Validation("Order items must be an array".into())),
        Err(err) => Err(FishbowlError::Validation(format!("Invalid order items JSON: {err}"))),
    }
}

/// Sum `qty` and `qtyAvailable` across inventory rows.
///
/// Missing or non-numeric quantities count as zero. Integer totals stay
/// integers.
pub fn format_inventory_response(inventory: Vec<Value>) -> Record {
    let mut total_quantity = QuantitySum::default();
    let mut total_available = QuantitySum::default();

    for row in &inventory {
        total_quantity.add(row.get("qty"));
        total_available.add(row.get("qtyAvailable"));
    }

    let mut summary = Record::new();
    summary.insert("totalQuantity".into(), total_quantity.into_value());
    summary.insert("totalAvailable".into(), total_available.into_value());
    summary.insert("locations".into(), Value::Array(inventory));
    summary
}

#[derive(Default)]
struct QuantitySum {
    integer: i64,
    float: f64,
    fractional: bool,
}

impl QuantitySum {
    fn add(&mut self, value: Option<&Value>) {
        let Some(Value::Number(number)) = value else {
            return;
        };
        if let Some(whole) = number.as_i64() {
            self.integer = self.integer.saturating_add(whole);
        } else if let Some(real) = number.as_f64() {
            self.float += real;
            self.fractional = true;
        }
    }

    fn into_value(self) -> Value {
        if self.fractional {
            #[allow(clippy::cast_precision_loss)]
            let total = self.float + self.integer as f64;
            Number::from_f64(total).map_or(Value::from(0), Value::Number)
        } else {
            Value::from(self.integer)
        }
    }
}

fn copy_truthy(source: &Record, target: &mut Record, key: &str) {
    if let Some(value) = source.get(key).filter(|value| is_truthy(value)) {
        target.insert(key.to_string(), value.clone());
    }
}

fn copy_present(source: &Record, target: &mut Record, key: &str) {
    if let Some(value) = source.get(key) {
        target.insert(key.to_string(), value.clone());
    }
}

fn named(field: &str, value: &Value) -> Value {
    let mut object = Record::new();
    object.insert(field.to_string(), value.clone());
    Value::Object(object)
}
