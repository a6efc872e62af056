//! Purchase orders

use fishbowl_domain::utils::{build_order_object, format_date, reference, truthy};
use fishbowl_domain::{Record, Result};
use serde_json::Value;

use super::common::{field, merged, Entity, Lookup};
use super::{ApiCall, Params};

const PURCHASE_ORDER: Entity = Entity {
    path: "/purchase-order",
    plural: "purchaseOrders",
    id_param: "poId",
    lookup: Some(Lookup::Number),
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => PURCHASE_ORDER.get(params)?,
        "getAll" => PURCHASE_ORDER.get_all(params),
        "create" => create(params)?,
        "update" => {
            let body = build_order_object(&params.collection("updateFields"), "po")?;
            PURCHASE_ORDER.update(params, body)?
        }
        "delete" => PURCHASE_ORDER.delete(params)?,
        "issue" | "close" | "void" => PURCHASE_ORDER.action(params, operation)?,
        "receive" => receive(params)?,
        "quickReceive" => {
            let mut body = field("locationId", params.required("locationId")?.clone());
            body.insert("receiveAll".into(), Value::Bool(true));
            PURCHASE_ORDER.post_member(
                params,
                "/quick-receive",
                merged(body, params.cleaned("additionalFields")),
            )?
        }
        "addItem" => PURCHASE_ORDER.add_item(params)?,
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn create(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let vendor = field("vendorId", params.required("vendorId")?.clone());
    let fields = merged(vendor, additional.clone());
    let mut body = build_order_object(&fields, "po")?;

    for key in ["remitToAddress", "shipToAddress"] {
        if let Some(address) = truthy(&additional, key) {
            body.insert(key.into(), address.clone());
        }
    }
    if let Some(buyer) = truthy(&additional, "buyerId") {
        body.insert("buyer".into(), reference(buyer));
    }

    Ok(PURCHASE_ORDER.create(body))
}

/// Receive specific lines: each entry of `items` contributes its `itemId`,
/// `qty` and `locationId`.
fn receive(params: Params<'_>) -> Result<ApiCall> {
    let items: Vec<Value> = params
        .list("items")
        .iter()
        .map(|item| {
            let mut line = Record::new();
            for key in ["itemId", "qty", "locationId"] {
                if let Some(value) = item.get(key) {
                    line.insert(key.into(), value.clone());
                }
            }
            Value::Object(line)
        })
        .collect();

    let additional = params.collection("additionalFields");
    let mut body = merged(field("items", Value::Array(items)), params.cleaned("additionalFields"));
    if let Some(date) = truthy(&additional, "receiveDate") {
        body.insert("receiveDate".into(), Value::String(format_date(date)?));
    }

    PURCHASE_ORDER.post_member(params, "/receive", body)
}
