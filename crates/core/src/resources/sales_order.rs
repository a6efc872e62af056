//! Sales orders

use fishbowl_domain::utils::{build_order_object, clean_object, format_date, reference, truthy};
use fishbowl_domain::{Record, Result};
use serde_json::Value;

use super::common::{field, merged, Entity, Lookup};
use super::{ApiCall, Params};

const SALES_ORDER: Entity = Entity {
    path: "/sales-order",
    plural: "salesOrders",
    id_param: "soId",
    lookup: Some(Lookup::Number),
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => SALES_ORDER.get(params)?,
        "getAll" => SALES_ORDER.get_all(params),
        "create" => create(params)?,
        "update" => {
            let body = build_order_object(&params.collection("updateFields"), "so")?;
            SALES_ORDER.update(params, body)?
        }
        "delete" => SALES_ORDER.delete(params)?,
        "issue" => SALES_ORDER.action(params, "issue")?,
        "void" => SALES_ORDER.action(params, "void")?,
        "ship" => ship(params)?,
        "quickShip" => {
            let auto_pick = field("autoPick", Value::Bool(true));
            let body = merged(auto_pick, params.cleaned("additionalFields"));
            SALES_ORDER.post_member(params, "/quick-ship", body)?
        }
        "addItem" => SALES_ORDER.add_item(params)?,
        "removeItem" => SALES_ORDER.remove_item(params)?,
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn create(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let customer = field("customerId", params.required("customerId")?.clone());
    let fields = merged(customer, additional.clone());
    let mut body = build_order_object(&fields, "so")?;

    for key in ["billToAddress", "shipToAddress"] {
        if let Some(address) = truthy(&additional, key) {
            body.insert(key.into(), address.clone());
        }
    }
    if let Some(salesman) = truthy(&additional, "salesmanId") {
        body.insert("salesman".into(), reference(salesman));
    }

    Ok(SALES_ORDER.create(body))
}

fn ship(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let mut body = Record::new();

    if let Some(carrier) = truthy(&additional, "carrierId") {
        body.insert("carrier".into(), reference(carrier));
    }
    if let Some(tracking) = truthy(&additional, "trackingNumber") {
        body.insert("trackingNumber".into(), tracking.clone());
    }
    if let Some(date) = truthy(&additional, "shipDate") {
        body.insert("shipDate".into(), Value::String(format_date(date)?));
    }
    if let Some(note) = truthy(&additional, "note") {
        body.insert("note".into(), note.clone());
    }

    SALES_ORDER.post_member(params, "/ship", clean_object(&body))
}
