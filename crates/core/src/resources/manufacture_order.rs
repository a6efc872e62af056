//! Manufacture orders

use fishbowl_domain::utils::{format_date, nest_reference, reference, truthy};
use fishbowl_domain::{Record, Result};
use serde_json::Value;

use super::common::{field, merged, Entity, Lookup};
use super::{ApiCall, Params};

const MANUFACTURE_ORDER: Entity = Entity {
    path: "/manufacture-order",
    plural: "manufactureOrders",
    id_param: "moId",
    lookup: Some(Lookup::Number),
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => MANUFACTURE_ORDER.get(params)?,
        "getAll" => MANUFACTURE_ORDER.get_all(params),
        "create" => create(params)?,
        "update" => {
            let fields = params.collection("updateFields");
            let mut body = params.cleaned("updateFields");
            nest_reference(&mut body, &fields, "locationId", "location");
            format_dates(&mut body, &fields, &["dateScheduled", "dateStarted", "dateFinished"])?;
            MANUFACTURE_ORDER.update(params, body)?
        }
        "delete" => MANUFACTURE_ORDER.delete(params)?,
        "issue" | "close" | "void" => MANUFACTURE_ORDER.action(params, operation)?,
        "build" => build(params)?,
        "addItem" => MANUFACTURE_ORDER.add_item(params)?,
        "removeItem" => MANUFACTURE_ORDER.remove_item(params)?,
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn create(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let mut body = field("part", reference(params.required("partId")?));
    body.insert("quantity".into(), params.required("quantity")?.clone());
    let mut body = merged(body, params.cleaned("additionalFields"));

    nest_reference(&mut body, &additional, "locationId", "location");
    nest_reference(&mut body, &additional, "bomId", "bom");
    format_dates(&mut body, &additional, &["dateScheduled"])?;

    Ok(MANUFACTURE_ORDER.create(body))
}

/// Record a build; `quantity` is only sent when positive.
fn build(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let mut body = params.cleaned("additionalFields");

    let quantity = params.number_or("quantity", 0.0);
    if quantity > 0.0 {
        if let Some(value) = params.get("quantity") {
            body.insert("quantity".into(), value.clone());
        }
    }
    nest_reference(&mut body, &additional, "locationId", "location");
    format_dates(&mut body, &additional, &["dateFinished"])?;

    MANUFACTURE_ORDER.post_member(params, "/build", body)
}

fn format_dates(body: &mut Record, source: &Record, keys: &[&str]) -> Result<()> {
    for key in keys {
        if let Some(date) = truthy(source, key) {
            body.insert((*key).to_string(), Value::String(format_date(date)?));
        }
    }
    Ok(())
}
