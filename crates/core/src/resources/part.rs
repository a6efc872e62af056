//! Parts, their inventory and tracking

use fishbowl_domain::utils::{build_part_object, reference, truthy};
use fishbowl_domain::{Record, RequestDescriptor, Result};
use serde_json::json;

use super::common::{field, merged, Entity, Lookup};
use super::{ApiCall, Output, Params};
use crate::envelope::Extract;

const PART: Entity =
    Entity { path: "/part", plural: "parts", id_param: "partId", lookup: Some(Lookup::Number) };

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => PART.get(params)?,
        "getAll" => PART.get_all(params),
        "create" => create(params)?,
        "update" => PART.update(params, build_part_object(&params.collection("updateFields")))?,
        "delete" => PART.delete(params)?,
        "getInventory" => get_inventory(params)?,
        "addInventory" => add_inventory(params)?,
        "cycleInventory" => {
            PART.post_member(params, "/cycle-count", located_quantity(params, "locationId")?)?
        }
        "moveInventory" => move_inventory(params)?,
        "scrapInventory" => scrap_inventory(params)?,
        "getTracking" => PART.children(
            params,
            "tracking",
            vec![Extract::BareArray, Extract::field("tracking"), Extract::Whole],
        )?,
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn create(params: Params<'_>) -> Result<ApiCall> {
    let mut fields = Record::new();
    for key in ["partNumber", "description", "partType"] {
        fields.insert(key.into(), params.required(key)?.clone());
    }
    let fields = merged(fields, params.collection("additionalFields"));
    Ok(PART.create(build_part_object(&fields)))
}

fn get_inventory(params: Params<'_>) -> Result<ApiCall> {
    let mut request = RequestDescriptor::get(PART.member(params, "/inventory")?);
    if let Some(group) = params.get("locationGroupId") {
        request.query.insert("locationGroupId".into(), group.clone());
    }
    Ok(ApiCall::single(request).with_output(Output::InventorySummary(vec![
        Extract::BareArray,
        Extract::field("inventory"),
        Extract::Whole,
    ])))
}

/// `{location: {id}, qty, ...additionalFields}`.
fn located_quantity(params: Params<'_>, location_key: &str) -> Result<Record> {
    let mut body = field("location", reference(params.required(location_key)?));
    body.insert("qty".into(), params.required("qty")?.clone());
    Ok(merged(body, params.cleaned("additionalFields")))
}

fn add_inventory(params: Params<'_>) -> Result<ApiCall> {
    let mut body = located_quantity(params, "locationId")?;
    let additional = params.collection("additionalFields");
    if let Some(tracking_number) = truthy(&additional, "trackingNumber") {
        body.insert("tracking".into(), json!({ "trackingNumber": tracking_number }));
    }
    PART.post_member(params, "/inventory", body)
}

fn move_inventory(params: Params<'_>) -> Result<ApiCall> {
    let mut body = field("fromLocation", reference(params.required("fromLocationId")?));
    body.insert("toLocation".into(), reference(params.required("toLocationId")?));
    body.insert("qty".into(), params.required("qty")?.clone());
    PART.post_member(params, "/move", merged(body, params.cleaned("additionalFields")))
}

fn scrap_inventory(params: Params<'_>) -> Result<ApiCall> {
    let mut body = located_quantity(params, "locationId")?;
    if let Some(reason) = params.get("reason") {
        body.insert("reason".into(), reason.clone());
    }
    PART.post_member(params, "/scrap", body)
}

#[cfg(test)]
mod tests {
    use fishbowl_domain::{FishbowlError, HttpMethod};
    use serde_json::Value;

    use super::*;
    use crate::resources::Fetch;

    fn call(operation: &str, params: Value) -> ApiCall {
        let record = params.as_object().cloned().unwrap_or_default();
        plan(operation, Params::new(&record)).unwrap().unwrap()
    }

    #[test]
    fn get_by_id_hits_member_path() {
        let call = call("get", json!({"partId": 5}));
        assert_eq!(call.request, RequestDescriptor::get("/part/5"));
        assert_eq!(call.fetch, Fetch::Single);
    }

    #[test]
    fn create_requires_identity_fields() {
        let record = json!({"partNumber": "A100", "description": "Widget"});
        let record = record.as_object().cloned().unwrap();
        let err = plan("create", Params::new(&record)).unwrap_err();
        assert_eq!(err, FishbowlError::Validation("Missing required parameter: partType".into()));
    }

    #[test]
    fn create_builds_part_payload() {
        let call = call(
            "create",
            json!({
                "partNumber": "A100",
                "description": "Widget",
                "partType": "Inventory",
                "additionalFields": {"uomId": 1, "cost": 0, "details": ""}
            }),
        );

        assert_eq!(call.request.method, HttpMethod::Post);
        assert_eq!(call.request.endpoint, "/part");
        assert_eq!(
            Value::Object(call.request.body),
            json!({
                "partNumber": "A100",
                "description": "Widget",
                "partType": "Inventory",
                "uom": {"id": 1},
                "cost": 0
            })
        );
    }

    #[test]
    fn inventory_lookup_summarises_rows() {
        let call = call("getInventory", json!({"partId": 5, "locationGroupId": 2}));

        assert_eq!(call.request.endpoint, "/part/5/inventory");
        assert_eq!(call.request.query.get("locationGroupId"), Some(&json!(2)));
        assert!(matches!(call.output, Output::InventorySummary(_)));
    }

    #[test]
    fn add_inventory_nests_location_and_tracking() {
        let call = call(
            "addInventory",
            json!({
                "partId": 5,
                "locationId": 3,
                "qty": 10,
                "additionalFields": {"trackingNumber": "LOT-9", "note": "restock", "cost": 0}
            }),
        );

        assert_eq!(call.request.endpoint, "/part/5/inventory");
        assert_eq!(
            Value::Object(call.request.body),
            json!({
                "location": {"id": 3},
                "qty": 10,
                "trackingNumber": "LOT-9",
                "note": "restock",
                "cost": 0,
                "tracking": {"trackingNumber": "LOT-9"}
            })
        );
    }

    #[test]
    fn move_inventory_uses_both_locations() {
        let call = call(
            "moveInventory",
            json!({"partId": 5, "fromLocationId": 1, "toLocationId": 2, "qty": 4}),
        );

        assert_eq!(call.request.endpoint, "/part/5/move");
        assert_eq!(
            Value::Object(call.request.body),
            json!({"fromLocation": {"id": 1}, "toLocation": {"id": 2}, "qty": 4})
        );
    }

    #[test]
    fn scrap_and_cycle_count_paths() {
        let scrap = call(
            "scrapInventory",
            json!({"partId": 5, "locationId": 1, "qty": 1, "reason": "Damaged"}),
        );
        assert_eq!(scrap.request.endpoint, "/part/5/scrap");
        assert_eq!(scrap.request.body.get("reason"), Some(&json!("Damaged")));

        let cycle = call("cycleInventory", json!({"partId": 5, "locationId": 1, "qty": 0}));
        assert_eq!(cycle.request.endpoint, "/part/5/cycle-count");
        assert_eq!(cycle.request.body.get("qty"), Some(&json!(0)));
    }
}
