//! Locations and location-level inventory

use fishbowl_domain::utils::{nest_reference, reference};
use fishbowl_domain::{Record, RequestDescriptor, Result};
use serde_json::Value;

use super::common::{field, merged, Entity, Lookup};
use super::{ApiCall, Output, Params};
use crate::envelope::Extract;

const LOCATION: Entity = Entity {
    path: "/location",
    plural: "locations",
    id_param: "locationId",
    lookup: Some(Lookup::Name),
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => LOCATION.get(params)?,
        "getAll" => LOCATION.get_all(params),
        "create" => {
            let name = field("name", params.required("name")?.clone());
            let fields = merged(name, params.cleaned("additionalFields"));
            LOCATION.create(with_references(fields))
        }
        "update" => LOCATION.update(params, with_references(params.cleaned("updateFields")))?,
        "delete" => LOCATION.delete(params)?,
        "getInventory" => get_inventory(params)?,
        "moveAllInventory" => {
            let from = params.required_id("fromLocationId")?;
            let body = merged(
                field("toLocation", reference(params.required("toLocationId")?)),
                params.cleaned("additionalFields"),
            );
            let endpoint = format!("{}/{from}/move-all", LOCATION.path);
            ApiCall::single(RequestDescriptor::post(endpoint).with_body(body))
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn with_references(fields: Record) -> Record {
    let mut body = fields.clone();
    nest_reference(&mut body, &fields, "locationGroupId", "locationGroup");
    nest_reference(&mut body, &fields, "locationTypeId", "locationType");
    body
}

/// Inventory summary; `returnAll` defaults to true here.
fn get_inventory(params: Params<'_>) -> Result<ApiCall> {
    let mut request = RequestDescriptor::get(LOCATION.member(params, "/inventory")?);
    if !params.flag("returnAll", true) {
        request.query.insert("pageSize".into(), Value::from(params.limit()));
        request.query.insert("pageNumber".into(), Value::from(1));
    }
    Ok(ApiCall::single(request).with_output(Output::InventorySummary(vec![
        Extract::BareArray,
        Extract::field("inventory"),
        Extract::field("results"),
        Extract::Empty,
    ])))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn call(operation: &str, params: Value) -> ApiCall {
        let record = params.as_object().cloned().unwrap_or_default();
        plan(operation, Params::new(&record)).unwrap().unwrap()
    }

    #[test]
    fn create_nests_group_and_type() {
        let call = call(
            "create",
            json!({
                "name": "Bin A",
                "additionalFields": {"locationGroupId": 1, "locationTypeId": 2, "parentId": 9}
            }),
        );
        assert_eq!(
            Value::Object(call.request.body),
            json!({
                "name": "Bin A",
                "locationGroup": {"id": 1},
                "locationType": {"id": 2},
                "parentId": 9
            })
        );
    }

    #[test]
    fn inventory_is_unpaged_by_default() {
        let all = call("getInventory", json!({"locationId": 4}));
        assert_eq!(all.request.endpoint, "/location/4/inventory");
        assert!(all.request.query.is_empty());

        let limited =
            call("getInventory", json!({"locationId": 4, "returnAll": false, "limit": 10}));
        assert_eq!(Value::Object(limited.request.query), json!({"pageSize": 10, "pageNumber": 1}));
    }

    #[test]
    fn move_all_posts_to_source_location() {
        let call = call("moveAllInventory", json!({"fromLocationId": 4, "toLocationId": 6}));
        assert_eq!(call.request.endpoint, "/location/4/move-all");
        assert_eq!(Value::Object(call.request.body), json!({"toLocation": {"id": 6}}));
    }
}
