//! Location groups

use fishbowl_domain::{RequestDescriptor, Result};
use serde_json::Value;

use super::common::{field, merged, result_list, Entity};
use super::{ApiCall, Params};

const LOCATION_GROUP: Entity = Entity {
    path: "/location-group",
    plural: "locationGroups",
    id_param: "locationGroupId",
    lookup: None,
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => LOCATION_GROUP.get(params)?,
        "getAll" => LOCATION_GROUP.get_all(params),
        "create" => {
            let name = field("name", params.required("name")?.clone());
            LOCATION_GROUP.create(merged(name, params.cleaned("additionalFields")))
        }
        "update" => LOCATION_GROUP.update(params, params.cleaned("updateFields"))?,
        "delete" => LOCATION_GROUP.delete(params)?,
        "getLocations" => {
            let mut query = field("locationGroupId", params.required("locationGroupId")?.clone());
            if !params.flag("returnAll", true) {
                query.insert("pageSize".into(), Value::from(params.limit()));
                query.insert("pageNumber".into(), Value::from(1));
            }
            let request = RequestDescriptor::get("/location").with_query(query);
            ApiCall::items(request, result_list("locations"))
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
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
    fn get_ignores_lookup_flags() {
        let call = call("get", json!({"locationGroupId": 2, "byName": true}));
        assert_eq!(call.request.endpoint, "/location-group/2");
    }

    #[test]
    fn locations_in_group() {
        let all = call("getLocations", json!({"locationGroupId": 2}));
        assert_eq!(all.request.endpoint, "/location");
        assert_eq!(Value::Object(all.request.query), json!({"locationGroupId": 2}));

        let paged = call("getLocations", json!({"locationGroupId": 2, "returnAll": false}));
        assert_eq!(
            Value::Object(paged.request.query),
            json!({"locationGroupId": 2, "pageSize": 50, "pageNumber": 1})
        );
    }

    #[test]
    fn update_sends_cleaned_fields() {
        let update_fields = json!({"name": "East", "description": ""});
        let call = call("update", json!({"locationGroupId": 2, "updateFields": update_fields}));
        assert_eq!(call.request.endpoint, "/location-group/2");
        assert_eq!(Value::Object(call.request.body), json!({"name": "East"}));
    }
}
