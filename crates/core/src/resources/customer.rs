//! Customers, their addresses, contacts and orders

use fishbowl_domain::utils::{build_address, build_filter_query, nest_reference, truthy};
use fishbowl_domain::{Record, RequestDescriptor, Result};

use super::common::{child_list, field, merged, result_list, Entity, Lookup};
use super::{ApiCall, Params};

const CUSTOMER: Entity = Entity {
    path: "/customer",
    plural: "customers",
    id_param: "customerId",
    lookup: Some(Lookup::Name),
};

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => CUSTOMER.get(params)?,
        "getAll" => CUSTOMER.list(params, list_filters(&params.collection("filters"))),
        "create" => {
            let name = field("name", params.required("name")?.clone());
            let fields = merged(name, params.cleaned("additionalFields"));
            CUSTOMER.create(with_references(fields))
        }
        "update" => CUSTOMER.update(params, with_references(params.cleaned("updateFields")))?,
        "delete" => CUSTOMER.delete(params)?,
        "getAddresses" => CUSTOMER.children(params, "addresses", child_list("addresses"))?,
        "addAddress" => add_address(params)?,
        "getContacts" => CUSTOMER.children(params, "contacts", child_list("contacts"))?,
        "addContact" => {
            let name = field("name", params.required("contactName")?.clone());
            let body = merged(name, params.cleaned("contactFields"));
            CUSTOMER.post_member(params, "/contacts", body)?
        }
        "getOrders" => {
            let mut query = build_filter_query(&params.collection("filters"));
            query.insert("customerId".into(), params.required("customerId")?.clone());
            let request = RequestDescriptor::get("/sales-order").with_query(query);
            ApiCall::items(request, result_list("salesOrders"))
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

/// Standard filters plus `activeOnly` (sent as `active`) and `name`.
fn list_filters(filters: &Record) -> Record {
    let mut query = build_filter_query(filters);
    if let Some(active) = filters.get("activeOnly").filter(|value| !value.is_null()) {
        query.insert("active".into(), active.clone());
    }
    if let Some(name) = truthy(filters, "name") {
        query.insert("name".into(), name.clone());
    }
    query
}

fn with_references(fields: Record) -> Record {
    let mut body = fields.clone();
    nest_reference(&mut body, &fields, "defaultCarrierId", "defaultCarrier");
    nest_reference(&mut body, &fields, "defaultSalesmanId", "defaultSalesman");
    body
}

fn add_address(params: Params<'_>) -> Result<ApiCall> {
    let fields = params.collection("addressFields");
    let named = merged(field("name", params.required("addressName")?.clone()), fields.clone());
    let mut body = build_address(&named);

    if let Some(default) = fields.get("default").filter(|value| !value.is_null()) {
        body.insert("default".into(), default.clone());
    }
    if let Some(kind) = truthy(&fields, "type") {
        body.insert("type".into(), kind.clone());
    }

    CUSTOMER.post_member(params, "/addresses", body)
}
