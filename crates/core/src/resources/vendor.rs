//! Vendors

use fishbowl_domain::utils::{build_address, build_filter_query, nest_reference, truthy};
use fishbowl_domain::{Record, RequestDescriptor, Result};

use super::common::{child_list, field, merged, result_list, Entity, Lookup};
use super::{ApiCall, Params};

const VENDOR: Entity =
    Entity { path: "/vendor", plural: "vendors", id_param: "vendorId", lookup: Some(Lookup::Name) };

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => VENDOR.get(params)?,
        "getAll" => VENDOR.get_all(params),
        "create" => {
            let name = field("name", params.required("name")?.clone());
            let fields = merged(name, params.cleaned("additionalFields"));
            let mut body = with_references(fields.clone());
            nest_reference(&mut body, &fields, "defaultShipTermsId", "defaultShipTerms");
            VENDOR.create(body)
        }
        "update" => VENDOR.update(params, with_references(params.cleaned("updateFields")))?,
        "delete" => VENDOR.delete(params)?,
        "getAddresses" => VENDOR.children(params, "addresses", child_list("addresses"))?,
        "addAddress" => add_address(params)?,
        "getContacts" => VENDOR.children(params, "contacts", child_list("contacts"))?,
        "addContact" => VENDOR.post_member(params, "/contacts", params.cleaned("contactFields"))?,
        "getPurchaseOrders" => {
            let mut query = build_filter_query(&params.collection("filters"));
            query.insert("vendorId".into(), params.required("vendorId")?.clone());
            ApiCall::items(
                RequestDescriptor::get("/purchase-order").with_query(query),
                result_list("purchaseOrders"),
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn with_references(fields: Record) -> Record {
    let mut body = fields.clone();
    nest_reference(&mut body, &fields, "defaultPaymentTermsId", "defaultPaymentTerms");
    nest_reference(&mut body, &fields, "defaultCarrierId", "defaultCarrier");
    body
}

fn add_address(params: Params<'_>) -> Result<ApiCall> {
    let fields = params.collection("addressFields");
    let mut body = build_address(&fields);

    if let Some(is_default) = fields.get("isDefault").filter(|value| !value.is_null()) {
        body.insert("isDefault".into(), is_default.clone());
    }
    if let Some(kind) = truthy(&fields, "type") {
        body.insert("type".into(), kind.clone());
    }

    VENDOR.post_member(params, "/addresses", body)
}
