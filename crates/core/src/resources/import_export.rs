//! Bulk import, report export and custom queries

use fishbowl_domain::utils::{format_date, truthy};
use fishbowl_domain::{FishbowlError, RequestDescriptor, Result};
use serde_json::Value;

use super::common::{field, merged};
use super::{ApiCall, Params};
use crate::envelope::Extract;

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "importSalesOrder" => import(params, "sales-order", "salesOrder")?,
        "importPurchaseOrder" => import(params, "purchase-order", "purchaseOrder")?,
        "importProducts" => import(params, "product", "product")?,
        "importCustomers" => import(params, "customer", "customer")?,
        "exportInventory" => export(params, "/export/inventory")?,
        "exportSalesReport" => export(params, "/export/sales")?,
        "runCustomQuery" => {
            let query = field("query", params.required("query")?.clone());
            let body = merged(query, params.cleaned("options"));
            ApiCall::items(
                RequestDescriptor::post("/query").with_body(body),
                vec![
                    Extract::BareArray,
                    Extract::field("results"),
                    Extract::field("data"),
                    Extract::Whole,
                ],
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn import(params: Params<'_>, path: &str, import_type: &str) -> Result<ApiCall> {
    let data = match params.required("data")? {
        Value::String(text) => serde_json::from_str::<Value>(text)
            .map_err(|_| FishbowlError::Validation("Invalid JSON data for import".into()))?,
        structured => structured.clone(),
    };

    let mut body = field("importType", Value::String(import_type.to_string()));
    body.insert("data".into(), data);
    let body = merged(body, params.cleaned("options"));

    Ok(ApiCall::single(RequestDescriptor::post(format!("/import/{path}")).with_body(body)))
}

fn export(params: Params<'_>, endpoint: &str) -> Result<ApiCall> {
    let filters = params.collection("filters");
    let mut query = merged(
        field("format", params.required("exportFormat")?.clone()),
        params.cleaned("filters"),
    );
    for key in ["dateFrom", "dateTo"] {
        if let Some(date) = truthy(&filters, key) {
            query.insert(key.into(), Value::String(format_date(date)?));
        }
    }
    Ok(ApiCall::single(RequestDescriptor::get(endpoint).with_query(query)))
}
