//! Payments

use fishbowl_domain::utils::{format_date, nest_reference, truthy};
use fishbowl_domain::{RequestDescriptor, Result};
use serde_json::Value;

use super::common::{field, merged, result_list, Entity};
use super::{ApiCall, Params};

const PAYMENT: Entity =
    Entity { path: "/payment", plural: "payments", id_param: "paymentId", lookup: None };

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => PAYMENT.get(params)?,
        "getAll" => PAYMENT.get_all(params),
        "create" => create(params)?,
        "update" => update(params)?,
        "delete" => PAYMENT.delete(params)?,
        "getByOrder" => {
            let order_id = params.required("orderId")?.clone();
            let key = match params.get("orderType").and_then(Value::as_str) {
                Some("salesOrder") => "salesOrderId",
                _ => "purchaseOrderId",
            };
            ApiCall::items(
                RequestDescriptor::get(PAYMENT.path).with_query(field(key, order_id)),
                result_list("payments"),
            )
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn create(params: Params<'_>) -> Result<ApiCall> {
    let additional = params.collection("additionalFields");
    let mut body = field("amount", params.required("amount")?.clone());
    body.insert("paymentDate".into(), Value::String(format_date(params.required("paymentDate")?)?));
    let mut body = merged(body, params.cleaned("additionalFields"));

    nest_reference(&mut body, &additional, "paymentTypeId", "paymentType");
    nest_reference(&mut body, &additional, "salesOrderId", "salesOrder");
    nest_reference(&mut body, &additional, "purchaseOrderId", "purchaseOrder");

    Ok(PAYMENT.create(body))
}

fn update(params: Params<'_>) -> Result<ApiCall> {
    let fields = params.collection("updateFields");
    let mut body = params.cleaned("updateFields");

    if let Some(date) = truthy(&fields, "paymentDate") {
        body.insert("paymentDate".into(), Value::String(format_date(date)?));
    }
    nest_reference(&mut body, &fields, "paymentTypeId", "paymentType");

    PAYMENT.update(params, body)
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
    fn create_formats_date_and_nests_order_references() {
        let call = call(
            "create",
            json!({
                "amount": 125.5,
                "paymentDate": "2024-03-15T12:00:00Z",
                "additionalFields": {"paymentTypeId": 1, "salesOrderId": 77}
            }),
        );

        assert_eq!(
            Value::Object(call.request.body),
            json!({
                "amount": 125.5,
                "paymentDate": "2024-03-15",
                "paymentType": {"id": 1},
                "salesOrder": {"id": 77}
            })
        );
    }

    #[test]
    fn by_order_picks_query_key_from_order_type() {
        let sales = call("getByOrder", json!({"orderType": "salesOrder", "orderId": 5}));
        assert_eq!(sales.request.endpoint, "/payment");
        assert_eq!(Value::Object(sales.request.query), json!({"salesOrderId": 5}));

        let purchase = call("getByOrder", json!({"orderType": "purchaseOrder", "orderId": 6}));
        assert_eq!(Value::Object(purchase.request.query), json!({"purchaseOrderId": 6}));
    }

    #[test]
    fn update_formats_date() {
        let update_fields = json!({"paymentDate": "2024-01-09", "memo": ""});
        let call = call("update", json!({"paymentId": 2, "updateFields": update_fields}));
        assert_eq!(call.request.endpoint, "/payment/2");
        assert_eq!(Value::Object(call.request.body), json!({"paymentDate": "2024-01-09"}));
    }
}
