//! Units of measure and their conversions

use fishbowl_domain::utils::reference;
use fishbowl_domain::{Record, Result};

use super::common::{child_list, field, merged, Entity};
use super::{ApiCall, Params};

const UOM: Entity = Entity { path: "/uom", plural: "uoms", id_param: "uomId", lookup: None };

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => UOM.get(params)?,
        "getAll" => UOM.get_all(params),
        "create" => {
            let mut body = Record::new();
            for key in ["name", "abbreviation", "type"] {
                body.insert(key.into(), params.required(key)?.clone());
            }
            UOM.create(merged(body, params.cleaned("additionalFields")))
        }
        "update" => UOM.update(params, params.cleaned("updateFields"))?,
        "delete" => UOM.delete(params)?,
        "getConversions" => UOM.children(params, "conversions", child_list("conversions"))?,
        "addConversion" => {
            let mut body = field("toUom", reference(params.required("toUomId")?));
            body.insert("factor".into(), params.required("factor")?.clone());
            let body = merged(body, params.cleaned("additionalFields"));
            UOM.post_member(params, "/conversions", body)?
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}
