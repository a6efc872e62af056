//! Fishbowl users

use fishbowl_domain::utils::nest_reference;
use fishbowl_domain::{Record, Result};

use super::common::{child_list, merged, Entity};
use super::{ApiCall, Params};

const USER: Entity = Entity { path: "/user", plural: "users", id_param: "userId", lookup: None };

pub fn plan(operation: &str, params: Params<'_>) -> Result<Option<ApiCall>> {
    let call = match operation {
        "get" => USER.get(params)?,
        "getAll" => USER.get_all(params),
        "create" => {
            let mut identity = Record::new();
            for key in ["userName", "firstName", "lastName"] {
                identity.insert(key.into(), params.required(key)?.clone());
            }
            USER.create(with_group(merged(identity, params.cleaned("additionalFields"))))
        }
        "update" => USER.update(params, with_group(params.cleaned("updateFields")))?,
        "delete" => USER.delete(params)?,
        "getPermissions" => USER.children(params, "permissions", child_list("permissions"))?,
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn with_group(fields: Record) -> Record {
    let mut body = fields.clone();
    nest_reference(&mut body, &fields, "userGroupId", "userGroup");
    body
}
