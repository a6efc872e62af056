//! CRUD shapes shared by most resources

use fishbowl_domain::utils::{build_filter_query, build_line_item};
use fishbowl_domain::{Record, RequestDescriptor, Result};
use serde_json::Value;

use super::{ApiCall, Output, Params};
use crate::envelope::Extract;

/// Alternate key for `get`: look the entity up by number or name instead
/// of by id.
#[derive(Debug, Clone, Copy)]
pub(super) enum Lookup {
    Number,
    Name,
}

impl Lookup {
    const fn flag(self) -> &'static str {
        match self {
            Self::Number => "byNumber",
            Self::Name => "byName",
        }
    }

    const fn query_key(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
        }
    }
}

/// Static description of one REST collection.
#[derive(Debug, Clone, Copy)]
pub(super) struct Entity {
    pub path: &'static str,
    pub plural: &'static str,
    pub id_param: &'static str,
    pub lookup: Option<Lookup>,
}

impl Entity {
    /// Id parameter as a path segment.
    pub fn id(&self, params: Params<'_>) -> Result<String> {
        params.required_id(self.id_param)
    }

    /// `/{path}/{id}{suffix}` for the entity named by the id parameter.
    pub fn member(&self, params: Params<'_>, suffix: &str) -> Result<String> {
        Ok(format!("{}/{}{suffix}", self.path, self.id(params)?))
    }

    /// Fetch one entity by id, number or name.
    pub fn get(&self, params: Params<'_>) -> Result<ApiCall> {
        let id = self.id(params)?;
        let endpoint = match self.lookup {
            Some(lookup) if params.flag(lookup.flag(), false) => {
                format!("{}?{}={}", self.path, lookup.query_key(), urlencoding::encode(&id))
            }
            _ => format!("{}/{id}", self.path),
        };
        Ok(ApiCall::single(RequestDescriptor::get(endpoint)))
    }

    /// `getAll` with the standard filter set.
    pub fn get_all(&self, params: Params<'_>) -> ApiCall {
        self.list(params, build_filter_query(&params.collection("filters")))
    }

    /// `getAll` with a prepared filter query.
    pub fn list(&self, params: Params<'_>, mut query: Record) -> ApiCall {
        if params.flag("returnAll", false) {
            let request = RequestDescriptor::get(self.path).with_query(query);
            return ApiCall::all_pages(request, self.plural);
        }

        let limit = params.limit();
        query.insert("pageSize".into(), Value::from(limit));
        query.insert("pageNumber".into(), Value::from(1));
        ApiCall::single(RequestDescriptor::get(self.path).with_query(query)).with_output(
            Output::LimitedItems {
                extract: vec![
                    Extract::field("results"),
                    Extract::field(self.plural),
                    Extract::Empty,
                ],
                limit,
            },
        )
    }

    pub fn create(&self, body: Record) -> ApiCall {
        ApiCall::single(RequestDescriptor::post(self.path).with_body(body))
    }

    pub fn update(&self, params: Params<'_>, body: Record) -> Result<ApiCall> {
        Ok(ApiCall::single(RequestDescriptor::put(self.member(params, "")?).with_body(body)))
    }

    /// Delete by id, confirming with `{success, <idParam>}`.
    pub fn delete(&self, params: Params<'_>) -> Result<ApiCall> {
        let id = params.required(self.id_param)?;
        let request = RequestDescriptor::delete(self.member(params, "")?);
        let confirmed = confirmation([(self.id_param, id)]);
        Ok(ApiCall::single(request).with_output(Output::Confirmation(confirmed)))
    }

    /// Bodiless `POST /{path}/{id}/{action}` (issue, void, close, ...).
    pub fn action(&self, params: Params<'_>, action: &str) -> Result<ApiCall> {
        Ok(ApiCall::single(RequestDescriptor::post(self.member(params, &format!("/{action}"))?)))
    }

    /// `POST /{path}/{id}/{suffix}` with a body.
    pub fn post_member(&self, params: Params<'_>, suffix: &str, body: Record) -> Result<ApiCall> {
        Ok(ApiCall::single(RequestDescriptor::post(self.member(params, suffix)?).with_body(body)))
    }

    /// `GET /{path}/{id}/{child}` listing `child` sub-records.
    pub fn children(
        &self,
        params: Params<'_>,
        child: &str,
        extract: Vec<Extract>,
    ) -> Result<ApiCall> {
        let request = RequestDescriptor::get(self.member(params, &format!("/{child}"))?);
        Ok(ApiCall::items(request, extract))
    }

    /// `POST /{path}/{id}/items` with a line item built from `partId`, `qty`
    /// and `additionalFields`.
    pub fn add_item(&self, params: Params<'_>) -> Result<ApiCall> {
        let mut fields = field("partId", params.required("partId")?.clone());
        fields.insert("qty".into(), params.required("qty")?.clone());
        let fields = merged(fields, params.collection("additionalFields"));
        self.post_member(params, "/items", build_line_item(&fields))
    }

    /// `DELETE /{path}/{id}/items/{itemId}`.
    pub fn remove_item(&self, params: Params<'_>) -> Result<ApiCall> {
        let order_id = params.required(self.id_param)?;
        let item_id = params.required("itemId")?;
        let endpoint =
            self.member(params, &format!("/items/{}", params.required_id("itemId")?))?;
        let confirmation = confirmation([(self.id_param, order_id), ("itemId", item_id)]);
        Ok(ApiCall::single(RequestDescriptor::delete(endpoint))
            .with_output(Output::Confirmation(confirmation)))
    }
}

/// `{success: true, ...ids}` emitted for calls whose response is discarded.
pub(super) fn confirmation<const N: usize>(ids: [(&str, &Value); N]) -> Record {
    let mut record = Record::new();
    record.insert("success".into(), Value::Bool(true));
    for (key, value) in ids {
        record.insert(key.to_string(), value.clone());
    }
    record
}

/// Extraction for `/{child}` listings: bare array, else the named field,
/// else nothing.
pub(super) fn child_list(field: &str) -> Vec<Extract> {
    vec![Extract::BareArray, Extract::field(field), Extract::Empty]
}

/// Extraction for filtered cross-resource lookups.
pub(super) fn result_list(field: &str) -> Vec<Extract> {
    vec![Extract::field("results"), Extract::field(field), Extract::Empty]
}

/// `{base, ...extra}` where `extra` keys overwrite `base`.
pub(super) fn merged(mut base: Record, extra: Record) -> Record {
    base.extend(extra);
    base
}

/// Single-entry record.
pub(super) fn field(key: &str, value: Value) -> Record {
    let mut record = Record::new();
    record.insert(key.to_string(), value);
    record
}
