//! Resource mappers
//!
//! Each resource module turns `(operation, params)` into an [`ApiCall`]: the
//! request to send, how to fetch it and how to shape the response into
//! output records. Mappers never touch the network, so every mapping can be
//! tested without a transport.

mod common;
pub mod params;

pub mod customer;
pub mod import_export;
pub mod location;
pub mod location_group;
pub mod manufacture_order;
pub mod part;
pub mod payment;
pub mod purchase_order;
pub mod sales_order;
pub mod uom;
pub mod user;
pub mod vendor;

use fishbowl_domain::{impl_wire_name_conversions, FishbowlError, Record, RequestDescriptor, Result};

pub use self::params::Params;
use crate::envelope::Extract;

/// Fishbowl resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Parts and their inventory.
    Part,
    /// Sales orders, shipping included.
    SalesOrder,
    /// Purchase orders, receiving included.
    PurchaseOrder,
    /// Customers with addresses and contacts.
    Customer,
    /// Vendors with addresses and contacts.
    Vendor,
    /// Manufacture orders.
    ManufactureOrder,
    /// Stock locations.
    Location,
    /// Groups of locations.
    LocationGroup,
    /// Units of measure and conversions.
    Uom,
    /// Fishbowl users.
    User,
    /// Payments against orders.
    Payment,
    /// Bulk imports, exports and custom queries.
    ImportExport,
}

impl_wire_name_conversions!(Resource, "resource" {
    Part => "part",
    SalesOrder => "salesOrder",
    PurchaseOrder => "purchaseOrder",
    Customer => "customer",
    Vendor => "vendor",
    ManufactureOrder => "manufactureOrder",
    Location => "location",
    LocationGroup => "locationGroup",
    Uom => "uom",
    User => "user",
    Payment => "payment",
    ImportExport => "importExport",
});

impl Resource {
    /// Every resource, in wire-name order.
    pub const ALL: [Self; 12] = [
        Self::Part,
        Self::SalesOrder,
        Self::PurchaseOrder,
        Self::Customer,
        Self::Vendor,
        Self::ManufactureOrder,
        Self::Location,
        Self::LocationGroup,
        Self::Uom,
        Self::User,
        Self::Payment,
        Self::ImportExport,
    ];
}

/// How the request is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    /// One call.
    Single,
    /// Walk every page, extracting items from `results` or `property`.
    AllPages { property: String },
}

/// How a response becomes output records.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The response is a single record.
    Response,
    /// One record per extracted item.
    Items(Vec<Extract>),
    /// At most `limit` extracted items.
    LimitedItems { extract: Vec<Extract>, limit: usize },
    /// Quantity totals over the extracted inventory rows.
    InventorySummary(Vec<Extract>),
    /// Ignore the response body and emit this record.
    Confirmation(Record),
}

/// A fully mapped action, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub request: RequestDescriptor,
    pub fetch: Fetch,
    pub output: Output,
}

impl ApiCall {
    /// Single call whose response is the output record.
    pub fn single(request: RequestDescriptor) -> Self {
        Self { request, fetch: Fetch::Single, output: Output::Response }
    }

    /// Single call producing one record per extracted item.
    pub fn items(request: RequestDescriptor, extract: Vec<Extract>) -> Self {
        Self { request, fetch: Fetch::Single, output: Output::Items(extract) }
    }

    /// Every page of a listing; the concatenated items are the output.
    pub fn all_pages(request: RequestDescriptor, property: &str) -> Self {
        Self {
            request,
            fetch: Fetch::AllPages { property: property.to_string() },
            output: Output::Items(vec![Extract::BareArray]),
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }
}

/// Map `operation` on `resource` with `params` to an [`ApiCall`].
///
/// # Errors
/// - `UnknownOperation` when the resource has no such operation
/// - `Validation` for missing or malformed parameters
pub fn plan(resource: Resource, operation: &str, params: &Record) -> Result<ApiCall> {
    let params = Params::new(params);
    let call = match resource {
        Resource::Part => part::plan(operation, params)?,
        Resource::SalesOrder => sales_order::plan(operation, params)?,
        Resource::PurchaseOrder => purchase_order::plan(operation, params)?,
        Resource::Customer => customer::plan(operation, params)?,
        Resource::Vendor => vendor::plan(operation, params)?,
        Resource::ManufactureOrder => manufacture_order::plan(operation, params)?,
        Resource::Location => location::plan(operation, params)?,
        Resource::LocationGroup => location_group::plan(operation, params)?,
        Resource::Uom => uom::plan(operation, params)?,
        Resource::User => user::plan(operation, params)?,
        Resource::Payment => payment::plan(operation, params)?,
        Resource::ImportExport => import_export::plan(operation, params)?,
    };
    call.ok_or_else(|| unknown_operation(resource, operation))
}

fn unknown_operation(resource: Resource, operation: &str) -> FishbowlError {
    FishbowlError::UnknownOperation(format!(
        "Unknown operation: {operation} for resource {resource}"
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resource_names_parse_case_insensitively() {
        assert_eq!("salesOrder".parse::<Resource>().unwrap(), Resource::SalesOrder);
        assert_eq!("IMPORTEXPORT".parse::<Resource>().unwrap(), Resource::ImportExport);
        assert_eq!(
            "widget".parse::<Resource>().unwrap_err(),
            FishbowlError::UnknownOperation("Unknown resource: widget".into())
        );
    }

    #[test]
    fn every_resource_rejects_unknown_operations() {
        let params = json!({"partId": 1}).as_object().cloned().unwrap();
        for resource in Resource::ALL {
            let err = plan(resource, "teleport", &params).unwrap_err();
            assert_eq!(
                err,
                FishbowlError::UnknownOperation(format!(
                    "Unknown operation: teleport for resource {resource}"
                ))
            );
        }
    }
}
