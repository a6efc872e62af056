//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Resources, trigger events and similar selectors arrive as camelCase
//! strings (`salesOrder`, `partCreated`). This macro maps each variant to its
//! wire name once and derives both directions from that table.
//!
//! # Example
//!
//! ```rust
//! use fishbowl_domain::{impl_wire_name_conversions, Result};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Direction {
//!     Inbound,
//!     Outbound,
//! }
//!
//! impl_wire_name_conversions!(Direction, "direction" {
//!     Inbound => "inbound",
//!     Outbound => "outbound",
//! });
//!
//! assert_eq!(Direction::Inbound.as_str(), "inbound");
//! assert!("sideways".parse::<Direction>().is_err());
//!
//! fn parse(name: &str) -> Result<Direction> {
//!     name.parse()
//! }
//! assert_eq!(parse("OUTBOUND").ok(), Some(Direction::Outbound));
//! ```

/// Implements `as_str`, Display and FromStr for a selector enum
///
/// This macro generates:
/// - `as_str()`: the wire name of the variant
/// - Display trait: writes the wire name
/// - FromStr trait: matches the wire name (ASCII case-insensitive) and fails
///   with `FishbowlError::UnknownOperation("Unknown {label}: {input}")`
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident, $label:literal { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::FishbowlError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::FishbowlError::UnknownOperation(format!("Unknown {}: {}", $label, s)))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::{FishbowlError, Result};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestResource {
        SalesOrder,
        Uom,
    }

    impl_wire_name_conversions!(TestResource, "resource" {
        SalesOrder => "salesOrder",
        Uom => "uom",
    });

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(TestResource::SalesOrder.to_string(), "salesOrder");
        assert_eq!(TestResource::Uom.as_str(), "uom");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TestResource::from_str("salesOrder").unwrap(), TestResource::SalesOrder);
        assert_eq!(TestResource::from_str("SALESORDER").unwrap(), TestResource::SalesOrder);
        assert_eq!(TestResource::from_str("UOM").unwrap(), TestResource::Uom);
    }

    fn lookup(name: &str) -> Result<TestResource> {
        name.parse()
    }

    #[test]
    fn expands_beside_the_crate_result_alias() {
        assert_eq!(lookup("uom").unwrap(), TestResource::Uom);
        assert!(lookup("bom").is_err());
    }

    #[test]
    fn parse_unknown_names_the_label() {
        let err = TestResource::from_str("invoice").unwrap_err();
        assert_eq!(err, FishbowlError::UnknownOperation("Unknown resource: invoice".into()));
    }
}
