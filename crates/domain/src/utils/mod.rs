//! Pure helpers for shaping Fishbowl payloads

pub mod builders;
pub mod dates;
pub mod object;

pub use builders::{
    build_address, build_filter_query, build_line_item, build_order_object, build_part_object,
    format_inventory_response, parse_order_items,
};
pub use dates::{format_date, format_date_time, parse_timestamp, parse_timestamp_str, to_iso_string};
pub use object::{
    clean_object, is_blank, is_truthy, nest_reference, query_pairs, reference, scalar_to_string,
    truthy, validate_required,
};
