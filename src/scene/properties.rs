//! `Properties70` lookup.
//!
//! Typed object values live in a `Properties70` block of `P` entries:
//!
//! ```text
//! P: "Lcl Translation", "Lcl Translation", "", "A", 1.0, 2.0, 3.0
//!     name              type               label flags values...
//! ```

use std::borrow::Cow;

use crate::format::{Element, Property};
use crate::util::DVec3;

/// Index of the first value in a `P` entry.
pub const VALUE_INDEX: usize = 4;

/// Find the `P` entry named `name` in the element's `Properties70` block.
pub fn find<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element
        .child("Properties70")?
        .children_named("P")
        .find(|p| p.property(0).is_some_and(|n| n.to_str() == name))
}

fn value<'a>(element: &'a Element, name: &str) -> Option<&'a Property> {
    find(element, name)?.property(VALUE_INDEX)
}

pub fn resolve_f64(element: &Element, name: &str, default: f64) -> f64 {
    value(element, name).map_or(default, Property::to_f64)
}

pub fn resolve_i64(element: &Element, name: &str, default: i64) -> i64 {
    value(element, name).map_or(default, Property::to_i64)
}

pub fn resolve_enum(element: &Element, name: &str, default: i32) -> i32 {
    value(element, name).map_or(default, Property::to_i32)
}

pub fn resolve_str<'a>(element: &'a Element, name: &str) -> Option<Cow<'a, str>> {
    value(element, name).map(Property::to_str)
}

/// Three consecutive values; entries with fewer than three fall back to `default`.
pub fn resolve_vec3(element: &Element, name: &str, default: DVec3) -> DVec3 {
    let Some(p) = find(element, name) else { return default };
    match (
        p.property(VALUE_INDEX),
        p.property(VALUE_INDEX + 1),
        p.property(VALUE_INDEX + 2),
    ) {
        (Some(x), Some(y), Some(z)) => DVec3::new(x.to_f64(), y.to_f64(), z.to_f64()),
        _ => default,
    }
}
