//! Resolution of "auto" dimensions
//!
//! A field declared as `auto` takes its value from a relative of the
//! component. Each field searches its own scope:
//!
//! | field | scope |
//! |---|---|
//! | body tube `radius` | parent's children, any `radius` / `aftradius` |
//! | nose cone `aftradius` | next sibling, if it is a body tube |
//! | centering ring `innerradius` | parent's children, first `innertube` |
//! | ring / bulkhead / coupler `outerradius` | radius of the enclosing tube |
//!
//! Lookups return `None` when nothing in scope carries a numeric value;
//! [`AutoPolicy`] decides what happens then.

use crate::document::DocNode;
use crate::import::ImportError;

/// Radius of a body tube declared `auto`: the first numeric `radius` or
/// `aftradius` among the components sharing its parent.
pub fn body_tube_radius(siblings: &[DocNode]) -> Option<f64> {
    siblings.iter().find_map(|sibling| {
        sibling
            .children
            .iter()
            .filter(|field| field.name == "radius" || field.name == "aftradius")
            .find_map(numeric)
    })
}

/// Aft radius of a nose cone declared `auto`: the radius of the body tube
/// directly following it.
pub fn nose_aft_radius(siblings: &[DocNode], index: usize) -> Option<f64> {
    siblings
        .get(index + 1)
        .filter(|next| next.name == "bodytube")
        .and_then(|tube| tube.child("radius"))
        .and_then(numeric)
}

/// Inner radius of a centering ring declared `auto`: the outer radius of the
/// first inner tube sharing its parent.
pub fn ring_inner_radius(siblings: &[DocNode]) -> Option<f64> {
    siblings
        .iter()
        .filter(|sibling| sibling.name == "innertube")
        .find_map(|tube| tube.child("outerradius").and_then(numeric))
}

fn numeric(field: &DocNode) -> Option<f64> {
    field.text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// What to do with an "auto" field that could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPolicy {
    /// Substitute 0 and log a warning
    ZeroDefault,
    /// Abort the import
    Strict,
}

impl AutoPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::ZeroDefault }
    }

    /// Settle a lookup result into a concrete value
    pub fn settle(
        self,
        found: Option<f64>,
        component: &str,
        field: &str,
    ) -> Result<Settled, ImportError> {
        match (found, self) {
            (Some(value), _) => Ok(Settled::Resolved(value)),
            (None, Self::ZeroDefault) => {
                tracing::warn!("No value found for auto <{}> on {}, using 0", field, component);
                Ok(Settled::Defaulted)
            }
            (None, Self::Strict) => Err(ImportError::UnresolvedAuto {
                component: component.to_string(),
                field: field.to_string(),
            }),
        }
    }
}

/// Outcome of settling an "auto" field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Settled {
    Resolved(f64),
    /// Nothing in scope, 0 substituted
    Defaulted,
}

impl Settled {
    pub fn value(self) -> f64 {
        match self {
            Self::Resolved(value) => value,
            Self::Defaulted => 0.0,
        }
    }
}
