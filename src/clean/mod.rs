//! Optional cleaning passes over an extracted metadata map.
//!
//! - [`keys`] — canonicalize raw tag names to snake_case via the column map
//! - [`values`] — coerce string values to typed primitives
//!
//! Both passes are pure: they consume a map and produce a new one.

pub mod keys;
pub mod values;
