//! Whitelist-driven list filters shared by every resource.
//!
//! A request's `filter[...]` parameters are parsed into a
//! [`FilterInput`](crate::parser::FilterInput), checked against the entity's
//! [`EntityFilterSpec`] and rendered into a [`RenderedFilter`] that each
//! database dialect turns into SQL.

pub mod render;
pub mod rule;
pub mod specs;

pub use render::{render_filter, Comparison, FilterValue, Predicate, RenderedFilter};
pub use rule::{EntityFilterSpec, FieldRule, FieldType, FilterField, MatchKind};
