//! Attribute namespace: dispatch contexts, endpoints, groups, and the
//! transactional builder that produces them from a device description.

mod builder;
mod types;

pub use builder::{BuilderLimits, NamespaceBuilder};
pub use types::{AttributeGroup, Component, Endpoint};
