//! Attribute-namespace builder and device lifecycle for counting
//! peripherals.
//!
//! A driver describes its hardware as a [`counterd_types::Device`] — the
//! Signals it observes, the Counts that accumulate them, the Synapses
//! linking the two, and any extension attributes — then registers it:
//!
//! ```text
//! [driver model] ──> [NamespaceBuilder] ──> [groups of endpoints]
//!                           │                        │
//!                    validate/rollback        [NamespaceHost]
//!                                                    │
//!                                        external readers/writers
//! ```
//!
//! Registration is all-or-nothing: either the complete namespace is
//! published under a fresh instance id, or everything already constructed
//! is unwound before the error surfaces. Final resource release is
//! deferred to the host's release callback, so an in-flight read or write
//! always completes against valid memory.
//!
//! # Key components
//!
//! - [`NamespaceBuilder`]: walks a device into named attribute groups
//! - [`EnumExt`](enum_adapter::EnumExt): generic enum attribute adapter
//! - [`DeviceRegistration`] / [`ScopedRegistration`]: lifecycle management
//! - [`dispatch`]: the read/write thunks the host invokes
//! - [`NamespaceHost`]: the contract the hosting layer implements

pub mod dispatch;
pub mod enum_adapter;
pub mod host;
pub mod lifecycle;
pub mod namespace;

pub use enum_adapter::EnumExt;
pub use host::{HostHandle, NamespaceHost, ReleaseFn};
pub use lifecycle::{
    instance_ids, DeviceNode, DeviceRegistration, InstanceIdAllocator, LifecycleState,
    ScopedRegistration,
};
pub use namespace::{AttributeGroup, BuilderLimits, Component, Endpoint, NamespaceBuilder};
