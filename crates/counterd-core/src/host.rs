//! The namespace-host contract.
//!
//! The host is the external layer that actually exposes endpoints to
//! readers and writers; the core consumes it through this narrow trait.

use crate::lifecycle::{instance_ids, DeviceNode};
use counterd_types::CounterResult;
use std::sync::Arc;

/// Opaque token identifying one published device inside a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostHandle(pub u64);

/// The deferred-release callback handed to the host on publish.
pub type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Contract between the device lifecycle manager and the hosting
/// namespace layer.
///
/// The id methods have provided implementations backed by the process-wide
/// allocator; hosts may override them (tests use this to stay hermetic).
pub trait NamespaceHost: Send + Sync {
    /// Allocates a fresh instance id, never reused while its device is
    /// live.
    fn allocate_id(&self) -> CounterResult<u32> {
        instance_ids().allocate()
    }

    /// Returns an instance id to the pool.
    fn release_id(&self, id: u32) {
        instance_ids().release(id)
    }

    /// Makes the node's endpoints visible to external callers, under the
    /// node's path and the optional parent path.
    ///
    /// The host retains the `Arc` for as long as any dispatch may occur.
    fn publish(&self, node: &Arc<DeviceNode>, parent: Option<&str>) -> CounterResult<HostHandle>;

    /// Removes the device from the namespace. Synchronous from the
    /// caller's point of view; backing memory is released later, once the
    /// host drops its last reference.
    fn unpublish(&self, handle: HostHandle);

    /// Registers the deferred-release callback for a published device.
    ///
    /// The host must invoke it exactly once, after `unpublish` and after
    /// dropping its last reference to the node; no dispatch may be started
    /// once it has run.
    fn on_final_release(&self, handle: HostHandle, release: ReleaseFn);
}
