//! The published unit: one device, its instance id, and its groups.

use crate::dispatch;
use crate::namespace::{AttributeGroup, Endpoint};
use counterd_types::{CounterError, CounterResult, Device};
use std::sync::Arc;

/// A fully built device namespace as handed to the host.
///
/// The node owns the builder's output for the device's entire registered
/// lifetime; the host keeps it alive (by `Arc`) until no further dispatch
/// can occur, at which point the deferred release callback runs and the
/// last references drop. `read`/`write` are the dispatch entry points the
/// host invokes on behalf of external callers.
#[derive(Debug)]
pub struct DeviceNode {
    instance_id: u32,
    device: Arc<Device>,
    groups: Vec<AttributeGroup>,
}

impl DeviceNode {
    pub(crate) fn new(instance_id: u32, device: Arc<Device>, groups: Vec<AttributeGroup>) -> Self {
        Self {
            instance_id,
            device,
            groups,
        }
    }

    /// Returns the device's unique instance id.
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Returns the externally visible device path segment (`counter<id>`).
    pub fn path(&self) -> String {
        format!("counter{}", self.instance_id)
    }

    /// Returns the entity model.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Returns the attribute groups in build order.
    pub fn groups(&self) -> &[AttributeGroup] {
        &self.groups
    }

    /// Looks up a group by name (`None` is the device-root group).
    ///
    /// Duplicate group names (duplicate driver-chosen ids) resolve to the
    /// most recently built group.
    pub fn group(&self, name: Option<&str>) -> Option<&AttributeGroup> {
        self.groups.iter().rev().find(|g| g.name.as_deref() == name)
    }

    /// Looks up an endpoint within a group.
    pub fn endpoint(&self, group: Option<&str>, name: &str) -> Option<&Endpoint> {
        self.group(group)?.endpoint(name)
    }

    /// Reads an endpoint on behalf of an external caller.
    pub fn read(&self, group: Option<&str>, name: &str) -> CounterResult<String> {
        let endpoint = self
            .endpoint(group, name)
            .ok_or_else(|| CounterError::not_found(attr_path(group, name)))?;
        dispatch::read_endpoint(&self.device, endpoint)
    }

    /// Writes an endpoint on behalf of an external caller.
    pub fn write(&self, group: Option<&str>, name: &str, buf: &str) -> CounterResult<usize> {
        let endpoint = self
            .endpoint(group, name)
            .ok_or_else(|| CounterError::not_found(attr_path(group, name)))?;
        dispatch::write_endpoint(&self.device, endpoint, buf)
    }
}

fn attr_path(group: Option<&str>, name: &str) -> String {
    match group {
        Some(group) => format!("{group}/{name}"),
        None => name.to_string(),
    }
}
