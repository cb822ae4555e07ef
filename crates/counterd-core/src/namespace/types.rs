//! Namespace building blocks: dispatch contexts, endpoints, groups.

use counterd_types::{Count, CountExt, DeviceExt, Signal, SignalExt, Synapse};
use std::sync::Arc;

/// The dispatch context bound to one endpoint.
///
/// Each variant identifies which entity (and which of its facets) the
/// endpoint reads or writes. Dispatch is a match over this enum; there is
/// no untyped context anywhere in the namespace.
#[derive(Debug, Clone)]
pub enum Component {
    /// The per-Signal `signal` level endpoint.
    SignalValue(Arc<Signal>),
    /// A driver-defined Signal extension attribute.
    SignalExtension {
        signal: Arc<Signal>,
        ext: Arc<SignalExt>,
    },
    /// The per-Count `count` value endpoint.
    CountValue(Arc<Count>),
    /// The per-Count `function` mode endpoint.
    CountFunction(Arc<Count>),
    /// The per-Count `function_available` listing.
    CountFunctionAvailable(Arc<Count>),
    /// The per-Count `synapses` listing.
    CountSynapses(Arc<Count>),
    /// A per-Synapse `signal<id>_action` mode endpoint.
    SynapseAction {
        count: Arc<Count>,
        synapse: Arc<Synapse>,
    },
    /// A per-Synapse `signal<id>_action_available` listing.
    SynapseActionAvailable(Arc<Synapse>),
    /// A driver-defined Count extension attribute.
    CountExtension {
        count: Arc<Count>,
        ext: Arc<CountExt>,
    },
    /// A driver-defined device extension attribute.
    DeviceExtension(Arc<DeviceExt>),
    /// A constant name endpoint (Signal, Count, or device name).
    Name(String),
    /// A constant numeric endpoint (`num_signals`, `num_counts`).
    Size(usize),
}

/// One named, independently readable/writable unit in the namespace.
///
/// `readable`/`writable` are fixed at build time from the presence of the
/// corresponding driver accessor; the host uses them for access modes and
/// dispatch rejects the absent direction with `Unsupported`.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: String,
    pub readable: bool,
    pub writable: bool,
    pub component: Component,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(
        name: impl Into<String>,
        readable: bool,
        writable: bool,
        component: Component,
    ) -> Self {
        Self {
            name: name.into(),
            readable,
            writable,
            component,
        }
    }
}

/// A named collection of endpoints for one Signal, one Count, or the
/// device root (`name == None`).
#[derive(Debug, Clone)]
pub struct AttributeGroup {
    pub name: Option<String>,
    pub endpoints: Vec<Endpoint>,
}

impl AttributeGroup {
    /// Creates an empty group.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            endpoints: Vec::new(),
        }
    }

    /// Looks up an endpoint by name.
    ///
    /// Duplicate names are a driver error the builder does not detect;
    /// lookups resolve to the most recently built match ("last registered
    /// wins").
    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().rev().find(|e| e.name == name)
    }

    /// Returns the endpoint names in build order.
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup_last_wins() {
        let mut group = AttributeGroup::new(Some("signal0".to_string()));
        group
            .endpoints
            .push(Endpoint::new("dup", true, false, Component::Size(1)));
        group
            .endpoints
            .push(Endpoint::new("dup", true, false, Component::Size(2)));

        let found = group.endpoint("dup").unwrap();
        assert!(matches!(found.component, Component::Size(2)));
        assert!(group.endpoint("missing").is_none());
    }

    #[test]
    fn test_endpoint_names_in_order() {
        let mut group = AttributeGroup::new(None);
        group
            .endpoints
            .push(Endpoint::new("num_signals", true, false, Component::Size(1)));
        group
            .endpoints
            .push(Endpoint::new("num_counts", true, false, Component::Size(1)));
        assert_eq!(group.endpoint_names(), vec!["num_signals", "num_counts"]);
    }
}
