//! Attribute namespace builder.
//!
//! Walks one [`Device`] and produces the ordered groups of endpoints the
//! lifecycle manager hands to the namespace host: one `signal<id>` group
//! per Signal, one `count<id>` group per Count, and a trailing unnamed
//! device-root group. The build is transactional: it either returns the
//! complete set of groups or unwinds everything already constructed before
//! surfacing the error.

use crate::namespace::{AttributeGroup, Component, Endpoint};
use counterd_types::{CounterError, CounterResult, Device};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Capacity limits applied while building.
///
/// `max_endpoints` bounds the total endpoint count across all groups;
/// exceeding it aborts the build with `ResourceExhausted`. The default is
/// unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderLimits {
    pub max_endpoints: Option<usize>,
}

/// Transforms one [`Device`] into its attribute groups.
pub struct NamespaceBuilder<'a> {
    device: &'a Device,
    limits: BuilderLimits,
}

impl<'a> NamespaceBuilder<'a> {
    /// Creates a builder for `device` with unlimited capacity.
    pub fn new(device: &'a Device) -> Self {
        Self {
            device,
            limits: BuilderLimits::default(),
        }
    }

    /// Applies capacity limits.
    pub fn with_limits(mut self, limits: BuilderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Checks the structural invariants of the entity graph.
    ///
    /// Called by [`build`](Self::build) and by the registration path
    /// before any allocation, so an invalid model is rejected without
    /// consuming an instance id.
    pub fn validate(device: &Device) -> CounterResult<()> {
        if device.signals.is_empty() {
            warn!("Signals undefined");
            return Err(CounterError::invalid_model("device declares no Signals"));
        }
        if device.counts.is_empty() {
            warn!("Counts undefined");
            return Err(CounterError::invalid_model("device declares no Counts"));
        }
        for count in &device.counts {
            if count.functions.is_empty() {
                warn!(count = count.id, "function modes undefined");
                return Err(CounterError::invalid_model(format!(
                    "count {}: no function modes",
                    count.id
                )));
            }
            if count.synapses.is_empty() {
                warn!(count = count.id, "Synapses undefined");
                return Err(CounterError::invalid_model(format!(
                    "count {}: no Synapses",
                    count.id
                )));
            }
            for (i, synapse) in count.synapses.iter().enumerate() {
                if synapse.actions.is_empty() {
                    warn!(
                        count = count.id,
                        signal = synapse.signal.id,
                        "action modes undefined"
                    );
                    return Err(CounterError::invalid_model(format!(
                        "count {}: synapse {} (signal {}): no action modes",
                        count.id, i, synapse.signal.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the complete, ordered group set.
    ///
    /// On any failure every endpoint and group constructed so far is
    /// released — endpoints innermost-first, groups in reverse
    /// construction order — before the error is returned.
    pub fn build(self) -> CounterResult<Vec<AttributeGroup>> {
        Self::validate(self.device)?;

        let mut tx = BuildTransaction::new(self.limits);
        self.signal_groups(&mut tx)?;
        self.count_groups(&mut tx)?;
        self.device_group(&mut tx)?;
        Ok(tx.commit())
    }

    fn signal_groups(&self, tx: &mut BuildTransaction) -> CounterResult<()> {
        let ops = &self.device.ops;
        for signal in &self.device.signals {
            tx.open_group(Some(format!("signal{}", signal.id)));
            tx.add(Endpoint::new(
                "signal",
                ops.signal_read.is_some(),
                false,
                Component::SignalValue(signal.clone()),
            ))?;
            if let Some(name) = &signal.name {
                tx.add(Endpoint::new(
                    "name",
                    true,
                    false,
                    Component::Name(name.clone()),
                ))?;
            }
            for ext in &signal.ext {
                tx.add(Endpoint::new(
                    ext.name.clone(),
                    ext.read.is_some(),
                    ext.write.is_some(),
                    Component::SignalExtension {
                        signal: signal.clone(),
                        ext: ext.clone(),
                    },
                ))?;
            }
        }
        Ok(())
    }

    fn count_groups(&self, tx: &mut BuildTransaction) -> CounterResult<()> {
        let ops = &self.device.ops;
        for count in &self.device.counts {
            tx.open_group(Some(format!("count{}", count.id)));

            for synapse in &count.synapses {
                let prefix = format!("signal{}_", synapse.signal.id);
                tx.add(Endpoint::new(
                    format!("{prefix}action"),
                    ops.action_get.is_some(),
                    ops.action_set.is_some(),
                    Component::SynapseAction {
                        count: count.clone(),
                        synapse: synapse.clone(),
                    },
                ))?;
                tx.add(Endpoint::new(
                    format!("{prefix}action_available"),
                    true,
                    false,
                    Component::SynapseActionAvailable(synapse.clone()),
                ))?;
            }

            tx.add(Endpoint::new(
                "count",
                ops.count_read.is_some(),
                ops.count_write.is_some(),
                Component::CountValue(count.clone()),
            ))?;
            tx.add(Endpoint::new(
                "function",
                ops.function_get.is_some(),
                ops.function_set.is_some(),
                Component::CountFunction(count.clone()),
            ))?;
            tx.add(Endpoint::new(
                "function_available",
                true,
                false,
                Component::CountFunctionAvailable(count.clone()),
            ))?;
            tx.add(Endpoint::new(
                "synapses",
                true,
                false,
                Component::CountSynapses(count.clone()),
            ))?;
            if let Some(name) = &count.name {
                tx.add(Endpoint::new(
                    "name",
                    true,
                    false,
                    Component::Name(name.clone()),
                ))?;
            }
            for ext in &count.ext {
                tx.add(Endpoint::new(
                    ext.name.clone(),
                    ext.read.is_some(),
                    ext.write.is_some(),
                    Component::CountExtension {
                        count: count.clone(),
                        ext: ext.clone(),
                    },
                ))?;
            }
        }
        Ok(())
    }

    fn device_group(&self, tx: &mut BuildTransaction) -> CounterResult<()> {
        tx.open_group(None);
        if let Some(name) = &self.device.name {
            tx.add(Endpoint::new(
                "name",
                true,
                false,
                Component::Name(name.clone()),
            ))?;
        }
        tx.add(Endpoint::new(
            "num_signals",
            true,
            false,
            Component::Size(self.device.signals.len()),
        ))?;
        tx.add(Endpoint::new(
            "num_counts",
            true,
            false,
            Component::Size(self.device.counts.len()),
        ))?;
        for ext in &self.device.ext {
            tx.add(Endpoint::new(
                ext.name.clone(),
                ext.read.is_some(),
                ext.write.is_some(),
                Component::DeviceExtension(ext.clone()),
            ))?;
        }
        Ok(())
    }
}

/// Tracks groups under construction and unwinds them unless committed.
struct BuildTransaction {
    limits: BuilderLimits,
    sealed: Vec<AttributeGroup>,
    current: Option<AttributeGroup>,
    endpoints_built: usize,
    committed: bool,
}

impl BuildTransaction {
    fn new(limits: BuilderLimits) -> Self {
        Self {
            limits,
            sealed: Vec::new(),
            current: None,
            endpoints_built: 0,
            committed: false,
        }
    }

    fn open_group(&mut self, name: Option<String>) {
        self.seal_current();
        self.current = Some(AttributeGroup::new(name));
    }

    fn seal_current(&mut self) {
        if let Some(group) = self.current.take() {
            self.sealed.push(group);
        }
    }

    fn add(&mut self, endpoint: Endpoint) -> CounterResult<()> {
        if let Some(max) = self.limits.max_endpoints {
            if self.endpoints_built >= max {
                return Err(CounterError::resource_exhausted(format!(
                    "endpoint slots ({max})"
                )));
            }
        }
        let group = self
            .current
            .as_mut()
            .ok_or_else(|| CounterError::internal("endpoint added outside a group"))?;
        group.endpoints.push(endpoint);
        self.endpoints_built += 1;
        Ok(())
    }

    fn commit(mut self) -> Vec<AttributeGroup> {
        self.seal_current();
        self.committed = true;
        std::mem::take(&mut self.sealed)
    }
}

impl Drop for BuildTransaction {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Unwind: endpoints innermost-first, then groups newest-first.
        if let Some(mut group) = self.current.take() {
            while group.endpoints.pop().is_some() {}
        }
        while let Some(mut group) = self.sealed.pop() {
            while group.endpoints.pop().is_some() {}
        }
        debug!(
            endpoints = self.endpoints_built,
            "namespace build rolled back"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterd_types::{
        ActionKind, Count, CountValue, DeviceExt, DeviceOps, FunctionKind, Signal, SignalLevel,
        Synapse,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// One Signal (id 3), one Count (id 0) listening to it.
    fn quadrature_device() -> Device {
        let signal = Arc::new(Signal::new(3));
        Device::new()
            .with_signal(signal.clone())
            .with_count(
                Count::new(0, vec![FunctionKind::Increase]).with_synapse(Synapse::new(
                    signal,
                    vec![ActionKind::RisingEdge, ActionKind::FallingEdge],
                )),
            )
            .with_ops(
                DeviceOps::new()
                    .with_signal_read(|_| Ok(SignalLevel::Low))
                    .with_count_read(|_| Ok(CountValue::Unsigned(0)))
                    .with_function_get(|_| Ok(0))
                    .with_action_get(|_, _| Ok(0)),
            )
    }

    #[test]
    fn test_group_and_endpoint_names() {
        let device = quadrature_device();
        let groups = NamespaceBuilder::new(&device).build().unwrap();

        assert_eq!(groups.len(), 3);

        assert_eq!(groups[0].name.as_deref(), Some("signal3"));
        assert_eq!(groups[0].endpoint_names(), vec!["signal"]);

        assert_eq!(groups[1].name.as_deref(), Some("count0"));
        assert_eq!(
            groups[1].endpoint_names(),
            vec![
                "signal3_action",
                "signal3_action_available",
                "count",
                "function",
                "function_available",
                "synapses",
            ]
        );

        assert_eq!(groups[2].name, None);
        assert_eq!(groups[2].endpoint_names(), vec!["num_signals", "num_counts"]);
    }

    #[test]
    fn test_accessor_presence_gates_modes() {
        let device = quadrature_device();
        let groups = NamespaceBuilder::new(&device).build().unwrap();

        let signal = groups[0].endpoint("signal").unwrap();
        assert!(signal.readable);
        assert!(!signal.writable);

        // count_write and function_set/action_set are absent.
        let count = groups[1].endpoint("count").unwrap();
        assert!(count.readable);
        assert!(!count.writable);
        let function = groups[1].endpoint("function").unwrap();
        assert!(function.readable);
        assert!(!function.writable);
        let action = groups[1].endpoint("signal3_action").unwrap();
        assert!(action.readable);
        assert!(!action.writable);
    }

    #[test]
    fn test_signal_endpoint_listed_without_accessor() {
        let mut device = quadrature_device();
        device.ops.signal_read = None;
        let groups = NamespaceBuilder::new(&device).build().unwrap();

        let signal = groups[0].endpoint("signal").unwrap();
        assert!(!signal.readable);
        assert!(!signal.writable);
    }

    #[test]
    fn test_name_endpoints_only_when_named() {
        let signal = Arc::new(Signal::new(1).with_name("channel A"));
        let device = Device::new()
            .with_name("qdec0")
            .with_signal(signal.clone())
            .with_count(
                Count::new(2, vec![FunctionKind::QuadratureX4])
                    .with_name("position")
                    .with_synapse(Synapse::new(signal, vec![ActionKind::BothEdges])),
            );
        let groups = NamespaceBuilder::new(&device).build().unwrap();

        assert!(groups[0].endpoint("name").is_some());
        assert!(groups[1].endpoint("name").is_some());
        assert!(groups[2].endpoint("name").is_some());

        let unnamed = quadrature_device();
        let groups = NamespaceBuilder::new(&unnamed).build().unwrap();
        assert!(groups[0].endpoint("name").is_none());
        assert!(groups[1].endpoint("name").is_none());
        assert!(groups[2].endpoint("name").is_none());
    }

    #[test]
    fn test_extension_endpoints() {
        let signal = Arc::new(
            Signal::new(0).with_ext(
                counterd_types::SignalExt::new("index").with_read(|_| Ok("0\n".to_string())),
            ),
        );
        let device = Device::new()
            .with_signal(signal.clone())
            .with_count(
                Count::new(0, vec![FunctionKind::Increase])
                    .with_synapse(Synapse::new(signal, vec![ActionKind::RisingEdge])),
            )
            .with_ext(DeviceExt::new("errata"));
        let groups = NamespaceBuilder::new(&device).build().unwrap();

        let index = groups[0].endpoint("index").unwrap();
        assert!(index.readable);
        assert!(!index.writable);

        // An extension with no accessors is still listed.
        let errata = groups[2].endpoint("errata").unwrap();
        assert!(!errata.readable);
        assert!(!errata.writable);
    }

    #[test]
    fn test_invalid_models_rejected() {
        let no_signals = Device::new().with_count(Count::new(0, vec![FunctionKind::Increase]));
        assert!(NamespaceBuilder::new(&no_signals).build().unwrap_err().is_invalid_model());

        let signal = Arc::new(Signal::new(0));
        let no_counts = Device::new().with_signal(signal.clone());
        assert!(NamespaceBuilder::new(&no_counts).build().unwrap_err().is_invalid_model());

        let no_functions = Device::new()
            .with_signal(signal.clone())
            .with_count(Count::new(0, vec![]).with_synapse(Synapse::new(
                signal.clone(),
                vec![ActionKind::RisingEdge],
            )));
        assert!(NamespaceBuilder::new(&no_functions).build().unwrap_err().is_invalid_model());

        let no_synapses = Device::new()
            .with_signal(signal.clone())
            .with_count(Count::new(0, vec![FunctionKind::Increase]));
        assert!(NamespaceBuilder::new(&no_synapses).build().unwrap_err().is_invalid_model());

        let no_actions = Device::new()
            .with_signal(signal.clone())
            .with_count(
                Count::new(0, vec![FunctionKind::Increase])
                    .with_synapse(Synapse::new(signal.clone(), vec![])),
            );
        let err = NamespaceBuilder::new(&no_actions).build().unwrap_err();
        assert_eq!(
            err,
            CounterError::invalid_model("count 0: synapse 0 (signal 0): no action modes")
        );
    }

    #[test]
    fn test_capacity_failure_rolls_back() {
        let signal = Arc::new(Signal::new(3));
        let device = Device::new()
            .with_signal(signal.clone())
            .with_count(
                Count::new(0, vec![FunctionKind::Increase]).with_synapse(Synapse::new(
                    signal.clone(),
                    vec![ActionKind::RisingEdge],
                )),
            )
            .with_count(
                Count::new(1, vec![FunctionKind::Decrease]).with_synapse(Synapse::new(
                    signal.clone(),
                    vec![ActionKind::FallingEdge],
                )),
            );

        let baseline = Arc::strong_count(&signal);

        // Fails while building the second Count's endpoints.
        let err = NamespaceBuilder::new(&device)
            .with_limits(BuilderLimits {
                max_endpoints: Some(9),
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, CounterError::ResourceExhausted { .. }));

        // Everything built so far was released.
        assert_eq!(Arc::strong_count(&signal), baseline);
    }

    #[test]
    fn test_capacity_sufficient_succeeds() {
        let device = quadrature_device();
        let groups = NamespaceBuilder::new(&device)
            .with_limits(BuilderLimits {
                max_endpoints: Some(9),
            })
            .build()
            .unwrap();
        assert_eq!(groups.iter().map(|g| g.endpoints.len()).sum::<usize>(), 9);
    }
}
