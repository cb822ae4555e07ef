//! Device node, device extension attributes, and the driver accessor table.

use crate::{Count, CountValue, CountWriteValue, CounterResult, Signal, SignalLevel, Synapse};
use std::fmt;
use std::sync::Arc;

/// Read callback for the per-Signal `signal` attribute.
pub type SignalReadFn = Arc<dyn Fn(&Signal) -> CounterResult<SignalLevel> + Send + Sync>;

/// Read callback for the per-Count `count` attribute.
pub type CountReadFn = Arc<dyn Fn(&Count) -> CounterResult<CountValue> + Send + Sync>;

/// Write callback for the per-Count `count` attribute.
pub type CountWriteFn = Arc<dyn Fn(&Count, CountWriteValue) -> CounterResult<()> + Send + Sync>;

/// Returns the index of the Count's current function mode.
pub type FunctionGetFn = Arc<dyn Fn(&Count) -> CounterResult<usize> + Send + Sync>;

/// Activates the function mode at the given index of the Count's table.
pub type FunctionSetFn = Arc<dyn Fn(&Count, usize) -> CounterResult<()> + Send + Sync>;

/// Returns the index of the Synapse's current action mode.
pub type ActionGetFn = Arc<dyn Fn(&Count, &Synapse) -> CounterResult<usize> + Send + Sync>;

/// Activates the action mode at the given index of the Synapse's table.
pub type ActionSetFn = Arc<dyn Fn(&Count, &Synapse, usize) -> CounterResult<()> + Send + Sync>;

/// Read callback for a device extension attribute.
pub type DeviceExtReadFn = Arc<dyn Fn(&Device) -> CounterResult<String> + Send + Sync>;

/// Write callback for a device extension attribute.
pub type DeviceExtWriteFn = Arc<dyn Fn(&Device, &str) -> CounterResult<()> + Send + Sync>;

/// A driver-defined extension attribute attached to the device as a whole.
#[derive(Clone)]
pub struct DeviceExt {
    pub name: String,
    pub read: Option<DeviceExtReadFn>,
    pub write: Option<DeviceExtWriteFn>,
}

impl DeviceExt {
    /// Creates an extension with no accessors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read: None,
            write: None,
        }
    }

    /// Sets the read callback.
    pub fn with_read(
        mut self,
        read: impl Fn(&Device) -> CounterResult<String> + Send + Sync + 'static,
    ) -> Self {
        self.read = Some(Arc::new(read));
        self
    }

    /// Sets the write callback.
    pub fn with_write(
        mut self,
        write: impl Fn(&Device, &str) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.write = Some(Arc::new(write));
        self
    }
}

impl fmt::Debug for DeviceExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceExt")
            .field("name", &self.name)
            .field("read", &self.read.is_some())
            .field("write", &self.write.is_some())
            .finish()
    }
}

/// The optional driver accessor table.
///
/// Each accessor that is present gates the corresponding direction of the
/// built-in endpoints: an absent `signal_read` leaves every `signal`
/// endpoint listed but unreadable, an absent `count_write` leaves `count`
/// read-only, and so on.
#[derive(Clone, Default)]
pub struct DeviceOps {
    pub signal_read: Option<SignalReadFn>,
    pub count_read: Option<CountReadFn>,
    pub count_write: Option<CountWriteFn>,
    pub function_get: Option<FunctionGetFn>,
    pub function_set: Option<FunctionSetFn>,
    pub action_get: Option<ActionGetFn>,
    pub action_set: Option<ActionSetFn>,
}

impl DeviceOps {
    /// Creates an empty accessor table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Signal level read accessor.
    pub fn with_signal_read(
        mut self,
        f: impl Fn(&Signal) -> CounterResult<SignalLevel> + Send + Sync + 'static,
    ) -> Self {
        self.signal_read = Some(Arc::new(f));
        self
    }

    /// Sets the Count value read accessor.
    pub fn with_count_read(
        mut self,
        f: impl Fn(&Count) -> CounterResult<CountValue> + Send + Sync + 'static,
    ) -> Self {
        self.count_read = Some(Arc::new(f));
        self
    }

    /// Sets the Count value write accessor.
    pub fn with_count_write(
        mut self,
        f: impl Fn(&Count, CountWriteValue) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.count_write = Some(Arc::new(f));
        self
    }

    /// Sets the function mode get accessor.
    pub fn with_function_get(
        mut self,
        f: impl Fn(&Count) -> CounterResult<usize> + Send + Sync + 'static,
    ) -> Self {
        self.function_get = Some(Arc::new(f));
        self
    }

    /// Sets the function mode set accessor.
    pub fn with_function_set(
        mut self,
        f: impl Fn(&Count, usize) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.function_set = Some(Arc::new(f));
        self
    }

    /// Sets the action mode get accessor.
    pub fn with_action_get(
        mut self,
        f: impl Fn(&Count, &Synapse) -> CounterResult<usize> + Send + Sync + 'static,
    ) -> Self {
        self.action_get = Some(Arc::new(f));
        self
    }

    /// Sets the action mode set accessor.
    pub fn with_action_set(
        mut self,
        f: impl Fn(&Count, &Synapse, usize) -> CounterResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.action_set = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for DeviceOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceOps")
            .field("signal_read", &self.signal_read.is_some())
            .field("count_read", &self.count_read.is_some())
            .field("count_write", &self.count_write.is_some())
            .field("function_get", &self.function_get.is_some())
            .field("function_set", &self.function_set.is_some())
            .field("action_get", &self.action_get.is_some())
            .field("action_set", &self.action_set.is_some())
            .finish()
    }
}

/// One counting peripheral, fully described by its driver.
///
/// Constructed entirely before registration and logically frozen from then
/// on: the builder and dispatch layers read structural fields but never
/// mutate them.
#[derive(Debug, Default)]
pub struct Device {
    pub name: Option<String>,
    /// Optional parent path forwarded to the namespace host on publish.
    pub parent: Option<String>,
    pub signals: Vec<Arc<Signal>>,
    pub counts: Vec<Arc<Count>>,
    pub ext: Vec<Arc<DeviceExt>>,
    pub ops: DeviceOps,
}

impl Device {
    /// Creates an empty device description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the parent path.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Appends a Signal.
    pub fn with_signal(mut self, signal: Arc<Signal>) -> Self {
        self.signals.push(signal);
        self
    }

    /// Appends a Count.
    pub fn with_count(mut self, count: Count) -> Self {
        self.counts.push(Arc::new(count));
        self
    }

    /// Appends a device extension attribute.
    pub fn with_ext(mut self, ext: DeviceExt) -> Self {
        self.ext.push(Arc::new(ext));
        self
    }

    /// Sets the accessor table.
    pub fn with_ops(mut self, ops: DeviceOps) -> Self {
        self.ops = ops;
        self
    }

    /// Looks up a Signal by driver-chosen id.
    ///
    /// With duplicate ids the first match wins; duplicates are a driver
    /// error the core does not detect.
    pub fn signal(&self, id: i32) -> Option<&Arc<Signal>> {
        self.signals.iter().find(|s| s.id == id)
    }

    /// Looks up a Count by driver-chosen id.
    pub fn count(&self, id: i32) -> Option<&Arc<Count>> {
        self.counts.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionKind, FunctionKind};

    #[test]
    fn test_device_builder() {
        let signal = Arc::new(Signal::new(3));
        let device = Device::new()
            .with_name("qdec0")
            .with_signal(signal.clone())
            .with_count(
                Count::new(0, vec![FunctionKind::Increase])
                    .with_synapse(Synapse::new(signal, vec![ActionKind::RisingEdge])),
            )
            .with_ops(DeviceOps::new().with_signal_read(|_| Ok(SignalLevel::High)));

        assert_eq!(device.name.as_deref(), Some("qdec0"));
        assert_eq!(device.signals.len(), 1);
        assert_eq!(device.counts.len(), 1);
        assert!(device.ops.signal_read.is_some());
        assert!(device.ops.count_read.is_none());
        assert!(device.signal(3).is_some());
        assert!(device.signal(4).is_none());
        assert!(device.count(0).is_some());
    }

    #[test]
    fn test_ops_debug_shows_presence() {
        let ops = DeviceOps::new().with_count_read(|_| Ok(CountValue::Unsigned(0)));
        let rendered = format!("{ops:?}");
        assert!(rendered.contains("count_read: true"));
        assert!(rendered.contains("count_write: false"));
    }
}
